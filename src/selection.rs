//! Page snapshots and content selection.
//!
//! A capture works on the part of the page the user selected or, when
//! nothing is selected, on the readable article the extractor finds.

use url::Url;

use crate::config::ExtractionOptions;
use crate::dom::{self, Document};
use crate::error::{Error, Result};
use crate::readable::{ContentExtractor, ReadableArticle};

/// The loaded page as the clipper sees it. Never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSnapshot {
    /// Full page HTML.
    pub html: String,

    /// Page URL, the base for relative links.
    pub url: Url,

    /// HTML of each selected range; empty when nothing is selected.
    pub selection: Vec<String>,
}

impl PageSnapshot {
    /// Snapshot without a selection.
    #[must_use]
    pub fn new(html: impl Into<String>, url: Url) -> Self {
        Self {
            html: html.into(),
            url,
            selection: Vec::new(),
        }
    }

    /// Replace the selection.
    #[must_use]
    pub fn with_selection(mut self, selection: Vec<String>) -> Self {
        self.selection = selection;
        self
    }

    /// Whether any selected range holds more than whitespace.
    #[must_use]
    pub fn has_selection(&self) -> bool {
        self.selection.iter().any(|range| !range.trim().is_empty())
    }
}

/// HTML chosen for conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedContent {
    /// HTML fragment to sanitize and convert.
    pub source_html: String,

    /// `true` when the HTML is the user's selection.
    pub is_user_selection: bool,
}

/// Choose the HTML to capture.
///
/// A non-blank selection wins and is copied into a detached container.
/// Otherwise `extractor` runs on the page; its article is returned alongside
/// for metadata lookups.
///
/// # Arguments
/// * `snapshot` - The page
/// * `doc` - The page parsed, shared with metadata extraction
/// * `extractor` - Readable-content extractor
/// * `options` - Extractor thresholds
pub fn select_content(
    snapshot: &PageSnapshot,
    doc: &Document,
    extractor: &dyn ContentExtractor,
    options: &ExtractionOptions,
) -> Result<(CapturedContent, Option<ReadableArticle>)> {
    if snapshot.has_selection() {
        tracing::debug!("capturing {} selected range(s)", snapshot.selection.len());
        let content = CapturedContent {
            source_html: dom::detached_container(&snapshot.selection),
            is_user_selection: true,
        };
        return Ok((content, None));
    }

    let article = extractor
        .extract(doc, &snapshot.url, options)
        .filter(|a| !a.content.trim().is_empty())
        .ok_or(Error::NoContent)?;

    let content = CapturedContent {
        source_html: article.content.clone(),
        is_user_selection: false,
    };
    Ok((content, Some(article)))
}

/// Outer HTML of every element matching `selector`, in document order.
///
/// Stands in for a browser selection when capturing a saved page. A
/// selector that does not parse matches nothing.
#[must_use]
pub fn selection_from_css(html: &str, selector: &str) -> Vec<String> {
    let doc = Document::from(html);
    doc.select(selector).nodes().iter().map(|node| node.html().to_string()).collect()
}
