//! Metadata extraction module.
//!
//! Derives the note's title, author, description, keywords and dates from the
//! page's meta tags and DOM, with the readable-content extraction result as an
//! extra source when one exists. Extraction never fails: every field has a
//! fallback, ending in an empty string or the capture date.

pub mod date;
pub mod meta_tags;

use chrono::NaiveDate;
use dom_query::Document;
use uuid::Uuid;

use crate::config::NoteProfile;
use crate::file_name;
use crate::readable::ReadableArticle;

pub use date::{parse_publication_date, publication_date, DATE_SELECTORS};

/// Quote characters stripped from front-matter values.
const QUOTE_CHARS: &[char] = &['"', '\'', '\u{201C}', '\u{201D}', '\u{2018}', '\u{2019}'];

/// Metadata describing one capture.
///
/// Text fields are already sanitized for the front-matter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageMetadata {
    /// Note title; agrees with the heading line and the file name.
    pub title: String,

    /// Author, or empty.
    pub author: String,

    /// Page description, or empty.
    pub description: String,

    /// Publication date; the capture date when none is discoverable.
    pub publication_date: NaiveDate,

    /// Day of the capture.
    pub capture_date: NaiveDate,

    /// URL of the captured page.
    pub source_url: String,

    /// Fresh random id for this capture.
    pub id: Uuid,

    /// Entries of the page's keywords meta.
    pub keywords: Vec<String>,
}

/// Extract all metadata from a page.
///
/// # Arguments
/// * `doc` - The page document (never modified)
/// * `source_url` - URL of the page
/// * `article` - Readable-content extraction result, when extraction ran
/// * `profile` - Source priorities and file-name rules
/// * `capture_date` - Today
#[must_use]
pub fn extract_metadata(
    doc: &Document,
    source_url: &str,
    article: Option<&ReadableArticle>,
    profile: &NoteProfile,
    capture_date: NaiveDate,
) -> PageMetadata {
    let title = profile
        .title_sources
        .iter()
        .find_map(|source| meta_tags::title_from(doc, *source, article))
        .unwrap_or_default();

    let author = profile
        .author_sources
        .iter()
        .find_map(|source| meta_tags::author_from(doc, *source, article))
        .unwrap_or_default();

    let description = meta_tags::description(doc).unwrap_or_default();

    let keywords = meta_tags::keywords(doc)
        .iter()
        .map(|k| sanitize_front_matter_value(k).trim().to_string())
        .filter(|k| !k.is_empty())
        .collect();

    PageMetadata {
        title: clean_title(&title, &profile.file_name.replacement),
        author: sanitize_front_matter_value(&author).trim().to_string(),
        description: sanitize_front_matter_value(&description),
        publication_date: publication_date(doc, capture_date),
        capture_date,
        source_url: source_url.to_string(),
        id: Uuid::new_v4(),
        keywords,
    }
}

/// Make a free-text value safe inside a front-matter block.
///
/// Removes straight and curly quotes and turns colons and line breaks into
/// spaces.
///
/// ```
/// use page_clipper::metadata::sanitize_front_matter_value;
///
/// assert_eq!(sanitize_front_matter_value("“Hi”: it's\nme"), "Hi  its me");
/// ```
#[must_use]
pub fn sanitize_front_matter_value(value: &str) -> String {
    value
        .chars()
        .filter(|c| !QUOTE_CHARS.contains(c))
        .map(|c| if matches!(c, ':' | '\n' | '\r') { ' ' } else { c })
        .collect()
}

/// Clean a title for the front matter, the heading line and the file name.
///
/// On top of [`sanitize_front_matter_value`], characters file systems reject
/// are replaced and whitespace is collapsed.
#[must_use]
pub fn clean_title(title: &str, replacement: &str) -> String {
    let sanitized = sanitize_front_matter_value(title);
    let replaced = file_name::replace_reserved(&sanitized, replacement);
    file_name::collapse_whitespace(&replaced)
}
