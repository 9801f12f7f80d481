//! HTML meta tag lookups
//!
//! Every metadata field is filled from an ordered list of sources; each
//! source is a lookup returning `Option<String>` and the first `Some` wins.
//! The lookups here know nothing about priority, the caller supplies it.

use dom_query::Document;

use crate::config::{AuthorSource, TitleSource};
use crate::dom;
use crate::readable::ReadableArticle;

/// Description sources, in priority order: `(attribute, value)`.
const DESCRIPTION_METAS: &[(&str, &str)] = &[
    ("name", "description"),
    ("property", "description"),
    ("property", "og:description"),
    ("name", "twitter:description"),
];

/// Look up a title from one source.
#[must_use]
pub fn title_from(doc: &Document, source: TitleSource, article: Option<&ReadableArticle>) -> Option<String> {
    match source {
        TitleSource::OpenGraph => dom::meta_content(doc, "property", "og:title"),
        TitleSource::Twitter => dom::meta_content(doc, "name", "twitter:title"),
        TitleSource::Document => document_title(doc),
        TitleSource::Readable => article.and_then(|a| non_blank(&a.title)),
    }
}

/// Look up an author from one source.
#[must_use]
pub fn author_from(doc: &Document, source: AuthorSource, article: Option<&ReadableArticle>) -> Option<String> {
    match source {
        AuthorSource::Byline => article.and_then(|a| a.byline.as_deref()).and_then(non_blank),
        AuthorSource::MetaName => dom::meta_content(doc, "name", "author"),
        AuthorSource::MetaProperty => dom::meta_content(doc, "property", "author"),
        AuthorSource::ArticleAuthor => dom::meta_content(doc, "property", "article:author"),
        AuthorSource::SiteName => dom::meta_content(doc, "property", "og:site_name"),
        AuthorSource::Bylines => dom::meta_content(doc, "name", "bylines"),
    }
}

/// First non-empty description meta.
#[must_use]
pub fn description(doc: &Document) -> Option<String> {
    DESCRIPTION_METAS
        .iter()
        .find_map(|(attr, value)| dom::meta_content(doc, attr, value))
}

/// Entries of `<meta name="keywords">`, matched case-insensitively on the name.
#[must_use]
pub fn keywords(doc: &Document) -> Vec<String> {
    let content = doc
        .select("meta[name]")
        .nodes()
        .iter()
        .find(|node| {
            dom::node_attribute(node, "name").is_some_and(|name| name.eq_ignore_ascii_case("keywords"))
        })
        .and_then(|node| dom::node_attribute(node, "content"))
        .unwrap_or_default();

    content
        .split(',')
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Text of the document's `<title>` element.
#[must_use]
pub fn document_title(doc: &Document) -> Option<String> {
    let node = doc.select("title").nodes().first().copied()?;
    non_blank(&node.text())
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
