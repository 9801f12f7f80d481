//! Readable-content extraction.
//!
//! The extractor finds the main article of a page and returns it as HTML,
//! together with the title and byline it saw. The pipeline only depends on the
//! [`ContentExtractor`] trait; the default backend is `dom_smoothie`, a port of
//! Mozilla Readability.

use dom_query::Document;
use url::Url;

use crate::config::ExtractionOptions;

/// Main content found by an extractor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReadableArticle {
    /// Article title as the extractor saw it.
    pub title: String,

    /// Author line, when the extractor found one.
    pub byline: Option<String>,

    /// Article HTML.
    pub content: String,
}

/// A readable-content extractor.
///
/// Implementations receive the page document read-only and must work on their
/// own copy if they need to mutate it. `None` means no readable article was
/// found; implementations log their own failure details.
pub trait ContentExtractor {
    /// Extract the main article of `doc`.
    fn extract(&self, doc: &Document, page_url: &Url, options: &ExtractionOptions) -> Option<ReadableArticle>;
}

/// Extractor backed by `dom_smoothie`.
#[cfg(feature = "readability")]
#[derive(Debug, Clone, Copy, Default)]
pub struct SmoothieExtractor;

#[cfg(feature = "readability")]
impl ContentExtractor for SmoothieExtractor {
    fn extract(&self, doc: &Document, page_url: &Url, options: &ExtractionOptions) -> Option<ReadableArticle> {
        use dom_smoothie::{Config, Readability};

        let cfg = Config {
            char_threshold: options.char_threshold,
            classes_to_preserve: options.classes_to_preserve.clone(),
            ..Config::default()
        };

        // Readability rewrites the tree it parses; hand it a detached copy
        let snapshot = crate::dom::clone_document(doc).html().to_string();

        let mut reader = match Readability::new(snapshot, Some(page_url.as_str()), Some(cfg)) {
            Ok(reader) => reader,
            Err(err) => {
                tracing::warn!("readability setup failed: {err}");
                return None;
            }
        };

        let article = match reader.parse() {
            Ok(article) => article,
            Err(err) => {
                tracing::warn!("readability found no article: {err}");
                return None;
            }
        };

        let content = article.content.to_string();
        if content.trim().is_empty() {
            return None;
        }

        Some(ReadableArticle {
            title: article.title.to_string(),
            byline: article.byline.map(|b| b.to_string()),
            content,
        })
    }
}

#[cfg(all(test, feature = "readability"))]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"<!DOCTYPE html>
        <html>
        <head><title>Sample Article</title></head>
        <body>
            <nav><a href="/">Home</a> <a href="/about">About</a></nav>
            <article>
                <h1>Sample Article</h1>
                <p>This is the first paragraph of the article. It contains enough
                meaningful prose to be recognised as the main content of the page,
                well above any character threshold a reader might configure.</p>
                <p>Here is a second paragraph with more content. Extraction should
                keep this text while removing the navigation and the footer that
                surround the article on the page.</p>
                <p>A third paragraph, so the candidate scores comfortably and the
                extractor has no reason to doubt that this block is the article.</p>
            </article>
            <footer>Copyright</footer>
        </body>
        </html>"#;

    fn url() -> Url {
        Url::parse("https://example.com/posts/sample").unwrap()
    }

    #[test]
    fn test_extracts_article_body() {
        let doc = Document::from(ARTICLE);
        let article = SmoothieExtractor
            .extract(&doc, &url(), &ExtractionOptions::default())
            .expect("article should be found");

        assert!(article.content.contains("first paragraph"));
        assert!(article.content.contains("third paragraph"));
        assert!(!article.title.is_empty());
    }

    #[test]
    fn test_page_document_is_not_modified() {
        let doc = Document::from(ARTICLE);
        let before = doc.html().to_string();
        let _ = SmoothieExtractor.extract(&doc, &url(), &ExtractionOptions::default());
        assert_eq!(doc.html().to_string(), before);
    }
}
