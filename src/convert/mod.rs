//! Structured-text conversion.
//!
//! Turns sanitized HTML into the Markdown body of a note: a rule-driven
//! [`ConversionEngine`] configured with the clipper's rules, followed by the
//! nested image-link fix-up.

pub mod engine;
pub mod fixup;
pub mod rules;

pub use engine::{CodeBlockStyle, ConversionEngine, Filter, HeadingStyle, Replacement, Rule, StyleOptions};
pub use fixup::fix_nested_image_links;
pub use rules::{register_clipper_rules, KEPT_TAGS};

use crate::config::ImageLinkFixup;
use crate::sanitize::SanitizedHtml;

/// HTML to Markdown converter used by the clipper.
#[derive(Debug)]
pub struct MarkdownConverter {
    engine: ConversionEngine,
    fixup: ImageLinkFixup,
}

impl MarkdownConverter {
    /// Converter with the default style, the clipper's rules and the given
    /// image-link fix-up.
    #[must_use]
    pub fn new(fixup: ImageLinkFixup) -> Self {
        let mut engine = ConversionEngine::new(StyleOptions::default());
        register_clipper_rules(&mut engine);
        Self { engine, fixup }
    }

    /// Wrap an already configured engine.
    #[must_use]
    pub fn with_engine(engine: ConversionEngine, fixup: ImageLinkFixup) -> Self {
        Self { engine, fixup }
    }

    /// The underlying engine, for registering further rules.
    pub fn engine_mut(&mut self) -> &mut ConversionEngine {
        &mut self.engine
    }

    /// Convert sanitized HTML to the note body.
    #[must_use]
    pub fn convert(&self, html: &SanitizedHtml) -> String {
        let markdown = self.engine.convert(html.as_str());
        fix_nested_image_links(&markdown, self.fixup)
    }
}

impl Default for MarkdownConverter {
    fn default() -> Self {
        Self::new(ImageLinkFixup::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sanitize::sanitize;
    use url::Url;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn test_linked_image_is_unwrapped() {
        let html = sanitize(r#"<p><a href="page.html"><img src="img.png" alt="alt"></a></p>"#, &base());
        let md = MarkdownConverter::default().convert(&html);
        assert_eq!(md, "![alt](https://example.com/blog/img.png)");
    }

    #[test]
    fn test_compact_fixup() {
        let html = sanitize(r#"<a href="/p"><img src="/i.png" alt="x"></a>"#, &base());
        let md = MarkdownConverter::new(ImageLinkFixup::Compact).convert(&html);
        assert_eq!(md, "[![x](https://example.com/i.png)](https://example.com/p)");
    }

    #[test]
    fn test_article_body() {
        let html = sanitize(
            r#"<h2>Intro</h2>
            <p>Read the <a href="/docs">docs</a>.</p>
            <pre><code class="language-sh">cargo run</code></pre>
            <ul><li>one</li><li>two</li></ul>"#,
            &base(),
        );
        let md = MarkdownConverter::default().convert(&html);
        assert_eq!(
            md,
            "## Intro\n\nRead the [docs](https://example.com/docs).\n\n```sh\ncargo run\n```\n\n- one\n- two"
        );
    }
}
