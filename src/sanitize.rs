//! HTML sanitizing.
//!
//! Strips elements that never belong in a note and makes every link and
//! image URL absolute, so the converted Markdown still works once it leaves
//! the page it came from.

use url::Url;

use crate::dom::{self, Document, Selection};
use crate::url_utils;

/// Elements removed before conversion.
pub const REMOVED_SELECTOR: &str = r#"script, style, iframe, nav, footer, .advertisement, .social-share, .comments, [role="complementary"], .sidebar"#;

/// HTML that went through [`sanitize`].
///
/// Holds no script, style or navigational element and no relative link or
/// image URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SanitizedHtml(String);

impl SanitizedHtml {
    /// The HTML.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the HTML out.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for SanitizedHtml {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SanitizedHtml {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Clean an HTML fragment for conversion.
///
/// # Arguments
/// * `html` - Captured HTML fragment
/// * `base_url` - URL of the page the fragment came from
///
/// Running it twice gives the same result as running it once.
#[must_use]
pub fn sanitize(html: &str, base_url: &Url) -> SanitizedHtml {
    let doc = Document::from(html);
    let body = doc.select("body");

    body.select(REMOVED_SELECTOR).remove();

    resolve_attribute(&body.select("a[href]"), "href", base_url);
    resolve_attribute(&body.select("img[src]"), "src", base_url);

    SanitizedHtml(dom::inner_html(&body).to_string())
}

/// Make one URL attribute absolute on every element of `sel`.
///
/// Values that fail to resolve are kept as they are.
fn resolve_attribute(sel: &Selection, attr: &str, base_url: &Url) {
    for node in sel.nodes() {
        let element = Selection::from(*node);
        let Some(value) = dom::get_attribute(&element, attr) else {
            continue;
        };

        match url_utils::resolve_url(&value, base_url) {
            Ok(resolved) if resolved != value => dom::set_attribute(&element, attr, &resolved),
            Ok(_) => {}
            Err(err) => tracing::debug!("keeping unresolvable {attr} {value:?}: {err}"),
        }
    }
}
