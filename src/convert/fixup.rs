//! Nested image-link fix-up.
//!
//! Pages often wrap an image in a link to the same image or to an article.
//! After conversion that reads `[![alt](img)](link)`, frequently with line
//! breaks between the brackets, which most Markdown renderers show as a bare
//! link. The fix-up rewrites those constructs after conversion.

use regex::Regex;
use std::sync::LazyLock;

use crate::config::ImageLinkFixup;

/// `[ ![alt](img) ](link)`, whitespace allowed inside the outer brackets.
///
/// Destinations may hold escaped characters and one level of balanced
/// parentheses, as in `Foo_(bar).png`.
#[allow(clippy::expect_used)]
static NESTED_IMAGE_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?s)\[\s*!\[((?:\\.|[^\]\\])*)\]\(((?:\\.|\([^()]*\)|[^()\\])*)\)\s*\]\(((?:\\.|\([^()]*\)|[^()\\])*)\)",
    )
    .expect("valid nested image link pattern")
});

/// Apply the fix-up until nothing changes.
///
/// [`ImageLinkFixup::Unwrap`] keeps only the image; [`ImageLinkFixup::Compact`]
/// keeps the outer link and removes the whitespace inside it.
///
/// ```
/// use page_clipper::config::ImageLinkFixup;
/// use page_clipper::convert::fix_nested_image_links;
///
/// let md = "[![alt](img.png)](page.html)";
/// assert_eq!(fix_nested_image_links(md, ImageLinkFixup::Unwrap), "![alt](img.png)");
/// assert_eq!(fix_nested_image_links("[\n![a](i)\n](l)", ImageLinkFixup::Compact), "[![a](i)](l)");
/// ```
#[must_use]
pub fn fix_nested_image_links(markdown: &str, mode: ImageLinkFixup) -> String {
    let replacement = match mode {
        ImageLinkFixup::Unwrap => "![$1]($2)",
        ImageLinkFixup::Compact => "[![$1]($2)]($3)",
    };

    let mut current = markdown.to_string();
    loop {
        let next = NESTED_IMAGE_LINK.replace_all(&current, replacement).into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}
