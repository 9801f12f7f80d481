//! Saved-page decoding.
//!
//! Pages saved from a browser keep the bytes the server sent. Before parsing
//! they are transcoded to UTF-8 from their byte-order mark or, failing that,
//! their `<meta>` charset declaration.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Bytes examined for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// `<meta charset="...">` and `<meta http-equiv="Content-Type" content="...; charset=...">`
#[allow(clippy::expect_used)]
static CHARSET_DECLARATIONS: LazyLock<[Regex; 2]> = LazyLock::new(|| {
    [
        Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("valid meta charset pattern"),
        Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#)
            .expect("valid content-type pattern"),
    ]
});

/// Encoding of a saved page.
///
/// A byte-order mark wins; then the first charset declaration in the first
/// kilobyte that names an encoding known to the WHATWG Encoding Standard;
/// then UTF-8.
#[must_use]
pub fn detect_encoding(bytes: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(bytes) {
        return encoding;
    }

    let head = String::from_utf8_lossy(&bytes[..bytes.len().min(SNIFF_LEN)]);
    CHARSET_DECLARATIONS
        .iter()
        .filter_map(|re| re.captures(&head).and_then(|c| c.get(1)))
        .find_map(|label| Encoding::for_label(label.as_str().as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode a saved page to UTF-8.
///
/// Undecodable sequences become U+FFFD.
///
/// ```
/// use page_clipper::encoding::decode_page;
///
/// let html = b"<meta charset=\"iso-8859-1\"><p>caf\xE9</p>";
/// assert!(decode_page(html).contains("café"));
/// ```
#[must_use]
pub fn decode_page(bytes: &[u8]) -> String {
    let encoding = detect_encoding(bytes);
    let (decoded, used, had_errors) = encoding.decode(bytes);
    if had_errors {
        tracing::debug!("page is not valid {}; replaced undecodable bytes", used.name());
    }
    decoded.into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_charset() {
        let html = br#"<html><head><meta charset="windows-1252"></head></html>"#;
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn test_latin1_label_maps_to_windows_1252() {
        let html = br#"<meta charset='ISO-8859-1'>"#;
        assert_eq!(detect_encoding(html).name(), "windows-1252");
    }

    #[test]
    fn test_content_type_declaration() {
        let html = br#"<meta http-equiv="Content-Type" content="text/html; charset=Shift_JIS">"#;
        assert_eq!(detect_encoding(html).name(), "Shift_JIS");
    }

    #[test]
    fn test_bom_wins_over_declaration() {
        let mut html = vec![0xEF, 0xBB, 0xBF];
        html.extend_from_slice(br#"<meta charset="windows-1252"><p>x</p>"#);
        assert_eq!(detect_encoding(&html), UTF_8);
        assert!(decode_page(&html).starts_with("<meta"));
    }

    #[test]
    fn test_unknown_label_falls_back_to_utf8() {
        assert_eq!(detect_encoding(br#"<meta charset="klingon">"#), UTF_8);
        assert_eq!(detect_encoding(b"<p>no declaration</p>"), UTF_8);
    }

    #[test]
    fn test_decode_windows_1252() {
        let html = b"<meta charset=\"windows-1252\"><p>\x93quoted\x94 \x80</p>";
        let text = decode_page(html);
        assert!(text.contains("\u{201C}quoted\u{201D} \u{20AC}"));
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        let text = decode_page(b"<p>bad \xFF byte</p>");
        assert!(text.contains('\u{FFFD}'));
    }
}
