//! URL Utility Functions
//!
//! Resolution of link and image URLs against the page URL, used by the
//! sanitizer and by the CLI when it validates `--url`.

use url::Url;

use crate::{Error, Result};

/// Schemes whose URLs are kept exactly as written.
const VERBATIM_SCHEMES: &[&str] = &["data:", "javascript:", "mailto:", "tel:"];

/// Check if a string is a valid absolute URL with a scheme.
///
/// # Returns
/// * `(is_absolute, parsed_url)` - Whether URL is absolute and the parsed URL if valid
#[must_use]
pub fn is_absolute_url(s: &str) -> (bool, Option<Url>) {
    let s = s.trim();

    if s.is_empty() {
        return (false, None);
    }

    match Url::parse(s) {
        Ok(url) => (true, Some(url)),
        Err(_) => (false, None),
    }
}

/// Resolve a link or image URL against `base`.
///
/// Blank values and `data:`/`javascript:`/`mailto:`/`tel:` URLs come back
/// unchanged. Everything else is joined onto `base` and serialized in the
/// normalized form the `url` crate produces, so resolving an already
/// resolved value is a no-op.
///
/// # Errors
/// Returns the parser error when the value cannot be joined onto `base`;
/// callers keep the original value in that case.
pub fn resolve_url(value: &str, base: &Url) -> std::result::Result<String, url::ParseError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Ok(value.to_string());
    }

    let lower = trimmed.to_ascii_lowercase();
    if VERBATIM_SCHEMES.iter().any(|scheme| lower.starts_with(scheme)) {
        return Ok(value.to_string());
    }

    base.join(trimmed).map(String::from)
}

/// Parse the page URL the capture is anchored to.
pub fn parse_page_url(url_str: &str) -> Result<Url> {
    match is_absolute_url(url_str) {
        (true, Some(url)) => Ok(url),
        _ => Err(Error::InvalidUrl(url_str.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://example.com/blog/post.html").unwrap()
    }

    #[test]
    fn test_is_absolute_url_valid() {
        assert!(is_absolute_url("https://example.com").0);
        assert!(is_absolute_url("  http://example.com/path  ").0);
        assert!(is_absolute_url("mailto:someone@example.com").0);
    }

    #[test]
    fn test_is_absolute_url_invalid() {
        assert!(!is_absolute_url("").0);
        assert!(!is_absolute_url("/relative/path").0);
        assert!(!is_absolute_url("image.png").0);
    }

    #[test]
    fn test_resolve_relative() {
        assert_eq!(resolve_url("img/a.png", &base()).unwrap(), "https://example.com/blog/img/a.png");
        assert_eq!(resolve_url("/about", &base()).unwrap(), "https://example.com/about");
        assert_eq!(resolve_url("//cdn.example.org/x.js", &base()).unwrap(), "https://cdn.example.org/x.js");
        assert_eq!(resolve_url("#top", &base()).unwrap(), "https://example.com/blog/post.html#top");
    }

    #[test]
    fn test_resolve_absolute_is_stable() {
        let once = resolve_url("HTTPS://Example.com/a/../b", &base()).unwrap();
        let twice = resolve_url(&once, &base()).unwrap();
        assert_eq!(once, "https://example.com/b");
        assert_eq!(once, twice);
    }

    #[test]
    fn test_resolve_keeps_special_schemes() {
        for value in ["data:image/png;base64,AAAA", "javascript:void(0)", "mailto:a@b.c", "tel:+123"] {
            assert_eq!(resolve_url(value, &base()).unwrap(), value);
        }
        assert_eq!(resolve_url("", &base()).unwrap(), "");
    }

    #[test]
    fn test_resolve_failure_reports_error() {
        assert!(resolve_url("http://[::1", &base()).is_err());
    }

    #[test]
    fn test_parse_page_url() {
        assert!(parse_page_url("https://example.com/a").is_ok());
        assert!(matches!(parse_page_url("not a url"), Err(Error::InvalidUrl(_))));
    }
}
