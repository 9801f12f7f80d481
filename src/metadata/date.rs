//! Publication date discovery.
//!
//! Candidate elements are tried in a fixed order; the first one whose value
//! parses as a calendar date wins. Anything unparsable is skipped, and a page
//! with no usable candidate is dated on the day it was captured.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use dom_query::Document;

use crate::dom;

/// Date candidates, in priority order.
pub const DATE_SELECTORS: &[&str] = &[
    r#"meta[property="article:published_time"]"#,
    r#"meta[name="publication-date"]"#,
    r#"meta[name="date"]"#,
    r#"meta[property="og:published_time"]"#,
    "[datetime]",
    r#"meta[name="publish-date"]"#,
];

/// Date-time shapes carrying a UTC offset (`+0100` or `+01:00`).
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"];

/// Date-time shapes without an offset.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Date-only shapes.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%B %d, %Y", // January 15, 2024
    "%b %d, %Y", // Jan 15, 2024
    "%d %B %Y",  // 15 January 2024
    "%d %b %Y",  // 15 Jan 2024
];

/// Find the page's publication date, falling back to `capture_date`.
#[must_use]
pub fn publication_date(doc: &Document, capture_date: NaiveDate) -> NaiveDate {
    for selector in DATE_SELECTORS {
        let Some(node) = doc.select(selector).nodes().first().copied() else {
            continue;
        };

        let value = dom::node_attribute(&node, "content")
            .filter(|v| !v.is_empty())
            .or_else(|| dom::node_attribute(&node, "datetime"));
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            continue;
        };

        match parse_publication_date(&value) {
            Some(date) => return date,
            None => tracing::debug!("unparsable date {value:?} in {selector}"),
        }
    }

    capture_date
}

/// Parse a date string as found in meta tags and `datetime` attributes.
///
/// Values with an offset keep the calendar date of that offset, so
/// `2024-03-15T23:30:00-05:00` is the 15th.
///
/// ```
/// use page_clipper::metadata::parse_publication_date;
///
/// let date = parse_publication_date("2024-3-5T08:00:00Z").unwrap();
/// assert_eq!(date.to_string(), "2024-03-05");
/// assert!(parse_publication_date("last tuesday").is_none());
/// ```
#[must_use]
pub fn parse_publication_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.date_naive());
    }

    // `Z` is not accepted by %z
    let with_offset = value.strip_suffix('Z').map_or_else(|| value.to_string(), |v| format!("{v}+00:00"));
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(&with_offset, fmt) {
            return Some(dt.date_naive());
        }
    }

    for fmt in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(dt.date());
        }
    }

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return Some(date);
        }
    }

    // Year and month only: first of the month
    NaiveDate::parse_from_str(&format!("{value}-01"), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn test_parse_formats() {
        let cases = [
            ("2024-03-15", "2024-03-15"),
            ("2024-03-15T10:30:00Z", "2024-03-15"),
            ("2024-03-15T10:30:00+00:00", "2024-03-15"),
            ("2024-03-15T10:30:00.123456+0530", "2024-03-15"),
            ("2024-03-15T23:30:00-05:00", "2024-03-15"),
            ("2024-03-15T10:30", "2024-03-15"),
            ("2024-03-15 10:30:00", "2024-03-15"),
            ("Fri, 15 Mar 2024 10:30:00 +0000", "2024-03-15"),
            ("2024/03/15", "2024-03-15"),
            ("03/15/2024", "2024-03-15"),
            ("March 5, 2024", "2024-03-05"),
            ("Mar 5, 2024", "2024-03-05"),
            ("5 March 2024", "2024-03-05"),
            ("2024-03", "2024-03-01"),
            ("2024-3-5", "2024-03-05"),
        ];

        for (input, expected) in cases {
            let parsed = parse_publication_date(input);
            assert_eq!(parsed.map(|d| d.to_string()).as_deref(), Some(expected), "input: {input}");
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "   ", "invalid date", "2024-13-45", "yesterday", "32/01/2024"] {
            assert!(parse_publication_date(input).is_none(), "input: {input}");
        }
    }

    #[test]
    fn test_publication_date_first_selector_wins() {
        let doc = Document::from(
            r#"<html><head>
            <meta name="date" content="2023-01-02">
            <meta property="article:published_time" content="2022-05-06T07:08:09Z">
            </head><body></body></html>"#,
        );
        assert_eq!(publication_date(&doc, today()).to_string(), "2022-05-06");
    }

    #[test]
    fn test_publication_date_skips_unparsable_candidate() {
        let doc = Document::from(
            r#"<html><head>
            <meta property="article:published_time" content="not a date">
            </head><body><time datetime="2021-11-12">Nov 12</time></body></html>"#,
        );
        assert_eq!(publication_date(&doc, today()).to_string(), "2021-11-12");
    }

    #[test]
    fn test_publication_date_falls_back_to_capture_date() {
        let doc = Document::from("<html><head><title>t</title></head><body><p>x</p></body></html>");
        assert_eq!(publication_date(&doc, today()), today());

        let doc = Document::from(r#"<html><head><meta name="date" content="soon"></head><body></body></html>"#);
        assert_eq!(publication_date(&doc, today()), today());
    }
}
