//! Markdown text utilities.
//!
//! Low-level helpers shared by the conversion engine and its rules: escaping
//! text nodes, collapsing whitespace, joining converted chunks and cleaning
//! the final output.

use regex::Regex;
use std::sync::LazyLock;

/// Characters escaped anywhere in a text node.
const MARKDOWN_SPECIAL_CHARS: &[char] = &['\\', '*', '_', '`', '[', ']'];

/// Markers that only mean something at the start of a text node.
#[allow(clippy::expect_used)]
static LINE_START_PATTERNS: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"^-", r"\-"),
        (r"^\+ ", r"\+ "),
        (r"^(=+)", r"\$1"),
        (r"^(#{1,6}) ", r"\$1 "),
        (r"^~~~", r"\~~~"),
        (r"^>", r"\>"),
        (r"^(\d+)\. ", r"$1\. "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).expect("valid line-start pattern"), replacement))
    .collect()
});

/// Runs of HTML whitespace.
#[allow(clippy::expect_used)]
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r\n\x0C]+").expect("valid whitespace pattern"));

/// Escape Markdown special characters in a text node.
///
/// Backslashes, emphasis markers, backticks and brackets are escaped
/// everywhere. Heading, list, quote, rule and fence markers are escaped only
/// at the start of the text, where they would otherwise start a block.
///
/// # Examples
///
/// ```
/// use page_clipper::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*not italic*"), r"\*not italic\*");
/// assert_eq!(escape_markdown("my_variable_name"), r"my\_variable\_name");
/// assert_eq!(escape_markdown("# not a heading"), r"\# not a heading");
/// assert_eq!(escape_markdown("1. not a list"), r"1\. not a list");
/// assert_eq!(escape_markdown("a - b"), "a - b");
/// ```
#[must_use]
pub fn escape_markdown(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut result = String::with_capacity(text.len() + text.len() / 4);
    for ch in text.chars() {
        if MARKDOWN_SPECIAL_CHARS.contains(&ch) {
            result.push('\\');
        }
        result.push(ch);
    }

    for (pattern, replacement) in LINE_START_PATTERNS.iter() {
        if pattern.is_match(&result) {
            result = pattern.replace(&result, *replacement).into_owned();
            break;
        }
    }

    result
}

/// Collapse every run of HTML whitespace to a single space.
///
/// Non-breaking spaces are content and survive.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_RUN.replace_all(text, " ").into_owned()
}

/// Append a converted chunk to the output.
///
/// Newlines at the seam are merged: the separator keeps the larger of the two
/// newline runs, capped at one blank line.
#[must_use]
pub fn join_chunks(output: &str, chunk: &str) -> String {
    let head = output.trim_end_matches('\n');
    let tail = chunk.trim_start_matches('\n');
    let newlines = (output.len() - head.len()).max(chunk.len() - tail.len()).min(2);

    let mut joined = String::with_capacity(head.len() + newlines + tail.len());
    joined.push_str(head);
    for _ in 0..newlines {
        joined.push('\n');
    }
    joined.push_str(tail);
    joined
}

/// Longest run of consecutive `marker` characters in `text`.
#[must_use]
pub fn longest_run(text: &str, marker: char) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for ch in text.chars() {
        if ch == marker {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Tidy converted Markdown.
///
/// Outside fenced code, whitespace-only lines become empty and blank-line
/// runs collapse to one. Fenced code is left byte for byte. Leading
/// newlines and all trailing whitespace are removed.
#[must_use]
pub fn clean_output(markdown: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut open_fence: Option<(char, usize)> = None;
    let mut previous_blank = false;

    for line in markdown.split('\n') {
        let trimmed = line.trim_start();

        if let Some((marker, len)) = open_fence {
            if trimmed.starts_with(marker)
                && longest_run(trimmed, marker) >= len
                && trimmed.trim_start_matches(marker).trim().is_empty()
            {
                open_fence = None;
            }
            lines.push(line);
            previous_blank = false;
            continue;
        }

        if let Some(marker) = fence_marker(trimmed) {
            open_fence = Some((marker, trimmed.chars().take_while(|c| *c == marker).count()));
        }

        if line.trim().is_empty() {
            if !previous_blank {
                lines.push("");
            }
            previous_blank = true;
        } else {
            lines.push(line);
            previous_blank = false;
        }
    }

    lines
        .join("\n")
        .trim_start_matches(['\n', '\r', '\t'])
        .trim_end()
        .to_string()
}

/// Opening fence character of a line, if the line opens a fenced block.
fn fence_marker(line: &str) -> Option<char> {
    ['`', '~']
        .into_iter()
        .find(|marker| line.chars().take_while(|c| c == marker).count() >= 3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_inline_chars() {
        assert_eq!(escape_markdown("a*b"), r"a\*b");
        assert_eq!(escape_markdown("[link]"), r"\[link\]");
        assert_eq!(escape_markdown(r"back\slash"), r"back\\slash");
        assert_eq!(escape_markdown("use `x`"), r"use \`x\`");
    }

    #[test]
    fn test_escape_line_start_markers() {
        assert_eq!(escape_markdown("- item"), r"\- item");
        assert_eq!(escape_markdown("+ item"), r"\+ item");
        assert_eq!(escape_markdown("== title"), r"\== title");
        assert_eq!(escape_markdown("## title"), r"\## title");
        assert_eq!(escape_markdown("> quote"), r"\> quote");
        assert_eq!(escape_markdown("~~~"), r"\~~~");
        assert_eq!(escape_markdown("42. answer"), r"42\. answer");
    }

    #[test]
    fn test_escape_leaves_mid_text_markers() {
        assert_eq!(escape_markdown("x # y"), "x # y");
        assert_eq!(escape_markdown("x > y"), "x > y");
        assert_eq!(escape_markdown("1.5 litres"), "1.5 litres");
        assert_eq!(escape_markdown(""), "");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("a \n\t b"), "a b");
        assert_eq!(collapse_whitespace("  a  "), " a ");
        assert_eq!(collapse_whitespace("a\u{a0}\u{a0}b"), "a\u{a0}\u{a0}b");
    }

    #[test]
    fn test_join_chunks() {
        assert_eq!(join_chunks("a", "b"), "ab");
        assert_eq!(join_chunks("a\n\n", "\n\nb"), "a\n\nb");
        assert_eq!(join_chunks("a\n", "b"), "a\nb");
        assert_eq!(join_chunks("a\n\n\n\n", "b"), "a\n\nb");
        assert_eq!(join_chunks("", "\n\nb"), "\n\nb");
    }

    #[test]
    fn test_longest_run() {
        assert_eq!(longest_run("a `` b ```` c", '`'), 4);
        assert_eq!(longest_run("none", '`'), 0);
    }

    #[test]
    fn test_clean_output_collapses_blank_lines() {
        assert_eq!(clean_output("\n\na\n  \n\n\nb\n\n"), "a\n\nb");
    }

    #[test]
    fn test_clean_output_keeps_fenced_code() {
        let md = "text\n\n```\nline\n\n\n   \nend\n```\n\n\nafter";
        assert_eq!(clean_output(md), "text\n\n```\nline\n\n\n   \nend\n```\n\nafter");
    }

    #[test]
    fn test_clean_output_longer_fence() {
        let md = "````\n```\ninner\n```\n\n\n````\n\n\nx";
        assert_eq!(clean_output(md), "````\n```\ninner\n```\n\n\n````\n\nx");
    }
}
