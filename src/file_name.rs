//! Note file names and locations.

use chrono::NaiveDate;

use crate::config::{Destination, FileNameRules};

/// Characters rejected by at least one common file system.
pub const RESERVED_CHARS: &[char] = &[':', '/', '\\', '?', '%', '*', '|', '"', '<', '>'];

/// Where the note should be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTarget {
    /// Folder inside the vault; empty for the vault root.
    pub folder: String,

    /// File name without extension.
    pub file_name: String,

    /// Vault name; empty lets the application choose.
    pub vault: String,
}

impl FileTarget {
    /// Build the target for a note.
    #[must_use]
    pub fn new(destination: &Destination, file_name: String) -> Self {
        Self {
            folder: destination.folder.clone(),
            file_name,
            vault: destination.vault.clone(),
        }
    }

    /// Vault-relative path of the note: folder and file name joined by `/`.
    #[must_use]
    pub fn path(&self) -> String {
        if self.folder.is_empty() || self.folder.ends_with('/') {
            format!("{}{}", self.folder, self.file_name)
        } else {
            format!("{}/{}", self.folder, self.file_name)
        }
    }
}

/// Replace every reserved character with `replacement`.
///
/// Reserved characters inside `replacement` itself are dropped, so the
/// output never contains one.
#[must_use]
pub fn replace_reserved(value: &str, replacement: &str) -> String {
    let replacement: String = replacement.chars().filter(|c| !RESERVED_CHARS.contains(c)).collect();
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        if RESERVED_CHARS.contains(&c) {
            result.push_str(&replacement);
        } else {
            result.push(c);
        }
    }
    result
}

/// Collapse every whitespace run to one space and trim both ends.
#[must_use]
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Compute `"{capture_date}-{title}"` as a file-system-safe name.
///
/// The title is cleaned of reserved characters and whitespace runs, then cut
/// so the whole name fits `rules.max_len` characters. The cut may land inside
/// a word. A blank title gives just the date.
///
/// ```
/// use chrono::NaiveDate;
/// use page_clipper::config::FileNameRules;
/// use page_clipper::file_name::note_file_name;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let name = note_file_name("AI: The Next Wave?", date, &FileNameRules::default());
/// assert_eq!(name, "2024-03-01-AI The Next Wave");
/// ```
#[must_use]
pub fn note_file_name(title: &str, capture_date: NaiveDate, rules: &FileNameRules) -> String {
    let prefix = capture_date.format("%Y-%m-%d").to_string();
    let safe_title = collapse_whitespace(&replace_reserved(title, &rules.replacement));

    if safe_title.is_empty() {
        return truncate_chars(&prefix, rules.max_len).to_string();
    }

    let budget = rules.max_len.saturating_sub(prefix.chars().count() + 1);
    let title_part = truncate_chars(&safe_title, budget).trim_end();
    if title_part.is_empty() {
        return truncate_chars(&prefix, rules.max_len).to_string();
    }

    format!("{prefix}-{title_part}")
}

/// Longest prefix of `value` with at most `max` characters.
fn truncate_chars(value: &str, max: usize) -> &str {
    match value.char_indices().nth(max) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
