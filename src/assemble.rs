//! Note assembly.
//!
//! A note is a front-matter block, a `# title` heading and, for full
//! captures, the converted body. Everything here is plain string building:
//! the same metadata and body always give the same note.

use serde::{Deserialize, Serialize};

use crate::config::NoteProfile;
use crate::error::{Error, Result};
use crate::metadata::PageMetadata;

/// What a capture keeps of the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CaptureMode {
    /// Front matter and title only.
    MetadataOnly,
    /// Front matter, title and the converted content.
    Full,
}

impl CaptureMode {
    /// Parse the answer to the capture-mode prompt.
    ///
    /// Only `"1"` and `"2"` are accepted; surrounding whitespace is ignored.
    ///
    /// ```
    /// use page_clipper::assemble::CaptureMode;
    ///
    /// assert_eq!(CaptureMode::from_answer(" 1 ").unwrap(), CaptureMode::MetadataOnly);
    /// assert_eq!(CaptureMode::from_answer("2").unwrap(), CaptureMode::Full);
    /// assert!(CaptureMode::from_answer("3").is_err());
    /// ```
    pub fn from_answer(answer: &str) -> Result<Self> {
        match answer.trim() {
            "1" => Ok(Self::MetadataOnly),
            "2" => Ok(Self::Full),
            other => Err(Error::InvalidCaptureMode(other.to_string())),
        }
    }

    /// Prompt answer selecting this mode.
    #[must_use]
    pub fn answer(self) -> &'static str {
        match self {
            Self::MetadataOnly => "1",
            Self::Full => "2",
        }
    }
}

/// Layout of the front-matter block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrontMatterSchema {
    /// `id`, `title`, `author`, `tags`, dates and `source_*` keys.
    #[default]
    Standard,
    /// `category: "[[Clippings]]"` layout with `clipped` and `publish` keys.
    Clippings,
}

/// One front-matter value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderValue {
    /// Emitted in double quotes.
    Quoted(String),
    /// Emitted as is; empty gives a bare `key:`.
    Raw(String),
    /// Emitted as an indented `- item` list.
    List(Vec<String>),
}

/// Ordered front-matter block. Keys are emitted in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    entries: Vec<(String, HeaderValue)>,
}

impl FrontMatter {
    /// Empty block.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key. An existing key keeps its position.
    pub fn insert(&mut self, key: &str, value: HeaderValue) -> &mut Self {
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        self
    }

    /// Value of a key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&HeaderValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Keys in emission order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Render between `---` delimiters, with a trailing newline.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("---\n");
        for (key, value) in &self.entries {
            match value {
                HeaderValue::Quoted(v) => out.push_str(&format!("{key}: \"{v}\"\n")),
                HeaderValue::Raw(v) if v.is_empty() => out.push_str(&format!("{key}:\n")),
                HeaderValue::Raw(v) => out.push_str(&format!("{key}: {v}\n")),
                HeaderValue::List(items) => {
                    out.push_str(&format!("{key}:\n"));
                    for item in items {
                        out.push_str(&format!("  - {item}\n"));
                    }
                }
            }
        }
        out.push_str("---\n");
        out
    }
}

/// An assembled note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredDocument {
    /// Front matter.
    pub header: FrontMatter,

    /// Heading line and content.
    pub body: String,
}

impl StructuredDocument {
    /// Full note text.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}\n{}", self.header.render(), self.body)
    }
}

/// Assemble a note.
///
/// # Arguments
/// * `meta` - Sanitized page metadata
/// * `markdown` - Converted content; ignored for metadata-only captures
/// * `mode` - Capture mode chosen for this run
/// * `profile` - Front-matter schema, tags and link-back settings
#[must_use]
pub fn assemble(meta: &PageMetadata, markdown: &str, mode: CaptureMode, profile: &NoteProfile) -> StructuredDocument {
    let header = front_matter(meta, mode, profile);

    let mut body = format!("# {}\n", meta.title);
    match mode {
        CaptureMode::Full => {
            let markdown = markdown.trim();
            if !markdown.is_empty() {
                body.push('\n');
                body.push_str(markdown);
                body.push('\n');
            }
        }
        CaptureMode::MetadataOnly if profile.link_back => {
            body.push_str(&format!("[Read more]({})\n", meta.source_url));
        }
        CaptureMode::MetadataOnly => {}
    }

    StructuredDocument { header, body }
}

/// Build the front-matter block for the profile's schema.
#[must_use]
pub fn front_matter(meta: &PageMetadata, mode: CaptureMode, profile: &NoteProfile) -> FrontMatter {
    let author = if meta.author.is_empty() {
        HeaderValue::Raw(String::new())
    } else {
        HeaderValue::Quoted(format!("[[{}]]", meta.author))
    };
    let tags = HeaderValue::List(note_tags(meta, mode, profile));
    let capture_date = meta.capture_date.format("%Y-%m-%d").to_string();

    let mut header = FrontMatter::new();
    match profile.schema {
        FrontMatterSchema::Standard => {
            header
                .insert("id", HeaderValue::Quoted(meta.id.to_string()))
                .insert("title", HeaderValue::Quoted(meta.title.clone()))
                .insert("author", author)
                .insert("tags", tags)
                .insert("created_date", HeaderValue::Raw(capture_date.clone()))
                .insert("modified_date", HeaderValue::Raw(capture_date))
                .insert("source", HeaderValue::Raw(meta.source_url.clone()))
                .insert("source_date", HeaderValue::Raw(meta.publication_date.format("%Y-%m-%d").to_string()))
                .insert("source_title", HeaderValue::Quoted(meta.title.clone()))
                .insert("source_description", HeaderValue::Quoted(meta.description.clone()));
        }
        FrontMatterSchema::Clippings => {
            header
                .insert("category", HeaderValue::Quoted("[[Clippings]]".to_string()))
                .insert("author", author)
                .insert("title", HeaderValue::Quoted(meta.title.clone()))
                .insert("source", HeaderValue::Raw(meta.source_url.clone()))
                .insert("clipped", HeaderValue::Raw(capture_date))
                .insert("description", HeaderValue::Quoted(meta.description.clone()))
                .insert("summary", HeaderValue::Quoted(String::new()))
                .insert("tags", tags)
                .insert("publish", HeaderValue::Raw("false".to_string()));
        }
    }
    header
}

/// Tags of a note: the profile's tags, the link tag for metadata-only
/// captures, then page keywords when enabled. Duplicates are dropped.
#[must_use]
pub fn note_tags(meta: &PageMetadata, mode: CaptureMode, profile: &NoteProfile) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    let mut push = |tag: &str| {
        let tag = tag.trim();
        if !tag.is_empty() && !tags.iter().any(|t| t == tag) {
            tags.push(tag.to_string());
        }
    };

    for tag in &profile.tags {
        push(tag);
    }
    if mode == CaptureMode::MetadataOnly {
        push(&profile.link_tag);
    }
    if profile.keyword_tags {
        for keyword in &meta.keywords {
            push(keyword);
        }
    }

    tags
}
