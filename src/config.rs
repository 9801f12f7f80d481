//! Configuration for a capture.
//!
//! The `ClipperConfig` struct carries everything that differs between clipper
//! deployments: where the note goes, how readable content is extracted, and
//! the shape of the note itself. Built-in presets cover the common setups and
//! any of them can be written out and edited as TOML.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::assemble::{CaptureMode, FrontMatterSchema};
use crate::{Error, Result};

/// Names accepted by [`ClipperConfig::preset`].
pub const PRESET_NAMES: &[&str] = &["capture", "clippings", "link"];

/// Top-level configuration for a capture.
///
/// # Example
///
/// ```rust
/// use page_clipper::ClipperConfig;
///
/// let mut config = ClipperConfig::default();
/// config.destination.vault = "Work".to_string();
/// config.note.keyword_tags = true;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClipperConfig {
    /// Where the note is handed off to.
    pub destination: Destination,

    /// Readable-content extraction tuning.
    pub extraction: ExtractionOptions,

    /// Shape of the generated note.
    pub note: NoteProfile,
}

/// Hand-off destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Destination {
    /// Vault to open. Empty lets the application pick its current vault.
    ///
    /// Default: `"Main"`
    pub vault: String,

    /// Folder inside the vault, e.g. `"Clippings/"`.
    ///
    /// Default: `"References/Capture/"`
    pub folder: String,

    /// Hand-off URL prefix, up to but excluding the query string.
    ///
    /// Default: `"obsidian://new"`
    pub scheme: String,
}

impl Default for Destination {
    fn default() -> Self {
        Self {
            vault: "Main".to_string(),
            folder: "References/Capture/".to_string(),
            scheme: "obsidian://new".to_string(),
        }
    }
}

/// Options passed to the readable-content extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionOptions {
    /// Minimum characters a candidate block needs to count as article text.
    ///
    /// Default: `60`
    pub char_threshold: usize,

    /// Classes kept on elements in the extracted HTML.
    ///
    /// Default: `["code", "pre", "table"]`
    pub classes_to_preserve: Vec<String>,
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            char_threshold: 60,
            classes_to_preserve: vec!["code".to_string(), "pre".to_string(), "table".to_string()],
        }
    }
}

/// Where a note title may come from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TitleSource {
    /// `<meta property="og:title">`
    OpenGraph,
    /// `<meta name="twitter:title">`
    Twitter,
    /// The document's `<title>`.
    Document,
    /// The title reported by the readable-content extractor.
    Readable,
}

/// Where an author may come from, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuthorSource {
    /// Byline reported by the readable-content extractor.
    Byline,
    /// `<meta name="author">`
    MetaName,
    /// `<meta property="author">`
    MetaProperty,
    /// `<meta property="article:author">`
    ArticleAuthor,
    /// `<meta property="og:site_name">`
    SiteName,
    /// `<meta name="bylines">`
    Bylines,
}

/// How `[![alt](img)](link)` in converted Markdown is repaired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImageLinkFixup {
    /// Drop the outer link, keep the image.
    #[default]
    Unwrap,
    /// Keep the link but remove whitespace inside the brackets.
    Compact,
}

/// File-name rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNameRules {
    /// Maximum file name length in characters, date prefix included.
    ///
    /// Default: `150`
    pub max_len: usize,

    /// Replacement for characters file systems reject.
    ///
    /// Default: `" "`
    pub replacement: String,
}

impl Default for FileNameRules {
    fn default() -> Self {
        Self {
            max_len: 150,
            replacement: " ".to_string(),
        }
    }
}

/// Shape of the generated note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoteProfile {
    /// Front-matter layout.
    pub schema: FrontMatterSchema,

    /// Tags every note carries.
    ///
    /// Default: `["AI"]`
    pub tags: Vec<String>,

    /// Extra tag for metadata-only captures. Empty disables it.
    ///
    /// Default: `"link"`
    pub link_tag: String,

    /// Add the page's `<meta name="keywords">` entries as tags.
    ///
    /// Default: `false`
    pub keyword_tags: bool,

    /// Title sources, first non-empty wins.
    pub title_sources: Vec<TitleSource>,

    /// Author sources, first non-empty wins.
    pub author_sources: Vec<AuthorSource>,

    /// Append `[Read more](source)` to metadata-only notes.
    ///
    /// Default: `false`
    pub link_back: bool,

    /// Skip the prompt and always capture in this mode.
    ///
    /// Default: `None`
    pub capture_mode: Option<CaptureMode>,

    /// Repair strategy for images wrapped in links.
    pub image_link_fixup: ImageLinkFixup,

    /// File-name rules.
    pub file_name: FileNameRules,
}

impl Default for NoteProfile {
    fn default() -> Self {
        Self {
            schema: FrontMatterSchema::Standard,
            tags: vec!["AI".to_string()],
            link_tag: "link".to_string(),
            keyword_tags: false,
            title_sources: vec![
                TitleSource::OpenGraph,
                TitleSource::Twitter,
                TitleSource::Document,
                TitleSource::Readable,
            ],
            author_sources: vec![
                AuthorSource::Byline,
                AuthorSource::MetaName,
                AuthorSource::MetaProperty,
                AuthorSource::ArticleAuthor,
                AuthorSource::SiteName,
                AuthorSource::Bylines,
            ],
            link_back: false,
            capture_mode: None,
            image_link_fixup: ImageLinkFixup::Unwrap,
            file_name: FileNameRules::default(),
        }
    }
}

impl ClipperConfig {
    /// Built-in configuration by name.
    ///
    /// - `capture`: full pipeline, prompt for the mode, standard front matter.
    /// - `clippings`: `[[Clippings]]` category schema, Readability defaults,
    ///   compact image-link repair.
    /// - `link`: metadata-only without a prompt, with a link back to the page.
    pub fn preset(name: &str) -> Result<Self> {
        match name {
            "capture" => Ok(Self::default()),
            "clippings" => Ok(Self {
                destination: Destination {
                    folder: "Ressources/".to_string(),
                    ..Destination::default()
                },
                extraction: ExtractionOptions {
                    char_threshold: 500,
                    classes_to_preserve: Vec::new(),
                },
                note: NoteProfile {
                    schema: FrontMatterSchema::Clippings,
                    link_tag: String::new(),
                    image_link_fixup: ImageLinkFixup::Compact,
                    ..NoteProfile::default()
                },
            }),
            "link" => Ok(Self {
                note: NoteProfile {
                    title_sources: vec![TitleSource::OpenGraph, TitleSource::Twitter, TitleSource::Document],
                    author_sources: vec![
                        AuthorSource::MetaName,
                        AuthorSource::MetaProperty,
                        AuthorSource::ArticleAuthor,
                        AuthorSource::Bylines,
                    ],
                    link_tag: String::new(),
                    link_back: true,
                    capture_mode: Some(CaptureMode::MetadataOnly),
                    ..NoteProfile::default()
                },
                ..Self::default()
            }),
            other => Err(Error::Config(format!(
                "unknown preset {other:?} (expected one of: {})",
                PRESET_NAMES.join(", ")
            ))),
        }
    }

    /// Parse a TOML document. Missing sections and fields take their defaults.
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    /// Serialize to TOML, e.g. to seed a user config file.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }
}

/// Location of the user config file, if one exists.
///
/// Looks for `page-clipper/config.toml` under the XDG config directories.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    let dirs = xdg::BaseDirectories::with_prefix("page-clipper").ok()?;
    dirs.find_config_file("config.toml")
}

/// Load a configuration file.
pub fn load_from_path(path: &Path) -> Result<ClipperConfig> {
    let text = fs::read_to_string(path)?;
    let config: ClipperConfig =
        toml::from_str(&text).map_err(|e| Error::Config(format!("{}: {e}", path.display())))?;
    tracing::debug!("loaded configuration from {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = ClipperConfig::default();
        assert_eq!(config.destination.vault, "Main");
        assert_eq!(config.destination.folder, "References/Capture/");
        assert_eq!(config.destination.scheme, "obsidian://new");
        assert_eq!(config.extraction.char_threshold, 60);
        assert_eq!(config.note.tags, vec!["AI"]);
        assert_eq!(config.note.file_name.max_len, 150);
        assert!(!config.note.keyword_tags);
        assert!(config.note.capture_mode.is_none());
    }

    #[test]
    fn test_presets() {
        assert_eq!(ClipperConfig::preset("capture").unwrap(), ClipperConfig::default());

        let clippings = ClipperConfig::preset("clippings").unwrap();
        assert_eq!(clippings.note.schema, FrontMatterSchema::Clippings);
        assert_eq!(clippings.note.image_link_fixup, ImageLinkFixup::Compact);

        let link = ClipperConfig::preset("link").unwrap();
        assert_eq!(link.note.capture_mode, Some(CaptureMode::MetadataOnly));
        assert!(link.note.link_back);
        assert!(!link.note.title_sources.contains(&TitleSource::Readable));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(matches!(ClipperConfig::preset("nope"), Err(Error::Config(_))));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ClipperConfig::from_toml(
            r#"
            [destination]
            vault = "Work"

            [note]
            tags = ["reading", "web"]
            keyword_tags = true
            capture_mode = "full"
            author_sources = ["meta-name", "site-name"]
            "#,
        )
        .unwrap();

        assert_eq!(config.destination.vault, "Work");
        assert_eq!(config.destination.folder, "References/Capture/");
        assert_eq!(config.note.tags, vec!["reading", "web"]);
        assert!(config.note.keyword_tags);
        assert_eq!(config.note.capture_mode, Some(CaptureMode::Full));
        assert_eq!(config.note.author_sources, vec![AuthorSource::MetaName, AuthorSource::SiteName]);
        assert_eq!(config.extraction, ExtractionOptions::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = ClipperConfig::preset("clippings").unwrap();
        let text = config.to_toml().unwrap();
        assert_eq!(ClipperConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_toml() {
        let result = ClipperConfig::from_toml("[note]\nschema = \"yaml-ish\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
