//! # page-clipper
//!
//! Capture a loaded web page as a Markdown note and hand it off to a
//! note-taking application through its URL scheme (`obsidian://new`).
//!
//! A capture takes the user's selection, or the page's main article when
//! nothing is selected, strips scripts and page chrome, makes links absolute,
//! converts the result to Markdown and prepends a front-matter block built
//! from the page's metadata. The finished note travels to the application
//! inside the hand-off URL; nothing is written to disk.
//!
//! ## Quick Start
//!
//! ```rust
//! use page_clipper::launch::RecordingNavigator;
//! use page_clipper::prompt::ScriptedPrompter;
//! use page_clipper::{Clipper, ClipperConfig, Collaborators, PageSnapshot};
//! use url::Url;
//!
//! let html = r#"<html><head><title>My Article</title></head>
//! <body><article><p>Main content here.</p></article></body></html>"#;
//! let snapshot = PageSnapshot::new(html, Url::parse("https://example.com/a")?)
//!     .with_selection(vec!["<p>Main content here.</p>".to_string()]);
//!
//! let config = ClipperConfig::default();
//! let clipper = Clipper::new(config.clone(), Collaborators::load(&config)?);
//!
//! let mut prompter = ScriptedPrompter::answering("2");
//! let mut navigator = RecordingNavigator::default();
//! let outcome = clipper.run(&snapshot, &mut prompter, &mut navigator)?;
//!
//! assert!(outcome.content.contains("# My Article"));
//! assert!(navigator.visited[0].starts_with("obsidian://new?file="));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Pipeline
//!
//! - [`selection`]: user selection or readable-content extraction ([`readable`])
//! - [`metadata`]: title, author, description, dates and keywords
//! - [`sanitize`]: element removal and URL resolution
//! - [`convert`]: rule-driven HTML to Markdown with the nested image-link fix-up
//! - [`assemble`] and [`file_name`]: front matter, heading, body, file name
//! - [`launch`]: hand-off URL and navigators
//! - [`clipper`]: the whole run, with the capture-mode [`prompt`]

mod error;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// URL parsing and resolution against the page URL.
pub mod url_utils;

/// Saved-page charset detection and transcoding.
pub mod encoding;

/// Configuration, presets and TOML loading.
pub mod config;

/// Page metadata extraction.
pub mod metadata;

/// Readable-content extraction.
pub mod readable;

/// Page snapshots and content selection.
pub mod selection;

/// HTML sanitizing.
pub mod sanitize;

/// Markdown text utilities (escaping, joining, cleanup).
pub mod markdown;

/// HTML to Markdown conversion.
pub mod convert;

/// Note file names and locations.
pub mod file_name;

/// Front matter and note assembly.
pub mod assemble;

/// Hand-off URL and navigators.
pub mod launch;

/// Capture-mode prompt.
pub mod prompt;

/// Capture orchestration.
pub mod clipper;

/// Log output for the command-line tool.
pub mod logging;

// Public API - re-exports
pub use assemble::{CaptureMode, FrontMatterSchema, StructuredDocument};
pub use clipper::{ClipOutcome, Clipper, Collaborators};
pub use config::ClipperConfig;
pub use error::{Error, Result};
pub use launch::{HandOff, Navigator};
pub use metadata::PageMetadata;
pub use prompt::Prompter;
pub use readable::{ContentExtractor, ReadableArticle};
pub use sanitize::SanitizedHtml;
pub use selection::{CapturedContent, PageSnapshot};
