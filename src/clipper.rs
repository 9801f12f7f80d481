//! Capture orchestration.
//!
//! [`Clipper::run`] takes a page snapshot through the whole pipeline:
//! content selection, metadata, sanitizing and conversion, the capture-mode
//! prompt, assembly, and finally the hand-off. A run is all or nothing: any
//! fatal error is reported through the prompter and nothing is handed off.

use chrono::{Local, NaiveDate};

use crate::assemble::{assemble, CaptureMode, StructuredDocument};
use crate::config::ClipperConfig;
use crate::convert::MarkdownConverter;
use crate::dom;
use crate::error::{Error, Result};
use crate::file_name::{note_file_name, FileTarget};
use crate::launch::{HandOff, Navigator};
use crate::metadata::{extract_metadata, PageMetadata};
use crate::prompt::{Prompter, CAPTURE_MODE_PROMPT, DEFAULT_CAPTURE_ANSWER, INVALID_CHOICE_ALERT};
use crate::readable::ContentExtractor;
use crate::sanitize::sanitize;
use crate::selection::{select_content, CapturedContent, PageSnapshot};

/// External pieces a capture needs, set up before the run.
pub struct Collaborators {
    /// Readable-content extractor.
    pub extractor: Box<dyn ContentExtractor>,

    /// HTML to Markdown converter.
    pub converter: MarkdownConverter,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").field("converter", &self.converter).finish_non_exhaustive()
    }
}

impl Collaborators {
    /// Use the given extractor and converter.
    #[must_use]
    pub fn new(extractor: Box<dyn ContentExtractor>, converter: MarkdownConverter) -> Self {
        Self { extractor, converter }
    }

    /// Set up the default collaborators for `config`.
    ///
    /// Fails with [`Error::CollaboratorUnavailable`] when the crate was built
    /// without an extraction backend.
    pub fn load(config: &ClipperConfig) -> Result<Self> {
        let converter = MarkdownConverter::new(config.note.image_link_fixup);

        #[cfg(feature = "readability")]
        {
            Ok(Self::new(Box::new(crate::readable::SmoothieExtractor), converter))
        }

        #[cfg(not(feature = "readability"))]
        {
            let _ = converter;
            Err(Error::CollaboratorUnavailable(
                "readable-content extraction (build with the `readability` feature)".to_string(),
            ))
        }
    }
}

/// Result of a successful capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClipOutcome {
    /// Capture mode used.
    pub mode: CaptureMode,

    /// Metadata of the page.
    pub metadata: PageMetadata,

    /// The note.
    pub document: StructuredDocument,

    /// Rendered note, as sent.
    pub content: String,

    /// URL handed to the navigator, with its target.
    pub hand_off: HandOff,
}

/// Runs captures with one configuration.
#[derive(Debug)]
pub struct Clipper {
    config: ClipperConfig,
    collaborators: Collaborators,
    capture_date: Option<NaiveDate>,
}

impl Clipper {
    /// Clipper with loaded collaborators.
    #[must_use]
    pub fn new(config: ClipperConfig, collaborators: Collaborators) -> Self {
        Self {
            config,
            collaborators,
            capture_date: None,
        }
    }

    /// Date captures instead of today.
    #[must_use]
    pub fn with_capture_date(mut self, date: NaiveDate) -> Self {
        self.capture_date = Some(date);
        self
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ClipperConfig {
        &self.config
    }

    /// Capture `snapshot` and hand the note off through `navigator`.
    ///
    /// On failure the user is alerted through `prompter` and the navigator
    /// is not called.
    pub fn run<P, N>(&self, snapshot: &PageSnapshot, prompter: &mut P, navigator: &mut N) -> Result<ClipOutcome>
    where
        P: Prompter + ?Sized,
        N: Navigator + ?Sized,
    {
        match self.capture(snapshot, prompter, navigator) {
            Ok(outcome) => Ok(outcome),
            Err(err) => {
                let message = match &err {
                    Error::InvalidCaptureMode(_) => INVALID_CHOICE_ALERT.to_string(),
                    other => other.to_string(),
                };
                tracing::warn!("capture of {} aborted: {err}", snapshot.url);
                prompter.alert(&message);
                Err(err)
            }
        }
    }

    fn capture<P, N>(&self, snapshot: &PageSnapshot, prompter: &mut P, navigator: &mut N) -> Result<ClipOutcome>
    where
        P: Prompter + ?Sized,
        N: Navigator + ?Sized,
    {
        let profile = &self.config.note;
        let capture_date = self.capture_date.unwrap_or_else(|| Local::now().date_naive());
        let doc = dom::parse(&snapshot.html);

        // A fixed metadata-only profile never needs the content
        let (content, article) = if profile.capture_mode == Some(CaptureMode::MetadataOnly) {
            (None, None)
        } else {
            let (content, article) =
                select_content(snapshot, &doc, self.collaborators.extractor.as_ref(), &self.config.extraction)?;
            (Some(content), article)
        };

        let metadata = extract_metadata(&doc, snapshot.url.as_str(), article.as_ref(), profile, capture_date);
        let markdown = content.as_ref().map(|c| self.convert(c, snapshot)).unwrap_or_default();

        let mode = match profile.capture_mode {
            Some(mode) => mode,
            None => {
                let answer = prompter
                    .ask(CAPTURE_MODE_PROMPT, DEFAULT_CAPTURE_ANSWER)
                    .ok_or_else(|| Error::InvalidCaptureMode(String::new()))?;
                CaptureMode::from_answer(&answer)?
            }
        };

        let document = assemble(&metadata, &markdown, mode, profile);
        let rendered = document.render();
        let file_name = note_file_name(&metadata.title, capture_date, &profile.file_name);
        let target = FileTarget::new(&self.config.destination, file_name);
        let hand_off = HandOff::build(target, &rendered, &self.config.destination.scheme);

        tracing::info!("handing off {} ({} bytes, {mode:?})", hand_off.target.path(), rendered.len());
        navigator.navigate(&hand_off.url)?;

        Ok(ClipOutcome {
            mode,
            metadata,
            document,
            content: rendered,
            hand_off,
        })
    }

    fn convert(&self, content: &CapturedContent, snapshot: &PageSnapshot) -> String {
        let sanitized = sanitize(&content.source_html, &snapshot.url);
        self.collaborators.converter.convert(&sanitized)
    }
}
