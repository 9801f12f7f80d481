//! Error types for page-clipper.
//!
//! This module defines the errors that abort a capture. Recoverable problems
//! (an unparsable date, a malformed link) never surface here: they are logged
//! and replaced by a fallback where they happen.

/// Error type for capture operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A collaborator (extraction backend, converter) could not be set up.
    #[error("collaborator unavailable: {0}")]
    CollaboratorUnavailable(String),

    /// No selection and no readable article could be extracted.
    #[error("No readable content found on this page")]
    NoContent,

    /// The capture-mode prompt was answered with something other than 1 or 2.
    #[error("Invalid choice {0:?}. Aborting.")]
    InvalidCaptureMode(String),

    /// The page URL could not be parsed.
    #[error("invalid page URL: {0}")]
    InvalidUrl(String),

    /// A configuration file or preset was rejected.
    #[error("configuration error: {0}")]
    Config(String),

    /// The hand-off URL could not be delivered to the destination application.
    #[error("hand-off failed: {0}")]
    Launch(String),

    /// Reading a page or configuration file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type alias for capture operations.
pub type Result<T> = std::result::Result<T, Error>;
