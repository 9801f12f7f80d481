//! Hand-off to the note application.
//!
//! The note travels inside a URL of the application's scheme
//! (`obsidian://new` by default): `file` names the note, `content` carries
//! it, and `vault` optionally picks the vault. Opening the URL is the last
//! step of a capture; nothing is awaited afterwards.

use std::io::Write;
use std::process::Command;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Error, Result};
use crate::file_name::FileTarget;

/// Characters left alone by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a URL component like `encodeURIComponent`.
///
/// ```
/// use page_clipper::launch::encode_component;
///
/// assert_eq!(encode_component("a b/c?d=é"), "a%20b%2Fc%3Fd%3D%C3%A9");
/// assert_eq!(encode_component("keep-_.!~*'()"), "keep-_.!~*'()");
/// ```
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// A ready-to-open hand-off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandOff {
    /// The full URL.
    pub url: String,

    /// Where the note lands.
    pub target: FileTarget,
}

impl HandOff {
    /// Build the hand-off URL for a note.
    ///
    /// # Arguments
    /// * `target` - Folder, file name and vault
    /// * `content` - Rendered note
    /// * `scheme` - URL prefix, e.g. `obsidian://new`
    #[must_use]
    pub fn build(target: FileTarget, content: &str, scheme: &str) -> Self {
        let mut url = format!(
            "{scheme}?file={}&content={}",
            encode_component(&target.path()),
            encode_component(content)
        );
        if !target.vault.is_empty() {
            url.push_str("&vault=");
            url.push_str(&encode_component(&target.vault));
        }
        Self { url, target }
    }
}

/// Receiver of hand-off URLs.
pub trait Navigator {
    /// Transfer control to `url`.
    fn navigate(&mut self, url: &str) -> Result<()>;
}

/// Opens URLs with the platform's URL handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemNavigator;

impl SystemNavigator {
    /// Opener command for `os` (a `std::env::consts::OS` value).
    ///
    /// Windows goes through `rundll32` rather than `cmd /C start`, which
    /// would split the URL at its first `&`.
    fn command(os: &str, url: &str) -> Command {
        let mut cmd = match os {
            "macos" => Command::new("open"),
            "windows" => {
                let mut cmd = Command::new("rundll32");
                cmd.arg("url.dll,FileProtocolHandler");
                cmd
            }
            _ => Command::new("xdg-open"),
        };
        cmd.arg(url);
        cmd
    }
}

impl Navigator for SystemNavigator {
    fn navigate(&mut self, url: &str) -> Result<()> {
        spawn_detached(Self::command(std::env::consts::OS, url))
    }
}

/// Start `cmd` and return without waiting for it.
///
/// The opener hands the URL to the application and exits on its own; its
/// exit status is not collected.
fn spawn_detached(mut cmd: Command) -> Result<()> {
    let program = cmd.get_program().to_string_lossy().into_owned();
    match cmd.spawn() {
        Ok(_child) => {
            tracing::debug!("started {program}");
            Ok(())
        }
        Err(err) => Err(Error::Launch(format!("{program}: {err}"))),
    }
}

/// Writes each URL on its own line.
#[derive(Debug)]
pub struct WriterNavigator<W: Write> {
    writer: W,
}

impl<W: Write> WriterNavigator<W> {
    /// Navigator writing to `writer`.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give the writer back.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Navigator for WriterNavigator<W> {
    fn navigate(&mut self, url: &str) -> Result<()> {
        writeln!(self.writer, "{url}")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Remembers every URL it was sent.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    /// URLs in the order they arrived.
    pub visited: Vec<String>,
}

impl Navigator for RecordingNavigator {
    fn navigate(&mut self, url: &str) -> Result<()> {
        self.visited.push(url.to_string());
        Ok(())
    }
}
