//! Capture-mode prompt.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

/// Question asked when the profile does not fix a capture mode.
pub const CAPTURE_MODE_PROMPT: &str = "Choose capture mode:\n1. Link Only (Metadata)\n2. Full Capture\n\n(Enter 1 or 2)";

/// Answer pre-filled in the prompt.
pub const DEFAULT_CAPTURE_ANSWER: &str = "2";

/// Alert shown when the answer is not a capture mode.
pub const INVALID_CHOICE_ALERT: &str = "Invalid choice. Aborting.";

/// A modal user prompt.
pub trait Prompter {
    /// Ask a question. `None` means the user dismissed it.
    fn ask(&mut self, message: &str, default: &str) -> Option<String>;

    /// Show a message.
    fn alert(&mut self, message: &str);
}

/// Prompt on a terminal, or any reader/writer pair.
///
/// An empty line takes the default answer; end of input dismisses.
#[derive(Debug)]
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    /// Prompter reading answers from `input` and writing to `output`.
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Give the reader and writer back.
    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn ask(&mut self, message: &str, default: &str) -> Option<String> {
        if writeln!(self.output, "{message}").is_err() || write!(self.output, "[{default}] ").is_err() {
            return None;
        }
        let _ = self.output.flush();

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => {
                let answer = line.trim_end_matches(['\r', '\n']);
                if answer.trim().is_empty() {
                    Some(default.to_string())
                } else {
                    Some(answer.to_string())
                }
            }
        }
    }

    fn alert(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
        let _ = self.output.flush();
    }
}

/// Answers from a fixed script and records what it was shown.
#[derive(Debug, Clone, Default)]
pub struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,

    /// Questions asked, in order.
    pub questions: Vec<String>,

    /// Alerts shown, in order.
    pub alerts: Vec<String>,
}

impl ScriptedPrompter {
    /// Prompter giving `answers` in order; `None` dismisses. Once the
    /// script runs out every question is dismissed.
    #[must_use]
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(|a| a.map(Into::into)).collect(),
            questions: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Prompter giving `answer` to the first question and dismissing the rest.
    #[must_use]
    pub fn answering(answer: &str) -> Self {
        Self::new([Some(answer)])
    }
}

impl Prompter for ScriptedPrompter {
    fn ask(&mut self, message: &str, _default: &str) -> Option<String> {
        self.questions.push(message.to_string());
        self.answers.pop_front().flatten()
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}
