use std::fmt;

/// Which grammar failure a [`SyntaxError`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// The line does not match the construct its sigil announced.
    Grammar,
    /// The line ended while a call header or argument list was still open.
    EndOfLine,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub message: String,
    pub help: Option<String>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            kind: SyntaxErrorKind::Grammar,
            message: message.into(),
            help: None,
        }
    }

    pub fn end_of_line(message: impl Into<String>) -> Self {
        Self {
            kind: SyntaxErrorKind::EndOfLine,
            message: message.into(),
            help: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for SyntaxError {}
