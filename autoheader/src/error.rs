use std::fmt;
use std::ops::Range;

use codespan_reporting::diagnostic::{Diagnostic, Label, Severity};
use thiserror::Error;

pub type Result<T, E = AutoHeaderError> = std::result::Result<T, E>;

/// Why a `levels` range was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeFault {
    /// `start` or `finish` is not a number.
    NonNumericBound,
    /// `start` is greater than `finish`.
    Inverted,
    /// A bound lies outside `1..=6`.
    OutOfRange,
}

/// The distinguishable failure kinds of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ConfigurationNotSet,
    InvalidLevelType,
    InvalidLevelRange(RangeFault),
    MismatchedSeparator,
    MissingSignifier,
    MalformedSignifier,
    InvalidSidebarFlag,
    /// A hook ran after an earlier hook for the same document had failed.
    ExitingError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::ConfigurationNotSet => "ConfigurationNotSet",
            ErrorKind::InvalidLevelType => "InvalidLevelType",
            ErrorKind::InvalidLevelRange(_) => "InvalidLevelRange",
            ErrorKind::MismatchedSeparator => "MismatchedSeparator",
            ErrorKind::MissingSignifier => "MissingSignifier",
            ErrorKind::MalformedSignifier => "MalformedSignifier",
            ErrorKind::InvalidSidebarFlag => "InvalidSidebarFlag",
            ErrorKind::ExitingError => "ExitingError",
        };
        f.write_str(name)
    }
}

/// A configuration or input failure, optionally pointing into the document source.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct AutoHeaderError {
    pub kind: ErrorKind,
    pub message: String,
    pub span: Option<Range<usize>>,
    pub notes: Vec<String>,
}

impl AutoHeaderError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        AutoHeaderError {
            kind,
            message: message.into(),
            span: None,
            notes: Vec::new(),
        }
    }

    pub fn with_span(mut self, span: Range<usize>) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Convert to a codespan-reporting Diagnostic for display.
    ///
    /// Errors without a span still produce a diagnostic, just without a label.
    pub fn to_diagnostic<FileId: Copy>(&self, file_id: FileId) -> Diagnostic<FileId> {
        let labels = match &self.span {
            Some(span) => vec![Label::primary(file_id, span.clone())],
            None => Vec::new(),
        };
        Diagnostic::new(Severity::Error)
            .with_code(self.kind.to_string())
            .with_message(&self.message)
            .with_labels(labels)
            .with_notes(self.notes.clone())
    }
}

/// Single channel every failure is routed through.
///
/// With `debug` on, failures are handed back to the caller and abort the
/// current document. With `debug` off they are logged as warnings and the
/// caller carries on with its unmodified input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Reporter {
    debug: bool,
}

impl Reporter {
    pub fn new(debug: bool) -> Self {
        Reporter { debug }
    }

    /// Returns `Err` only when the failure must abort.
    pub fn report(&self, error: AutoHeaderError) -> Result<()> {
        if self.debug {
            return Err(error);
        }
        log::warn!("auto-header skipped: {error}");
        Ok(())
    }
}
