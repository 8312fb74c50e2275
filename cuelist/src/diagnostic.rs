use std::{error::Error, fmt::Display, ops::Range};

use crate::{error::ParseError, reader::SourceId};

/// Any kind of problem reported while reading a cue list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Unique error code reference
    pub error_code: String,

    /// Severity of the problem
    pub level: Level,

    /// Name of the diagnostic
    pub name: String,

    /// All labels with information about this diagnostic
    pub labels: Vec<Label>,
}

/// Reference to a place in a decoded source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    /// The source file
    pub source: Option<SourceId>,

    /// Byte range into the decoded source text that the label points at.  An
    /// empty range marks a single position rather than a span.
    pub location: Option<Range<usize>>,

    /// The message to display to the user.
    pub message: String,
}

/// Severity of a given diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// The cue list could not be read
    Error,
}

impl Diagnostic {
    fn new(level: Level, code: String) -> Self {
        Diagnostic {
            error_code: code,
            level,
            name: String::new(),
            labels: vec![],
        }
    }

    /// Create an error diagnostic
    pub(crate) fn error(code: impl Into<String>) -> Self {
        Self::new(Level::Error, code.into())
    }

    /// Set the descriptive name of the diagnostic
    pub(crate) fn name(self, value: impl Into<String>) -> Self {
        Self {
            name: value.into(),
            ..self
        }
    }

    /// Add a label to the diagnostic
    pub(crate) fn label(mut self, label: impl Into<Label>) -> Self {
        self.labels.push(label.into());
        self
    }

    /// Build the report for a failed pass over one source
    pub(crate) fn from_parse_error(err: &ParseError, source: SourceId) -> Self {
        let offset = err.offset();
        Diagnostic::error(err.code())
            .name(err.to_string())
            .label(
                Label::new()
                    .source(source)
                    .loc(offset..offset + 1)
                    .message(err.hint()),
            )
    }
}

impl Label {
    /// Create a new, empty label
    pub(crate) fn new() -> Label {
        Label {
            source: None,
            location: None,
            message: String::new(),
        }
    }

    /// Set the message for this label
    pub(crate) fn message(self, value: impl Into<String>) -> Self {
        Self {
            message: value.into(),
            ..self
        }
    }

    /// Set the source file for this label
    pub fn source(self, id: SourceId) -> Self {
        Self {
            source: Some(id),
            ..self
        }
    }

    /// Set the location within the source for this label
    pub fn loc(self, loc: Range<usize>) -> Self {
        Self {
            location: Some(loc),
            ..self
        }
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} {}: {}", self.level, self.error_code, self.name)?;

        for label in &self.labels {
            if let Some(source) = label.source {
                writeln!(f)?;

                write!(f, "\t{:?} [{source:?}", self.level)?;
                if let Some(location) = &label.location {
                    write!(f, "@{}..{}", location.start, location.end)?;
                }
                write!(f, "]: {}", label.message)?;
            }
        }

        for label in &self.labels {
            if label.source.is_none() {
                writeln!(f)?;
                write!(f, "\t{:?}: {}", self.level, label.message)?;
            }
        }

        Ok(())
    }
}

impl Error for Diagnostic {}
