use thiserror::Error;

/// A condition the tokenizer cannot recover from.  Offsets are byte offsets
/// into the decoded source text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Channel data, a KeyFrame close or a parameter arrived while no
    /// top-level KeyFrame was open
    #[error("no KeyFrame is open at offset {offset}")]
    NoOpenKeyFrame { offset: usize },

    /// `KF` tried to open a KeyFrame while an earlier one was still open
    #[error("KeyFrame {index} is still open when another is opened at offset {offset}")]
    KeyFrameStillOpen { index: usize, offset: usize },

    /// A parameter literal had no usable digits, or did not fit in 32 bits
    #[error("invalid numeric literal {literal:?} at offset {offset}")]
    InvalidNumber { literal: String, offset: usize },
}

pub type Result<T = (), E = ParseError> = std::result::Result<T, E>;

impl ParseError {
    /// Byte offset of the character that triggered the error
    pub fn offset(&self) -> usize {
        match self {
            ParseError::NoOpenKeyFrame { offset }
            | ParseError::KeyFrameStillOpen { offset, .. }
            | ParseError::InvalidNumber { offset, .. } => *offset,
        }
    }

    /// Stable error code used in diagnostics
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::NoOpenKeyFrame { .. } => "E0001",
            ParseError::InvalidNumber { .. } => "E0002",
            ParseError::KeyFrameStillOpen { .. } => "E0003",
        }
    }

    /// Short advice shown next to the error location
    pub(crate) fn hint(&self) -> &'static str {
        match self {
            ParseError::NoOpenKeyFrame { .. } => "open a KeyFrame with `KF` before this",
            ParseError::InvalidNumber { .. } => "literals are written as `0H<digits>;`",
            ParseError::KeyFrameStillOpen { .. } => "close the open KeyFrame with `kf` first",
        }
    }
}
