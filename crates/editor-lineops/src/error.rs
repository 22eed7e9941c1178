//! Error types for line operations.

use thiserror::Error;

/// A location that does not exist in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BadLocation {
    /// Character offset past the end of the buffer.
    #[error("offset {offset} is outside 0..={len}")]
    Offset {
        /// Requested character offset.
        offset: usize,
        /// Buffer length in characters.
        len: usize,
    },
    /// Line index past the last line.
    #[error("line {line} is outside 0..{count}")]
    Line {
        /// Requested zero-based line.
        line: usize,
        /// Number of lines in the buffer.
        count: usize,
    },
    /// Range whose end runs past the end of the buffer.
    #[error("range {offset}+{length} exceeds buffer length {len}")]
    Range {
        /// Range start in characters.
        offset: usize,
        /// Range length in characters.
        length: usize,
        /// Buffer length in characters.
        len: usize,
    },
}

/// Failure reported by a platform clipboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot set clipboard contents: {reason}")]
pub struct ClipboardError {
    /// Platform description of the failure.
    pub reason: String,
}

impl ClipboardError {
    /// Create a clipboard error with a platform reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors produced by the line mutation engine and the command layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineOpError {
    /// Selection does not fit in the buffer.
    #[error("invalid selection {offset}+{length} for buffer of length {len}")]
    InvalidSelection {
        /// Selection start.
        offset: usize,
        /// Selection length.
        length: usize,
        /// Buffer length in characters.
        len: usize,
    },
    /// Malformed argument, e.g. an unknown deletion kind.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    /// A buffer location vanished between computing a region and applying it.
    #[error(transparent)]
    BadLocation(#[from] BadLocation),
    /// Moving or copying would reach into folded or hidden content.
    #[error("illegal move: the affected lines are not fully visible")]
    IllegalMove,
    /// The clipboard rejected the text; nothing was deleted.
    #[error(transparent)]
    Clipboard(#[from] ClipboardError),
    /// Invalid preference text.
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LineOpError {
    /// Whether the error leaves the engine usable and should be surfaced as a status
    /// message rather than treated as a programming error.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::IllegalMove | Self::Clipboard(_) | Self::BadLocation(_)
        )
    }
}

impl From<serde_json::Error> for LineOpError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recoverable_classification() {
        assert!(LineOpError::IllegalMove.is_recoverable());
        assert!(LineOpError::Clipboard(ClipboardError::new("busy")).is_recoverable());
        assert!(!LineOpError::InvalidArgument("kind".into()).is_recoverable());
        assert!(
            !LineOpError::InvalidSelection {
                offset: 9,
                length: 1,
                len: 3
            }
            .is_recoverable()
        );
    }

    #[test]
    fn display_messages() {
        let err = LineOpError::from(BadLocation::Line { line: 4, count: 2 });
        assert_eq!(err.to_string(), "line 4 is outside 0..2");
        let err = LineOpError::from(ClipboardError::new("locked"));
        assert_eq!(err.to_string(), "cannot set clipboard contents: locked");
    }
}
