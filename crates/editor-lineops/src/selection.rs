//! Selection and span values shared by the region math and the engine.

use crate::document::TextBuffer;
use crate::error::{BadLocation, LineOpError};
use std::str::FromStr;

/// A single contiguous selection in character offsets.
///
/// A zero-length selection is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextSelection {
    /// Start offset.
    pub offset: usize,
    /// Length in characters.
    pub length: usize,
}

impl TextSelection {
    /// Create a selection covering `offset..offset + length`.
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Create a caret (empty selection) at `offset`.
    pub fn caret(offset: usize) -> Self {
        Self { offset, length: 0 }
    }

    /// Exclusive end offset, saturating at `usize::MAX`.
    pub fn end(&self) -> usize {
        self.offset.saturating_add(self.length)
    }

    /// Whether the selection is a bare caret.
    pub fn is_caret(&self) -> bool {
        self.length == 0
    }

    /// Check the selection fits inside `buffer`.
    pub fn validate(&self, buffer: &dyn TextBuffer) -> Result<(), LineOpError> {
        let len = buffer.len();
        let in_bounds = self
            .offset
            .checked_add(self.length)
            .is_some_and(|end| end <= len);
        if !in_bounds {
            return Err(LineOpError::InvalidSelection {
                offset: self.offset,
                length: self.length,
                len,
            });
        }
        Ok(())
    }

    /// Line containing the selection start.
    pub fn start_line(&self, buffer: &dyn TextBuffer) -> Result<usize, BadLocation> {
        buffer.line_of_offset(self.offset)
    }

    /// Line containing the last selected character.
    ///
    /// A non-empty selection that ends at the start of a line does not touch that line.
    pub fn end_line(&self, buffer: &dyn TextBuffer) -> Result<usize, BadLocation> {
        let end = if self.length > 0 {
            self.end() - 1
        } else {
            self.offset
        };
        buffer.line_of_offset(end)
    }
}

/// A run of whole or partial lines, usually without the trailing delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineSpan {
    /// Start offset.
    pub offset: usize,
    /// Length in characters.
    pub length: usize,
}

impl LineSpan {
    /// Create a span covering `offset..offset + length`.
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Create a span from a half-open offset range. `end` before `start` yields an empty span.
    pub fn from_bounds(start: usize, end: usize) -> Self {
        Self {
            offset: start,
            length: end.saturating_sub(start),
        }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// The span as a selection.
    pub fn to_selection(self) -> TextSelection {
        TextSelection::new(self.offset, self.length)
    }
}

/// A visible region reported by a coordinate mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Region {
    /// Start offset in model coordinates.
    pub offset: usize,
    /// Length in characters.
    pub length: usize,
}

impl Region {
    /// Create a region covering `offset..offset + length`.
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Exclusive end offset.
    pub fn end(&self) -> usize {
        self.offset + self.length
    }

    /// Whether `offset` lies inside the region, counting the end position.
    pub fn contains_inclusive(&self, offset: usize) -> bool {
        offset >= self.offset && offset <= self.end()
    }
}

/// Which part of the touched line(s) a delete removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletionKind {
    /// The full lines including their delimiters.
    Whole,
    /// From the start of the first line up to the selection start.
    ToBeginning,
    /// From the selection end to the end of the last line.
    ToEnd,
}

impl FromStr for DeletionKind {
    type Err = LineOpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "whole" => Ok(Self::Whole),
            "to_beginning" => Ok(Self::ToBeginning),
            "to_end" => Ok(Self::ToEnd),
            other => Err(LineOpError::InvalidArgument(format!(
                "unknown deletion kind `{other}`"
            ))),
        }
    }
}

/// Direction of a line move or copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveDirection {
    /// Towards the start of the buffer.
    Up,
    /// Towards the end of the buffer.
    Down,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;

    #[test]
    fn end_line_excludes_line_start_boundary() {
        let doc = Document::new("ab\ncd\nef");
        // "ab\n" fully selected ends at the start of line 1.
        let sel = TextSelection::new(0, 3);
        assert_eq!(sel.start_line(&doc).unwrap(), 0);
        assert_eq!(sel.end_line(&doc).unwrap(), 0);

        let sel = TextSelection::new(1, 3);
        assert_eq!(sel.end_line(&doc).unwrap(), 1);
    }

    #[test]
    fn validate_rejects_out_of_bounds() {
        let doc = Document::new("abc");
        assert!(TextSelection::new(3, 0).validate(&doc).is_ok());
        assert!(matches!(
            TextSelection::new(2, 5).validate(&doc),
            Err(LineOpError::InvalidSelection { len: 3, .. })
        ));
        assert!(matches!(
            TextSelection::new(2, usize::MAX).validate(&doc),
            Err(LineOpError::InvalidSelection { offset: 2, .. })
        ));
    }

    #[test]
    fn deletion_kind_parse() {
        assert_eq!("to_end".parse::<DeletionKind>().unwrap(), DeletionKind::ToEnd);
        assert!(matches!(
            "sideways".parse::<DeletionKind>(),
            Err(LineOpError::InvalidArgument(_))
        ));
    }
}
