//! Text buffer abstraction and the rope-backed [`Document`].
//!
//! [`TextBuffer`] is the narrow contract the line operations consume: offset/line addressing,
//! per-line delimiters and an atomic `replace`. [`Document`] implements it on top of a
//! [`ropey::Rope`] that recognizes LF, CRLF and CR as line breaks, and records every replace in
//! an undo history that understands compound changes.

use crate::error::BadLocation;
use crate::line_ending::LineEnding;
use crate::selection::LineSpan;
use crate::undo::{TextEdit, UndoRedoManager, UndoStep};
use ropey::Rope;

/// Mutable text addressed by character offset and zero-based line number.
pub trait TextBuffer {
    /// Length in characters.
    fn len(&self) -> usize;

    /// Whether the buffer holds no text.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text of `offset..offset + length`.
    fn get(&self, offset: usize, length: usize) -> Result<String, BadLocation>;

    /// Replace `offset..offset + length` with `text` in one atomic step.
    fn replace(&mut self, offset: usize, length: usize, text: &str) -> Result<(), BadLocation>;

    /// Number of lines. A buffer ending with a delimiter has a trailing empty line.
    fn number_of_lines(&self) -> usize;

    /// Line containing `offset`; `offset == len()` maps to the last line.
    fn line_of_offset(&self, offset: usize) -> Result<usize, BadLocation>;

    /// Offset of the first character of `line`.
    fn line_offset(&self, line: usize) -> Result<usize, BadLocation>;

    /// Length of `line` including its delimiter.
    fn line_length(&self, line: usize) -> Result<usize, BadLocation>;

    /// Delimiter terminating `line`, `None` for the last line.
    fn line_delimiter(&self, line: usize) -> Result<Option<LineEnding>, BadLocation>;

    /// Delimiter used when one has to be synthesized.
    fn default_line_ending(&self) -> LineEnding;

    /// Counter bumped by every modification.
    fn modification_stamp(&self) -> u64;

    /// Open a compound change; replaces until the matching
    /// [`end_compound_change`](TextBuffer::end_compound_change) undo as one unit.
    fn begin_compound_change(&mut self) {}

    /// Close the innermost compound change.
    fn end_compound_change(&mut self) {}

    /// Offset and length of `line` without its delimiter.
    fn line_information(&self, line: usize) -> Result<LineSpan, BadLocation> {
        let offset = self.line_offset(line)?;
        let delimiter = self
            .line_delimiter(line)?
            .map_or(0, LineEnding::char_len);
        Ok(LineSpan::new(offset, self.line_length(line)? - delimiter))
    }

    /// Text of `span`.
    fn get_span(&self, span: LineSpan) -> Result<String, BadLocation> {
        self.get(span.offset, span.length)
    }
}

/// Rope-backed document with undo history.
///
/// # Example
///
/// ```rust
/// use editor_lineops::{Document, LineEnding, TextBuffer};
///
/// let doc = Document::new("one\r\ntwo\nthree");
/// assert_eq!(doc.number_of_lines(), 3);
/// assert_eq!(doc.line_delimiter(0).unwrap(), Some(LineEnding::Crlf));
/// assert_eq!(doc.line_delimiter(2).unwrap(), None);
/// ```
pub struct Document {
    rope: Rope,
    default_line_ending: LineEnding,
    stamp: u64,
    history: UndoRedoManager,
}

impl Document {
    /// Create a document; the default delimiter is detected from `text` (LF if none).
    pub fn new(text: &str) -> Self {
        let default_line_ending = LineEnding::detect_in_text(text).unwrap_or_default();
        Self::with_line_ending(text, default_line_ending)
    }

    /// Create a document with an explicit default delimiter.
    pub fn with_line_ending(text: &str, default_line_ending: LineEnding) -> Self {
        Self {
            rope: Rope::from_str(text),
            default_line_ending,
            stamp: 0,
            history: UndoRedoManager::new(1000),
        }
    }

    /// Limit the undo history to `max_undo` steps.
    pub fn set_max_undo(&mut self, max_undo: usize) {
        self.history = UndoRedoManager::new(max_undo);
    }

    /// Full text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Can undo
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Can redo
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Number of undoable groups.
    pub fn undo_depth(&self) -> usize {
        self.history.undo_depth()
    }

    /// Whether a compound change is open.
    pub fn in_compound_change(&self) -> bool {
        self.history.in_compound()
    }

    /// Undo the newest group; returns the caret offset after the undo.
    pub fn undo(&mut self) -> Option<usize> {
        // Undo closes any open compound change.
        while self.history.in_compound() {
            self.history.end_compound();
        }
        let steps = self.history.pop_undo_group()?;
        let mut caret = None;
        for step in steps {
            let edit = &step.edit;
            self.apply_raw(edit.offset, edit.inserted_len(), &edit.deleted_text);
            caret = Some(edit.offset + edit.deleted_len());
            self.history.push_redo(step);
        }
        caret
    }

    /// Redo the most recently undone group; returns the caret offset after the redo.
    pub fn redo(&mut self) -> Option<usize> {
        let steps = self.history.pop_redo_group()?;
        let mut caret = None;
        for step in steps {
            let edit = &step.edit;
            self.apply_raw(edit.offset, edit.deleted_len(), &edit.inserted_text);
            caret = Some(edit.offset + edit.inserted_len());
            self.history.push_undo_raw(step);
        }
        caret
    }

    fn apply_raw(&mut self, offset: usize, length: usize, text: &str) {
        if length > 0 {
            self.rope.remove(offset..offset + length);
        }
        if !text.is_empty() {
            self.rope.insert(offset, text);
        }
        self.stamp = self.stamp.wrapping_add(1);
    }

    fn check_line(&self, line: usize) -> Result<(), BadLocation> {
        let count = self.rope.len_lines();
        if line >= count {
            return Err(BadLocation::Line { line, count });
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("")
    }
}

impl TextBuffer for Document {
    fn len(&self) -> usize {
        self.rope.len_chars()
    }

    fn get(&self, offset: usize, length: usize) -> Result<String, BadLocation> {
        let len = self.len();
        let end = offset
            .checked_add(length)
            .filter(|&end| end <= len)
            .ok_or(BadLocation::Range {
                offset,
                length,
                len,
            })?;
        Ok(self.rope.slice(offset..end).to_string())
    }

    fn replace(&mut self, offset: usize, length: usize, text: &str) -> Result<(), BadLocation> {
        let deleted_text = self.get(offset, length)?;
        if deleted_text.is_empty() && text.is_empty() {
            return Ok(());
        }
        self.apply_raw(offset, length, text);
        self.history.push(TextEdit {
            offset,
            deleted_text,
            inserted_text: text.to_string(),
        });
        Ok(())
    }

    fn number_of_lines(&self) -> usize {
        self.rope.len_lines()
    }

    fn line_of_offset(&self, offset: usize) -> Result<usize, BadLocation> {
        let len = self.len();
        if offset > len {
            return Err(BadLocation::Offset { offset, len });
        }
        Ok(self.rope.char_to_line(offset))
    }

    fn line_offset(&self, line: usize) -> Result<usize, BadLocation> {
        self.check_line(line)?;
        Ok(self.rope.line_to_char(line))
    }

    fn line_length(&self, line: usize) -> Result<usize, BadLocation> {
        self.check_line(line)?;
        Ok(self.rope.line(line).len_chars())
    }

    fn line_delimiter(&self, line: usize) -> Result<Option<LineEnding>, BadLocation> {
        self.check_line(line)?;
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        let delimiter = match len.checked_sub(1).map(|i| slice.char(i)) {
            Some('\n') if len >= 2 && slice.char(len - 2) == '\r' => Some(LineEnding::Crlf),
            Some('\n') => Some(LineEnding::Lf),
            Some('\r') => Some(LineEnding::Cr),
            _ => None,
        };
        Ok(delimiter)
    }

    fn default_line_ending(&self) -> LineEnding {
        self.default_line_ending
    }

    fn modification_stamp(&self) -> u64 {
        self.stamp
    }

    fn begin_compound_change(&mut self) {
        self.history.begin_compound();
    }

    fn end_compound_change(&mut self) {
        self.history.end_compound();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_delimiters() {
        let doc = Document::new("a\r\nb\nc\rd");
        assert_eq!(doc.number_of_lines(), 4);
        assert_eq!(doc.line_delimiter(0).unwrap(), Some(LineEnding::Crlf));
        assert_eq!(doc.line_delimiter(1).unwrap(), Some(LineEnding::Lf));
        assert_eq!(doc.line_delimiter(2).unwrap(), Some(LineEnding::Cr));
        assert_eq!(doc.line_delimiter(3).unwrap(), None);
        assert_eq!(doc.line_length(0).unwrap(), 3);
        assert_eq!(doc.line_offset(1).unwrap(), 3);
        assert_eq!(doc.line_information(0).unwrap(), LineSpan::new(0, 1));
    }

    #[test]
    fn test_trailing_delimiter_adds_empty_line() {
        let doc = Document::new("a\nb\n");
        assert_eq!(doc.number_of_lines(), 3);
        assert_eq!(doc.line_offset(2).unwrap(), 4);
        assert_eq!(doc.line_length(2).unwrap(), 0);
        assert_eq!(doc.line_of_offset(4).unwrap(), 2);
    }

    #[test]
    fn test_line_of_offset_inside_crlf() {
        let doc = Document::new("ab\r\ncd");
        // Between '\r' and '\n' still belongs to line 0.
        assert_eq!(doc.line_of_offset(3).unwrap(), 0);
        assert_eq!(doc.line_of_offset(4).unwrap(), 1);
    }

    #[test]
    fn test_bad_locations() {
        let doc = Document::new("abc");
        assert_eq!(
            doc.line_of_offset(4),
            Err(BadLocation::Offset { offset: 4, len: 3 })
        );
        assert_eq!(doc.line_offset(1), Err(BadLocation::Line { line: 1, count: 1 }));
        assert!(doc.get(2, 2).is_err());
        assert!(doc.get(2, usize::MAX).is_err());
    }

    #[test]
    fn test_replace_and_undo_redo() {
        let mut doc = Document::new("hello world");
        doc.replace(6, 5, "rust").unwrap();
        assert_eq!(doc.text(), "hello rust");
        assert_eq!(doc.undo(), Some(11));
        assert_eq!(doc.text(), "hello world");
        assert_eq!(doc.redo(), Some(10));
        assert_eq!(doc.text(), "hello rust");
    }

    #[test]
    fn test_compound_change_undoes_as_one() {
        let mut doc = Document::new("abc");
        doc.begin_compound_change();
        doc.replace(0, 0, "1").unwrap();
        doc.replace(4, 0, "2").unwrap();
        doc.end_compound_change();
        assert_eq!(doc.text(), "1abc2");
        assert_eq!(doc.undo_depth(), 1);
        doc.undo();
        assert_eq!(doc.text(), "abc");
        doc.redo();
        assert_eq!(doc.text(), "1abc2");
    }

    #[test]
    fn test_stamp_moves_on_every_change() {
        let mut doc = Document::new("abc");
        let before = doc.modification_stamp();
        doc.replace(0, 1, "").unwrap();
        assert_ne!(doc.modification_stamp(), before);
        // A no-op replace leaves the stamp alone.
        let stamp = doc.modification_stamp();
        doc.replace(0, 0, "").unwrap();
        assert_eq!(doc.modification_stamp(), stamp);
    }

    #[test]
    fn test_default_line_ending_detected() {
        assert_eq!(Document::new("a\r\nb").default_line_ending(), LineEnding::Crlf);
        assert_eq!(Document::new("ab").default_line_ending(), LineEnding::Lf);
    }
}
