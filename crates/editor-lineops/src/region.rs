//! Region computations for line operations.
//!
//! Everything here is a pure function of the buffer, the selection and the mapper. Results are
//! recomputed for every operation and never cached across edits.

use crate::document::TextBuffer;
use crate::error::BadLocation;
use crate::line_ending::LineEnding;
use crate::mapper::CoordinateMapper;
use crate::selection::{DeletionKind, LineSpan, MoveDirection, TextSelection};

fn delimiter_len(buffer: &dyn TextBuffer, line: usize) -> Result<usize, BadLocation> {
    Ok(buffer.line_delimiter(line)?.map_or(0, LineEnding::char_len))
}

/// Region removed by a single-offset delete of the given kind.
///
/// `ToEnd` at the end of a line's content covers only the delimiter (nothing on the last line).
/// The region never starts before `offset`, so a caret inside a CRLF takes only the `\n`.
pub fn compute_delete_region(
    buffer: &dyn TextBuffer,
    offset: usize,
    kind: DeletionKind,
) -> Result<LineSpan, BadLocation> {
    let line = buffer.line_of_offset(offset)?;
    let line_offset = buffer.line_offset(line)?;

    let span = match kind {
        DeletionKind::Whole => LineSpan::new(line_offset, buffer.line_length(line)?),
        DeletionKind::ToBeginning => LineSpan::from_bounds(line_offset, offset),
        DeletionKind::ToEnd => {
            let content_end = buffer.line_information(line)?.end();
            if offset >= content_end {
                LineSpan::from_bounds(offset, content_end + delimiter_len(buffer, line)?)
            } else {
                LineSpan::from_bounds(offset, content_end)
            }
        }
    };
    Ok(span)
}

/// Region removed by a delete of the given kind applied to a (possibly multi-line) selection,
/// clipped to the mapper's visible region.
///
/// - `Whole` covers every line the selection touches, delimiters included.
/// - `ToBeginning` runs from the start of the first line to the selection start.
/// - `ToEnd` runs from the selection end to the end of the line holding it.
pub fn compute_multi_line_delete_region(
    buffer: &dyn TextBuffer,
    mapper: &dyn CoordinateMapper,
    selection: TextSelection,
    kind: DeletionKind,
) -> Result<LineSpan, BadLocation> {
    let span = match kind {
        DeletionKind::Whole => {
            let start_line = selection.start_line(buffer)?;
            let end_line = selection.end_line(buffer)?;
            let start = buffer.line_offset(start_line)?;
            let end = buffer.line_offset(end_line)? + buffer.line_length(end_line)?;
            LineSpan::from_bounds(start, end)
        }
        DeletionKind::ToBeginning => compute_delete_region(buffer, selection.offset, kind)?,
        DeletionKind::ToEnd => compute_delete_region(buffer, selection.end(), kind)?,
    };
    Ok(clip_to_visible_region(buffer, mapper, span))
}

/// Intersect `span` with the visible region. A span entirely outside collapses to length 0.
pub fn clip_to_visible_region(
    buffer: &dyn TextBuffer,
    mapper: &dyn CoordinateMapper,
    span: LineSpan,
) -> LineSpan {
    let visible = mapper.visible_region(buffer);
    let start = span.offset.max(visible.offset);
    let end = span.end().min(visible.end());
    LineSpan::from_bounds(start, end)
}

/// Full lines touched by `selection`, without the last line's delimiter.
///
/// The flag is `true` when the last line is empty apart from its delimiter: the selection that
/// follows the moved block then keeps covering that delimiter so the empty line stays selected.
pub fn compute_moving_selection(
    buffer: &dyn TextBuffer,
    selection: TextSelection,
) -> Result<(LineSpan, bool), BadLocation> {
    let start_line = selection.start_line(buffer)?;
    let end_line = selection.end_line(buffer)?;

    let low = buffer.line_offset(start_line)?;
    let end_line_length = buffer.line_length(end_line)?;
    let mut high = buffer.line_offset(end_line)? + end_line_length;

    let delimiter = delimiter_len(buffer, end_line)?;
    high -= delimiter;
    let add_delimiter = delimiter > 0 && end_line_length == delimiter;

    Ok((LineSpan::from_bounds(low, high), add_delimiter))
}

/// The line the moving block jumps over, without its delimiter.
///
/// `None` when there is no such line. A copy tolerates one position past either edge: copying
/// up from the first line reports the first line itself, copying down from the last line
/// reports the empty span at the end of the buffer.
pub fn compute_skipped_line(
    buffer: &dyn TextBuffer,
    selection: TextSelection,
    direction: MoveDirection,
    is_copy: bool,
) -> Result<Option<LineSpan>, BadLocation> {
    let lines = buffer.number_of_lines();
    let skipped = match direction {
        MoveDirection::Up => selection.start_line(buffer)?.checked_sub(1),
        MoveDirection::Down => Some(selection.end_line(buffer)? + 1),
    };

    match skipped {
        None if is_copy => Ok(Some(buffer.line_information(0)?)),
        None => Ok(None),
        Some(line) if line < lines => Ok(Some(buffer.line_information(line)?)),
        Some(line) if is_copy && line == lines => Ok(Some(LineSpan::new(buffer.len(), 0))),
        Some(_) => Ok(None),
    }
}

fn is_whitespace(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

/// Whether `span` can be touched without reaching into hidden content.
///
/// An overhang past either edge of the visible region is tolerated when it is whitespace and
/// the region edge lies on the span's own first/last line, since folds often start or end in
/// the middle of indentation. Both clipped ends must also map to widget offsets, so a span may
/// not start or end inside a collapsed fold.
pub fn contained_by_visible_region(
    buffer: &dyn TextBuffer,
    span: LineSpan,
    mapper: &dyn CoordinateMapper,
) -> Result<bool, BadLocation> {
    let min = span.offset;
    let max = span.end();
    let visible = mapper.visible_region(buffer);
    let selection = span.to_selection();

    if visible.offset > min {
        if buffer.line_of_offset(visible.offset)? != selection.start_line(buffer)? {
            return Ok(false);
        }
        if !is_whitespace(&buffer.get(min, visible.offset - min)?) {
            return Ok(false);
        }
    }

    let visible_end = visible.end();
    if visible_end < max {
        if buffer.line_of_offset(visible_end)? != selection.end_line(buffer)? {
            return Ok(false);
        }
        if !is_whitespace(&buffer.get(visible_end, max - visible_end)?) {
            return Ok(false);
        }
    }

    let first = min.max(visible.offset);
    let last = max.min(visible_end);
    Ok(mapper.model_to_widget(buffer, first).is_some()
        && mapper.model_to_widget(buffer, last).is_some())
}
