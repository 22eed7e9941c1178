//! The line mutation engine: delete, move/copy and join.
//!
//! Operations are recomputed from the buffer on every call. The engine keeps only the state that
//! has to outlive one call: the clipboard accumulation of consecutive cuts and the compound edit
//! grouping a burst of moves.

use crate::clipboard::Clipboard;
use crate::compound::CompoundEdit;
use crate::delete_session::{DeleteSession, ViewerEvent};
use crate::document::TextBuffer;
use crate::error::{BadLocation, LineOpError};
use crate::line_ending::LineEnding;
use crate::mapper::CoordinateMapper;
use crate::region::{
    compute_moving_selection, compute_multi_line_delete_region, compute_skipped_line,
    contained_by_visible_region,
};
use crate::selection::{DeletionKind, LineSpan, MoveDirection, TextSelection};
use tracing::{debug, warn};

/// Why an operation left the buffer untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// The computed region had no characters.
    EmptyRegion,
    /// No line exists beyond the buffer edge in the requested direction.
    EdgeOfBuffer,
    /// Nothing to operate on.
    EmptySelection,
}

/// Result of an engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// The buffer changed; `selection` is where the caller should put the selection.
    Applied {
        /// Selection after the edit.
        selection: TextSelection,
    },
    /// The buffer is untouched.
    Unchanged(NoOpReason),
}

impl EditOutcome {
    /// Whether the buffer changed.
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied { .. })
    }

    /// Selection after the edit, if any.
    pub fn selection(&self) -> Option<TextSelection> {
        match self {
            EditOutcome::Applied { selection } => Some(*selection),
            EditOutcome::Unchanged(_) => None,
        }
    }
}

/// Per-invocation scratch for a move or copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct MoveState {
    moving_area: LineSpan,
    skipped_line: LineSpan,
    add_delimiter: bool,
}

/// Computed replace for a move or copy.
struct Insertion {
    text: String,
    offset: usize,
    deviation: isize,
    delimiter: LineEnding,
}

/// Line-oriented mutations over a [`TextBuffer`].
#[derive(Debug, Default)]
pub struct LineMutationEngine {
    session: DeleteSession,
    compound: CompoundEdit,
    trim_trailing_whitespace_on_join: bool,
}

impl LineMutationEngine {
    /// Create an engine with accumulation on and join trimming off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle clipboard accumulation of consecutive cuts.
    pub fn set_accumulate_cut_lines(&mut self, accumulate: bool) {
        self.session.set_accumulate(accumulate);
    }

    /// Toggle trailing-whitespace trimming of joined fragments.
    pub fn set_trim_trailing_whitespace_on_join(&mut self, trim: bool) {
        self.trim_trailing_whitespace_on_join = trim;
    }

    /// The clipboard accumulation session.
    pub fn delete_session(&self) -> &DeleteSession {
        &self.session
    }

    /// Whether a move/copy burst currently holds an open undo group.
    pub fn in_compound_edit(&self) -> bool {
        self.compound.is_open()
    }

    /// Forward a viewer event to the clipboard session and the compound edit.
    pub fn handle_event(&mut self, event: ViewerEvent, buffer: &mut dyn TextBuffer) {
        self.session.handle_event(event);
        if matches!(
            event,
            ViewerEvent::MouseDown | ViewerEvent::MouseDoubleClick | ViewerEvent::FocusLost
        ) {
            self.compound.interaction(buffer);
        }
    }

    /// Notify the compound edit that a command is about to run.
    pub fn command_started(&mut self, command_id: &str, buffer: &mut dyn TextBuffer) {
        self.compound.command_started(command_id, buffer);
    }

    /// Delete (and optionally cut) the lines or partial lines touched by `selection`.
    ///
    /// Ends any open move/copy burst. On success the caller places the caret at the start of the removed region, which is
    /// what the returned selection holds. A clipboard failure leaves the buffer untouched.
    pub fn delete_line(
        &mut self,
        buffer: &mut dyn TextBuffer,
        mapper: &dyn CoordinateMapper,
        clipboard: &mut dyn Clipboard,
        selection: TextSelection,
        kind: DeletionKind,
        copy_to_clipboard: bool,
    ) -> Result<EditOutcome, LineOpError> {
        self.compound.end(buffer);
        selection.validate(&*buffer)?;
        let region = compute_multi_line_delete_region(&*buffer, mapper, selection, kind)?;
        if region.length == 0 {
            debug!(offset = selection.offset, ?kind, "delete line: empty region");
            return Ok(EditOutcome::Unchanged(NoOpReason::EmptyRegion));
        }

        if copy_to_clipboard {
            self.session
                .check_state(selection.offset, buffer.modification_stamp());
            let text = buffer.get_span(region)?;
            self.session.append(&text, clipboard)?;
        }

        if let Err(err) = buffer.replace(region.offset, region.length, "") {
            if copy_to_clipboard {
                self.session.uninstall();
            }
            return Err(err.into());
        }

        if copy_to_clipboard {
            self.session
                .save_state(region.offset, buffer.modification_stamp());
        }

        debug!(
            offset = region.offset,
            length = region.length,
            ?kind,
            copy_to_clipboard,
            "delete line"
        );
        Ok(EditOutcome::Applied {
            selection: TextSelection::caret(region.offset),
        })
    }

    /// Move the lines touched by `selection` past their neighbour, or duplicate them.
    ///
    /// Consecutive calls share one undo group until another command, a mouse press or focus
    /// loss is reported. Touching hidden content fails with [`LineOpError::IllegalMove`].
    pub fn move_or_copy_lines(
        &mut self,
        buffer: &mut dyn TextBuffer,
        mapper: &dyn CoordinateMapper,
        selection: TextSelection,
        direction: MoveDirection,
        is_copy: bool,
    ) -> Result<EditOutcome, LineOpError> {
        selection.validate(&*buffer)?;
        if buffer.is_empty() {
            return Ok(EditOutcome::Unchanged(NoOpReason::EmptySelection));
        }

        let Some(skipped_line) = compute_skipped_line(&*buffer, selection, direction, is_copy)?
        else {
            debug!(?direction, is_copy, "move lines: at buffer edge");
            return Ok(EditOutcome::Unchanged(NoOpReason::EdgeOfBuffer));
        };
        let (moving_area, add_delimiter) = compute_moving_selection(&*buffer, selection)?;
        let state = MoveState {
            moving_area,
            skipped_line,
            add_delimiter,
        };

        if !contained_by_visible_region(&*buffer, state.moving_area, mapper)?
            || !contained_by_visible_region(&*buffer, state.skipped_line, mapper)?
        {
            warn!(
                offset = state.moving_area.offset,
                length = state.moving_area.length,
                ?direction,
                "illegal move: lines reach into hidden content"
            );
            return Err(LineOpError::IllegalMove);
        }

        let insertion = Self::insertion(&*buffer, selection, &state, direction, is_copy)?;
        let replaced = if is_copy {
            0
        } else {
            insertion.text.chars().count()
        };

        self.compound.begin(buffer);
        let result = buffer.replace(insertion.offset, replaced, &insertion.text);
        self.compound.finish_command();
        result?;

        let offset = state
            .moving_area
            .offset
            .checked_add_signed(insertion.deviation)
            .ok_or(BadLocation::Offset {
                offset: state.moving_area.offset,
                len: buffer.len(),
            })?;
        let mut length = state.moving_area.length;
        if state.add_delimiter {
            length += insertion.delimiter.char_len();
        }
        if !mapper.is_projected() {
            let visible_end = mapper.visible_region(&*buffer).end();
            length = length.min(visible_end.saturating_sub(offset));
        }
        // An empty last line moved down has no delimiter left to cover.
        length = length.min(buffer.len().saturating_sub(offset));

        debug!(
            offset = insertion.offset,
            replaced,
            inserted = insertion.text.chars().count(),
            ?direction,
            is_copy,
            "move lines"
        );
        Ok(EditOutcome::Applied {
            selection: TextSelection::new(offset, length),
        })
    }

    fn insertion(
        buffer: &dyn TextBuffer,
        selection: TextSelection,
        state: &MoveState,
        direction: MoveDirection,
        is_copy: bool,
    ) -> Result<Insertion, LineOpError> {
        let moving = buffer.get_span(state.moving_area)?;
        let skipped = buffer.get_span(state.skipped_line)?;
        let default = buffer.default_line_ending();

        let insertion = match (direction, is_copy) {
            (MoveDirection::Up, false) => {
                let skipped_index = selection.start_line(buffer)?.saturating_sub(1);
                let delimiter = buffer.line_delimiter(skipped_index)?.unwrap_or(default);
                Insertion {
                    text: format!("{moving}{}{skipped}", delimiter.as_str()),
                    offset: state.skipped_line.offset,
                    deviation: -((state.skipped_line.length + delimiter.char_len()) as isize),
                    delimiter,
                }
            }
            (MoveDirection::Up, true) => Insertion {
                text: format!("{moving}{}", default.as_str()),
                offset: state.moving_area.offset,
                deviation: 0,
                delimiter: default,
            },
            (MoveDirection::Down, false) => {
                let delimiter = buffer
                    .line_delimiter(selection.end_line(buffer)?)?
                    .unwrap_or(default);
                Insertion {
                    text: format!("{skipped}{}{moving}", delimiter.as_str()),
                    offset: state.moving_area.offset,
                    deviation: (state.skipped_line.length + delimiter.char_len()) as isize,
                    delimiter,
                }
            }
            (MoveDirection::Down, true) => {
                let (text, delimiter) = match buffer.line_delimiter(selection.end_line(buffer)?)? {
                    Some(delimiter) => (format!("{moving}{}", delimiter.as_str()), delimiter),
                    None => (format!("{}{moving}", default.as_str()), default),
                };
                Insertion {
                    text,
                    offset: state.skipped_line.offset,
                    deviation: (state.moving_area.length + delimiter.char_len()) as isize,
                    delimiter,
                }
            }
        };
        Ok(insertion)
    }

    /// Join `start_line..=end_line` into one line; returns the caret offset after the join.
    ///
    /// A single line joins with the next one. Every line but the first loses its leading
    /// whitespace. Returns `None` on the last line. Ends any open move/copy burst.
    pub fn join_lines(
        &mut self,
        buffer: &mut dyn TextBuffer,
        start_line: usize,
        end_line: usize,
        joiner: &str,
    ) -> Result<Option<usize>, LineOpError> {
        self.compound.end(buffer);
        if start_line > end_line {
            return Err(LineOpError::InvalidArgument(format!(
                "join start line {start_line} is after end line {end_line}"
            )));
        }
        let count = buffer.number_of_lines();
        if end_line >= count {
            return Err(BadLocation::Line {
                line: end_line,
                count,
            }
            .into());
        }
        if start_line + 1 == count {
            debug!(start_line, "join lines: last line");
            return Ok(None);
        }
        let end_line = if start_line == end_line {
            end_line + 1
        } else {
            end_line
        };

        let mut joined = String::new();
        for line in start_line..=end_line {
            let text = buffer.get_span(buffer.line_information(line)?)?;
            let mut fragment = if line == start_line {
                text.as_str()
            } else {
                text.trim_start()
            };
            if self.trim_trailing_whitespace_on_join && line != end_line {
                fragment = fragment.trim_end();
            }
            joined.push_str(fragment);
            if line != end_line {
                joined.push_str(joiner);
            }
        }

        let start = buffer.line_offset(start_line)?;
        let end = buffer.line_information(end_line)?.end();
        buffer.replace(start, end - start, &joined)?;

        debug!(start_line, end_line, offset = start, "join lines");
        Ok(Some(start + joined.chars().count()))
    }

    /// Join the lines touched by `selection`.
    pub fn join_selected_lines(
        &mut self,
        buffer: &mut dyn TextBuffer,
        selection: TextSelection,
        joiner: &str,
    ) -> Result<Option<usize>, LineOpError> {
        selection.validate(&*buffer)?;
        let start_line = selection.start_line(&*buffer)?;
        let end_line = selection.end_line(&*buffer)?;
        self.join_lines(buffer, start_line, end_line, joiner)
    }
}
