//! Command layer
//!
//! The host-facing surface: a [`LineCommand`] per editor action and a [`LineCommandExecutor`]
//! that owns the document, the live selection, the folds and the clipboard, forwards each
//! command to the [`LineMutationEngine`] and reconciles the selection it returns.
//!
//! # Example
//!
//! ```rust
//! use editor_lineops::{LineCommand, LineCommandExecutor};
//!
//! let mut executor = LineCommandExecutor::new("alpha\nbeta\ngamma");
//! executor
//!     .execute(LineCommand::MoveCaret { offset: 7 })
//!     .unwrap();
//! executor.execute(LineCommand::MoveLinesUp).unwrap();
//! assert_eq!(executor.text(), "beta\nalpha\ngamma");
//!
//! executor.execute(LineCommand::CutLine).unwrap();
//! assert_eq!(executor.text(), "alpha\ngamma");
//! assert_eq!(executor.clipboard().contents(), Some("beta\n"));
//! ```

use crate::clipboard::{Clipboard, MemoryClipboard};
use crate::compound::command_ids;
use crate::config::LineOpsConfig;
use crate::delete_session::ViewerEvent;
use crate::document::{Document, TextBuffer};
use crate::engine::{EditOutcome, LineMutationEngine, NoOpReason};
use crate::error::LineOpError;
use crate::folding::{FoldRegion, FoldingManager};
use crate::line_ending::LineEnding;
use crate::mapper::ProjectionMapper;
use crate::selection::{DeletionKind, MoveDirection, TextSelection};
use tracing::{debug, warn};

/// Editor actions understood by [`LineCommandExecutor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    /// Delete the lines touched by the selection.
    DeleteLine,
    /// Delete the lines touched by the selection, appending them to the clipboard.
    CutLine,
    /// Delete from the start of the first selected line to the selection start.
    DeleteLineToBeginning,
    /// Like [`LineCommand::DeleteLineToBeginning`], appending to the clipboard.
    CutLineToBeginning,
    /// Delete from the selection end to the end of its line.
    DeleteLineToEnd,
    /// Like [`LineCommand::DeleteLineToEnd`], appending to the clipboard.
    CutLineToEnd,
    /// Swap the selected lines with the line above.
    MoveLinesUp,
    /// Swap the selected lines with the line below.
    MoveLinesDown,
    /// Duplicate the selected lines, keeping the selection on the upper copy.
    CopyLinesUp,
    /// Duplicate the selected lines, moving the selection to the lower copy.
    CopyLinesDown,
    /// Join the selected lines, or the caret line with the next one.
    JoinLines,
    /// Replace the selection.
    SetSelection {
        /// Start offset.
        offset: usize,
        /// Length in characters.
        length: usize,
    },
    /// Place a caret.
    MoveCaret {
        /// Caret offset.
        offset: usize,
    },
    /// Undo the last group of edits.
    Undo,
    /// Redo the last undone group.
    Redo,
    /// Insert text (typing, paste).
    Insert {
        /// Insertion offset.
        offset: usize,
        /// Text to insert.
        text: String,
    },
    /// Add a collapsed fold over `start_line..=end_line`.
    Fold {
        /// First line, which stays visible.
        start_line: usize,
        /// Last hidden line.
        end_line: usize,
    },
    /// Expand the innermost fold containing `line`.
    Unfold {
        /// Any line inside the fold.
        line: usize,
    },
    /// Expand every fold.
    UnfoldAll,
}

impl LineCommand {
    /// Stable identifier, used to decide whether a move/copy burst continues.
    pub fn id(&self) -> &'static str {
        match self {
            LineCommand::DeleteLine => "lineops.deleteLine",
            LineCommand::CutLine => "lineops.cutLine",
            LineCommand::DeleteLineToBeginning => "lineops.deleteLineToBeginning",
            LineCommand::CutLineToBeginning => "lineops.cutLineToBeginning",
            LineCommand::DeleteLineToEnd => "lineops.deleteLineToEnd",
            LineCommand::CutLineToEnd => "lineops.cutLineToEnd",
            LineCommand::MoveLinesUp => command_ids::MOVE_LINES_UP,
            LineCommand::MoveLinesDown => command_ids::MOVE_LINES_DOWN,
            LineCommand::CopyLinesUp => command_ids::COPY_LINES_UP,
            LineCommand::CopyLinesDown => command_ids::COPY_LINES_DOWN,
            LineCommand::JoinLines => "lineops.joinLines",
            LineCommand::SetSelection { .. } => "lineops.setSelection",
            LineCommand::MoveCaret { .. } => "lineops.moveCaret",
            LineCommand::Undo => "lineops.undo",
            LineCommand::Redo => "lineops.redo",
            LineCommand::Insert { .. } => "lineops.insert",
            LineCommand::Fold { .. } => "lineops.fold",
            LineCommand::Unfold { .. } => "lineops.unfold",
            LineCommand::UnfoldAll => "lineops.unfoldAll",
        }
    }
}

/// Command result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandResult {
    /// Success, no return value
    Success,
    /// The buffer changed; the live selection is now this one.
    Selection(TextSelection),
    /// Nothing happened (the host may beep).
    Unchanged(NoOpReason),
    /// The buffer moved under the operation; nothing was changed.
    Aborted,
}

/// Executes [`LineCommand`]s against an owned document.
pub struct LineCommandExecutor<C: Clipboard = MemoryClipboard> {
    document: Document,
    selection: TextSelection,
    folding: FoldingManager,
    clipboard: C,
    engine: LineMutationEngine,
    config: LineOpsConfig,
    /// Command history
    command_history: Vec<LineCommand>,
}

impl LineCommandExecutor {
    /// Create an executor over `text` with an in-memory clipboard and default preferences.
    pub fn new(text: &str) -> Self {
        Self::with_config(text, MemoryClipboard::new(), LineOpsConfig::default())
    }

    /// Create an empty executor
    pub fn empty() -> Self {
        Self::new("")
    }
}

impl<C: Clipboard> LineCommandExecutor<C> {
    /// Create an executor with an explicit clipboard and preferences.
    pub fn with_config(text: &str, clipboard: C, config: LineOpsConfig) -> Self {
        let line_ending = LineEnding::detect_in_text(text).unwrap_or(config.default_line_ending);
        let mut document = Document::with_line_ending(text, line_ending);
        document.set_max_undo(config.max_undo);

        let mut engine = LineMutationEngine::new();
        engine.set_accumulate_cut_lines(config.accumulate_cut_lines);
        engine.set_trim_trailing_whitespace_on_join(config.trim_trailing_whitespace_on_join);

        Self {
            document,
            selection: TextSelection::default(),
            folding: FoldingManager::new(),
            clipboard,
            engine,
            config,
            command_history: Vec::new(),
        }
    }

    /// The document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Full text.
    pub fn text(&self) -> String {
        self.document.text()
    }

    /// The live selection.
    pub fn selection(&self) -> TextSelection {
        self.selection
    }

    /// Fold regions.
    pub fn folding(&self) -> &FoldingManager {
        &self.folding
    }

    /// The clipboard.
    pub fn clipboard(&self) -> &C {
        &self.clipboard
    }

    /// Mutable clipboard access.
    pub fn clipboard_mut(&mut self) -> &mut C {
        &mut self.clipboard
    }

    /// Active preferences.
    pub fn config(&self) -> &LineOpsConfig {
        &self.config
    }

    /// The engine, for inspecting session state.
    pub fn engine(&self) -> &LineMutationEngine {
        &self.engine
    }

    /// Commands executed so far.
    pub fn command_history(&self) -> &[LineCommand] {
        &self.command_history
    }

    /// Forward a viewer event (mouse, focus, selection, text change).
    pub fn handle_event(&mut self, event: ViewerEvent) {
        if let ViewerEvent::SelectionChanged(selection) = event {
            self.selection = selection;
        }
        self.engine.handle_event(event, &mut self.document);
    }

    /// Execute command
    pub fn execute(&mut self, command: LineCommand) -> Result<CommandResult, LineOpError> {
        self.command_history.push(command.clone());
        self.engine.command_started(command.id(), &mut self.document);

        let result = match command {
            LineCommand::DeleteLine => self.delete(DeletionKind::Whole, false),
            LineCommand::CutLine => self.delete(DeletionKind::Whole, true),
            LineCommand::DeleteLineToBeginning => self.delete(DeletionKind::ToBeginning, false),
            LineCommand::CutLineToBeginning => self.delete(DeletionKind::ToBeginning, true),
            LineCommand::DeleteLineToEnd => self.delete(DeletionKind::ToEnd, false),
            LineCommand::CutLineToEnd => self.delete(DeletionKind::ToEnd, true),
            LineCommand::MoveLinesUp => self.move_lines(MoveDirection::Up, false),
            LineCommand::MoveLinesDown => self.move_lines(MoveDirection::Down, false),
            LineCommand::CopyLinesUp => self.move_lines(MoveDirection::Up, true),
            LineCommand::CopyLinesDown => self.move_lines(MoveDirection::Down, true),
            LineCommand::JoinLines => self.join(),
            LineCommand::SetSelection { offset, length } => {
                self.set_selection(TextSelection::new(offset, length))
            }
            LineCommand::MoveCaret { offset } => self.set_selection(TextSelection::caret(offset)),
            LineCommand::Undo => self.undo(),
            LineCommand::Redo => self.redo(),
            LineCommand::Insert { offset, text } => self.insert(offset, &text),
            LineCommand::Fold {
                start_line,
                end_line,
            } => {
                if start_line >= end_line || end_line >= self.document.number_of_lines() {
                    return Err(LineOpError::InvalidArgument(format!(
                        "invalid fold range {start_line}..={end_line}"
                    )));
                }
                self.folding
                    .add_region(FoldRegion::collapsed(start_line, end_line));
                Ok(CommandResult::Success)
            }
            LineCommand::Unfold { line } => {
                self.folding.expand_line(line);
                Ok(CommandResult::Success)
            }
            LineCommand::UnfoldAll => {
                self.folding.expand_all();
                Ok(CommandResult::Success)
            }
        };

        // A buffer that changed under the operation aborts it without a partial mutation.
        match result {
            Err(LineOpError::BadLocation(err)) => {
                warn!(error = %err, "line operation aborted");
                Ok(CommandResult::Aborted)
            }
            other => other,
        }
    }

    /// Batch execute commands, stopping at the first error.
    pub fn execute_batch(
        &mut self,
        commands: Vec<LineCommand>,
    ) -> Result<Vec<CommandResult>, LineOpError> {
        commands
            .into_iter()
            .map(|command| self.execute(command))
            .collect()
    }

    fn delete(&mut self, kind: DeletionKind, cut: bool) -> Result<CommandResult, LineOpError> {
        let start_line = self.selection.start_line(&self.document)?;
        let lines_before = self.document.number_of_lines();

        let mapper = ProjectionMapper::new(&self.folding);
        let outcome = self.engine.delete_line(
            &mut self.document,
            &mapper,
            &mut self.clipboard,
            self.selection,
            kind,
            cut,
        )?;
        self.shift_folds(start_line, lines_before);
        Ok(self.apply_outcome(outcome))
    }

    fn move_lines(
        &mut self,
        direction: MoveDirection,
        is_copy: bool,
    ) -> Result<CommandResult, LineOpError> {
        let edit_line = match direction {
            MoveDirection::Up => self.selection.start_line(&self.document)?,
            MoveDirection::Down => self.selection.end_line(&self.document)?,
        };
        let lines_before = self.document.number_of_lines();

        let mapper = ProjectionMapper::new(&self.folding);
        let outcome = self.engine.move_or_copy_lines(
            &mut self.document,
            &mapper,
            self.selection,
            direction,
            is_copy,
        )?;
        self.shift_folds(edit_line, lines_before);
        Ok(self.apply_outcome(outcome))
    }

    fn join(&mut self) -> Result<CommandResult, LineOpError> {
        let start_line = self.selection.start_line(&self.document)?;
        let lines_before = self.document.number_of_lines();

        let caret = self.engine.join_selected_lines(
            &mut self.document,
            self.selection,
            &self.config.joiner,
        )?;
        match caret {
            Some(offset) => {
                self.shift_folds(start_line, lines_before);
                Ok(self.apply_outcome(EditOutcome::Applied {
                    selection: TextSelection::caret(offset),
                }))
            }
            None => Ok(CommandResult::Unchanged(NoOpReason::EdgeOfBuffer)),
        }
    }

    fn set_selection(&mut self, selection: TextSelection) -> Result<CommandResult, LineOpError> {
        selection.validate(&self.document)?;
        self.selection = selection;
        self.engine
            .handle_event(ViewerEvent::SelectionChanged(selection), &mut self.document);
        Ok(CommandResult::Success)
    }

    fn insert(&mut self, offset: usize, text: &str) -> Result<CommandResult, LineOpError> {
        TextSelection::caret(offset).validate(&self.document)?;
        let edit_line = self.document.line_of_offset(offset)?;
        let lines_before = self.document.number_of_lines();

        self.document.replace(offset, 0, text)?;
        self.shift_folds(edit_line, lines_before);
        let stamp = self.document.modification_stamp();
        self.engine
            .handle_event(ViewerEvent::TextChanged { stamp }, &mut self.document);

        self.selection = TextSelection::caret(offset + text.chars().count());
        Ok(CommandResult::Selection(self.selection))
    }

    fn undo(&mut self) -> Result<CommandResult, LineOpError> {
        let caret = self
            .document
            .undo()
            .ok_or_else(|| LineOpError::InvalidArgument("nothing to undo".to_string()))?;
        self.after_history_change(caret);
        Ok(CommandResult::Selection(self.selection))
    }

    fn redo(&mut self) -> Result<CommandResult, LineOpError> {
        let caret = self
            .document
            .redo()
            .ok_or_else(|| LineOpError::InvalidArgument("nothing to redo".to_string()))?;
        self.after_history_change(caret);
        Ok(CommandResult::Selection(self.selection))
    }

    fn after_history_change(&mut self, caret: usize) {
        self.folding
            .clamp_to_line_count(self.document.number_of_lines());
        let stamp = self.document.modification_stamp();
        self.engine
            .handle_event(ViewerEvent::TextChanged { stamp }, &mut self.document);
        self.selection = TextSelection::caret(caret.min(self.document.len()));
    }

    fn shift_folds(&mut self, edit_line: usize, lines_before: usize) {
        let lines_after = self.document.number_of_lines();
        let delta = lines_after as isize - lines_before as isize;
        if delta != 0 {
            debug!(edit_line, delta, "shifting folds");
            self.folding.apply_line_delta(edit_line, delta);
            self.folding.clamp_to_line_count(lines_after);
        }
    }

    fn apply_outcome(&mut self, outcome: EditOutcome) -> CommandResult {
        match outcome {
            EditOutcome::Applied { selection } => {
                self.selection = selection;
                CommandResult::Selection(selection)
            }
            EditOutcome::Unchanged(reason) => CommandResult::Unchanged(reason),
        }
    }
}
