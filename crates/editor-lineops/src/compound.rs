//! Undo grouping for bursts of move/copy commands.
//!
//! Pressing "move line down" five times should undo in one step. The first move or copy opens a
//! compound change on the buffer; the group stays open until the user does something else:
//! runs a command outside the move/copy family, presses the mouse, or leaves the widget.

use crate::document::TextBuffer;
use tracing::debug;

/// Command identifiers understood by [`ExitStrategy`].
pub mod command_ids {
    /// Move selected lines up.
    pub const MOVE_LINES_UP: &str = "lineops.moveLinesUp";
    /// Move selected lines down.
    pub const MOVE_LINES_DOWN: &str = "lineops.moveLinesDown";
    /// Duplicate selected lines above.
    pub const COPY_LINES_UP: &str = "lineops.copyLinesUp";
    /// Duplicate selected lines below.
    pub const COPY_LINES_DOWN: &str = "lineops.copyLinesDown";
}

/// Decides which commands keep a compound edit open.
#[derive(Debug, Clone)]
pub struct ExitStrategy {
    continuing: Vec<&'static str>,
}

impl ExitStrategy {
    /// Strategy that keeps the group open only for the given command ids.
    pub fn new(continuing: Vec<&'static str>) -> Self {
        Self { continuing }
    }

    /// Whether running `command_id` ends the group.
    pub fn ends_on(&self, command_id: &str) -> bool {
        !self.continuing.contains(&command_id)
    }
}

impl Default for ExitStrategy {
    fn default() -> Self {
        Self::new(vec![
            command_ids::MOVE_LINES_UP,
            command_ids::MOVE_LINES_DOWN,
            command_ids::COPY_LINES_UP,
            command_ids::COPY_LINES_DOWN,
        ])
    }
}

/// An open-or-closed compound change on the buffer.
#[derive(Debug, Default)]
pub struct CompoundEdit {
    open: bool,
    processing: bool,
    strategy: ExitStrategy,
}

impl CompoundEdit {
    /// Closed compound edit using the default move/copy strategy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a group is currently open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the group if needed and mark a move/copy as in progress.
    pub fn begin(&mut self, buffer: &mut dyn TextBuffer) {
        if !self.open {
            debug!("compound line edit started");
            buffer.begin_compound_change();
            self.open = true;
        }
        self.processing = true;
    }

    /// Mark the running move/copy as finished; the group stays open.
    pub fn finish_command(&mut self) {
        self.processing = false;
    }

    /// A command is about to run. Ends the group unless the strategy says it continues it.
    pub fn command_started(&mut self, command_id: &str, buffer: &mut dyn TextBuffer) {
        if self.strategy.ends_on(command_id) {
            self.end(buffer);
        }
    }

    /// Focus loss or a mouse press ends the group.
    pub fn interaction(&mut self, buffer: &mut dyn TextBuffer) {
        self.end(buffer);
    }

    /// Close the group. Never closes it under a running move/copy.
    pub fn end(&mut self, buffer: &mut dyn TextBuffer) {
        if self.open && !self.processing {
            debug!("compound line edit ended");
            buffer.end_compound_change();
            self.open = false;
        }
    }
}
