//! Clipboard accumulation for consecutive cut-line commands.
//!
//! Repeating "cut line" without doing anything else in between builds one clipboard entry, the
//! way a kill ring does. Any sign that the user moved on (a click, a focus change, a caret move,
//! an unrelated text change) ends the chain so the clipboard never holds surprising content.

use crate::clipboard::Clipboard;
use crate::error::ClipboardError;
use crate::selection::TextSelection;
use tracing::{trace, warn};

/// Viewer notifications that can end a clipboard session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerEvent {
    /// Mouse button pressed in the text widget.
    MouseDown,
    /// Mouse button released in the text widget.
    MouseUp,
    /// Double click in the text widget.
    MouseDoubleClick,
    /// The text widget gained focus.
    FocusGained,
    /// The text widget lost focus.
    FocusLost,
    /// The buffer changed; `stamp` is its modification stamp after the change.
    TextChanged {
        /// Modification stamp observed after the change.
        stamp: u64,
    },
    /// The viewer selection changed.
    SelectionChanged(TextSelection),
}

/// Accumulates consecutive cut fragments into one clipboard entry.
#[derive(Debug)]
pub struct DeleteSession {
    accumulated: String,
    /// Caret offset left by the previous deletion.
    last_caret: Option<usize>,
    /// Buffer stamp right after the previous deletion.
    last_stamp: Option<u64>,
    active: bool,
    accumulate: bool,
}

impl DeleteSession {
    /// Create an inactive session.
    pub fn new() -> Self {
        Self {
            accumulated: String::new(),
            last_caret: None,
            last_stamp: None,
            active: false,
            accumulate: true,
        }
    }

    /// Disable accumulation: every cut then replaces the clipboard with its own fragment.
    pub fn set_accumulate(&mut self, accumulate: bool) {
        self.accumulate = accumulate;
    }

    /// Whether a session is installed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Text gathered so far.
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    /// Prepare for a deletion at `caret` on a buffer whose stamp is `stamp`.
    ///
    /// Starts a session if none is active. An active session keeps its content only when the
    /// caret is where the previous deletion left it and the buffer has not changed since.
    pub fn check_state(&mut self, caret: usize, stamp: u64) {
        if !self.active {
            trace!(caret, "clipboard session started");
            self.active = true;
            self.reset_content();
            return;
        }

        let continues = self.accumulate
            && self.last_caret == Some(caret)
            && self.last_stamp == Some(stamp);
        if !continues {
            trace!(
                caret,
                last_caret = ?self.last_caret,
                "clipboard session restarted"
            );
            self.reset_content();
        }
    }

    /// Append `text` and publish the whole accumulation.
    ///
    /// On failure the session is uninstalled; the caller must not delete anything.
    pub fn append(
        &mut self,
        text: &str,
        clipboard: &mut dyn Clipboard,
    ) -> Result<(), ClipboardError> {
        self.accumulated.push_str(text);
        if let Err(err) = clipboard.set_contents(&self.accumulated) {
            warn!(error = %err, "clipboard write failed, deletion aborted");
            self.uninstall();
            return Err(err);
        }
        Ok(())
    }

    /// Record where the deletion left the caret and the buffer stamp it produced.
    pub fn save_state(&mut self, caret: usize, stamp: u64) {
        self.last_caret = Some(caret);
        self.last_stamp = Some(stamp);
    }

    /// React to a viewer event; returns `true` when it ended the session.
    ///
    /// Echoes of the session's own deletion (the caret it left behind, the stamp it produced)
    /// are ignored.
    pub fn handle_event(&mut self, event: ViewerEvent) -> bool {
        if !self.active {
            return false;
        }
        let own_echo = match event {
            ViewerEvent::SelectionChanged(selection) => {
                selection.is_caret() && self.last_caret == Some(selection.offset)
            }
            ViewerEvent::TextChanged { stamp } => self.last_stamp == Some(stamp),
            _ => false,
        };
        if own_echo {
            return false;
        }
        trace!(?event, "clipboard session ended by viewer event");
        self.uninstall();
        true
    }

    /// Tear the session down. Never fails.
    pub fn uninstall(&mut self) {
        self.active = false;
        self.reset_content();
    }

    fn reset_content(&mut self) {
        self.accumulated.clear();
        self.last_caret = None;
        self.last_stamp = None;
    }
}

impl Default for DeleteSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clipboard::MemoryClipboard;

    #[test]
    fn consecutive_appends_accumulate() {
        let mut session = DeleteSession::new();
        let mut clipboard = MemoryClipboard::new();

        session.check_state(4, 1);
        session.append("one\n", &mut clipboard).unwrap();
        session.save_state(4, 2);

        session.check_state(4, 2);
        session.append("two\n", &mut clipboard).unwrap();
        assert_eq!(clipboard.contents(), Some("one\ntwo\n"));
    }

    #[test]
    fn caret_move_restarts_content() {
        let mut session = DeleteSession::new();
        let mut clipboard = MemoryClipboard::new();

        session.check_state(0, 0);
        session.append("one\n", &mut clipboard).unwrap();
        session.save_state(0, 1);

        session.check_state(7, 1);
        assert!(session.is_active());
        session.append("two\n", &mut clipboard).unwrap();
        assert_eq!(clipboard.contents(), Some("two\n"));
    }

    #[test]
    fn stamp_change_restarts_content() {
        let mut session = DeleteSession::new();
        let mut clipboard = MemoryClipboard::new();
        session.check_state(0, 0);
        session.append("one\n", &mut clipboard).unwrap();
        session.save_state(0, 1);

        session.check_state(0, 5);
        assert_eq!(session.accumulated(), "");
    }

    #[test]
    fn failed_write_uninstalls() {
        let mut session = DeleteSession::new();
        let mut clipboard = MemoryClipboard::new();
        clipboard.set_available(false);

        session.check_state(0, 0);
        assert!(session.append("one\n", &mut clipboard).is_err());
        assert!(!session.is_active());
    }

    #[test]
    fn own_echo_events_are_ignored() {
        let mut session = DeleteSession::new();
        let mut clipboard = MemoryClipboard::new();
        session.check_state(3, 0);
        session.append("x", &mut clipboard).unwrap();
        session.save_state(3, 1);

        assert!(!session.handle_event(ViewerEvent::TextChanged { stamp: 1 }));
        assert!(!session.handle_event(ViewerEvent::SelectionChanged(TextSelection::caret(3))));
        assert!(session.is_active());

        assert!(session.handle_event(ViewerEvent::SelectionChanged(TextSelection::caret(5))));
        assert!(!session.is_active());
    }

    #[test]
    fn interaction_events_uninstall() {
        for event in [
            ViewerEvent::MouseDown,
            ViewerEvent::MouseUp,
            ViewerEvent::MouseDoubleClick,
            ViewerEvent::FocusGained,
            ViewerEvent::FocusLost,
            ViewerEvent::TextChanged { stamp: 99 },
        ] {
            let mut session = DeleteSession::new();
            session.check_state(0, 0);
            assert!(session.handle_event(event), "{event:?}");
            assert!(!session.is_active());
        }
    }

    #[test]
    fn disabled_accumulation_keeps_only_latest() {
        let mut session = DeleteSession::new();
        session.set_accumulate(false);
        let mut clipboard = MemoryClipboard::new();

        session.check_state(0, 0);
        session.append("one\n", &mut clipboard).unwrap();
        session.save_state(0, 1);
        session.check_state(0, 1);
        session.append("two\n", &mut clipboard).unwrap();
        assert_eq!(clipboard.contents(), Some("two\n"));
    }
}
