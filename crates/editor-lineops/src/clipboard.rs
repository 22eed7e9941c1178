//! System clipboard abstraction.

use crate::error::ClipboardError;

/// A platform clipboard accepting plain text.
pub trait Clipboard {
    /// Replace the clipboard contents with `text`.
    fn set_contents(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard for headless hosts and tests.
///
/// It can be marked unavailable to reproduce a platform clipboard that is locked by another
/// application.
#[derive(Debug, Clone)]
pub struct MemoryClipboard {
    contents: Option<String>,
    available: bool,
}

impl MemoryClipboard {
    /// Create an empty, available clipboard.
    pub fn new() -> Self {
        Self {
            contents: None,
            available: true,
        }
    }

    /// Current contents.
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }

    /// Make subsequent writes succeed or fail.
    pub fn set_available(&mut self, available: bool) {
        self.available = available;
    }
}

impl Default for MemoryClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_contents(&mut self, text: &str) -> Result<(), ClipboardError> {
        if !self.available {
            return Err(ClipboardError::new("clipboard is locked by another owner"));
        }
        self.contents = Some(text.to_string());
        Ok(())
    }
}

impl<C: Clipboard + ?Sized> Clipboard for Box<C> {
    fn set_contents(&mut self, text: &str) -> Result<(), ClipboardError> {
        (**self).set_contents(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_clipboard_keeps_old_contents() {
        let mut clipboard = MemoryClipboard::new();
        clipboard.set_contents("first").unwrap();
        clipboard.set_available(false);
        assert!(clipboard.set_contents("second").is_err());
        assert_eq!(clipboard.contents(), Some("first"));
    }
}
