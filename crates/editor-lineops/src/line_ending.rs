//! Line ending helpers.
//!
//! Unlike a normalizing editor store, `editor-lineops` keeps every delimiter exactly as it
//! appears in the buffer: a single document may mix LF, CRLF and CR lines, and the line
//! operations must preserve whichever delimiter each line carries.

use serde::{Deserialize, Serialize};

/// A line delimiter recognized by the line tracker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEnding {
    /// Unix-style LF (`'\n'`).
    #[default]
    Lf,
    /// Windows-style CRLF (`"\r\n"`).
    Crlf,
    /// Classic Mac CR (`'\r'`).
    Cr,
}

impl LineEnding {
    /// The delimiter text.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::Crlf => "\r\n",
            Self::Cr => "\r",
        }
    }

    /// Length of the delimiter in characters.
    pub fn char_len(self) -> usize {
        match self {
            Self::Crlf => 2,
            Self::Lf | Self::Cr => 1,
        }
    }

    /// Detect the dominant line ending from a source text.
    ///
    /// The first delimiter found wins; a text without any delimiter yields `None`.
    pub fn detect_in_text(text: &str) -> Option<Self> {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\n' => return Some(Self::Lf),
                '\r' if chars.peek() == Some(&'\n') => return Some(Self::Crlf),
                '\r' => return Some(Self::Cr),
                _ => {}
            }
        }
        None
    }
}

impl std::fmt::Display for LineEnding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Lf => "LF",
            Self::Crlf => "CRLF",
            Self::Cr => "CR",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detect_prefers_first_delimiter() {
        assert_eq!(LineEnding::detect_in_text("a\r\nb\nc"), Some(LineEnding::Crlf));
        assert_eq!(LineEnding::detect_in_text("a\rb"), Some(LineEnding::Cr));
        assert_eq!(LineEnding::detect_in_text("a\nb\r\n"), Some(LineEnding::Lf));
        assert_eq!(LineEnding::detect_in_text("abc"), None);
    }

    #[test]
    fn serde_uses_lowercase_names() {
        let json = serde_json::to_string(&LineEnding::Crlf).unwrap();
        assert_eq!(json, "\"crlf\"");
        let parsed: LineEnding = serde_json::from_str("\"cr\"").unwrap();
        assert_eq!(parsed, LineEnding::Cr);
    }
}
