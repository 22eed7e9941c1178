//! Line operation preferences.
//!
//! Hosts usually keep editor preferences as JSON; [`LineOpsConfig::from_json_str`] accepts a
//! partial object and fills every missing key with its default.

use crate::error::LineOpError;
use crate::line_ending::LineEnding;
use serde::{Deserialize, Serialize};

/// Preferences consumed by the line mutation engine and the command layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LineOpsConfig {
    /// Text inserted between joined lines.
    pub joiner: String,
    /// Delimiter used when the document gives no better choice.
    pub default_line_ending: LineEnding,
    /// Also strip trailing whitespace from every joined fragment.
    pub trim_trailing_whitespace_on_join: bool,
    /// Concatenate consecutive cut-line commands into one clipboard entry.
    pub accumulate_cut_lines: bool,
    /// Maximum number of undo steps kept by the document.
    pub max_undo: usize,
}

impl Default for LineOpsConfig {
    fn default() -> Self {
        Self {
            joiner: " ".to_string(),
            default_line_ending: LineEnding::Lf,
            trim_trailing_whitespace_on_join: false,
            accumulate_cut_lines: true,
            max_undo: 1000,
        }
    }
}

impl LineOpsConfig {
    /// Parse preferences from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, LineOpError> {
        let config: Self = serde_json::from_str(json)?;
        if config.max_undo == 0 {
            return Err(LineOpError::Config("max_undo must be greater than 0".into()));
        }
        Ok(config)
    }

    /// Serialize preferences to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, LineOpError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
