use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::resize::ResizeBehaviour;

/// Resize settings, fixed for the lifetime of a handler
///
/// Deserializes from the editor's camelCase option names:
///
/// ```json
/// { "columnResizingBehaviour": "resizetable", "tablePixelsForced": true }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResizeConfig {
    pub column_resizing_behaviour: ResizeBehaviour,
    /// Native resize handles on tables
    #[serde(alias = "objectResizing")]
    pub object_resizing_enabled: bool,
    /// Column and row resize bars
    #[serde(alias = "resizeBars")]
    pub resize_bars_enabled: bool,
    /// Treat every table as responsive when a resize starts
    pub table_responsive_forced: bool,
    /// Convert tables to pixel sizing when a resize starts
    pub table_pixels_forced: bool,
    /// Convert tables to percent sizing when a resize starts
    pub table_percentages_forced: bool,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            column_resizing_behaviour: ResizeBehaviour::PreserveTable,
            object_resizing_enabled: true,
            resize_bars_enabled: true,
            table_responsive_forced: false,
            table_pixels_forced: false,
            table_percentages_forced: false,
        }
    }
}

impl ResizeConfig {
    /// Parse settings from JSON; missing keys take their defaults
    ///
    /// # Errors
    /// Returns [`crate::TableError::Config`] for malformed JSON or unknown values.
    pub fn from_json(json: &str) -> Result<Self> {
        if json.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(json)?)
    }

    /// True if resize bars should be shown at all
    pub fn bars_enabled(&self) -> bool {
        self.object_resizing_enabled && self.resize_bars_enabled
    }
}
