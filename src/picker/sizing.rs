use serde::{Deserialize, Serialize};

use crate::types::{Address, GridSize};

/// Size limits of the picker grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PickerSettings {
    pub min_rows: usize,
    pub min_cols: usize,
    pub max_rows: usize,
    pub max_cols: usize,
}

impl Default for PickerSettings {
    fn default() -> Self {
        Self {
            min_rows: 10,
            min_cols: 10,
            max_rows: 20,
            max_cols: 20,
        }
    }
}

/// Picker state derived from one hovered address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Changes {
    /// Size the picker grid should have
    pub full: GridSize,
    /// Extent of the selection from the top-left cell (1-based counts)
    pub selection: GridSize,
}

fn clamp_extent(value: usize, min: usize, max: usize) -> usize {
    value.max(min).min(max.max(min))
}

/// Grid size and selection for a hovered `address`.
///
/// The grid keeps one spare row and column beyond the pointer, so it grows
/// as the pointer nears its edge and shrinks back when it retreats, always
/// within the settings' limits.
pub fn resize(address: Address, settings: &PickerSettings) -> Changes {
    let full = GridSize::new(
        clamp_extent(address.row + 2, settings.min_rows, settings.max_rows),
        clamp_extent(address.column + 2, settings.min_cols, settings.max_cols),
    );
    let selection = GridSize::new(
        (address.row + 1).min(full.rows),
        (address.column + 1).min(full.columns),
    );
    Changes { full, selection }
}
