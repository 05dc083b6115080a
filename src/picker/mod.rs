//! Insert-table grid picker.
//!
//! The picker shows a small grid of cells; hovering selects a rectangle
//! from the top-left cell to the one under the pointer, and the grid grows
//! while the pointer is within one cell of its edge.

mod cell_position;
mod redimension;
mod sizing;

pub use cell_position::find_cell;
pub use redimension::{PickerGrid, PickerTable, Redimension};
pub use sizing::{resize, Changes, PickerSettings};
