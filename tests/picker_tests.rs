//! Integration tests for the insert-table grid picker.
//!
//! A pointer sweeping over the picker grows it one row and column ahead of
//! the hovered cell, shrinks it back when the pointer retreats, and never
//! leaves the configured limits.
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use tablegrid::picker::{PickerGrid, PickerSettings, PickerTable, Redimension};
use tablegrid::{Coords, Dimensions, GridSize};

/// Picker grid that counts how often it is resized
struct CountingGrid {
    inner: PickerGrid,
    resizes: usize,
}

impl CountingGrid {
    fn new(size: GridSize) -> Self {
        Self {
            inner: PickerGrid::new(Coords::new(0.0, 0.0), Dimensions::new(10.0, 10.0), size),
            resizes: 0,
        }
    }

    /// Hover over the centre of cell `(row, column)`
    fn hover(&mut self, picker: &Redimension, row: usize, column: usize) {
        let grid = self.inner.size;
        let x = column as f64 * 10.0 + 5.0;
        let y = row as f64 * 10.0 + 5.0;
        picker.handle(self, grid, x, y);
    }
}

impl PickerTable for CountingGrid {
    fn position(&self) -> Coords {
        self.inner.position()
    }

    fn dimensions(&self) -> Dimensions {
        self.inner.dimensions()
    }

    fn set_size(&mut self, size: GridSize) {
        self.resizes += 1;
        self.inner.set_size(size);
    }

    fn set_selection(&mut self, selection: GridSize) {
        self.inner.set_selection(selection);
    }
}

fn active_picker() -> Redimension {
    let mut picker = Redimension::new(PickerSettings::default());
    picker.on();
    picker
}

#[test]
fn test_bottom_right_cell_grows_grid() {
    let picker = active_picker();
    let mut grid = CountingGrid::new(GridSize::new(10, 10));

    grid.hover(&picker, 9, 9);
    assert_eq!(grid.inner.size, GridSize::new(11, 11));
    assert_eq!(grid.inner.selection, GridSize::new(10, 10));
    assert_eq!(grid.resizes, 1);
}

#[test]
fn test_sweep_grows_then_shrinks() {
    let picker = active_picker();
    let mut grid = CountingGrid::new(GridSize::new(10, 10));

    for step in 9..14 {
        grid.hover(&picker, step, 2);
    }
    assert_eq!(grid.inner.size, GridSize::new(15, 10));
    assert_eq!(grid.inner.selection, GridSize::new(14, 3));

    grid.hover(&picker, 0, 0);
    assert_eq!(grid.inner.size, GridSize::new(10, 10));
    assert_eq!(grid.inner.selection, GridSize::new(1, 1));
}

#[test]
fn test_growth_stops_at_max() {
    let picker = active_picker();
    let mut grid = CountingGrid::new(GridSize::new(10, 10));

    for step in 0..40 {
        let last = grid.inner.size;
        grid.hover(&picker, last.rows - 1, last.columns - 1);
        assert!(grid.inner.size.rows <= 20 && grid.inner.size.columns <= 20, "step {step}");
    }
    assert_eq!(grid.inner.size, GridSize::new(20, 20));
    assert_eq!(grid.inner.selection, GridSize::new(20, 20));
}

#[test]
fn test_unchanged_size_is_not_reapplied() {
    let picker = active_picker();
    let mut grid = CountingGrid::new(GridSize::new(10, 10));

    grid.hover(&picker, 1, 1);
    grid.hover(&picker, 4, 6);
    assert_eq!(grid.resizes, 0);
    assert_eq!(grid.inner.selection, GridSize::new(5, 7));
}

#[test]
fn test_pointer_outside_is_clamped() {
    let picker = active_picker();
    let mut grid = CountingGrid::new(GridSize::new(10, 10));

    let changes = picker.handle(&mut grid, GridSize::new(10, 10), -50.0, 500.0).unwrap();
    assert_eq!(changes.selection, GridSize::new(10, 1));
    assert_eq!(changes.full, GridSize::new(11, 10));
}

#[test]
fn test_inactive_picker_ignores_pointer() {
    let mut picker = Redimension::new(PickerSettings::default());
    let mut grid = CountingGrid::new(GridSize::new(10, 10));

    assert!(picker.handle(&mut grid, GridSize::new(10, 10), 95.0, 95.0).is_none());
    assert_eq!(grid.inner.selection, GridSize::default());

    picker.on();
    assert!(picker.is_active());
    picker.off();
    assert!(picker.handle(&mut grid, GridSize::new(10, 10), 95.0, 95.0).is_none());
    assert_eq!(grid.resizes, 0);
}

#[test]
fn test_custom_limits() {
    let settings: PickerSettings =
        serde_json::from_str(r#"{"minRows": 3, "minCols": 4, "maxRows": 5, "maxCols": 6}"#).unwrap();
    let mut picker = Redimension::new(settings);
    picker.on();
    let mut grid = CountingGrid::new(GridSize::new(3, 4));

    grid.hover(&picker, 0, 0);
    assert_eq!(grid.inner.size, GridSize::new(3, 4));
    for _ in 0..5 {
        let last = grid.inner.size;
        grid.hover(&picker, last.rows - 1, last.columns - 1);
    }
    assert_eq!(grid.inner.size, GridSize::new(5, 6));
}
