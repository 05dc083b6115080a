use tracing::trace;

use crate::types::{Coords, Dimensions, GridSize};

use super::{find_cell, resize, Changes, PickerSettings};

/// The picker widget as the hover logic sees it
pub trait PickerTable {
    /// Page position of the widget's top-left corner
    fn position(&self) -> Coords;

    /// Rendered size of the widget's grid
    fn dimensions(&self) -> Dimensions;

    /// Change the number of rows and columns shown
    fn set_size(&mut self, size: GridSize);

    /// Highlight the top-left `selection.rows x selection.columns` cells
    fn set_selection(&mut self, selection: GridSize);
}

/// Hover state machine of the picker, inert until switched on
#[derive(Debug, Clone, Default)]
pub struct Redimension {
    settings: PickerSettings,
    active: bool,
}

impl Redimension {
    pub fn new(settings: PickerSettings) -> Self {
        Self {
            settings,
            active: false,
        }
    }

    pub fn on(&mut self) {
        self.active = true;
    }

    pub fn off(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn settings(&self) -> &PickerSettings {
        &self.settings
    }

    /// React to the pointer at `(x, y)` over `table`, currently showing `grid`.
    ///
    /// The table is resized first (only if its size changes), then the
    /// selection is applied. Returns the changes, or `None` while inactive.
    pub fn handle(
        &self,
        table: &mut dyn PickerTable,
        grid: GridSize,
        x: f64,
        y: f64,
    ) -> Option<Changes> {
        if !self.active {
            return None;
        }
        let address = find_cell(table.position(), table.dimensions(), grid, Coords::new(x, y));
        let changes = resize(address, &self.settings);
        trace!(?address, ?changes, "Picker hover");
        if changes.full != grid {
            table.set_size(changes.full);
        }
        table.set_selection(changes.selection);
        Some(changes)
    }
}

/// In-memory picker grid with fixed-size cells
#[derive(Debug, Clone, PartialEq)]
pub struct PickerGrid {
    pub position: Coords,
    /// Size of one cell
    pub cell: Dimensions,
    pub size: GridSize,
    pub selection: GridSize,
}

impl PickerGrid {
    pub fn new(position: Coords, cell: Dimensions, size: GridSize) -> Self {
        Self {
            position,
            cell,
            size,
            selection: GridSize::default(),
        }
    }
}

impl PickerTable for PickerGrid {
    fn position(&self) -> Coords {
        self.position
    }

    fn dimensions(&self) -> Dimensions {
        Dimensions::new(
            self.cell.width * self.size.columns as f64,
            self.cell.height * self.size.rows as f64,
        )
    }

    fn set_size(&mut self, size: GridSize) {
        self.size = size;
    }

    fn set_selection(&mut self, selection: GridSize) {
        self.selection = selection;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn grid() -> PickerGrid {
        PickerGrid::new(
            Coords::new(100.0, 100.0),
            Dimensions::new(10.0, 10.0),
            GridSize::new(10, 10),
        )
    }

    #[test]
    fn test_inactive_is_noop() {
        let picker = Redimension::new(PickerSettings::default());
        let mut table = grid();
        let before = table.clone();
        assert_eq!(picker.handle(&mut table, before.size, 195.0, 195.0), None);
        assert_eq!(table, before);
    }

    #[test]
    fn test_grows_at_bottom_right() {
        let mut picker = Redimension::new(PickerSettings::default());
        picker.on();
        let mut table = grid();
        let size = table.size;
        let changes = picker.handle(&mut table, size, 195.0, 195.0).unwrap();
        assert_eq!(changes.full, GridSize::new(11, 11));
        assert_eq!(table.size, GridSize::new(11, 11));
        assert_eq!(table.selection, GridSize::new(10, 10));
    }

    #[test]
    fn test_off_stops_tracking() {
        let mut picker = Redimension::default();
        picker.on();
        picker.off();
        assert!(!picker.is_active());
        let mut table = grid();
        let size = table.size;
        assert!(picker.handle(&mut table, size, 105.0, 105.0).is_none());
    }

    /// Records the order of calls made on the widget
    #[derive(Default)]
    struct Recorder {
        calls: Vec<&'static str>,
    }

    impl PickerTable for Recorder {
        fn position(&self) -> Coords {
            Coords::default()
        }
        fn dimensions(&self) -> Dimensions {
            Dimensions::new(100.0, 100.0)
        }
        fn set_size(&mut self, _size: GridSize) {
            self.calls.push("size");
        }
        fn set_selection(&mut self, _selection: GridSize) {
            self.calls.push("selection");
        }
    }

    #[test]
    fn test_size_set_only_when_changed() {
        let mut picker = Redimension::default();
        picker.on();
        let mut widget = Recorder::default();
        picker.handle(&mut widget, GridSize::new(10, 10), 5.0, 5.0);
        assert_eq!(widget.calls, vec!["selection"]);
        picker.handle(&mut widget, GridSize::new(10, 10), 95.0, 5.0);
        assert_eq!(widget.calls, vec!["selection", "size", "selection"]);
    }
}
