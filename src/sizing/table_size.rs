//! Unit strategy for one table's column widths.

use crate::dom::{Document, NodeId};
use crate::grid::Warehouse;
use crate::layout::{StylePort, TableLayout};

use super::length::{format_percent, format_px};
use super::SizingMode;

/// Narrowest a column may become, in pixels
pub const MIN_CELL_WIDTH: f64 = 10.0;

/// Column widths of a table expressed in its own unit
///
/// Pixel tables work in pixels. Percent (and unsized) tables work in
/// percent of the table's pixel width, so a pixel delta converts exactly
/// once, at the width the table has when the strategy is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableSize {
    mode: SizingMode,
    pixel_width: f64,
}

impl TableSize {
    pub fn new(doc: &Document, port: &dyn StylePort, table: NodeId, mode: SizingMode) -> Self {
        Self {
            mode,
            pixel_width: port.width(doc, table),
        }
    }

    pub fn mode(&self) -> SizingMode {
        self.mode
    }

    /// Rendered table width the strategy was built against
    pub fn pixel_width(&self) -> f64 {
        self.pixel_width
    }

    /// True if widths are relative to the table
    pub fn is_relative(&self) -> bool {
        self.mode != SizingMode::Pixel
    }

    /// Convert a pixel amount into this table's unit
    pub fn cell_delta(&self, px: f64) -> f64 {
        if self.is_relative() {
            self.to_unit(px)
        } else {
            px
        }
    }

    /// Minimum column width in this table's unit
    pub fn min_cell_width(&self) -> f64 {
        self.cell_delta(MIN_CELL_WIDTH)
    }

    fn to_unit(&self, px: f64) -> f64 {
        if self.pixel_width > 0.0 {
            px / self.pixel_width * 100.0
        } else {
            0.0
        }
    }

    /// Current rendered width of every column, in this table's unit
    pub fn widths(&self, doc: &Document, port: &dyn StylePort, wh: &Warehouse) -> Vec<f64> {
        let layout = TableLayout::measure(doc, port, wh);
        if self.is_relative() {
            layout.col_widths.iter().map(|&w| self.to_unit(w)).collect()
        } else {
            layout.col_widths
        }
    }

    /// Format a width in this table's unit for the document
    pub fn format(&self, value: f64) -> String {
        if self.is_relative() {
            format_percent(value)
        } else {
            format_px(value)
        }
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp
)]
mod tests {
    use super::*;
    use crate::grid::derive_grid;
    use crate::layout::DeclaredLayout;

    #[test]
    fn test_pixel_and_percent_units() {
        let doc = Document::parse(
            r#"<table style="width: 400px"><tr><td style="width: 100px">a</td><td style="width: 300px">b</td></tr></table>"#,
        )
        .unwrap();
        let table = doc.first_table().unwrap();
        let wh = derive_grid(&doc, table);
        let port = DeclaredLayout::default();

        let px = TableSize::new(&doc, &port, table, SizingMode::Pixel);
        assert_eq!(px.pixel_width(), 400.0);
        assert_eq!(px.cell_delta(40.0), 40.0);
        assert_eq!(px.min_cell_width(), MIN_CELL_WIDTH);
        assert_eq!(px.widths(&doc, &port, &wh), vec![100.0, 300.0]);
        assert_eq!(px.format(99.7), "99px");

        let pct = TableSize::new(&doc, &port, table, SizingMode::Percent);
        assert!(pct.is_relative());
        assert_eq!(pct.cell_delta(40.0), 10.0);
        assert_eq!(pct.min_cell_width(), 2.5);
        assert_eq!(pct.widths(&doc, &port, &wh), vec![25.0, 75.0]);
        assert_eq!(pct.format(12.5), "12.5%");
    }
}
