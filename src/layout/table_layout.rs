//! Pre-computed edges of a table's columns and rows.
//!
//! Positions are computed once per measurement and shared by bar placement,
//! cell rectangles and the grid report.

use serde::Serialize;

use crate::dom::Document;
use crate::grid::{CellRef, Warehouse};
use crate::types::Coords;

use super::StylePort;

/// Pre-computed layout data for a table
#[derive(Debug, Clone)]
pub struct TableLayout {
    /// Page position of the table's top-left corner
    pub origin: Coords,
    /// Cumulative column positions (`col_positions[i]` = x of column i's left
    /// edge relative to the origin), with the right edge last
    pub col_positions: Vec<f64>,
    /// Cumulative row positions, with the bottom edge last
    pub row_positions: Vec<f64>,
    pub col_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
}

/// Rectangle covered by a cell, in page coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

fn cumulative(sizes: &[f64]) -> Vec<f64> {
    let mut positions = Vec::with_capacity(sizes.len() + 1);
    let mut edge = 0.0;
    positions.push(edge);
    for size in sizes {
        edge += size;
        positions.push(edge);
    }
    positions
}

impl TableLayout {
    pub fn new(origin: Coords, col_widths: Vec<f64>, row_heights: Vec<f64>) -> Self {
        Self {
            origin,
            col_positions: cumulative(&col_widths),
            row_positions: cumulative(&row_heights),
            col_widths,
            row_heights,
        }
    }

    /// Measure a table through the style port
    ///
    /// A column's width is read from its `<col>` when the table sizes its
    /// columns, else from the first cell that covers only that column, else
    /// as an equal share of a spanning cell.
    pub fn measure(doc: &Document, port: &dyn StylePort, wh: &Warehouse) -> Self {
        let size = wh.size();
        let col_widths = (0..size.columns)
            .map(|c| {
                if wh.has_columns() {
                    if let Some(col) = wh.column(c) {
                        return port.width(doc, col);
                    }
                }
                if let Some(cell) = wh.column_cell(c) {
                    return port.width(doc, cell.element);
                }
                (0..size.rows)
                    .find_map(|r| wh.cell_at(r, c))
                    .map_or(0.0, |cell| {
                        port.width(doc, cell.element) / cell.colspan.max(1) as f64
                    })
            })
            .collect();
        let row_heights = (0..size.rows)
            .map(|r| wh.row(r).map_or(0.0, |tr| port.height(doc, tr)))
            .collect();
        Self::new(port.position(doc, wh.table()), col_widths, row_heights)
    }

    pub fn columns(&self) -> usize {
        self.col_widths.len()
    }

    pub fn rows(&self) -> usize {
        self.row_heights.len()
    }

    /// Bounds of a cell including everything it spans
    pub fn cell_rect(&self, cell: &CellRef) -> CellRect {
        let edge = |positions: &[f64], i: usize| positions.get(i).copied().unwrap_or(0.0);
        let x = edge(&self.col_positions, cell.column);
        let y = edge(&self.row_positions, cell.row);
        let right = edge(
            &self.col_positions,
            (cell.column + cell.colspan).min(self.columns()),
        );
        let bottom = edge(&self.row_positions, (cell.row + cell.rowspan).min(self.rows()));
        CellRect {
            x: self.origin.x + x,
            y: self.origin.y + y,
            width: (right - x).max(0.0),
            height: (bottom - y).max(0.0),
        }
    }

    pub fn total_width(&self) -> f64 {
        self.col_positions.last().copied().unwrap_or(0.0)
    }

    pub fn total_height(&self) -> f64 {
        self.row_positions.last().copied().unwrap_or(0.0)
    }

    pub fn col_width(&self, col: usize) -> f64 {
        self.col_widths.get(col).copied().unwrap_or(0.0)
    }

    pub fn row_height(&self, row: usize) -> f64 {
        self.row_heights.get(row).copied().unwrap_or(0.0)
    }

    /// Page x of the right edge of column `col`
    pub fn col_right(&self, col: usize) -> Option<f64> {
        self.col_positions.get(col + 1).map(|x| self.origin.x + x)
    }

    /// Page y of the bottom edge of row `row`
    pub fn row_bottom(&self, row: usize) -> Option<f64> {
        self.row_positions.get(row + 1).map(|y| self.origin.y + y)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::grid::derive_grid;
    use crate::layout::DeclaredLayout;

    fn layout() -> TableLayout {
        TableLayout::new(
            Coords::new(100.0, 50.0),
            vec![60.0, 80.0, 40.0],
            vec![20.0, 30.0],
        )
    }

    #[test]
    fn test_basic_layout() {
        let layout = layout();
        assert_eq!(layout.columns(), 3);
        assert_eq!(layout.rows(), 2);
        assert_eq!(layout.total_width(), 180.0);
        assert_eq!(layout.total_height(), 50.0);
        assert_eq!(layout.col_right(1), Some(240.0));
        assert_eq!(layout.row_bottom(1), Some(100.0));
        assert_eq!(layout.col_right(3), None);
    }

    #[test]
    fn test_measure_with_spans() {
        let doc = Document::parse(
            r#"<table><tr><td colspan="2" style="width: 120px">a</td></tr><tr><td rowspan="1" colspan="2">b</td></tr></table>"#,
        )
        .unwrap();
        let table = doc.first_table().unwrap();
        let wh = derive_grid(&doc, table);
        let measured = TableLayout::measure(&doc, &DeclaredLayout::default(), &wh);
        assert_eq!(measured.col_widths, vec![60.0, 60.0]);
        let a = wh.cell_at(0, 0).unwrap();
        let rect = measured.cell_rect(a);
        assert_eq!(rect.width, 120.0);
        assert_eq!(rect.height, 20.0);
    }
}
