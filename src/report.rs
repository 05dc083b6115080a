//! Serializable summary of a table's grid and sizing.

use serde::Serialize;

use crate::dom::{Document, NodeId};
use crate::error::{Result, TableError};
use crate::grid::{derive_grid, CellKind};
use crate::layout::{CellRect, DeclaredLayout, StylePort, TableLayout};
use crate::sizing::{classify, get_raw_width, SizingMode};
use crate::types::GridSize;

/// One distinct cell of the grid
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellReport {
    pub row: usize,
    pub column: usize,
    pub rowspan: usize,
    pub colspan: usize,
    pub kind: CellKind,
    /// Declared width, `""` when unset
    pub raw_width: String,
    pub rect: CellRect,
}

/// Grid, sizing and geometry of one table
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableReport {
    pub size: GridSize,
    pub mode: SizingMode,
    pub raw_width: String,
    pub has_columns: bool,
    pub width: f64,
    pub height: f64,
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
    pub cells: Vec<CellReport>,
}

/// Describe `table` with geometry read through `port`
pub fn describe(doc: &Document, port: &dyn StylePort, table: NodeId) -> TableReport {
    let wh = derive_grid(doc, table);
    let layout = TableLayout::measure(doc, port, &wh);
    let cells = wh
        .cells()
        .iter()
        .map(|cell| CellReport {
            row: cell.row,
            column: cell.column,
            rowspan: cell.rowspan,
            colspan: cell.colspan,
            kind: cell.kind,
            raw_width: get_raw_width(doc, cell.element),
            rect: layout.cell_rect(cell),
        })
        .collect();

    TableReport {
        size: wh.size(),
        mode: classify(doc, table),
        raw_width: get_raw_width(doc, table),
        has_columns: wh.has_columns(),
        width: port.width(doc, table),
        height: port.height(doc, table),
        column_widths: layout.col_widths,
        row_heights: layout.row_heights,
        cells,
    }
}

/// Parse markup and describe its first table with declared geometry
///
/// # Errors
/// Returns an error if the markup cannot be read or holds no table.
pub fn describe_markup(markup: &str) -> Result<TableReport> {
    let doc = Document::parse(markup)?;
    let table = doc.first_table().ok_or(TableError::NoTable)?;
    Ok(describe(&doc, &DeclaredLayout::default(), table))
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

    #[test]
    fn test_describe_markup() {
        let report = describe_markup(
            r#"<table style="width: 50%"><thead><tr><th colspan="2">h</th></tr></thead><tr><td>a</td><td>b</td></tr></table>"#,
        )
        .unwrap();
        assert_eq!(report.size, GridSize::new(2, 2));
        assert_eq!(report.mode, SizingMode::Percent);
        assert_eq!(report.raw_width, "50%");
        assert_eq!(report.width, 400.0);
        assert_eq!(report.cells.len(), 3);
        assert_eq!(report.cells[0].kind, CellKind::Header);
        assert_eq!(report.cells[0].rect.width, 400.0);
    }

    #[test]
    fn test_no_table() {
        assert!(matches!(
            describe_markup("<p>nothing</p>"),
            Err(TableError::NoTable)
        ));
    }

    #[test]
    fn test_report_json() {
        let report = describe_markup("<table><tr><td>a</td></tr></table>").unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "none");
        assert_eq!(json["rawWidth"], "");
        assert_eq!(json["cells"][0]["kind"], "body");
    }
}
