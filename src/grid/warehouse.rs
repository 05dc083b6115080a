use serde::Serialize;

use crate::dom::NodeId;
use crate::types::GridSize;

/// Header/body classification of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CellKind {
    /// `<th>`, or any cell inside `<thead>`
    Header,
    Body,
}

/// A cell as seen from one grid address
///
/// Every address a span covers holds a copy of the same `CellRef`; `row`
/// and `column` always name the cell's origin address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CellRef {
    /// Backing `<td>`/`<th>` element
    pub element: NodeId,
    /// Origin row
    pub row: usize,
    /// Origin column
    pub column: usize,
    /// Effective row span (clamped to the rows that exist)
    pub rowspan: usize,
    /// Declared column span
    pub colspan: usize,
    pub kind: CellKind,
}

impl CellRef {
    /// True if `(row, col)` is this cell's origin address
    pub fn is_origin(&self, row: usize, col: usize) -> bool {
        self.row == row && self.column == col
    }

    /// Last column the cell's span reaches, clamped to the grid
    pub fn last_column(&self, columns: usize) -> usize {
        (self.column + self.colspan).min(columns).saturating_sub(1)
    }
}

/// The logical grid of one table
#[derive(Debug, Clone)]
pub struct Warehouse {
    table: NodeId,
    grid: Vec<Vec<Option<CellRef>>>,
    rows: Vec<NodeId>,
    columns: Vec<NodeId>,
    has_columns: bool,
    size: GridSize,
}

impl Warehouse {
    pub(super) fn new(
        table: NodeId,
        grid: Vec<Vec<Option<CellRef>>>,
        rows: Vec<NodeId>,
        columns: Vec<NodeId>,
        has_columns: bool,
        size: GridSize,
    ) -> Self {
        Self {
            table,
            grid,
            rows,
            columns,
            has_columns,
            size,
        }
    }

    /// The table element this grid was derived from
    pub fn table(&self) -> NodeId {
        self.table
    }

    /// `{rows, columns}` of the grid
    pub fn size(&self) -> GridSize {
        self.size
    }

    /// Cell covering `(row, col)`, or `None` for a hole or out-of-range address
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&CellRef> {
        self.grid.get(row)?.get(col)?.as_ref()
    }

    /// Distinct cells in row-major order of their origin address
    pub fn cells(&self) -> Vec<CellRef> {
        let mut out = Vec::new();
        for (r, row) in self.grid.iter().enumerate() {
            for (c, slot) in row.iter().enumerate() {
                if let Some(cell) = slot {
                    if cell.is_origin(r, c) {
                        out.push(*cell);
                    }
                }
            }
        }
        out
    }

    /// Distinct cells whose origin is in `row`
    pub fn cells_in_row(&self, row: usize) -> Vec<CellRef> {
        self.grid
            .get(row)
            .map(|slots| {
                slots
                    .iter()
                    .enumerate()
                    .filter_map(|(c, slot)| slot.filter(|cell| cell.is_origin(row, c)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// First single-column cell whose origin is in column `col`
    ///
    /// This is the cell whose width speaks for the whole column.
    pub fn column_cell(&self, col: usize) -> Option<CellRef> {
        self.grid.iter().enumerate().find_map(|(r, row)| {
            row.get(col)
                .copied()
                .flatten()
                .filter(|cell| cell.colspan == 1 && cell.is_origin(r, col))
        })
    }

    /// `<tr>` elements in grid order
    pub fn rows(&self) -> &[NodeId] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<NodeId> {
        self.rows.get(index).copied()
    }

    /// `<col>` element covering logical column `col`
    pub fn column(&self, col: usize) -> Option<NodeId> {
        if col >= self.size.columns {
            return None;
        }
        self.columns.get(col).copied()
    }

    /// True if the table has a `<colgroup>` with at least one `<col>`
    pub fn has_colgroup(&self) -> bool {
        !self.columns.is_empty()
    }

    /// True if per-column sizing exists (colgroup columns that declare widths)
    ///
    /// When set, column widths are authoritative over cell widths.
    pub fn has_columns(&self) -> bool {
        self.has_columns
    }

    /// Position of a `<col>` element among the logical columns
    pub fn column_index_of(&self, col: NodeId) -> Option<usize> {
        self.columns
            .iter()
            .take(self.size.columns)
            .position(|&c| c == col)
    }

    /// Grid position of a cell element (its origin)
    pub fn find_cell(&self, element: NodeId) -> Option<CellRef> {
        self.grid
            .iter()
            .flatten()
            .flatten()
            .find(|cell| cell.element == element)
            .copied()
    }

    /// Index of the rightmost logical column, `None` for a grid without columns
    pub fn last_column(&self) -> Option<usize> {
        self.size.columns.checked_sub(1)
    }
}
