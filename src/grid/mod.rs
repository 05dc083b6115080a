//! Logical grid projection of a table.
//!
//! [`derive_grid`] walks a table's own rows (never those of nested tables)
//! and projects every cell over the addresses its row/column spans cover.
//! The projection is disposable: it is rebuilt from the document whenever
//! it is needed and is never written back.
//!
//! Malformed spans never fail. A cell whose origin address is already
//! taken by an earlier row span moves right to the next free address;
//! addresses of its span that are already taken are skipped rather than
//! overwritten, and row spans are clamped to the last row.

mod warehouse;

pub use warehouse::{CellKind, CellRef, Warehouse};

use crate::dom::{Document, NodeId};
use crate::sizing::get_raw_width;
use crate::types::GridSize;

/// Browsers ignore column spans above this value.
pub const MAX_COLSPAN: usize = 1000;

/// Browsers ignore row spans above this value.
pub const MAX_ROWSPAN: usize = 65534;

/// Parse a `rowspan`/`colspan` attribute. Missing, zero or invalid → 1.
fn parse_span(value: Option<&str>, max: usize) -> usize {
    value
        .and_then(|v| v.trim().parse::<usize>().ok())
        .filter(|&n| n >= 1)
        .map_or(1, |n| n.min(max))
}

/// Collect the `<tr>` elements that belong to `table`, with a flag for rows
/// that sit inside `<thead>`.
fn table_rows(doc: &Document, table: NodeId) -> Vec<(NodeId, bool)> {
    let mut rows = Vec::new();
    for child in doc.element_children(table) {
        match doc.tag(child) {
            Some("tr") => rows.push((child, false)),
            Some(section @ ("thead" | "tbody" | "tfoot")) => {
                let in_head = section == "thead";
                rows.extend(doc.children_by_tag(child, "tr").map(|tr| (tr, in_head)));
            }
            _ => {}
        }
    }
    rows
}

/// Collect `<col>` elements by logical column index. `<col span=n>` covers n indices.
fn table_columns(doc: &Document, table: NodeId) -> Vec<NodeId> {
    let mut columns = Vec::new();
    for colgroup in doc.children_by_tag(table, "colgroup") {
        for col in doc.children_by_tag(colgroup, "col") {
            let span = parse_span(doc.attr(col, "span"), MAX_COLSPAN);
            columns.extend(std::iter::repeat(col).take(span));
        }
    }
    columns
}

/// Project a table element into its logical grid.
///
/// Never panics on malformed input; a non-table element yields an empty grid.
pub fn derive_grid(doc: &Document, table: NodeId) -> Warehouse {
    let rows = table_rows(doc, table);
    let row_count = rows.len();
    let mut slots: Vec<Vec<Option<CellRef>>> = vec![Vec::new(); row_count];

    for (r, &(tr, in_head)) in rows.iter().enumerate() {
        let mut col = 0usize;
        let cells: Vec<NodeId> = doc
            .element_children(tr)
            .filter(|&c| doc.is_tag(c, "td") || doc.is_tag(c, "th"))
            .collect();

        for element in cells {
            // Skip addresses already claimed by row spans from above
            while slots
                .get(r)
                .and_then(|row| row.get(col))
                .is_some_and(Option::is_some)
            {
                col += 1;
            }

            let rowspan = parse_span(doc.attr(element, "rowspan"), MAX_ROWSPAN)
                .min(row_count - r);
            let colspan = parse_span(doc.attr(element, "colspan"), MAX_COLSPAN);
            let kind = if in_head || doc.is_tag(element, "th") {
                CellKind::Header
            } else {
                CellKind::Body
            };
            let cell = CellRef {
                element,
                row: r,
                column: col,
                rowspan,
                colspan,
                kind,
            };

            for dr in 0..rowspan {
                let Some(row) = slots.get_mut(r + dr) else {
                    break;
                };
                if row.len() < col + colspan {
                    row.resize(col + colspan, None);
                }
                for slot in row.iter_mut().skip(col).take(colspan) {
                    if slot.is_none() {
                        *slot = Some(cell);
                    }
                }
            }
            col += colspan;
        }
    }

    // A colgroup wider than every row still adds (empty) columns
    let column_elements = table_columns(doc, table);
    let columns = slots
        .iter()
        .map(Vec::len)
        .max()
        .unwrap_or(0)
        .max(column_elements.len());
    for row in &mut slots {
        row.resize(columns, None);
    }

    let has_columns = column_elements
        .iter()
        .any(|&col| !get_raw_width(doc, col).is_empty());

    Warehouse::new(
        table,
        slots,
        rows.into_iter().map(|(tr, _)| tr).collect(),
        column_elements,
        has_columns,
        GridSize::new(row_count, columns),
    )
}

/// Get the `{rows, columns}` size of a table's grid.
pub fn get_grid_size(doc: &Document, table: NodeId) -> GridSize {
    derive_grid(doc, table).size()
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn grid_of(html: &str) -> (Document, Warehouse) {
        let doc = Document::parse(html).unwrap();
        let table = doc.first_table().unwrap();
        let warehouse = derive_grid(&doc, table);
        (doc, warehouse)
    }

    #[test]
    fn test_parse_span() {
        assert_eq!(parse_span(None, MAX_COLSPAN), 1);
        assert_eq!(parse_span(Some("0"), MAX_COLSPAN), 1);
        assert_eq!(parse_span(Some("-2"), MAX_COLSPAN), 1);
        assert_eq!(parse_span(Some(" 3 "), MAX_COLSPAN), 3);
        assert_eq!(parse_span(Some("abc"), MAX_COLSPAN), 1);
        assert_eq!(parse_span(Some("5000"), MAX_COLSPAN), MAX_COLSPAN);
    }

    #[test]
    fn test_simple_grid() {
        let (_, wh) = grid_of("<table><tr><td>1</td><td>2</td></tr><tr><td>3</td><td>4</td></tr></table>");
        assert_eq!(wh.size(), GridSize::new(2, 2));
        assert_eq!(wh.cells().len(), 4);
    }

    #[test]
    fn test_colspan_row_has_single_owner() {
        let (_, wh) = grid_of(
            r#"<table><tr><td colspan="2">a</td></tr><tr><td>b</td><td>c</td></tr></table>"#,
        );
        assert_eq!(wh.size(), GridSize::new(2, 2));
        let a0 = wh.cell_at(0, 0).unwrap();
        let a1 = wh.cell_at(0, 1).unwrap();
        assert_eq!(a0.element, a1.element);
        assert_eq!(a0.colspan, 2);
    }

    #[test]
    fn test_rowspan_pushes_next_row_right() {
        let (_, wh) = grid_of(
            r#"<table><tr><td rowspan="2">a</td><td>b</td></tr><tr><td>c</td></tr></table>"#,
        );
        assert_eq!(wh.size(), GridSize::new(2, 2));
        let c = wh.cell_at(1, 1).unwrap();
        assert_eq!(c.column, 1);
        assert_eq!(wh.cell_at(1, 0).unwrap().row, 0);
    }

    #[test]
    fn test_rowspan_clamped_to_row_count() {
        let (_, wh) = grid_of(r#"<table><tr><td rowspan="9">a</td></tr></table>"#);
        assert_eq!(wh.size(), GridSize::new(1, 1));
        assert_eq!(wh.cell_at(0, 0).unwrap().rowspan, 1);
    }

    #[test]
    fn test_overlapping_spans_do_not_overwrite() {
        // b spans down into row 1, c spans across the address b already owns
        let (_, wh) = grid_of(
            r#"<table><tr><td>a</td><td rowspan="2">b</td><td>x</td></tr><tr><td colspan="3">c</td></tr></table>"#,
        );
        let b = wh.cell_at(0, 1).unwrap().element;
        assert_eq!(wh.cell_at(1, 1).unwrap().element, b);
        let c = wh.cell_at(1, 0).unwrap().element;
        assert_eq!(wh.cell_at(1, 2).unwrap().element, c);
        assert_eq!(wh.size(), GridSize::new(2, 3));
    }

    #[test]
    fn test_jagged_rows_padded() {
        let (_, wh) = grid_of("<table><tr><td>a</td><td>b</td><td>c</td></tr><tr><td>d</td></tr></table>");
        assert_eq!(wh.size(), GridSize::new(2, 3));
        assert!(wh.cell_at(1, 2).is_none());
        assert!(wh.cell_at(1, 0).is_some());
    }

    #[test]
    fn test_headers_classified() {
        let (_, wh) = grid_of(
            "<table><thead><tr><td>h</td></tr></thead><tbody><tr><th>r</th></tr><tr><td>b</td></tr></tbody></table>",
        );
        assert_eq!(wh.cell_at(0, 0).unwrap().kind, CellKind::Header);
        assert_eq!(wh.cell_at(1, 0).unwrap().kind, CellKind::Header);
        assert_eq!(wh.cell_at(2, 0).unwrap().kind, CellKind::Body);
    }

    #[test]
    fn test_nested_table_rows_excluded() {
        let (doc, wh) = grid_of(
            "<table><tr><td><table><tr><td>1</td><td>2</td><td>3</td></tr></table></td></tr></table>",
        );
        assert_eq!(wh.size(), GridSize::new(1, 1));
        let inner = doc.tables()[1];
        assert_eq!(get_grid_size(&doc, inner), GridSize::new(1, 3));
    }

    #[test]
    fn test_colgroup_span_and_sizing() {
        let (_, wh) = grid_of(
            r#"<table><colgroup><col span="2" style="width: 50px"><col></colgroup><tr><td>a</td><td>b</td><td>c</td></tr></table>"#,
        );
        assert!(wh.has_columns());
        assert_eq!(wh.column(0), wh.column(1));
        assert!(wh.column(2).is_some());
        assert!(wh.column(3).is_none());
    }

    #[test]
    fn test_colgroup_without_widths_is_not_sized() {
        let (_, wh) =
            grid_of("<table><colgroup><col><col></colgroup><tr><td>a</td><td>b</td></tr></table>");
        assert!(wh.has_colgroup());
        assert!(!wh.has_columns());
    }

    #[test]
    fn test_colgroup_widens_grid() {
        let (_, wh) = grid_of(
            r#"<table><colgroup><col style="width: 40px"><col style="width: 40px"><col style="width: 40px"></colgroup><tr><td>a</td><td>b</td></tr></table>"#,
        );
        assert_eq!(wh.size(), GridSize::new(1, 3));
        assert!(wh.cell_at(0, 1).is_some());
        assert!(wh.cell_at(0, 2).is_none());
        assert!(wh.column(2).is_some());
        assert_eq!(wh.last_column(), Some(2));
    }

    #[test]
    fn test_empty_table() {
        let (_, wh) = grid_of("<table></table>");
        assert_eq!(wh.size(), GridSize::new(0, 0));
        assert!(wh.cells().is_empty());
        assert_eq!(wh.last_column(), None);
    }
}
