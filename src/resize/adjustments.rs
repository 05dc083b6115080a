use tracing::{debug, trace};

use crate::dom::css::css_set;
use crate::dom::{Document, NodeId};
use crate::grid::derive_grid;
use crate::layout::{StylePort, TableLayout};
use crate::sizing::{
    apply_width_writes, convert_to_percent_size, format_percent, format_px, get_raw_height,
    get_raw_width, plan_column_writes, settle_pixels, CssLength, SizingMode, TableSize,
    MIN_CELL_WIDTH,
};

use super::ResizeBehaviour;

/// Deltas smaller than this do not move anything
const NO_CHANGE: f64 = 1e-9;

/// Resize column `pivot` of `table` by `delta` pixels.
///
/// `PreserveTable` keeps the table's width and lets the other columns give
/// or take the delta in proportion to their widths; `ResizeTable` lets
/// only the pivot change and grows or shrinks the table with it. No column
/// goes below the minimum cell width. An unsized table is converted to
/// percent sizing first.
///
/// A zero delta, a table without columns, or a pivot outside the grid
/// leaves the document untouched.
pub fn adjust_width(
    doc: &mut Document,
    port: &dyn StylePort,
    table: NodeId,
    delta: f64,
    pivot: usize,
    behaviour: ResizeBehaviour,
    mode: SizingMode,
) {
    if delta.abs() < NO_CHANGE {
        return;
    }
    let columns = derive_grid(doc, table).size().columns;
    if columns == 0 || pivot >= columns {
        debug!(columns, pivot, "Nothing to adjust");
        return;
    }

    let mode = match mode {
        SizingMode::None => {
            convert_to_percent_size(doc, port, table);
            SizingMode::Percent
        }
        other => other,
    };

    let wh = derive_grid(doc, table);
    let size = TableSize::new(doc, port, table, mode);
    if size.is_relative() && size.pixel_width() <= 0.0 {
        debug!("Percent table has no rendered width");
        return;
    }

    let widths = size.widths(doc, port, &wh);
    let step = size.cell_delta(delta);
    let deltas = behaviour.column_deltas(&widths, pivot, step, size.min_cell_width());
    let applied = deltas.get(pivot).copied().unwrap_or(0.0);
    trace!(?widths, ?deltas, step, "Column deltas");
    if applied.abs() < NO_CHANGE {
        return;
    }

    let mut new_widths: Vec<f64> = widths.iter().zip(&deltas).map(|(w, d)| w + d).collect();
    let mut writes = Vec::new();

    if behaviour.resizes_table() {
        match mode {
            SizingMode::Pixel => {
                if !get_raw_width(doc, table).is_empty() {
                    writes.push((table, format_px(size.pixel_width() + applied)));
                }
            }
            _ => {
                // Columns were in percent of the old width; re-express them
                // against the new one
                let factor = 1.0 + applied / 100.0;
                let container = port.container_width(doc, table);
                let table_percent = match CssLength::parse(&get_raw_width(doc, table)) {
                    Some(CssLength::Percent(p)) => p,
                    _ if container > 0.0 => size.pixel_width() / container * 100.0,
                    _ => 100.0,
                };
                writes.push((table, format_percent(table_percent * factor)));
                for w in &mut new_widths {
                    *w /= factor;
                }
            }
        }
    }

    if size.is_relative() {
        writes.extend(plan_column_writes(&wh, &new_widths, |w| size.format(w)));
    } else {
        let settled: Vec<f64> = settle_pixels(&new_widths)
            .into_iter()
            .map(|w| w as f64)
            .collect();
        writes.extend(plan_column_writes(&wh, &settled, format_px));
    }

    debug!(
        table = table.index(),
        pivot,
        delta,
        ?behaviour,
        ?mode,
        "Adjusting column widths"
    );
    apply_width_writes(doc, &writes);
}

/// Resize row `row` of `table` by `delta` pixels.
///
/// The new height goes to the row and to its cells (a cell spanning several
/// rows takes the sum of them). A table that declares a pixel height grows
/// or shrinks with the row. Rows never go below the minimum cell size.
pub fn adjust_height(
    doc: &mut Document,
    port: &dyn StylePort,
    table: NodeId,
    delta: f64,
    row: usize,
) {
    if delta.abs() < NO_CHANGE {
        return;
    }
    let wh = derive_grid(doc, table);
    if row >= wh.size().rows {
        debug!(row, rows = wh.size().rows, "Nothing to adjust");
        return;
    }

    let layout = TableLayout::measure(doc, port, &wh);
    let old = layout.row_height(row);
    let new = (old + delta).max(MIN_CELL_WIDTH.min(old));
    let applied = new - old;
    if applied.abs() < NO_CHANGE {
        return;
    }

    let mut heights = layout.row_heights.clone();
    if let Some(h) = heights.get_mut(row) {
        *h = new;
    }

    let mut writes: Vec<(NodeId, String)> = Vec::new();
    if let Some(tr) = wh.row(row) {
        writes.push((tr, format_px(new)));
    }
    for cell in wh.cells() {
        if row < cell.row || row >= cell.row + cell.rowspan {
            continue;
        }
        let span: f64 = heights.iter().skip(cell.row).take(cell.rowspan).sum();
        writes.push((cell.element, format_px(span)));
    }
    if let Some(CssLength::Px(h)) = CssLength::parse(&get_raw_height(doc, table)) {
        writes.push((table, format_px(h + applied)));
    }

    debug!(table = table.index(), row, delta, applied, "Adjusting row height");
    for (el, value) in &writes {
        css_set(doc, *el, "height", value);
        doc.remove_attr(*el, "height");
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
    use crate::layout::DeclaredLayout;
    use crate::sizing::classify;

    fn table_of(html: &str) -> (Document, NodeId) {
        let doc = Document::parse(html).unwrap();
        let table = doc.first_table().unwrap();
        (doc, table)
    }

    fn widths(doc: &Document, table: NodeId) -> Vec<String> {
        derive_grid(doc, table)
            .cells()
            .iter()
            .map(|c| get_raw_width(doc, c.element))
            .collect()
    }

    const THREE_COLUMNS: &str = r#"<table style="width: 300px"><tr><td style="width: 100px">a</td><td style="width: 100px">b</td><td style="width: 100px">c</td></tr></table>"#;

    #[test]
    fn test_resize_table_pixel() {
        let (mut doc, table) = table_of(THREE_COLUMNS);
        let port = DeclaredLayout::default();
        adjust_width(&mut doc, &port, table, 50.0, 1, ResizeBehaviour::ResizeTable, SizingMode::Pixel);
        assert_eq!(widths(&doc, table), vec!["100px", "150px", "100px"]);
        assert_eq!(get_raw_width(&doc, table), "350px");
    }

    #[test]
    fn test_preserve_table_pixel() {
        let (mut doc, table) = table_of(THREE_COLUMNS);
        let port = DeclaredLayout::default();
        adjust_width(&mut doc, &port, table, 30.0, 0, ResizeBehaviour::PreserveTable, SizingMode::Pixel);
        assert_eq!(widths(&doc, table), vec!["130px", "85px", "85px"]);
        assert_eq!(get_raw_width(&doc, table), "300px");
    }

    #[test]
    fn test_zero_delta_is_byte_identical() {
        let (mut doc, table) = table_of("<table><tr><td width=\"40\">a</td><td>b</td></tr></table>");
        let before = doc.to_html();
        let port = DeclaredLayout::default();
        for behaviour in [ResizeBehaviour::PreserveTable, ResizeBehaviour::ResizeTable] {
            for mode in [SizingMode::Pixel, SizingMode::Percent, SizingMode::None] {
                adjust_width(&mut doc, &port, table, 0.0, 0, behaviour, mode);
            }
        }
        assert_eq!(doc.to_html(), before);
    }

    #[test]
    fn test_invalid_pivot_and_empty_table_are_noops() {
        let (mut doc, table) = table_of(THREE_COLUMNS);
        let before = doc.to_html();
        let port = DeclaredLayout::default();
        adjust_width(&mut doc, &port, table, 20.0, 3, ResizeBehaviour::ResizeTable, SizingMode::Pixel);
        assert_eq!(doc.to_html(), before);

        let (mut empty, table) = table_of(r#"<table style="width: 100px"></table>"#);
        let before = empty.to_html();
        adjust_width(&mut empty, &port, table, 20.0, 0, ResizeBehaviour::ResizeTable, SizingMode::None);
        assert_eq!(empty.to_html(), before);
    }

    #[test]
    fn test_percent_resize_table_rescales() {
        let (mut doc, table) = table_of(
            r#"<table style="width: 50%"><tr><td style="width: 50%">a</td><td style="width: 50%">b</td></tr></table>"#,
        );
        let port = DeclaredLayout::new(800.0);
        // 400px table, column 1 grows 100px
        adjust_width(&mut doc, &port, table, 100.0, 1, ResizeBehaviour::ResizeTable, SizingMode::Percent);
        assert_eq!(get_raw_width(&doc, table), "62.5%");
        assert_eq!(widths(&doc, table), vec!["40%", "60%"]);
        assert_eq!(port.column_widths(&doc, table), vec![200.0, 300.0]);
    }

    #[test]
    fn test_percent_preserve_table() {
        let (mut doc, table) = table_of(
            r#"<table style="width: 50%"><tr><td style="width: 50%">a</td><td style="width: 50%">b</td></tr></table>"#,
        );
        let port = DeclaredLayout::new(800.0);
        adjust_width(&mut doc, &port, table, 40.0, 0, ResizeBehaviour::PreserveTable, SizingMode::Percent);
        assert_eq!(get_raw_width(&doc, table), "50%");
        assert_eq!(widths(&doc, table), vec!["60%", "40%"]);
    }

    #[test]
    fn test_none_converts_to_percent_first() {
        let (mut doc, table) = table_of("<table><tr><td>a</td><td>b</td></tr></table>");
        let port = DeclaredLayout::new(640.0);
        adjust_width(&mut doc, &port, table, 64.0, 0, ResizeBehaviour::PreserveTable, SizingMode::None);
        assert_eq!(classify(&doc, table), SizingMode::Percent);
        assert_eq!(get_raw_width(&doc, table), "20%");
        // 128px table; the 64px delta is clamped so column 1 keeps 10px
        assert_eq!(widths(&doc, table), vec!["92.1875%", "7.8125%"]);
    }

    #[test]
    fn test_writes_go_to_sized_columns() {
        let (mut doc, table) = table_of(
            r#"<table style="width: 300px"><colgroup><col style="width: 100px"><col style="width: 200px"></colgroup><tr><td colspan="2">a</td></tr></table>"#,
        );
        let port = DeclaredLayout::default();
        adjust_width(&mut doc, &port, table, 20.0, 0, ResizeBehaviour::PreserveTable, SizingMode::Pixel);
        let wh = derive_grid(&doc, table);
        assert_eq!(get_raw_width(&doc, wh.column(0).unwrap()), "120px");
        assert_eq!(get_raw_width(&doc, wh.column(1).unwrap()), "180px");
        assert_eq!(widths(&doc, table), vec![""]);
    }

    #[test]
    fn test_adjust_height() {
        let (mut doc, table) = table_of(
            r#"<table style="height: 40px"><tr><td rowspan="2">a</td><td>b</td></tr><tr><td>c</td></tr></table>"#,
        );
        let port = DeclaredLayout::default();
        adjust_height(&mut doc, &port, table, 15.0, 1);
        let wh = derive_grid(&doc, table);
        let a = wh.cell_at(0, 0).unwrap().element;
        let c = wh.cell_at(1, 1).unwrap().element;
        assert_eq!(get_raw_height(&doc, c), "35px");
        assert_eq!(get_raw_height(&doc, a), "55px");
        assert_eq!(get_raw_height(&doc, wh.row(1).unwrap()), "35px");
        assert_eq!(get_raw_height(&doc, table), "55px");
    }

    #[test]
    fn test_adjust_height_floor_and_noops() {
        let (mut doc, table) = table_of("<table><tr><td>a</td></tr></table>");
        let port = DeclaredLayout::default();
        let before = doc.to_html();
        adjust_height(&mut doc, &port, table, 0.0, 0);
        adjust_height(&mut doc, &port, table, 10.0, 4);
        assert_eq!(doc.to_html(), before);
        adjust_height(&mut doc, &port, table, -100.0, 0);
        let td = derive_grid(&doc, table).cell_at(0, 0).unwrap().element;
        assert_eq!(get_raw_height(&doc, td), "10px");
    }
}
