//! Conversions between sizing modes.
//!
//! Each conversion reads the current rendered geometry, computes every new
//! declaration, and only then writes. A table without columns is left
//! untouched.

use tracing::debug;

use crate::dom::css::css_remove;
use crate::dom::{Document, NodeId};
use crate::grid::derive_grid;
use crate::layout::{StylePort, TableLayout};

use super::length::{format_percent, format_px, settle_pixels};
use super::{apply_width_writes, plan_column_writes};

/// Express the table relative to its container and its columns relative to
/// the table, keeping the currently rendered geometry
pub fn convert_to_percent_size(doc: &mut Document, port: &dyn StylePort, table: NodeId) {
    let wh = derive_grid(doc, table);
    if wh.size().columns == 0 {
        return;
    }
    let table_px = port.width(doc, table);
    let container = port.container_width(doc, table);
    if table_px <= 0.0 || container <= 0.0 {
        debug!(table_px, container, "Table has no width to convert");
        return;
    }

    let layout = TableLayout::measure(doc, port, &wh);
    let percents: Vec<f64> = layout
        .col_widths
        .iter()
        .map(|w| w / table_px * 100.0)
        .collect();
    let mut writes = vec![(table, format_percent(table_px / container * 100.0))];
    writes.extend(plan_column_writes(&wh, &percents, format_percent));

    debug!(table = table.index(), table_px, container, "Converting table to percent sizing");
    apply_width_writes(doc, &writes);
}

/// Fix the table and its columns at their currently rendered pixel widths
pub fn convert_to_pixel_size(doc: &mut Document, port: &dyn StylePort, table: NodeId) {
    let wh = derive_grid(doc, table);
    if wh.size().columns == 0 {
        return;
    }
    let layout = TableLayout::measure(doc, port, &wh);
    let table_px = port.width(doc, table);
    let settled: Vec<f64> = settle_pixels(&layout.col_widths)
        .into_iter()
        .map(|w| w as f64)
        .collect();
    let mut writes = vec![(table, format_px(table_px))];
    writes.extend(plan_column_writes(&wh, &settled, format_px));

    debug!(table = table.index(), table_px, "Converting table to pixel sizing");
    apply_width_writes(doc, &writes);
}

/// Remove every width declaration so the table sizes to its content
pub fn convert_to_none_size(doc: &mut Document, table: NodeId) {
    let wh = derive_grid(doc, table);
    if wh.size().columns == 0 {
        return;
    }
    let mut targets = vec![table];
    targets.extend((0..wh.size().columns).filter_map(|c| wh.column(c)));
    targets.extend(wh.cells().iter().map(|cell| cell.element));

    debug!(table = table.index(), "Removing table widths");
    for el in targets {
        css_remove(doc, el, "width");
        doc.remove_attr(el, "width");
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
    use crate::sizing::{classify, get_raw_width, SizingMode};

    fn table_of(html: &str) -> (Document, NodeId) {
        let doc = Document::parse(html).unwrap();
        let table = doc.first_table().unwrap();
        (doc, table)
    }

    fn cell_widths(doc: &Document, table: NodeId) -> Vec<String> {
        derive_grid(doc, table)
            .cells()
            .iter()
            .map(|c| get_raw_width(doc, c.element))
            .collect()
    }

    #[test]
    fn test_responsive_to_percent() {
        let (mut doc, table) =
            table_of("<table><tr><td>a</td><td>b</td></tr><tr><td>c</td><td>d</td></tr></table>");
        let port = DeclaredLayout::new(512.0);
        convert_to_percent_size(&mut doc, &port, table);

        assert_eq!(classify(&doc, table), SizingMode::Percent);
        // two 64px default columns in a 512px container
        assert_eq!(get_raw_width(&doc, table), "25%");
        assert_eq!(cell_widths(&doc, table), vec!["50%", "50%", "50%", "50%"]);
    }

    #[test]
    fn test_percent_conversion_writes_columns_when_sized() {
        let (mut doc, table) = table_of(
            r#"<table style="width: 400px"><colgroup><col width="100"><col width="300"></colgroup><tr><td>a</td><td>b</td></tr></table>"#,
        );
        let port = DeclaredLayout::default();
        convert_to_percent_size(&mut doc, &port, table);

        assert_eq!(get_raw_width(&doc, table), "50%");
        let wh = derive_grid(&doc, table);
        let col0 = wh.column(0).unwrap();
        assert_eq!(get_raw_width(&doc, col0), "25%");
        assert!(!doc.has_attr(col0, "width"));
        assert_eq!(cell_widths(&doc, table), vec!["", ""]);
    }

    #[test]
    fn test_percent_to_pixel() {
        let (mut doc, table) = table_of(
            r#"<table style="width: 50%"><tr><td style="width: 30%">a</td><td style="width: 70%">b</td></tr></table>"#,
        );
        let port = DeclaredLayout::new(1000.0);
        convert_to_pixel_size(&mut doc, &port, table);

        assert_eq!(get_raw_width(&doc, table), "500px");
        assert_eq!(cell_widths(&doc, table), vec!["150px", "350px"]);
    }

    #[test]
    fn test_to_none_strips_widths() {
        let (mut doc, table) = table_of(
            r#"<table width="300" style="width: 300px; border: 1px"><tr><td width="100">a</td><td style="width: 200px">b</td></tr></table>"#,
        );
        convert_to_none_size(&mut doc, table);
        assert_eq!(classify(&doc, table), SizingMode::None);
        assert_eq!(doc.attr(table, "style"), Some("border: 1px;"));
        assert_eq!(cell_widths(&doc, table), vec!["", ""]);
    }

    #[test]
    fn test_empty_table_untouched() {
        let (mut doc, table) = table_of(r#"<table style="width: 300px"></table>"#);
        let before = doc.to_html();
        convert_to_percent_size(&mut doc, &DeclaredLayout::default(), table);
        convert_to_pixel_size(&mut doc, &DeclaredLayout::default(), table);
        convert_to_none_size(&mut doc, table);
        assert_eq!(doc.to_html(), before);
    }
}
