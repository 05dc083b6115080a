//! Sizing mode classification and width bookkeeping.
//!
//! A table expresses its width in one of three ways: a fixed pixel width,
//! a percentage of its container, or nothing at all (responsive). The raw
//! width string read from the document decides which; the empty string is
//! meaningful and is never conflated with `"0px"`.

pub mod conversions;
mod length;
mod table_size;

use serde::{Deserialize, Serialize};

pub use conversions::{convert_to_none_size, convert_to_percent_size, convert_to_pixel_size};
pub use length::{
    format_percent, format_px, floor_px, is_percentage, is_pixel, settle_pixels, CssLength,
};
pub use table_size::{TableSize, MIN_CELL_WIDTH};

use crate::dom::css::{css_get, css_set};
use crate::dom::{Document, NodeId};
use crate::grid::Warehouse;

/// How a table currently expresses its width
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizingMode {
    /// Fixed pixel width
    Pixel,
    /// Percentage of the containing block
    Percent,
    /// No declared width; the table sizes to its content
    None,
}

fn raw_dimension(doc: &Document, el: NodeId, prop: &str) -> String {
    if let Some(value) = css_get(doc, el, prop) {
        if !value.is_empty() {
            return value;
        }
    }
    match doc.attr(el, prop).map(str::trim) {
        Some(value) if value.is_empty() => String::new(),
        // A bare number in an HTML attribute means pixels
        Some(value) if value.parse::<f64>().is_ok() => format!("{value}px"),
        Some(value) => value.to_string(),
        None => String::new(),
    }
}

/// The author-declared width of an element: the inline `width` style,
/// else the `width` attribute (`"300"` reads as `"300px"`), else `""`.
pub fn get_raw_width(doc: &Document, el: NodeId) -> String {
    raw_dimension(doc, el, "width")
}

/// Same as [`get_raw_width`] for `height`
pub fn get_raw_height(doc: &Document, el: NodeId) -> String {
    raw_dimension(doc, el, "height")
}

/// Classify how `table` expresses its width.
///
/// A table without a width of its own still counts as pixel sized when
/// every `<col>` of its colgroup declares a pixel width.
pub fn classify(doc: &Document, table: NodeId) -> SizingMode {
    let raw = get_raw_width(doc, table);
    match CssLength::parse(&raw) {
        Some(CssLength::Percent(_)) => SizingMode::Percent,
        Some(CssLength::Px(_)) => SizingMode::Pixel,
        None if raw.is_empty() && columns_all_pixel(doc, table) => SizingMode::Pixel,
        None => SizingMode::None,
    }
}

fn columns_all_pixel(doc: &Document, table: NodeId) -> bool {
    let mut cols = doc
        .children_by_tag(table, "colgroup")
        .flat_map(|group| doc.children_by_tag(group, "col"))
        .peekable();
    if cols.peek().is_none() {
        return false;
    }
    cols.all(|col| is_pixel(&get_raw_width(doc, col)))
}

pub fn is_pixel_sizing(doc: &Document, table: NodeId) -> bool {
    classify(doc, table) == SizingMode::Pixel
}

pub fn is_percent_sizing(doc: &Document, table: NodeId) -> bool {
    classify(doc, table) == SizingMode::Percent
}

pub fn is_none_sizing(doc: &Document, table: NodeId) -> bool {
    classify(doc, table) == SizingMode::None
}

/// True if explicit per-column sizing exists (a colgroup whose columns
/// declare widths), as opposed to widths carried by the cells
pub fn has_columns(warehouse: &Warehouse) -> bool {
    warehouse.has_columns()
}

/// Plan the `width` writes that express per-column `widths`.
///
/// Sized colgroups take the widths on their `<col>` elements (a `<col>`
/// covering several columns takes the first one's). Otherwise every
/// owning cell takes the sum of the columns it spans.
pub(crate) fn plan_column_writes(
    wh: &Warehouse,
    widths: &[f64],
    format: impl Fn(f64) -> String,
) -> Vec<(NodeId, String)> {
    let mut writes: Vec<(NodeId, String)> = Vec::new();
    if wh.has_columns() {
        for (c, &w) in widths.iter().enumerate() {
            if let Some(col) = wh.column(c) {
                if !writes.iter().any(|(el, _)| *el == col) {
                    writes.push((col, format(w)));
                }
            }
        }
    } else {
        for cell in wh.cells() {
            let span_width: f64 = widths
                .iter()
                .skip(cell.column)
                .take(cell.colspan)
                .sum();
            writes.push((cell.element, format(span_width)));
        }
    }
    writes
}

/// Apply planned width writes: the value goes to the inline style and the
/// now-redundant `width` attribute is dropped.
pub(crate) fn apply_width_writes(doc: &mut Document, writes: &[(NodeId, String)]) {
    for (el, value) in writes {
        css_set(doc, *el, "width", value);
        doc.remove_attr(*el, "width");
    }
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
    use test_case::test_case;

    fn table_of(html: &str) -> (Document, NodeId) {
        let doc = Document::parse(html).unwrap();
        let table = doc.first_table().unwrap();
        (doc, table)
    }

    #[test_case(r#"<table style="width: 300px"></table>"#, "300px"; "style")]
    #[test_case(r#"<table width="300"></table>"#, "300px"; "bare attribute")]
    #[test_case(r#"<table width="50%"></table>"#, "50%"; "percent attribute")]
    #[test_case(r#"<table style="width: 40%" width="300"></table>"#, "40%"; "style wins")]
    #[test_case("<table></table>", ""; "unset")]
    #[test_case(r#"<table style="width: 0px"></table>"#, "0px"; "zero is not unset")]
    fn test_raw_width(html: &str, expected: &str) {
        let (doc, table) = table_of(html);
        assert_eq!(get_raw_width(&doc, table), expected);
    }

    #[test_case(r#"<table style="width: 300px"></table>"#, SizingMode::Pixel; "pixel")]
    #[test_case(r#"<table style="width: 75%"></table>"#, SizingMode::Percent; "percent")]
    #[test_case("<table></table>", SizingMode::None; "unset")]
    #[test_case(r#"<table style="width: 20em"></table>"#, SizingMode::None; "other unit")]
    #[test_case(
        r#"<table><colgroup><col style="width: 50px"><col width="60"></colgroup></table>"#,
        SizingMode::Pixel;
        "pixel columns"
    )]
    #[test_case(
        r#"<table><colgroup><col style="width: 50px"><col></colgroup></table>"#,
        SizingMode::None;
        "partly sized columns"
    )]
    fn test_classify(html: &str, expected: SizingMode) {
        let (doc, table) = table_of(html);
        assert_eq!(classify(&doc, table), expected);
    }

    #[test]
    fn test_plan_writes_to_cells_sums_spans() {
        let (doc, table) = table_of(
            r#"<table><tr><td colspan="2">a</td></tr><tr><td>b</td><td>c</td></tr></table>"#,
        );
        let wh = crate::grid::derive_grid(&doc, table);
        let writes = plan_column_writes(&wh, &[40.0, 60.0], format_px);
        let values: Vec<&str> = writes.iter().map(|(_, v)| v.as_str()).collect();
        assert_eq!(values, vec!["100px", "40px", "60px"]);
    }

    #[test]
    fn test_apply_drops_width_attribute() {
        let (mut doc, table) = table_of(r#"<table><tr><td width="80">a</td></tr></table>"#);
        let wh = crate::grid::derive_grid(&doc, table);
        let writes = plan_column_writes(&wh, &[120.0], format_px);
        apply_width_writes(&mut doc, &writes);
        let td = wh.cell_at(0, 0).unwrap().element;
        assert_eq!(get_raw_width(&doc, td), "120px");
        assert!(!doc.has_attr(td, "width"));
    }
}
