//! Rendered-size reads behind a trait.

use std::collections::HashMap;

use crate::dom::{Document, NodeId};
use crate::grid::{derive_grid, Warehouse};
use crate::sizing::{get_raw_height, get_raw_width, CssLength};
use crate::types::{Coords, Dimensions};

/// Default column width in pixels when nothing declares one
pub const DEFAULT_COLUMN_WIDTH: f64 = 64.0;

/// Default row height in pixels when nothing declares one
pub const DEFAULT_ROW_HEIGHT: f64 = 20.0;

/// Default width of the block a table sits in
pub const DEFAULT_CONTAINER_WIDTH: f64 = 800.0;

/// Source of rendered geometry
///
/// The resize engine never reads computed styles directly; everything it
/// needs to know about how the table is laid out comes through this port.
pub trait StylePort {
    /// Rendered width of an element in pixels
    fn width(&self, doc: &Document, el: NodeId) -> f64;

    /// Rendered height of an element in pixels
    fn height(&self, doc: &Document, el: NodeId) -> f64;

    /// Top-left corner of an element in page coordinates
    fn position(&self, doc: &Document, el: NodeId) -> Coords;

    /// Width a percentage width on `table` resolves against
    fn container_width(&self, doc: &Document, table: NodeId) -> f64;
}

/// Geometry computed from declared sizes, with optional host measurements
///
/// Columns take the width their `<col>` (or first single-span cell)
/// declares, spanning cells fill columns nothing else sizes, and the rest
/// fall back to [`DEFAULT_COLUMN_WIDTH`]. A table with a width of its own
/// distributes it over the columns proportionally. Measured elements
/// report their measurement instead.
#[derive(Debug, Clone)]
pub struct DeclaredLayout {
    /// Width percentages on tables resolve against
    pub container_width: f64,
    /// Page position of every table's top-left corner
    pub origin: Coords,
    pub default_column_width: f64,
    pub default_row_height: f64,
    measured: HashMap<NodeId, Dimensions>,
}

impl Default for DeclaredLayout {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_WIDTH)
    }
}

impl DeclaredLayout {
    pub fn new(container_width: f64) -> Self {
        Self {
            container_width,
            origin: Coords::default(),
            default_column_width: DEFAULT_COLUMN_WIDTH,
            default_row_height: DEFAULT_ROW_HEIGHT,
            measured: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_origin(mut self, origin: Coords) -> Self {
        self.origin = origin;
        self
    }

    /// Record a rendered size for an element, overriding its declared size
    pub fn measure(&mut self, el: NodeId, size: Dimensions) {
        self.measured.insert(el, size);
    }

    /// Drop the measurement of one element
    pub fn forget(&mut self, el: NodeId) {
        self.measured.remove(&el);
    }

    fn measured(&self, el: NodeId) -> Option<Dimensions> {
        self.measured.get(&el).copied()
    }

    fn element_width(&self, doc: &Document, el: NodeId, basis: f64) -> Option<f64> {
        self.measured(el)
            .map(|d| d.width)
            .or_else(|| CssLength::parse(&get_raw_width(doc, el)).map(|len| len.to_px(basis)))
    }

    fn element_height(&self, doc: &Document, el: NodeId) -> Option<f64> {
        if let Some(d) = self.measured(el) {
            return Some(d.height);
        }
        match CssLength::parse(&get_raw_height(doc, el)) {
            Some(CssLength::Px(h)) => Some(h),
            _ => None,
        }
    }

    fn declared_table_width(&self, doc: &Document, table: NodeId) -> Option<f64> {
        self.element_width(doc, table, self.container_width)
    }

    /// Rendered width of every column of `table`
    pub fn column_widths(&self, doc: &Document, table: NodeId) -> Vec<f64> {
        let wh = derive_grid(doc, table);
        self.columns_of(doc, &wh)
    }

    fn columns_of(&self, doc: &Document, wh: &Warehouse) -> Vec<f64> {
        let n = wh.size().columns;
        let table_px = self.declared_table_width(doc, wh.table());
        let basis = table_px.unwrap_or(self.container_width);

        let mut widths: Vec<Option<f64>> = (0..n)
            .map(|c| {
                let el = if wh.has_columns() {
                    wh.column(c)
                } else {
                    wh.column_cell(c).map(|cell| cell.element)
                };
                el.and_then(|el| self.element_width(doc, el, basis))
            })
            .collect();

        if !wh.has_columns() {
            for cell in wh.cells().iter().filter(|cell| cell.colspan > 1) {
                let Some(total) = self.element_width(doc, cell.element, basis) else {
                    continue;
                };
                let span = cell.last_column(n) + 1 - cell.column;
                let covered = widths.iter().skip(cell.column).take(span);
                let known: f64 = covered.clone().flatten().sum();
                let unknown = covered.filter(|w| w.is_none()).count();
                if unknown == 0 {
                    continue;
                }
                let share = ((total - known) / unknown as f64).max(0.0);
                for w in widths.iter_mut().skip(cell.column).take(span) {
                    if w.is_none() {
                        *w = Some(share);
                    }
                }
            }
        }

        let mut widths: Vec<f64> = widths
            .into_iter()
            .map(|w| w.unwrap_or(self.default_column_width))
            .collect();

        if let Some(target) = table_px {
            let sum: f64 = widths.iter().sum();
            if sum > 0.0 {
                let scale = target / sum;
                for w in &mut widths {
                    *w *= scale;
                }
            }
        }
        widths
    }

    /// Rendered height of every row of `table`
    pub fn row_heights(&self, doc: &Document, table: NodeId) -> Vec<f64> {
        let wh = derive_grid(doc, table);
        self.rows_of(doc, &wh)
    }

    fn rows_of(&self, doc: &Document, wh: &Warehouse) -> Vec<f64> {
        (0..wh.size().rows)
            .map(|r| {
                if let Some(measured) = wh.row(r).and_then(|tr| self.measured(tr)) {
                    return measured.height;
                }
                let own = wh.row(r).and_then(|tr| self.element_height(doc, tr));
                wh.cells_in_row(r)
                    .iter()
                    .filter(|cell| cell.rowspan == 1)
                    .filter_map(|cell| self.element_height(doc, cell.element))
                    .chain(own)
                    .fold(None, |acc: Option<f64>, h| Some(acc.map_or(h, |a| a.max(h))))
                    .unwrap_or(self.default_row_height)
            })
            .collect()
    }

    fn table_width(&self, doc: &Document, table: NodeId) -> f64 {
        match self.declared_table_width(doc, table) {
            Some(w) => w,
            None => self.column_widths(doc, table).iter().sum(),
        }
    }
}

impl StylePort for DeclaredLayout {
    fn width(&self, doc: &Document, el: NodeId) -> f64 {
        if let Some(measured) = self.measured(el) {
            return measured.width;
        }
        match doc.tag(el) {
            Some("table") => self.table_width(doc, el),
            Some("col") => {
                let Some(table) = doc.ancestor(el, "table") else {
                    return 0.0;
                };
                let wh = derive_grid(doc, table);
                wh.column_index_of(el)
                    .and_then(|c| self.columns_of(doc, &wh).get(c).copied())
                    .unwrap_or(0.0)
            }
            Some("td" | "th") => {
                let Some(table) = doc.ancestor(el, "table") else {
                    return 0.0;
                };
                let wh = derive_grid(doc, table);
                let Some(cell) = wh.find_cell(el) else {
                    return 0.0;
                };
                self.columns_of(doc, &wh)
                    .iter()
                    .skip(cell.column)
                    .take(cell.colspan)
                    .sum()
            }
            Some("tr" | "thead" | "tbody" | "tfoot" | "colgroup") => doc
                .ancestor(el, "table")
                .map_or(0.0, |table| self.width(doc, table)),
            _ => self.container_width,
        }
    }

    fn height(&self, doc: &Document, el: NodeId) -> f64 {
        if let Some(measured) = self.measured(el) {
            return measured.height;
        }
        let Some(table) = doc.closest(el, "table") else {
            return 0.0;
        };
        let wh = derive_grid(doc, table);
        let rows = self.rows_of(doc, &wh);
        match doc.tag(el) {
            Some("table") => {
                let sum: f64 = rows.iter().sum();
                self.element_height(doc, el).map_or(sum, |h| h.max(sum))
            }
            Some("tr") => wh
                .rows()
                .iter()
                .position(|&tr| tr == el)
                .and_then(|r| rows.get(r).copied())
                .unwrap_or(0.0),
            Some("td" | "th") => wh.find_cell(el).map_or(0.0, |cell| {
                rows.iter().skip(cell.row).take(cell.rowspan).sum()
            }),
            Some("thead" | "tbody" | "tfoot") => wh
                .rows()
                .iter()
                .zip(&rows)
                .filter(|(&tr, _)| doc.parent(tr) == Some(el))
                .map(|(_, h)| h)
                .sum(),
            _ => 0.0,
        }
    }

    fn position(&self, doc: &Document, el: NodeId) -> Coords {
        let Some(table) = doc.ancestor(el, "table") else {
            return self.origin;
        };
        let wh = derive_grid(doc, table);
        let rows = self.rows_of(doc, &wh);
        let above = |row: usize| -> f64 { rows.iter().take(row).sum() };
        match doc.tag(el) {
            Some("td" | "th") => wh.find_cell(el).map_or(self.origin, |cell| {
                let left: f64 = self.columns_of(doc, &wh).iter().take(cell.column).sum();
                Coords::new(self.origin.x + left, self.origin.y + above(cell.row))
            }),
            Some("tr") => wh
                .rows()
                .iter()
                .position(|&tr| tr == el)
                .map_or(self.origin, |r| Coords::new(self.origin.x, self.origin.y + above(r))),
            _ => self.origin,
        }
    }

    fn container_width(&self, _doc: &Document, _table: NodeId) -> f64 {
        self.container_width
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

    fn table_of(html: &str) -> (Document, NodeId) {
        let doc = Document::parse(html).unwrap();
        let table = doc.first_table().unwrap();
        (doc, table)
    }

    fn cells(doc: &Document, table: NodeId) -> Vec<NodeId> {
        derive_grid(doc, table).cells().iter().map(|c| c.element).collect()
    }

    #[test]
    fn test_declared_cell_widths() {
        let (doc, table) = table_of(
            r#"<table style="width: 300px"><tr><td style="width: 100px">a</td><td style="width: 200px">b</td></tr></table>"#,
        );
        let layout = DeclaredLayout::default();
        assert_eq!(layout.column_widths(&doc, table), vec![100.0, 200.0]);
        assert_eq!(layout.width(&doc, table), 300.0);
        let tds = cells(&doc, table);
        assert_eq!(layout.width(&doc, tds[1]), 200.0);
    }

    #[test]
    fn test_table_width_distributes_over_undeclared_columns() {
        let (doc, table) = table_of(
            r#"<table style="width: 300px"><tr><td>a</td><td>b</td><td>c</td></tr></table>"#,
        );
        let layout = DeclaredLayout::default();
        let widths = layout.column_widths(&doc, table);
        assert!(widths.iter().all(|w| (w - 100.0).abs() < 1e-9));
    }

    #[test]
    fn test_unsized_table_uses_defaults() {
        let (doc, table) = table_of("<table><tr><td>a</td><td>b</td></tr></table>");
        let layout = DeclaredLayout::default();
        assert_eq!(layout.width(&doc, table), DEFAULT_COLUMN_WIDTH * 2.0);
        assert_eq!(layout.height(&doc, table), DEFAULT_ROW_HEIGHT);
    }

    #[test]
    fn test_percent_table_resolves_against_container() {
        let (doc, table) = table_of(
            r#"<table style="width: 50%"><tr><td style="width: 25%">a</td><td style="width: 75%">b</td></tr></table>"#,
        );
        let layout = DeclaredLayout::new(1000.0);
        assert_eq!(layout.width(&doc, table), 500.0);
        assert_eq!(layout.column_widths(&doc, table), vec![125.0, 375.0]);
    }

    #[test]
    fn test_spanning_cell_fills_unsized_columns() {
        let (doc, table) = table_of(
            r#"<table><tr><td colspan="2" style="width: 150px">a</td><td style="width: 50px">b</td></tr><tr><td style="width: 100px">c</td><td>d</td><td>e</td></tr></table>"#,
        );
        let layout = DeclaredLayout::default();
        assert_eq!(layout.column_widths(&doc, table), vec![100.0, 50.0, 50.0]);
    }

    #[test]
    fn test_measurement_overrides_declaration() {
        let (doc, table) = table_of(r#"<table style="width: 300px"><tr><td>a</td></tr></table>"#);
        let mut layout = DeclaredLayout::default();
        layout.measure(table, Dimensions::new(320.0, 40.0));
        assert_eq!(layout.width(&doc, table), 320.0);
        assert_eq!(layout.height(&doc, table), 40.0);
        layout.forget(table);
        assert_eq!(layout.width(&doc, table), 300.0);
    }

    #[test]
    fn test_row_heights_and_positions() {
        let (doc, table) = table_of(
            r#"<table><tr style="height: 30px"><td>a</td><td style="height: 45px">b</td></tr><tr><td>c</td><td>d</td></tr></table>"#,
        );
        let layout = DeclaredLayout::default().with_origin(Coords::new(10.0, 20.0));
        assert_eq!(layout.row_heights(&doc, table), vec![45.0, DEFAULT_ROW_HEIGHT]);
        let tds = cells(&doc, table);
        let d = tds[3];
        assert_eq!(
            layout.position(&doc, d),
            Coords::new(10.0 + DEFAULT_COLUMN_WIDTH, 20.0 + 45.0)
        );
        assert_eq!(layout.height(&doc, tds[2]), DEFAULT_ROW_HEIGHT);
    }
}
