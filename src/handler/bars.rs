//! Column and row resize bars.
//!
//! Bars sit on the inner edges between columns and rows plus the table's
//! right and bottom edges. Their geometry is recomputed on every refresh;
//! hiding them keeps the geometry so showing them again needs no refresh.

use serde::Serialize;

use crate::dom::{Document, NodeId};
use crate::grid::derive_grid;
use crate::layout::{StylePort, TableLayout};
use crate::types::Coords;

/// Which kind of edge a bar sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BarKind {
    /// Vertical bar on a column's right edge
    Column,
    /// Horizontal bar on a row's bottom edge
    Row,
}

impl BarKind {
    /// Tag used in resize origins (`bar-col-2`)
    pub fn tag(self) -> &'static str {
        match self {
            BarKind::Column => "col",
            BarKind::Row => "row",
        }
    }
}

/// One draggable bar
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bar {
    pub kind: BarKind,
    /// Column (or row) whose trailing edge the bar sits on
    pub index: usize,
    /// Page coordinates of the bar's top-left end
    pub position: Coords,
    /// Extent along the edge: the table's height for column bars, its
    /// width for row bars
    pub length: f64,
}

impl Bar {
    /// Origin tag reported for drags of this bar
    pub fn origin(&self) -> String {
        format!("bar-{}-{}", self.kind.tag(), self.index)
    }
}

/// The bars of the table currently under the selection
#[derive(Debug, Clone, Default)]
pub struct ResizeBars {
    table: Option<NodeId>,
    bars: Vec<Bar>,
    hidden: bool,
}

impl ResizeBars {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lay bars out over `table`. Tables marked `data-mce-resize="false"`
    /// get none.
    pub fn refresh(&mut self, doc: &Document, port: &dyn StylePort, table: NodeId) {
        self.clear();
        if doc.attr(table, "data-mce-resize") == Some("false") {
            return;
        }
        let wh = derive_grid(doc, table);
        let layout = TableLayout::measure(doc, port, &wh);
        let (width, height) = (layout.total_width(), layout.total_height());

        for col in 0..layout.columns() {
            if let Some(x) = layout.col_right(col) {
                self.bars.push(Bar {
                    kind: BarKind::Column,
                    index: col,
                    position: Coords::new(x, layout.origin.y),
                    length: height,
                });
            }
        }
        for row in 0..layout.rows() {
            if let Some(y) = layout.row_bottom(row) {
                self.bars.push(Bar {
                    kind: BarKind::Row,
                    index: row,
                    position: Coords::new(layout.origin.x, y),
                    length: width,
                });
            }
        }
        self.table = Some(table);
    }

    pub fn clear(&mut self) {
        self.table = None;
        self.bars.clear();
    }

    pub fn hide(&mut self) {
        self.hidden = true;
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Table the bars were laid out over
    pub fn table(&self) -> Option<NodeId> {
        self.table
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    /// Bars that are currently visible
    pub fn visible(&self) -> &[Bar] {
        if self.hidden {
            &[]
        } else {
            &self.bars
        }
    }

    pub fn find(&self, kind: BarKind, index: usize) -> Option<Bar> {
        self.bars
            .iter()
            .find(|bar| bar.kind == kind && bar.index == index)
            .copied()
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

    const TABLE: &str = r#"<table style="width: 200px"><tr><td style="width: 50px">a</td><td style="width: 150px">b</td></tr><tr><td>c</td><td>d</td></tr></table>"#;

    fn refreshed(html: &str) -> (Document, ResizeBars) {
        let doc = Document::parse(html).unwrap();
        let table = doc.first_table().unwrap();
        let port = DeclaredLayout::default().with_origin(Coords::new(10.0, 10.0));
        let mut bars = ResizeBars::new();
        bars.refresh(&doc, &port, table);
        (doc, bars)
    }

    #[test]
    fn test_bar_layout() {
        let (doc, bars) = refreshed(TABLE);
        assert_eq!(bars.table(), doc.first_table());
        assert_eq!(bars.bars().len(), 4);

        let col0 = bars.find(BarKind::Column, 0).unwrap();
        assert_eq!(col0.position, Coords::new(60.0, 10.0));
        assert_eq!(col0.length, 40.0);
        assert_eq!(col0.origin(), "bar-col-0");

        let row1 = bars.find(BarKind::Row, 1).unwrap();
        assert_eq!(row1.position, Coords::new(10.0, 50.0));
        assert_eq!(row1.length, 200.0);
    }

    #[test]
    fn test_no_bars_when_resize_disabled() {
        let (_, bars) = refreshed(
            r#"<table data-mce-resize="false"><tr><td>a</td></tr></table>"#,
        );
        assert!(bars.bars().is_empty());
        assert_eq!(bars.table(), None);
    }

    #[test]
    fn test_hidden_bars_keep_geometry() {
        let (_, mut bars) = refreshed(TABLE);
        bars.hide();
        assert!(bars.visible().is_empty());
        assert_eq!(bars.bars().len(), 4);
        bars.show();
        assert_eq!(bars.visible().len(), 4);
    }
}
