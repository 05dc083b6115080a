//! Common test utilities and assertion helpers.
//!
//! This module provides helpers for loading fixture tables, reading back
//! declared widths, and a host that records what the resize handler asks
//! of the editor.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::float_cmp,
    clippy::panic
)]

use tablegrid::sizing::{get_raw_width, CssLength};
use tablegrid::{derive_grid, Document, EditorHost, NodeId, Notification, SelectionRange};

// Re-export fixtures for convenience
pub use super::fixtures::*;

// ============================================================================
// Loading
// ============================================================================

/// Parse markup and return the document with its first table.
///
/// Panics if the markup holds no table.
#[must_use]
pub fn load(html: &str) -> (Document, NodeId) {
    let doc = Document::parse(html).expect("Failed to parse markup");
    let table = doc.first_table().expect("No table in markup");
    (doc, table)
}

/// Declared width of every logical column: the `<col>` width when the table
/// has sized columns, otherwise the width of the column's first cell.
#[must_use]
pub fn column_widths(doc: &Document, table: NodeId) -> Vec<String> {
    let wh = derive_grid(doc, table);
    (0..wh.size().columns)
        .map(|c| {
            let el = if wh.has_columns() {
                wh.column(c)
            } else {
                wh.column_cell(c).map(|cell| cell.element)
            };
            el.map(|el| get_raw_width(doc, el)).unwrap_or_default()
        })
        .collect()
}

/// Numeric part of each width, panicking on anything unparsable.
#[must_use]
pub fn numbers(widths: &[String]) -> Vec<f64> {
    widths
        .iter()
        .map(|w| {
            CssLength::parse(w)
                .unwrap_or_else(|| panic!("Not a CSS length: {w:?}"))
                .value()
        })
        .collect()
}

// ============================================================================
// Assertions
// ============================================================================

/// Assert two floats agree to within `tolerance`.
pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} ± {tolerance}, got {actual}"
    );
}

/// Assert the table's declared width.
pub fn assert_table_width(doc: &Document, table: NodeId, expected: &str) {
    assert_eq!(
        get_raw_width(doc, table),
        expected,
        "table width in {}",
        doc.to_html()
    );
}

// ============================================================================
// Recording Host
// ============================================================================

/// Editor host that records every call
#[derive(Debug, Default)]
pub struct RecordingHost {
    pub selection: Option<SelectionRange>,
    pub restored: Vec<SelectionRange>,
    pub notifications: Vec<Notification>,
    pub focus_count: usize,
    pub undo_levels: usize,
}

impl RecordingHost {
    pub fn with_selection(range: SelectionRange) -> Self {
        Self {
            selection: Some(range),
            ..Self::default()
        }
    }

    /// `type` tags of the recorded notifications, in order
    pub fn kinds(&self) -> Vec<String> {
        self.notifications
            .iter()
            .map(|n| {
                serde_json::to_value(n).unwrap()["type"]
                    .as_str()
                    .unwrap()
                    .to_string()
            })
            .collect()
    }
}

impl EditorHost for RecordingHost {
    fn selection_range(&self) -> Option<SelectionRange> {
        self.selection.clone()
    }

    fn set_selection_range(&mut self, range: SelectionRange) {
        self.restored.push(range);
    }

    fn focus(&mut self) {
        self.focus_count += 1;
    }

    fn notify(&mut self, notification: Notification) {
        self.notifications.push(notification);
    }

    fn add_undo_level(&mut self) {
        self.undo_levels += 1;
    }
}
