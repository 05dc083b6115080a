//! tablegrid - table grid model and resize engine for rich-text editors
//!
//! Projects HTML tables into a logical grid and resizes them the way an
//! editor's table plugin does, natively or from WebAssembly:
//! - Grid derivation with row/column spans, headers and colgroups
//! - Sizing classification (pixel, percent, responsive) and conversions
//! - Column width redistribution under preserve/resize table policies
//! - Interactive resize controller with resize bars and host notifications
//! - Insert-table grid picker that grows under the pointer
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { TableResizer } from 'tablegrid';
//! await init();
//! const resizer = new TableResizer(table.outerHTML, '{"columnResizingBehaviour":"resizetable"}');
//! resizer.resizeStart('corner-se');
//! resizer.resizeEnd('corner-se', 450);
//! table.outerHTML = resizer.html();
//! ```

// Document model
pub mod dom;
pub mod error;
pub mod types;

// Table model and geometry
pub mod grid;
pub mod layout;
pub mod report;
pub mod sizing;

// Interaction
pub mod handler;
pub mod picker;
pub mod resize;

mod bindings;

use wasm_bindgen::prelude::*;

pub use bindings::TableResizer;
pub use dom::{Document, NodeId};
pub use error::{Result, TableError};
pub use grid::{derive_grid, Warehouse};
pub use handler::{EditorEvent, EditorHost, Notification, ResizeConfig, TableResizeHandler};
pub use layout::{DeclaredLayout, StylePort, TableLayout};
pub use resize::{adjust_height, adjust_width, ResizeBehaviour};
pub use sizing::SizingMode;
pub use types::*;

/// Describe the first table of an HTML fragment as a JSON string
///
/// # Arguments
/// * `markup` - HTML containing at least one `<table>`
///
/// # Returns
/// A JSON string with the grid size, sizing mode and cells
///
/// # Errors
/// Returns an error if the markup cannot be read or holds no table.
#[wasm_bindgen]
pub fn describe_table(markup: &str) -> std::result::Result<String, JsValue> {
    let report = report::describe_markup(markup).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&report)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Describe the first table of an HTML fragment as a `JsValue`
///
/// # Errors
/// Returns an error if the markup cannot be read or holds no table.
#[wasm_bindgen]
pub fn describe_table_to_js(markup: &str) -> std::result::Result<JsValue, JsValue> {
    let report = report::describe_markup(markup).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&report)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Grid size `{ rows, columns }` of the first table in `markup`
///
/// # Errors
/// Returns an error if the markup cannot be read or holds no table.
#[wasm_bindgen]
pub fn grid_size(markup: &str) -> std::result::Result<JsValue, JsValue> {
    let doc = Document::parse(markup).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let table = doc
        .first_table()
        .ok_or_else(|| JsValue::from_str(&TableError::NoTable.to_string()))?;

    serde_wasm_bindgen::to_value(&grid::get_grid_size(&doc, table))
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
