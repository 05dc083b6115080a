//! WebAssembly entry point.
//!
//! [`TableResizer`] owns a parsed copy of one table, the declared geometry
//! it is measured with and a [`TableResizeHandler`]. The page forwards the
//! native resize signals and bar drags to it and writes `html()` back.
//! Notifications are queued, or delivered to a callback when one is set.

use serde::Deserialize;
use tracing::{debug, warn};
use wasm_bindgen::prelude::*;

use crate::dom::css::css_set;
use crate::dom::{Document, NodeId};
use crate::error::{Result, TableError};
use crate::grid::get_grid_size;
use crate::handler::{
    is_corner_origin, Bar, BarKind, EditorEvent, EditorHost, HandlerContext, Notification,
    ResizeConfig, TableResizeHandler,
};
use crate::layout::DeclaredLayout;
use crate::sizing::format_px;
use crate::types::{Coords, GridSize, SelectionRange};

/// Page measurements supplied by the host
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct Measurements {
    container_width: Option<f64>,
    origin: Option<Coords>,
}

/// Host side of the handler for the bindings
#[derive(Default)]
struct BindingHost {
    selection: Option<SelectionRange>,
    pending: Vec<Notification>,
    undo_levels: usize,
    #[cfg(target_arch = "wasm32")]
    callback: Option<js_sys::Function>,
}

impl EditorHost for BindingHost {
    fn selection_range(&self) -> Option<SelectionRange> {
        self.selection.clone()
    }

    fn set_selection_range(&mut self, range: SelectionRange) {
        self.selection = Some(range);
    }

    fn focus(&mut self) {}

    fn notify(&mut self, notification: Notification) {
        #[cfg(target_arch = "wasm32")]
        if let Some(callback) = self.callback.as_ref() {
            let delivered = serde_wasm_bindgen::to_value(&notification)
                .map_err(JsValue::from)
                .and_then(|value| callback.call1(&JsValue::NULL, &value));
            if let Err(e) = delivered {
                self.callback_failed(notification, &format!("{e:?}"));
            }
            return;
        }
        self.pending.push(notification);
    }

    fn add_undo_level(&mut self) {
        self.undo_levels += 1;
    }
}

impl BindingHost {
    /// Keep a notification the host callback rejected so `takeNotifications` still sees it
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    fn callback_failed(&mut self, notification: Notification, error: &str) {
        warn!(
            target = notification.target().index(),
            error, "Notification callback failed, queueing instead"
        );
        self.pending.push(notification);
    }
}

/// Resizable table driven from JavaScript
#[wasm_bindgen]
pub struct TableResizer {
    doc: Document,
    table: NodeId,
    layout: DeclaredLayout,
    handler: TableResizeHandler,
    host: BindingHost,
}

impl TableResizer {
    /// Parse `markup` and attach a handler configured from `config_json`
    ///
    /// # Errors
    /// Returns an error for unreadable markup, markup without a table,
    /// or malformed configuration.
    pub fn create(markup: &str, config_json: &str) -> Result<Self> {
        let doc = Document::parse(markup)?;
        let table = doc.first_table().ok_or(TableError::NoTable)?;
        let config = ResizeConfig::from_json(config_json)?;
        let mut resizer = Self {
            doc,
            table,
            layout: DeclaredLayout::default(),
            handler: TableResizeHandler::new(config),
            host: BindingHost::default(),
        };
        resizer.refresh_bars();
        Ok(resizer)
    }

    /// Update the container width and page origin used for geometry
    ///
    /// # Errors
    /// Returns [`TableError::Config`] for malformed JSON.
    pub fn apply_measurements(&mut self, json: &str) -> Result<()> {
        let measurements: Measurements = serde_json::from_str(json)?;
        if let Some(width) = measurements.container_width {
            self.layout.container_width = width;
        }
        if let Some(origin) = measurements.origin {
            self.layout.origin = origin;
        }
        self.refresh_bars();
        Ok(())
    }

    fn dispatch(&mut self, event: EditorEvent) {
        let mut ctx = HandlerContext::new(&mut self.doc, &self.layout, &mut self.host);
        self.handler.handle(&mut ctx, event);
    }

    fn drag(&mut self, kind: BarKind, index: usize, delta: f64) -> bool {
        let mut ctx = HandlerContext::new(&mut self.doc, &self.layout, &mut self.host);
        self.handler.drag_bar(&mut ctx, kind, index, delta)
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn table(&self) -> NodeId {
        self.table
    }

    pub fn handler(&self) -> &TableResizeHandler {
        &self.handler
    }

    /// Bars currently shown over the table
    pub fn visible_bars(&self) -> Vec<Bar> {
        self.handler
            .bars()
            .map(|bars| bars.visible().to_vec())
            .unwrap_or_default()
    }

    pub fn size(&self) -> GridSize {
        get_grid_size(&self.doc, self.table)
    }

    /// Drain queued notifications
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.host.pending)
    }

    /// Undo levels recorded by bar drags
    pub fn undo_levels(&self) -> usize {
        self.host.undo_levels
    }
}

#[wasm_bindgen]
impl TableResizer {
    /// Create a resizer for the first table in `markup`
    #[wasm_bindgen(constructor)]
    pub fn new(markup: &str, config_json: &str) -> std::result::Result<TableResizer, JsValue> {
        console_error_panic_hook::set_once();
        Self::create(markup, config_json).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Set `{ containerWidth, origin: { x, y } }`
    #[wasm_bindgen(js_name = "setMeasurements")]
    pub fn set_measurements(&mut self, json: &str) -> std::result::Result<(), JsValue> {
        self.apply_measurements(json)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    #[wasm_bindgen(js_name = "resizeStart")]
    pub fn resize_start(&mut self, origin: &str) {
        self.dispatch(EditorEvent::ResizeStart {
            target: self.table,
            origin: origin.to_string(),
        });
    }

    /// Finish a resize at `width` pixels. Corner resizes leave the final
    /// width on the table the way the native handles do.
    #[wasm_bindgen(js_name = "resizeEnd")]
    pub fn resize_end(&mut self, origin: &str, width: f64) {
        if is_corner_origin(origin) && self.handler.is_dragging() {
            css_set(&mut self.doc, self.table, "width", &format_px(width));
        }
        self.dispatch(EditorEvent::ResizeEnd {
            target: self.table,
            origin: origin.to_string(),
            width,
        });
        self.refresh_bars();
    }

    #[wasm_bindgen(js_name = "switchMode")]
    pub fn switch_mode(&mut self, read_only: bool) {
        self.dispatch(EditorEvent::SwitchMode { read_only });
    }

    #[wasm_bindgen(js_name = "refreshBars")]
    pub fn refresh_bars(&mut self) {
        self.handler
            .refresh_bars(&self.doc, &self.layout, self.table);
    }

    /// Drag the bar on column `index`'s right edge by `delta` pixels
    #[wasm_bindgen(js_name = "dragColumnBar")]
    pub fn drag_column_bar(&mut self, index: usize, delta: f64) -> bool {
        self.drag(BarKind::Column, index, delta)
    }

    /// Drag the bar on row `index`'s bottom edge by `delta` pixels
    #[wasm_bindgen(js_name = "dragRowBar")]
    pub fn drag_row_bar(&mut self, index: usize, delta: f64) -> bool {
        self.drag(BarKind::Row, index, delta)
    }

    /// Visible bars as an array of `{ kind, index, position, length }`
    pub fn bars(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.visible_bars())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    #[wasm_bindgen(js_name = "gridSize")]
    pub fn grid_size(&self) -> std::result::Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.size())
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
    }

    /// Queued notifications as JSON, emptying the queue
    #[wasm_bindgen(js_name = "takeNotifications")]
    pub fn take_notifications(&mut self) -> std::result::Result<String, JsValue> {
        serde_json::to_string(&self.drain_notifications())
            .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
    }

    /// Current markup of the whole fragment
    pub fn html(&self) -> String {
        self.doc.to_html()
    }

    pub fn destroy(&mut self) {
        debug!("Tearing down table resizer");
        self.dispatch(EditorEvent::Teardown);
        self.handler.destroy();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
impl TableResizer {
    /// Deliver notifications to `callback` instead of queueing them
    #[wasm_bindgen(js_name = "setNotifyCallback")]
    pub fn set_notify_callback(&mut self, callback: js_sys::Function) {
        self.host.callback = Some(callback);
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
    use crate::sizing::get_raw_width;

    const TABLE: &str = r#"<table style="width: 300px"><colgroup><col style="width: 100px"><col style="width: 200px"></colgroup><tr><td>a</td><td>b</td></tr></table>"#;

    #[test]
    fn test_create_requires_table() {
        assert!(matches!(
            TableResizer::create("<p>x</p>", ""),
            Err(TableError::NoTable)
        ));
        assert!(TableResizer::create(TABLE, "{").is_err());
    }

    #[test]
    fn test_corner_resize_writes_columns() {
        let mut resizer = TableResizer::create(TABLE, "").unwrap();
        resizer.resize_start("corner-se");
        resizer.resize_end("corner-se", 450.0);

        let doc = resizer.document();
        assert_eq!(get_raw_width(doc, resizer.table()), "450px");
        let notes = resizer.drain_notifications();
        assert_eq!(notes.len(), 3);
        assert!(matches!(notes[2], Notification::TableModified { .. }));
        assert!(resizer.drain_notifications().is_empty());
    }

    #[test]
    fn test_measurements_and_bars() {
        let mut resizer = TableResizer::create(TABLE, "").unwrap();
        resizer
            .apply_measurements(r#"{"containerWidth": 1000, "origin": {"x": 5, "y": 7}}"#)
            .unwrap();
        let bars = resizer.visible_bars();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].position, Coords::new(105.0, 7.0));

        resizer.switch_mode(true);
        assert!(resizer.visible_bars().is_empty());
        resizer.switch_mode(false);
        assert_eq!(resizer.visible_bars().len(), 3);
    }

    #[test]
    fn test_column_bar_drag() {
        let mut resizer = TableResizer::create(TABLE, "").unwrap();
        assert!(resizer.drag_column_bar(0, 20.0));
        assert!(!resizer.drag_column_bar(9, 20.0));
        assert_eq!(resizer.undo_levels(), 1);
        assert!(resizer.html().contains("width: 120px;"));
        assert!(resizer.html().contains("width: 180px;"));
    }

    #[test]
    fn test_destroy_twice() {
        let mut resizer = TableResizer::create(TABLE, "").unwrap();
        resizer.destroy();
        resizer.destroy();
        assert!(resizer.handler().is_destroyed());
        assert!(resizer.visible_bars().is_empty());
        assert!(!resizer.drag_row_bar(0, 5.0));
    }

    #[test]
    fn test_failed_callback_queues_notification() {
        let mut host = BindingHost::default();
        let target = Document::new().root();
        host.callback_failed(
            Notification::TableModified {
                target,
                style_modified: true,
            },
            "TypeError: not a function",
        );
        assert_eq!(host.pending.len(), 1);
        assert_eq!(host.pending[0].target(), target);
    }

    #[test]
    fn test_entities_survive_resize() {
        let markup = r#"<table style="width: 300px"><tr><td style="width: 150px">&nbsp;</td><td style="width: 150px">a&copy;b &lt; c</td></tr></table>"#;
        let mut resizer = TableResizer::create(markup, "").unwrap();
        resizer.resize_start("corner-se");
        resizer.resize_end("corner-se", 400.0);

        let html = resizer.html();
        assert!(html.contains(">&nbsp;</td>"), "{html}");
        assert!(html.contains("a\u{a9}b &lt; c"), "{html}");
        assert!(!html.contains("&amp;"), "{html}");
        let reparsed = TableResizer::create(&html, "").unwrap();
        assert_eq!(reparsed.html(), html);
    }

    #[test]
    fn test_grid_size() {
        let resizer = TableResizer::create(TABLE, "").unwrap();
        assert_eq!(resizer.size(), GridSize::new(1, 2));
    }
}
