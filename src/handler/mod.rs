//! Interactive resize controller.
//!
//! [`TableResizeHandler`] follows one resize at a time through
//! `Idle -> Dragging -> Idle`. A resize start captures the table's width
//! and selection into a [`ResizeSession`]; the matching resize end turns
//! the final width into column adjustments (for the native corner handles),
//! restores the selection and reports the change to the editor. Resize
//! bars drive the engine directly and report through the same cycle with
//! `bar-` origins.
//!
//! The handler holds no references into the editor. Every call receives a
//! [`HandlerContext`] with the document, the geometry port and the host.

mod bars;
mod config;
mod events;

pub use bars::{Bar, BarKind, ResizeBars};
pub use config::ResizeConfig;
pub use events::{
    is_bar_origin, is_corner_origin, EditorEvent, EditorHost, Notification, BAR_PREFIX,
    CORNER_PREFIX,
};

use tracing::{debug, warn};

use crate::dom::css::css_set;
use crate::dom::{Document, NodeId};
use crate::grid::derive_grid;
use crate::layout::StylePort;
use crate::resize::{adjust_height, adjust_width, ResizeBehaviour};
use crate::sizing::{
    classify, convert_to_percent_size, convert_to_pixel_size, format_percent, format_px,
    get_raw_width, is_percentage, is_pixel, CssLength, SizingMode,
};
use crate::types::{CellSelection, SelectionRange};

/// Width changes smaller than this count as no change
const NO_CHANGE: f64 = 1e-9;

/// What a handler call may touch
pub struct HandlerContext<'a> {
    pub doc: &'a mut Document,
    pub port: &'a dyn StylePort,
    pub host: &'a mut dyn EditorHost,
}

impl<'a> HandlerContext<'a> {
    pub fn new(
        doc: &'a mut Document,
        port: &'a dyn StylePort,
        host: &'a mut dyn EditorHost,
    ) -> Self {
        Self { doc, port, host }
    }
}

/// State captured when a resize starts
#[derive(Debug, Clone, PartialEq)]
pub struct ResizeSession {
    pub table: NodeId,
    pub origin: String,
    /// Selection to restore once the resize ends
    pub selection: Option<SelectionRange>,
    /// Declared width before the resize, `""` when unset
    pub raw_width: String,
    /// Rendered width before the resize
    pub width: f64,
    pub height: f64,
}

/// Resize controller for one editor
#[derive(Debug)]
pub struct TableResizeHandler {
    config: ResizeConfig,
    session: Option<ResizeSession>,
    bars: Option<ResizeBars>,
    read_only: bool,
    destroyed: bool,
}

impl TableResizeHandler {
    pub fn new(config: ResizeConfig) -> Self {
        let bars = config.bars_enabled().then(ResizeBars::new);
        Self {
            config,
            session: None,
            bars,
            read_only: false,
            destroyed: false,
        }
    }

    pub fn config(&self) -> &ResizeConfig {
        &self.config
    }

    pub fn behaviour(&self) -> ResizeBehaviour {
        self.config.column_resizing_behaviour
    }

    /// The live resize, if one is in progress
    pub fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    /// Resize bars, `None` when disabled by configuration or destroyed
    pub fn bars(&self) -> Option<&ResizeBars> {
        self.bars.as_ref()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Dispatch one editor signal
    pub fn handle(&mut self, ctx: &mut HandlerContext<'_>, event: EditorEvent) {
        if self.destroyed {
            debug!(?event, "Ignoring signal after teardown");
            return;
        }
        match event {
            EditorEvent::ResizeStart { target, origin } => self.resize_start(ctx, target, &origin),
            EditorEvent::ResizeEnd {
                target,
                origin,
                width,
            } => self.resize_end(ctx, target, &origin, width),
            EditorEvent::SwitchMode { read_only } => self.switch_mode(read_only),
            EditorEvent::Teardown => self.destroy(),
        }
    }

    fn resize_start(&mut self, ctx: &mut HandlerContext<'_>, target: NodeId, origin: &str) {
        if !ctx.doc.is_tag(target, "table") {
            return;
        }
        if let Some(stale) = self.session.take() {
            warn!(origin = %stale.origin, "Resize started while another was in progress");
        }

        let mode = classify(ctx.doc, target);
        if self.config.table_pixels_forced && mode != SizingMode::Pixel {
            convert_to_pixel_size(ctx.doc, ctx.port, target);
        } else if self.config.table_percentages_forced && mode != SizingMode::Percent {
            convert_to_percent_size(ctx.doc, ctx.port, target);
        }
        // Bars resize from the initial geometry, so an unsized table needs a
        // relative baseline first
        if classify(ctx.doc, target) == SizingMode::None && is_bar_origin(origin) {
            convert_to_percent_size(ctx.doc, ctx.port, target);
        }

        let raw_width = if self.config.table_responsive_forced {
            String::new()
        } else {
            get_raw_width(ctx.doc, target)
        };
        let session = ResizeSession {
            table: target,
            origin: origin.to_string(),
            selection: ctx.host.selection_range(),
            raw_width,
            width: ctx.port.width(ctx.doc, target),
            height: ctx.port.height(ctx.doc, target),
        };
        debug!(
            table = target.index(),
            origin,
            raw_width = %session.raw_width,
            width = session.width,
            "Resize started"
        );
        ctx.host.notify(Notification::ObjectResizeStart {
            target,
            width: session.width,
            height: session.height,
            origin: origin.to_string(),
        });
        self.session = Some(session);
    }

    fn resize_end(&mut self, ctx: &mut HandlerContext<'_>, target: NodeId, origin: &str, width: f64) {
        if !ctx.doc.is_tag(target, "table") {
            return;
        }
        let session = match self.session.take() {
            Some(session) if session.table == target => session,
            other => {
                warn!(origin, "Resize ended without a matching start");
                if let Some(session) = other {
                    debug!(table = session.table.index(), "Dropping session of another table");
                }
                ResizeSession {
                    table: target,
                    origin: origin.to_string(),
                    selection: None,
                    raw_width: get_raw_width(ctx.doc, target),
                    width: ctx.port.width(ctx.doc, target),
                    height: ctx.port.height(ctx.doc, target),
                }
            }
        };

        if is_corner_origin(origin) {
            self.after_corner_resize(ctx, target, origin, width, &session);
        }

        remove_data_style(ctx.doc, target);
        if let Some(range) = session.selection.clone() {
            ctx.host.set_selection_range(range);
        }
        ctx.host.focus();

        let (final_width, final_height) = (
            ctx.port.width(ctx.doc, target),
            ctx.port.height(ctx.doc, target),
        );
        debug!(table = target.index(), origin, final_width, "Resize ended");
        ctx.host.notify(Notification::ObjectResizeEnd {
            target,
            width: final_width,
            height: final_height,
            origin: origin.to_string(),
        });
        ctx.host.notify(Notification::TableModified {
            target,
            style_modified: true,
        });
    }

    /// Turn a native corner resize into column adjustments.
    ///
    /// The pivot is the last column for `preservetable` or an east-edge
    /// handle, otherwise the first. A corner resize always changes the
    /// table's width, so the pivot takes the whole delta.
    fn after_corner_resize(
        &self,
        ctx: &mut HandlerContext<'_>,
        table: NodeId,
        origin: &str,
        width: f64,
        session: &ResizeSession,
    ) {
        let is_right_edge = origin.ends_with('e');
        let raw = session.raw_width.as_str();

        // Closest to responsive sizing is relative sizing
        if raw.is_empty() {
            convert_to_percent_size(ctx.doc, ctx.port, table);
        }

        if (width - session.width).abs() > NO_CHANGE && !raw.is_empty() {
            css_set(ctx.doc, table, "width", raw);
            let pivot = if self.behaviour() == ResizeBehaviour::PreserveTable || is_right_edge {
                derive_grid(ctx.doc, table).last_column().unwrap_or(0)
            } else {
                0
            };
            let mode = classify(ctx.doc, table);
            debug!(pivot, delta = width - session.width, "Adjusting columns after corner resize");
            adjust_width(
                ctx.doc,
                ctx.port,
                table,
                width - session.width,
                pivot,
                ResizeBehaviour::ResizeTable,
                mode,
            );
        } else if is_percentage(raw) {
            // A resize that did not move still leaves the table relative
            if let Some(CssLength::Percent(percent)) = CssLength::parse(raw) {
                if session.width > 0.0 {
                    let target = width * percent / session.width;
                    css_set(ctx.doc, table, "width", &format_percent(target));
                }
            }
        }

        if is_pixel(raw) {
            sync_pixels(ctx.doc, ctx.port, table);
        }
    }

    fn switch_mode(&mut self, read_only: bool) {
        self.read_only = read_only;
        if read_only {
            self.hide_bars();
        } else {
            self.show_bars();
        }
    }

    /// Lay the resize bars out over `table`
    pub fn refresh_bars(&mut self, doc: &Document, port: &dyn StylePort, table: NodeId) {
        if let Some(bars) = self.bars.as_mut() {
            bars.refresh(doc, port, table);
        }
    }

    pub fn hide_bars(&mut self) {
        if let Some(bars) = self.bars.as_mut() {
            bars.hide();
        }
    }

    pub fn show_bars(&mut self) {
        if let Some(bars) = self.bars.as_mut() {
            bars.show();
        }
    }

    /// Follow the editor's cell selection: bars go to the table holding the
    /// selected cells, and disappear when nothing is selected
    pub fn refresh_for_selection(
        &mut self,
        doc: &Document,
        port: &dyn StylePort,
        selection: &CellSelection,
    ) {
        match selection.anchor().and_then(|cell| doc.ancestor(cell, "table")) {
            Some(table) => {
                self.refresh_bars(doc, port, table);
                if !self.read_only {
                    self.show_bars();
                }
            }
            None => self.hide_bars(),
        }
    }

    /// Drag a resize bar by `delta` pixels.
    ///
    /// Column bars resize their column under the configured behaviour, row
    /// bars resize their row. The drag is reported as a full resize cycle
    /// with a `bar-` origin and recorded as one undo level. Returns `false`
    /// without touching anything when the bar does not exist, bars are
    /// hidden, or another resize is in progress.
    pub fn drag_bar(
        &mut self,
        ctx: &mut HandlerContext<'_>,
        kind: BarKind,
        index: usize,
        delta: f64,
    ) -> bool {
        let Some(bars) = self.bars.as_ref() else {
            return false;
        };
        if bars.is_hidden() || self.session.is_some() {
            debug!(hidden = bars.is_hidden(), "Bar drag refused");
            return false;
        }
        let (Some(table), Some(bar)) = (bars.table(), bars.find(kind, index)) else {
            return false;
        };

        let origin = bar.origin();
        self.resize_start(ctx, table, &origin);
        match kind {
            BarKind::Column => {
                let mode = classify(ctx.doc, table);
                adjust_width(ctx.doc, ctx.port, table, delta, index, self.behaviour(), mode);
            }
            BarKind::Row => adjust_height(ctx.doc, ctx.port, table, delta, index),
        }
        let width = ctx.port.width(ctx.doc, table);
        self.resize_end(ctx, table, &origin, width);
        ctx.host.add_undo_level();
        self.refresh_bars(ctx.doc, ctx.port, table);
        true
    }

    /// Drop the bars and any live session. Safe to call repeatedly.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        debug!(dragging = self.session.is_some(), "Destroying resize handler");
        self.session = None;
        self.bars = None;
        self.destroyed = true;
    }
}

/// Pin every cell of a table without sized columns to its rendered pixel
/// width, dropping the `width` attribute the style replaces
pub fn sync_pixels(doc: &mut Document, port: &dyn StylePort, table: NodeId) {
    let wh = derive_grid(doc, table);
    if wh.has_columns() {
        return;
    }
    let widths: Vec<(NodeId, String)> = wh
        .cells()
        .iter()
        .map(|cell| (cell.element, format_px(port.width(doc, cell.element))))
        .collect();
    for (cell, width) in &widths {
        css_set(doc, *cell, "width", width);
        doc.remove_attr(*cell, "width");
    }
}

/// Drop the editor's cached style copies from a table and its parts
fn remove_data_style(doc: &mut Document, table: NodeId) {
    let wh = derive_grid(doc, table);
    let mut targets = vec![table];
    targets.extend(wh.rows().iter().copied());
    targets.extend(wh.cells().iter().map(|cell| cell.element));
    targets.extend((0..wh.size().columns).filter_map(|c| wh.column(c)));
    for el in targets {
        doc.remove_attr(el, "data-mce-style");
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

    #[derive(Default)]
    struct Host {
        notifications: Vec<Notification>,
        focused: usize,
    }

    impl EditorHost for Host {
        fn selection_range(&self) -> Option<SelectionRange> {
            None
        }
        fn set_selection_range(&mut self, _range: SelectionRange) {}
        fn focus(&mut self) {
            self.focused += 1;
        }
        fn notify(&mut self, notification: Notification) {
            self.notifications.push(notification);
        }
        fn add_undo_level(&mut self) {}
    }

    #[test]
    fn test_non_table_targets_ignored() {
        let mut doc = Document::parse("<table><tr><td>a</td></tr></table>").unwrap();
        let td = doc
            .descendants(doc.root())
            .into_iter()
            .find(|&n| doc.is_tag(n, "td"))
            .unwrap();
        let port = DeclaredLayout::default();
        let mut host = Host::default();
        let mut handler = TableResizeHandler::new(ResizeConfig::default());
        let mut ctx = HandlerContext::new(&mut doc, &port, &mut host);
        handler.handle(
            &mut ctx,
            EditorEvent::ResizeStart {
                target: td,
                origin: "corner-se".into(),
            },
        );
        assert!(!handler.is_dragging());
        assert!(host.notifications.is_empty());
    }

    #[test]
    fn test_sync_pixels_pins_cells() {
        let mut doc = Document::parse(
            r#"<table style="width: 300px"><tr><td width="100">a</td><td>b</td></tr></table>"#,
        )
        .unwrap();
        let table = doc.first_table().unwrap();
        sync_pixels(&mut doc, &DeclaredLayout::default(), table);
        let wh = derive_grid(&doc, table);
        let a = wh.cell_at(0, 0).unwrap().element;
        let b = wh.cell_at(0, 1).unwrap().element;
        assert_eq!(doc.attr(a, "style"), Some("width: 100px;"));
        assert!(!doc.has_attr(a, "width"));
        assert_eq!(get_raw_width(&doc, b), "200px");
    }

    #[test]
    fn test_remove_data_style() {
        let mut doc = Document::parse(
            r#"<table data-mce-style="width: 1px"><tr data-mce-style="x"><td data-mce-style="y">a</td></tr></table>"#,
        )
        .unwrap();
        let table = doc.first_table().unwrap();
        remove_data_style(&mut doc, table);
        assert!(!doc.to_html().contains("data-mce-style"));
    }

    #[test]
    fn test_destroy_twice() {
        let mut handler = TableResizeHandler::new(ResizeConfig::default());
        assert!(handler.bars().is_some());
        handler.destroy();
        handler.destroy();
        assert!(handler.is_destroyed());
        assert!(handler.bars().is_none());
    }
}
