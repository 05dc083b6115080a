//! Signals from the editor and notifications back to it.

use serde::{Deserialize, Serialize};

use crate::dom::NodeId;
use crate::types::SelectionRange;

/// Origin tags starting with this come from the native corner handles
pub const CORNER_PREFIX: &str = "corner-";

/// Origin tags starting with this come from resize bars
pub const BAR_PREFIX: &str = "bar-";

/// A signal the editor delivers to the resize handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum EditorEvent {
    /// A resize of `target` began from the handle named by `origin`
    ResizeStart { target: NodeId, origin: String },
    /// The resize ended with `target` at `width` pixels
    ResizeEnd {
        target: NodeId,
        origin: String,
        width: f64,
    },
    /// The editor entered or left read-only mode
    #[serde(rename_all = "camelCase")]
    SwitchMode { read_only: bool },
    /// The editor is going away
    Teardown,
}

/// Something the handler tells the editor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Notification {
    ObjectResizeStart {
        target: NodeId,
        width: f64,
        height: f64,
        origin: String,
    },
    ObjectResizeEnd {
        target: NodeId,
        width: f64,
        height: f64,
        origin: String,
    },
    #[serde(rename_all = "camelCase")]
    TableModified { target: NodeId, style_modified: bool },
}

impl Notification {
    /// The element the notification is about
    pub fn target(&self) -> NodeId {
        match self {
            Notification::ObjectResizeStart { target, .. }
            | Notification::ObjectResizeEnd { target, .. }
            | Notification::TableModified { target, .. } => *target,
        }
    }
}

/// The editor services the resize handler calls back into
pub trait EditorHost {
    /// Current selection, if the editor has one
    fn selection_range(&self) -> Option<SelectionRange>;

    fn set_selection_range(&mut self, range: SelectionRange);

    /// Give the editor keyboard focus back
    fn focus(&mut self);

    fn notify(&mut self, notification: Notification);

    /// Record the document state as one undoable step
    fn add_undo_level(&mut self);
}

/// True for origins of the four native corner handles (`corner-se`, ...)
pub fn is_corner_origin(origin: &str) -> bool {
    origin.starts_with(CORNER_PREFIX)
}

/// True for origins of resize bar drags (`bar-col-1`, ...)
pub fn is_bar_origin(origin: &str) -> bool {
    origin.starts_with(BAR_PREFIX)
}
