use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

/// Selected table cells, as reported by the host editor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CellSelection {
    /// No cell is selected
    #[default]
    None,
    /// Caret or selection inside a single cell
    Single(NodeId),
    /// Several cells selected (in document order)
    Multiple(Vec<NodeId>),
}

impl CellSelection {
    /// The cell that anchors the selection (first in document order)
    pub fn anchor(&self) -> Option<NodeId> {
        match self {
            Self::None => None,
            Self::Single(cell) => Some(*cell),
            Self::Multiple(cells) => cells.first().copied(),
        }
    }
}

/// An editor selection range, captured before a resize and restored after it
///
/// The range is opaque to the resize subsystem: it is read from and handed
/// back to the host unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRange {
    pub start: NodeId,
    pub start_offset: usize,
    pub end: NodeId,
    pub end_offset: usize,
}

impl SelectionRange {
    /// A collapsed range (caret) at `offset` inside `node`
    pub fn caret(node: NodeId, offset: usize) -> Self {
        Self {
            start: node,
            start_offset: offset,
            end: node,
            end_offset: offset,
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end && self.start_offset == self.end_offset
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::dom::Document;

    #[test]
    fn test_anchor() {
        let mut doc = Document::new();
        let a = doc.create_element("td", Vec::new());
        let b = doc.create_element("td", Vec::new());
        assert_eq!(CellSelection::None.anchor(), None);
        assert_eq!(CellSelection::Single(b).anchor(), Some(b));
        assert_eq!(CellSelection::Multiple(vec![a, b]).anchor(), Some(a));
    }

    #[test]
    fn test_caret_is_collapsed() {
        let mut doc = Document::new();
        let a = doc.create_element("td", Vec::new());
        assert!(SelectionRange::caret(a, 3).is_collapsed());
    }
}
