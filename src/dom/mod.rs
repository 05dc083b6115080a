//! In-memory element tree for table markup.
//!
//! The document is an arena of nodes addressed by [`NodeId`]. It is the
//! only durable record of sizing intent: every width the resize engine
//! decides on is written back as an inline style here, and the host reads
//! the result back out as markup.

pub mod css;
mod parser;
mod writer;

use serde::{Deserialize, Serialize};

pub use parser::parse_html;
pub use writer::to_html;

/// Index of a node inside the [`Document`] that created it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Raw arena index
    pub fn index(self) -> usize {
        self.0
    }
}

/// Payload of a node
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Element with a lowercase tag name and attributes in source order
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
    },
    /// Text content with entities decoded
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Node {
    pub data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Tag name of the synthetic root that holds a parsed fragment
pub const FRAGMENT_TAG: &str = "#fragment";

/// Arena-backed element tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the fragment root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                data: NodeData::Element {
                    tag: FRAGMENT_TAG.to_string(),
                    attrs: Vec::new(),
                },
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Parse an HTML fragment
    ///
    /// # Errors
    /// Returns an error only when the markup cannot be read.
    pub fn parse(markup: &str) -> crate::error::Result<Self> {
        parse_html(markup)
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Create a detached element; attach it with [`Document::append_child`]
    pub fn create_element(&mut self, tag: &str, attrs: Vec<(String, String)>) -> NodeId {
        self.push(NodeData::Element {
            tag: tag.to_ascii_lowercase(),
            attrs,
        })
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.node(parent).is_none() || self.node(child).is_none() {
            return;
        }
        if let Some(old_parent) = self.parent(child) {
            if let Some(node) = self.nodes.get_mut(old_parent.0) {
                node.children.retain(|&c| c != child);
            }
        }
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.push(child);
        }
        if let Some(node) = self.nodes.get_mut(child.0) {
            node.parent = Some(parent);
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// All children (elements and text) of a node
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map_or(&[], |n| n.children.as_slice())
    }

    /// Element children of a node
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(move |&c| self.tag(c).is_some())
    }

    /// Element children with the given tag
    pub fn children_by_tag<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.element_children(id)
            .filter(move |&c| self.is_tag(c, tag))
    }

    /// Lowercase tag name, or `None` for text nodes
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element { tag, .. }) => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id) == Some(tag)
    }

    /// Text of a text node
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Element { attrs, .. }) => attrs.as_slice(),
            _ => &[],
        }
    }

    /// Attribute value by (case-insensitive) name
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.attrs(id)
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.attr(id, name).is_some()
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(Node {
            data: NodeData::Element { attrs, .. },
            ..
        }) = self.nodes.get_mut(id.0)
        {
            match attrs.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(name)) {
                Some((_, v)) => *v = value.to_string(),
                None => attrs.push((name.to_ascii_lowercase(), value.to_string())),
            }
        }
    }

    /// Remove an attribute; returns true if it was present
    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> bool {
        if let Some(Node {
            data: NodeData::Element { attrs, .. },
            ..
        }) = self.nodes.get_mut(id.0)
        {
            let before = attrs.len();
            attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            return attrs.len() != before;
        }
        false
    }

    /// Closest strict ancestor with the given tag
    pub fn ancestor(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        let mut current = self.parent(id);
        while let Some(node) = current {
            if self.is_tag(node, tag) {
                return Some(node);
            }
            current = self.parent(node);
        }
        None
    }

    /// Closest inclusive ancestor with the given tag
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        if self.is_tag(id, tag) {
            Some(id)
        } else {
            self.ancestor(id, tag)
        }
    }

    /// Element descendants in document (pre-)order, excluding `id` itself
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.tag(node).is_none() {
                continue;
            }
            out.push(node);
            stack.extend(self.children(node).iter().rev().copied());
        }
        out
    }

    /// All `<table>` elements in document order
    pub fn tables(&self) -> Vec<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .filter(|&n| self.is_tag(n, "table"))
            .collect()
    }

    /// The first `<table>` in document order
    pub fn first_table(&self) -> Option<NodeId> {
        self.descendants(self.root())
            .into_iter()
            .find(|&n| self.is_tag(n, "table"))
    }

    /// Serialize the whole fragment back to markup
    pub fn to_html(&self) -> String {
        self.children(self.root())
            .iter()
            .map(|&c| to_html(self, c))
            .collect()
    }
}
