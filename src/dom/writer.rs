//! Serializes document subtrees back to HTML markup.
//!
//! Output goes through html5ever's serializer, so text and attribute
//! values are escaped the way browsers serialize `innerHTML` (`&nbsp;`
//! included) and void elements get no end tag.

use std::io;

use html5ever::serialize::{
    serialize, Serialize, SerializeOpts, Serializer, TraversalScope,
};
use html5ever::{LocalName, Namespace, QualName};
use tracing::warn;

use super::parser::HTML_NAMESPACE;
use super::{Document, NodeData, NodeId};

/// A node of a [`Document`] and everything below it
struct Subtree<'a> {
    doc: &'a Document,
    id: NodeId,
}

enum Step {
    Open(NodeId),
    Close(QualName),
}

impl Serialize for Subtree<'_> {
    fn serialize<S: Serializer>(
        &self,
        serializer: &mut S,
        traversal_scope: TraversalScope,
    ) -> io::Result<()> {
        let mut steps: Vec<Step> = match traversal_scope {
            TraversalScope::IncludeNode => vec![Step::Open(self.id)],
            TraversalScope::ChildrenOnly(_) => self
                .doc
                .children(self.id)
                .iter()
                .rev()
                .map(|&c| Step::Open(c))
                .collect(),
        };

        while let Some(step) = steps.pop() {
            let id = match step {
                Step::Close(name) => {
                    serializer.end_elem(name)?;
                    continue;
                }
                Step::Open(id) => id,
            };
            match self.doc.node(id).map(|n| &n.data) {
                Some(NodeData::Text(text)) => serializer.write_text(text)?,
                Some(NodeData::Element { tag, attrs }) => {
                    let name = QualName::new(
                        None,
                        Namespace::from(HTML_NAMESPACE),
                        LocalName::from(tag.as_str()),
                    );
                    let names: Vec<QualName> = attrs
                        .iter()
                        .map(|(k, _)| {
                            QualName::new(None, Namespace::from(""), LocalName::from(k.as_str()))
                        })
                        .collect();
                    serializer.start_elem(
                        name.clone(),
                        names.iter().zip(attrs).map(|(k, (_, v))| (k, v.as_str())),
                    )?;
                    steps.push(Step::Close(name));
                    steps.extend(self.doc.children(id).iter().rev().map(|&c| Step::Open(c)));
                }
                None => {}
            }
        }
        Ok(())
    }
}

/// Write an element (or text node) and its subtree as HTML.
///
/// The fragment root writes only its children.
pub fn to_html(doc: &Document, id: NodeId) -> String {
    let traversal_scope = if id == doc.root() {
        TraversalScope::ChildrenOnly(None)
    } else {
        TraversalScope::IncludeNode
    };
    let opts = SerializeOpts {
        traversal_scope,
        ..Default::default()
    };

    let mut out = Vec::with_capacity(256);
    if let Err(e) = serialize(&mut out, &Subtree { doc, id }, opts) {
        warn!(node = id.index(), error = %e, "HTML serialization failed");
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_markup() {
        let html = r#"<table style="width: 300px;"><colgroup><col style="width: 50%;"><col></colgroup><tbody><tr><td>a &amp; b</td></tr></tbody></table>"#;
        let doc = Document::parse(html).unwrap();
        assert_eq!(doc.to_html(), html);
    }

    #[test]
    fn test_entities_survive_roundtrip() {
        let doc = Document::parse("<table><tr><td>&nbsp;</td><td>a&copy;b</td><td>&gt</td></tr></table>")
            .unwrap();
        let html = doc.to_html();
        assert_eq!(
            html,
            "<table><tbody><tr><td>&nbsp;</td><td>a\u{a9}b</td><td>&gt;</td></tr></tbody></table>"
        );
        assert_eq!(Document::parse(&html).unwrap().to_html(), html);
    }

    #[test]
    fn test_less_than_in_text_is_escaped() {
        let doc = Document::parse("<table><tr><td>1 < 2</td></tr></table>").unwrap();
        assert_eq!(
            doc.to_html(),
            "<table><tbody><tr><td>1 &lt; 2</td></tr></tbody></table>"
        );
    }

    #[test]
    fn test_escapes_attribute_quotes() {
        let mut doc = Document::new();
        let root = doc.root();
        let td = doc.create_element("td", vec![("title".into(), r#"say "hi""#.into())]);
        doc.append_child(root, td);
        assert_eq!(to_html(&doc, td), r#"<td title="say &quot;hi&quot;"></td>"#);
    }

    #[test]
    fn test_void_element_has_no_end_tag() {
        let mut doc = Document::new();
        let root = doc.root();
        let col = doc.create_element("col", vec![("span".into(), "2".into())]);
        doc.append_child(root, col);
        assert_eq!(doc.to_html(), r#"<col span="2">"#);
    }
}
