//! HTML fragment parsing with html5ever.
//!
//! Markup is parsed the way a browser parses `innerHTML` of a `<body>`:
//! entities are decoded, end tags the author left out are implied, rows
//! outside a section land in an implied `<tbody>`, and a bare `<` that
//! starts no tag stays text. The resulting tree is copied into the arena.

use std::io;
use std::rc::Rc;

use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{parse_fragment, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, NodeData as HtmlNode, RcDom};
use tracing::trace;

use crate::error::Result;

use super::{Document, NodeId};

pub(super) const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// Parse an HTML fragment into a [`Document`].
///
/// # Errors
/// Returns an error only when the markup cannot be read as UTF-8 input.
pub fn parse_html(markup: &str) -> Result<Document> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            scripting_enabled: false,
            ..Default::default()
        },
        ..Default::default()
    };
    let context = QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from("body"));

    let dom = parse_fragment(RcDom::default(), opts, context, Vec::new())
        .from_utf8()
        .read_from(&mut io::Cursor::new(markup.as_bytes()))?;

    let mut doc = Document::new();
    // Fragment parsing wraps the content in a synthetic <html> element
    let Some(html) = dom.document.children.borrow().first().cloned() else {
        return Ok(doc);
    };
    let root = doc.root();
    copy_children(&mut doc, &html, root);
    trace!(bytes = markup.len(), "Parsed fragment");
    Ok(doc)
}

/// Copy the children of `from` under `into`, depth first and in order.
fn copy_children(doc: &mut Document, from: &Handle, into: NodeId) {
    let mut pending: Vec<(Handle, NodeId)> = from
        .children
        .borrow()
        .iter()
        .rev()
        .map(|child| (Rc::clone(child), into))
        .collect();

    while let Some((handle, parent)) = pending.pop() {
        let id = match &handle.data {
            HtmlNode::Text { contents } => doc.create_text(&contents.borrow()),
            HtmlNode::Element {
                name,
                attrs,
                template_contents,
                ..
            } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attribute_name(&attr.name), attr.value.to_string()))
                    .collect();
                let id = doc.create_element(&name.local, attrs);
                // <template> keeps its content in a separate fragment
                let source = template_contents
                    .borrow()
                    .clone()
                    .unwrap_or_else(|| Rc::clone(&handle));
                let children = source.children.borrow();
                pending.extend(children.iter().rev().map(|child| (Rc::clone(child), id)));
                id
            }
            // Comments, doctypes and processing instructions carry no table structure
            _ => continue,
        };
        doc.append_child(parent, id);
    }
}

fn attribute_name(name: &QualName) -> String {
    match &name.prefix {
        Some(prefix) => format!("{prefix}:{}", name.local),
        None => name.local.to_string(),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn tags_under(doc: &Document, node: NodeId) -> Vec<String> {
        doc.element_children(node)
            .map(|c| doc.tag(c).unwrap_or_default().to_string())
            .collect()
    }

    fn rows_of(doc: &Document, table: NodeId) -> Vec<NodeId> {
        doc.descendants(table)
            .into_iter()
            .filter(|&n| doc.is_tag(n, "tr"))
            .collect()
    }

    fn first_text(doc: &Document, tag: &str) -> String {
        let el = doc
            .descendants(doc.root())
            .into_iter()
            .find(|&n| doc.is_tag(n, tag))
            .unwrap();
        doc.children(el).iter().filter_map(|&t| doc.text(t)).collect()
    }

    #[test]
    fn test_parse_simple_table() {
        let doc = parse_html(
            r#"<table style="width: 300px"><tbody><tr><td>a</td><td>b</td></tr></tbody></table>"#,
        )
        .unwrap();
        let table = doc.first_table().unwrap();
        assert_eq!(doc.attr(table, "style"), Some("width: 300px"));
        let tbody = doc.element_children(table).next().unwrap();
        let tr = doc.element_children(tbody).next().unwrap();
        assert_eq!(tags_under(&doc, tr), vec!["td", "td"]);
    }

    #[test]
    fn test_omitted_end_tags() {
        let doc = parse_html("<table><tr><td>1<td>2<tr><td>3<td>4</table>").unwrap();
        let table = doc.first_table().unwrap();
        assert_eq!(tags_under(&doc, table), vec!["tbody"]);
        let rows = rows_of(&doc, table);
        assert_eq!(rows.len(), 2);
        assert_eq!(tags_under(&doc, rows[0]), vec!["td", "td"]);
        assert_eq!(tags_under(&doc, rows[1]), vec!["td", "td"]);
    }

    #[test]
    fn test_void_elements() {
        let doc = parse_html(
            "<table><colgroup><col width=100><col width=200></colgroup><tr><td><br></td></tr></table>",
        )
        .unwrap();
        let table = doc.first_table().unwrap();
        let colgroup = doc.children_by_tag(table, "colgroup").next().unwrap();
        assert_eq!(tags_under(&doc, colgroup), vec!["col", "col"]);
        assert_eq!(doc.attr(doc.element_children(colgroup).next().unwrap(), "width"), Some("100"));
        let tr = rows_of(&doc, table)[0];
        assert_eq!(tags_under(&doc, tr), vec!["td"]);
    }

    #[test]
    fn test_nested_table_cells_stay_nested() {
        let doc = parse_html(
            "<table><tr><td><table><tr><td>inner</td></tr></table><td>outer</td></tr></table>",
        )
        .unwrap();
        let tables = doc.tables();
        assert_eq!(tables.len(), 2);
        let outer_tr = rows_of(&doc, tables[0])[0];
        assert_eq!(tags_under(&doc, outer_tr), vec!["td", "td"]);
    }

    #[test]
    fn test_stray_end_tag_ignored() {
        let doc = parse_html("<table><tr><td>a</span></td></tr></table>").unwrap();
        let table = doc.first_table().unwrap();
        let tr = rows_of(&doc, table)[0];
        assert_eq!(tags_under(&doc, tr), vec!["td"]);
        assert_eq!(first_text(&doc, "td"), "a");
    }

    #[test]
    fn test_named_entities_are_decoded() {
        let doc = parse_html("<table><tr><td>a&nbsp;b</td><td>&copy; 1 &gt 0</td></tr></table>")
            .unwrap();
        assert_eq!(first_text(&doc, "td"), "a\u{a0}b");
        let cells: Vec<String> = doc
            .descendants(doc.root())
            .into_iter()
            .filter(|&n| doc.is_tag(n, "td"))
            .map(|td| doc.children(td).iter().filter_map(|&t| doc.text(t)).collect())
            .collect();
        assert_eq!(cells[1], "\u{a9} 1 > 0");
    }

    #[test]
    fn test_bare_less_than_stays_text() {
        let doc = parse_html("<table><tr><td>1 < 2</td></tr></table>").unwrap();
        assert_eq!(first_text(&doc, "td"), "1 < 2");
    }

    #[test]
    fn test_attribute_entities_and_bare_attributes() {
        let doc = parse_html(r#"<table title="a &amp; b" hidden><tr><td>x</td></tr></table>"#)
            .unwrap();
        let table = doc.first_table().unwrap();
        assert_eq!(doc.attr(table, "title"), Some("a & b"));
        assert_eq!(doc.attr(table, "hidden"), Some(""));
    }

    #[test]
    fn test_comments_are_dropped() {
        let doc = parse_html("<!-- note --><table><tr><td>a</td></tr></table>").unwrap();
        assert_eq!(tags_under(&doc, doc.root()), vec!["table"]);
    }
}
