//! Inline style access over the `style` attribute.
//!
//! Declarations keep their source order; setting an existing property
//! replaces it in place and removing the last declaration drops the
//! attribute entirely.

use super::{Document, NodeId};

/// Parse a `style` attribute into `(property, value)` pairs.
///
/// Property names are lowercased; empty or malformed declarations are dropped.
pub fn parse_declarations(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|decl| {
            let (prop, value) = decl.split_once(':')?;
            let prop = prop.trim().to_ascii_lowercase();
            let value = value.trim();
            if prop.is_empty() || value.is_empty() {
                None
            } else {
                Some((prop, value.to_string()))
            }
        })
        .collect()
}

/// Format declarations as `prop: value;` pairs separated by spaces.
pub fn format_declarations(decls: &[(String, String)]) -> String {
    decls
        .iter()
        .map(|(p, v)| format!("{p}: {v};"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Read an inline style property.
pub fn css_get(doc: &Document, id: NodeId, prop: &str) -> Option<String> {
    let style = doc.attr(id, "style")?;
    parse_declarations(style)
        .into_iter()
        .find(|(p, _)| p.eq_ignore_ascii_case(prop))
        .map(|(_, v)| v)
}

/// Set an inline style property. An empty value removes it.
pub fn css_set(doc: &mut Document, id: NodeId, prop: &str, value: &str) {
    if value.trim().is_empty() {
        css_remove(doc, id, prop);
        return;
    }
    let mut decls = doc.attr(id, "style").map(parse_declarations).unwrap_or_default();
    match decls.iter_mut().find(|(p, _)| p.eq_ignore_ascii_case(prop)) {
        Some((_, v)) => *v = value.trim().to_string(),
        None => decls.push((prop.to_ascii_lowercase(), value.trim().to_string())),
    }
    doc.set_attr(id, "style", &format_declarations(&decls));
}

/// Remove an inline style property; returns true if it was present.
pub fn css_remove(doc: &mut Document, id: NodeId, prop: &str) -> bool {
    let Some(style) = doc.attr(id, "style") else {
        return false;
    };
    let mut decls = parse_declarations(style);
    let before = decls.len();
    decls.retain(|(p, _)| !p.eq_ignore_ascii_case(prop));
    if decls.len() == before {
        return false;
    }
    if decls.is_empty() {
        doc.remove_attr(id, "style");
    } else {
        doc.set_attr(id, "style", &format_declarations(&decls));
    }
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    fn doc_with_style(style: &str) -> (Document, NodeId) {
        let mut doc = Document::new();
        let root = doc.root();
        let td = doc.create_element("td", vec![("style".into(), style.into())]);
        doc.append_child(root, td);
        (doc, td)
    }

    #[test]
    fn test_parse_declarations() {
        let decls = parse_declarations("WIDTH: 50px;height:20px ; ;color:");
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0], ("width".to_string(), "50px".to_string()));
        assert_eq!(decls[1], ("height".to_string(), "20px".to_string()));
    }

    #[test]
    fn test_set_keeps_order() {
        let (mut doc, td) = doc_with_style("width: 50px; height: 20px;");
        css_set(&mut doc, td, "width", "75%");
        assert_eq!(doc.attr(td, "style"), Some("width: 75%; height: 20px;"));
        css_set(&mut doc, td, "color", "red");
        assert_eq!(
            doc.attr(td, "style"),
            Some("width: 75%; height: 20px; color: red;")
        );
    }

    #[test]
    fn test_remove_last_drops_attribute() {
        let (mut doc, td) = doc_with_style("width: 50px");
        assert_eq!(css_get(&doc, td, "width"), Some("50px".to_string()));
        assert!(css_remove(&mut doc, td, "width"));
        assert!(!doc.has_attr(td, "style"));
        assert!(!css_remove(&mut doc, td, "width"));
    }

    #[test]
    fn test_empty_value_removes() {
        let (mut doc, td) = doc_with_style("width: 50px; height: 10px");
        css_set(&mut doc, td, "width", "");
        assert_eq!(css_get(&doc, td, "width"), None);
        assert_eq!(css_get(&doc, td, "height"), Some("10px".to_string()));
    }
}
