//! Shared XML traversal helpers for the collectors
//!
//! Thin wrappers over roxmltree so the parsers read like the XML
//! paths they walk. All lookups are by local tag name; PAN-OS
//! responses carry no namespaces.

use roxmltree::{Document, Node};

use crate::error::ParseError;

/// Parse a response body, attributing failures to the given stage
pub(crate) fn parse_document<'a>(
    body: &'a str,
    stage: &'static str,
) -> Result<Document<'a>, ParseError> {
    Document::parse(body).map_err(|e| ParseError::new(stage, e.to_string()))
}

/// First descendant element with the given tag name
pub(crate) fn descendant<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.descendants()
        .find(|n| n.is_element() && n.has_tag_name(name))
}

/// All descendant elements with the given tag name, in document order
pub(crate) fn descendants<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Vec<Node<'a, 'i>> {
    node.descendants()
        .filter(|n| n.is_element() && n.has_tag_name(name))
        .collect()
}

/// First child element with the given tag name
pub(crate) fn child<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Option<Node<'a, 'i>> {
    node.children()
        .find(|n| n.is_element() && n.has_tag_name(name))
}

/// Child elements with the given tag name, in document order
pub(crate) fn children<'a, 'i>(node: Node<'a, 'i>, name: &str) -> Vec<Node<'a, 'i>> {
    node.children()
        .filter(|n| n.is_element() && n.has_tag_name(name))
        .collect()
}

/// All child elements, in document order
pub(crate) fn elements<'a, 'i>(node: Node<'a, 'i>) -> Vec<Node<'a, 'i>> {
    node.children().filter(|n| n.is_element()).collect()
}

/// Trimmed text content of the node itself
pub(crate) fn text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text().map(str::trim)
}

/// Trimmed text of the first child element with the given tag name
pub(crate) fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name).and_then(text)
}

/// `child_text` with a fallback for absent or empty elements
pub(crate) fn child_text_or<'a>(node: Node<'a, '_>, name: &str, default: &'a str) -> &'a str {
    match child_text(node, name) {
        Some(t) if !t.is_empty() => t,
        _ => default,
    }
}

/// A leaf value coerced to the most specific applicable type, in the
/// fixed precedence integer, float, boolean token, opaque string.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum LeafValue {
    Int(i64),
    Float(f64),
    Bool(bool),
    Text(String),
}

pub(crate) fn coerce(raw: &str) -> LeafValue {
    if let Ok(i) = raw.parse::<i64>() {
        return LeafValue::Int(i);
    }
    if let Ok(f) = raw.parse::<f64>() {
        return LeafValue::Float(f);
    }
    match raw {
        "True" => LeafValue::Bool(true),
        "False" => LeafValue::Bool(false),
        _ => LeafValue::Text(raw.to_string()),
    }
}
