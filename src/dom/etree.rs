// ABOUTME: Bridges dom_query's sibling-text-node tree onto an lxml-style .text/.tail model.
// ABOUTME: Every algorithm in dom/ is specified in terms of per-element text/tail, not text nodes.

use dom_query::{NodeRef, Selection};

/// Text directly inside `node`, before its first element child (lxml's `Element.text`).
/// If `node` has no element children at all, this is every text node under it concatenated.
pub fn text(node: &NodeRef) -> String {
    let mut buf = String::new();
    for child in node.children_it(false) {
        if child.is_element() {
            break;
        }
        if child.is_text() {
            buf.push_str(&child.text());
        }
    }
    buf
}

/// Text following `node`'s closing tag but preceding its next sibling element
/// (lxml's `Element.tail`).
pub fn tail(node: &NodeRef) -> String {
    let mut buf = String::new();
    let mut sib = node.next_sibling();
    while let Some(s) = sib {
        if s.is_element() {
            break;
        }
        if s.is_text() {
            buf.push_str(&s.text());
        }
        sib = s.next_sibling();
    }
    buf
}

/// Clear a node's tail text (the text nodes between it and its next sibling element).
pub fn set_tail_empty(node: &NodeRef) {
    let mut sib = node.next_sibling();
    while let Some(s) = sib {
        if s.is_element() {
            break;
        }
        let next = s.next_sibling();
        if s.is_text() {
            Selection::from(s).remove();
        }
        sib = next;
    }
}

/// Lowercase tag name, or empty string for non-elements.
pub fn tag(node: &NodeRef) -> String {
    node.node_name().map(|n| n.to_lowercase()).unwrap_or_default()
}

/// Get an attribute's value as an owned String.
pub fn attr(node: &NodeRef, name: &str) -> Option<String> {
    Selection::from(node.clone()).attr(name).map(|v| v.to_string())
}

/// Depth-first preorder walk over `node` and all descendants (elements only).
pub fn iter_elements(node: &NodeRef, visit: &mut impl FnMut(&NodeRef)) {
    visit(node);
    for child in node.children_it(false) {
        if child.is_element() {
            iter_elements(&child, visit);
        }
    }
}

/// Collect `node` and all descendant elements in document order.
pub fn descendants_and_self(node: &NodeRef) -> Vec<NodeRef> {
    let mut out = Vec::new();
    iter_elements(node, &mut |n| out.push(n.clone()));
    out
}

/// Remove `node` from its parent, if it has one. No-op (never panics) if already detached.
pub fn remove(node: &NodeRef) {
    if node.parent().is_some() {
        Selection::from(node.clone()).remove();
    }
}

/// Set an attribute's value.
pub fn set_attr(node: &NodeRef, name: &str, value: &str) {
    Selection::from(node.clone()).set_attr(name, value);
}

/// Remove an attribute, if present.
pub fn remove_attr(node: &NodeRef, name: &str) {
    Selection::from(node.clone()).remove_attr(name);
}

/// Clear `node`'s inner HTML, making it a childless empty element.
pub fn clear_contents(node: &NodeRef) {
    Selection::from(node.clone()).set_html("");
}

/// List of attribute names currently set on `node`.
pub fn attr_names(node: &NodeRef) -> Vec<String> {
    node.attrs()
        .iter()
        .map(|a| a.name.local.to_string())
        .collect()
}

/// Next sibling that is an element, skipping text nodes (lxml's `getnext()`).
pub fn next_element_sibling(node: &NodeRef) -> Option<NodeRef> {
    let mut sib = node.next_sibling();
    while let Some(s) = sib {
        if s.is_element() {
            return Some(s);
        }
        sib = s.next_sibling();
    }
    None
}

/// Previous sibling that is an element, skipping text nodes (lxml's `getprevious()`).
pub fn prev_element_sibling(node: &NodeRef) -> Option<NodeRef> {
    let mut sib = node.prev_sibling();
    while let Some(s) = sib {
        if s.is_element() {
            return Some(s);
        }
        sib = s.prev_sibling();
    }
    None
}
