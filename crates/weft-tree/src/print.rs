//! Serializes a [`Tree`] back to markup.
//!
//! This is the simplest possible code generator: every node prints as it was
//! written, expressions print inside `{...}`. Void elements get no end tag.

use crate::node::{AttrValue, NodeId, NodeKind};
use crate::Tree;

/// Elements that never have an end tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| name.eq_ignore_ascii_case(void))
}

/// Renders the whole tree starting at its root.
pub fn to_markup(tree: &Tree) -> String {
    let mut out = String::new();
    write_node(tree, tree.root(), &mut out);
    out
}

/// Renders a single subtree.
pub fn node_to_markup(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    write_node(tree, id, &mut out);
    out
}

fn write_value(value: &AttrValue, out: &mut String) {
    match value {
        AttrValue::Text(text) => out.push_str(text),
        AttrValue::Expression(source) => {
            out.push('{');
            out.push_str(source);
            out.push('}');
        }
    }
}

fn write_node(tree: &Tree, id: NodeId, out: &mut String) {
    match tree.kind(id) {
        NodeKind::Element {
            name,
            attributes,
            children,
        } => {
            out.push('<');
            out.push_str(name);
            write_node(tree, *attributes, out);
            out.push('>');
            if is_void(name) && children.is_empty() {
                return;
            }
            for &child in children {
                write_node(tree, child, out);
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        NodeKind::Attribute { name, value, quote } => {
            write_value(name, out);
            if let Some(value) = value {
                out.push('=');
                if let Some(quote) = quote {
                    out.push(*quote);
                }
                write_value(value, out);
                if let Some(quote) = quote {
                    out.push(*quote);
                }
            }
        }
        NodeKind::Text { content } => out.push_str(content),
        NodeKind::Fragment { children } => {
            for &child in children {
                write_node(tree, child, out);
            }
        }
        NodeKind::Expression { source, children } => {
            out.push('{');
            out.push_str(source);
            out.push('}');
            for &child in children {
                write_node(tree, child, out);
            }
        }
    }
}
