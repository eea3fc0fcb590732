//! Node kinds stored in the [`Tree`](crate::Tree) arena.
//!
//! Nodes never own each other directly. Every parent/child relation is a
//! [`NodeId`] handle into the arena, so a pass can read an element's
//! attribute run while it rewrites one of the attributes.

use std::fmt;

/// Handle to a node inside a [`Tree`](crate::Tree).
///
/// Handles are only minted by the tree that owns the node and stay valid
/// for the lifetime of that tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Name or value of an attribute: either literal text or a host-language
/// expression that must be left alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Literal markup text.
    Text(String),
    /// Opaque host-language expression source.
    Expression(String),
}

impl AttrValue {
    /// Returns the literal text, or `None` for expressions.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(text) => Some(text),
            AttrValue::Expression(_) => None,
        }
    }

    /// Returns the raw source regardless of variant.
    ///
    /// Used where a stable key is needed, e.g. when sorting attributes.
    pub fn source(&self) -> &str {
        match self {
            AttrValue::Text(text) | AttrValue::Expression(text) => text,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        AttrValue::Text(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        AttrValue::Text(text)
    }
}

/// The closed set of node kinds a parser hands to the rewrite pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// A markup element.
    Element {
        /// Tag name as written.
        name: String,
        /// Fragment holding the attribute run (attributes and separators).
        attributes: NodeId,
        /// Content children.
        children: Vec<NodeId>,
    },

    /// A single attribute inside an element's attribute run.
    Attribute {
        name: AttrValue,
        /// `None` for a bare attribute such as `disabled`.
        value: Option<AttrValue>,
        /// Quote character used around the value.
        quote: Option<char>,
    },

    /// Literal text.
    Text { content: String },

    /// Sibling sequence without a semantic wrapper.
    Fragment { children: Vec<NodeId> },

    /// Host-language expression. Passes never descend into it.
    Expression {
        source: String,
        children: Vec<NodeId>,
    },
}

impl NodeKind {
    /// Short lowercase label used in error messages.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Element { .. } => "element",
            NodeKind::Attribute { .. } => "attribute",
            NodeKind::Text { .. } => "text",
            NodeKind::Fragment { .. } => "fragment",
            NodeKind::Expression { .. } => "expression",
        }
    }

    pub fn is_expression(&self) -> bool {
        matches!(self, NodeKind::Expression { .. })
    }
}

/// One arena slot: the node kind plus a non-owning parent handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
}
