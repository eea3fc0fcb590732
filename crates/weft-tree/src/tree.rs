//! The node arena.
//!
//! [`Tree`] owns every node of one parsed template. The parser builds it with
//! the constructor methods ([`Tree::element`], [`Tree::text`], ...) and the
//! append methods; rewrite passes then mutate it in place through the
//! accessors below.
//!
//! Node ids are `u32`, so one tree holds at most `u32::MAX + 1` nodes;
//! allocating past that panics.
//!
//! Rewrites never free slots. A separator dropped by the attribute sort stays
//! in the arena but no child list refers to it any more, so printing and code
//! generation never see it.

use crate::error::TreeError;
use crate::node::{AttrValue, Node, NodeId, NodeKind};

/// Separator inserted in front of attributes added by a pass.
pub const SEPARATOR: &str = " ";

/// Arena of nodes rooted at a [`NodeKind::Fragment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding only an empty root fragment.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            root: NodeId(0),
        };
        tree.root = tree.push(NodeKind::Fragment {
            children: Vec::new(),
        });
        tree
    }

    /// The root fragment.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of arena slots, detached nodes included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = next_id(self.nodes.len());
        self.nodes.push(Node { kind, parent: None });
        id
    }

    // =========================================================================
    // Constructors (detached until appended)
    // =========================================================================

    /// Creates a detached element with an empty attribute run.
    pub fn element(&mut self, name: impl Into<String>) -> NodeId {
        let attributes = self.push(NodeKind::Fragment {
            children: Vec::new(),
        });
        let element = self.push(NodeKind::Element {
            name: name.into(),
            attributes,
            children: Vec::new(),
        });
        self.nodes[attributes.index()].parent = Some(element);
        element
    }

    /// Creates a detached text node.
    pub fn text(&mut self, content: impl Into<String>) -> NodeId {
        self.push(NodeKind::Text {
            content: content.into(),
        })
    }

    /// Creates a detached attribute with a literal name and optional literal value.
    ///
    /// Valued attributes are double-quoted.
    pub fn attribute(&mut self, name: impl Into<String>, value: Option<&str>) -> NodeId {
        let quote = value.map(|_| '"');
        self.push(NodeKind::Attribute {
            name: AttrValue::Text(name.into()),
            value: value.map(AttrValue::from),
            quote,
        })
    }

    /// Creates a detached attribute from arbitrary name/value parts.
    pub fn attribute_node(
        &mut self,
        name: AttrValue,
        value: Option<AttrValue>,
        quote: Option<char>,
    ) -> NodeId {
        self.push(NodeKind::Attribute { name, value, quote })
    }

    /// Creates a detached expression node.
    pub fn expression(&mut self, source: impl Into<String>) -> NodeId {
        self.push(NodeKind::Expression {
            source: source.into(),
            children: Vec::new(),
        })
    }

    /// Creates a detached fragment.
    pub fn fragment(&mut self) -> NodeId {
        self.push(NodeKind::Fragment {
            children: Vec::new(),
        })
    }

    // =========================================================================
    // Structure
    // =========================================================================

    /// Appends `child` to the content of an element, fragment or expression.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        match &mut self.nodes[parent.index()].kind {
            NodeKind::Element { children, .. }
            | NodeKind::Fragment { children }
            | NodeKind::Expression { children, .. } => children.push(child),
            other => {
                return Err(TreeError::WrongKind {
                    id: parent,
                    expected: "container",
                    actual: other.label(),
                })
            }
        }
        self.nodes[child.index()].parent = Some(parent);
        Ok(())
    }

    /// Appends `child` (an attribute or separator text) to an element's attribute run.
    ///
    /// No separator is added; parsers append separators explicitly.
    pub fn append_attribute(&mut self, element: NodeId, child: NodeId) -> Result<(), TreeError> {
        let run = self.attribute_run(element)?;
        self.append_child(run, child)
    }

    /// Returns the attribute fragment of an element.
    pub fn attribute_run(&self, element: NodeId) -> Result<NodeId, TreeError> {
        match &self.nodes[element.index()].kind {
            NodeKind::Element { attributes, .. } => Ok(*attributes),
            other => Err(TreeError::WrongKind {
                id: element,
                expected: "element",
                actual: other.label(),
            }),
        }
    }

    /// Replaces an element's attribute run with `children`.
    pub fn replace_attribute_children(
        &mut self,
        element: NodeId,
        children: Vec<NodeId>,
    ) -> Result<(), TreeError> {
        let run = self.attribute_run(element)?;
        for child in &children {
            self.nodes[child.index()].parent = Some(run);
        }
        if let NodeKind::Fragment { children: slot } = &mut self.nodes[run.index()].kind {
            *slot = children;
        }
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.index()].kind
    }

    pub fn kind_mut(&mut self, id: NodeId) -> &mut NodeKind {
        &mut self.nodes[id.index()].kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.index()].parent
    }

    /// Children in traversal order.
    ///
    /// For elements this is the attribute fragment followed by the content
    /// children. Text and attribute nodes have none.
    pub fn children(&self, id: NodeId) -> Vec<NodeId> {
        match self.kind(id) {
            NodeKind::Element {
                attributes,
                children,
                ..
            } => {
                let mut out = Vec::with_capacity(children.len() + 1);
                out.push(*attributes);
                out.extend_from_slice(children);
                out
            }
            NodeKind::Fragment { children } | NodeKind::Expression { children, .. } => {
                children.clone()
            }
            NodeKind::Attribute { .. } | NodeKind::Text { .. } => Vec::new(),
        }
    }

    /// Content children of an element, fragment or expression.
    pub fn content(&self, id: NodeId) -> &[NodeId] {
        match self.kind(id) {
            NodeKind::Element { children, .. }
            | NodeKind::Fragment { children }
            | NodeKind::Expression { children, .. } => children.as_slice(),
            NodeKind::Attribute { .. } | NodeKind::Text { .. } => &[],
        }
    }

    /// Tag name when `id` is an element.
    pub fn element_name(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// True when `id` is an element whose tag name matches `name` (ASCII case-insensitive).
    pub fn is_element(&self, id: NodeId, name: &str) -> bool {
        self.element_name(id)
            .is_some_and(|tag| tag.eq_ignore_ascii_case(name))
    }

    /// The attribute run of an element; empty for anything else.
    pub fn attribute_children(&self, element: NodeId) -> &[NodeId] {
        match self.kind(element) {
            NodeKind::Element { attributes, .. } => self.content(*attributes),
            _ => &[],
        }
    }

    /// Finds the first attribute with a literal name equal to `name` (ASCII case-insensitive).
    pub fn find_attribute(&self, element: NodeId, name: &str) -> Option<NodeId> {
        self.attribute_children(element)
            .iter()
            .copied()
            .find(|&child| match self.kind(child) {
                NodeKind::Attribute {
                    name: AttrValue::Text(attr),
                    ..
                } => attr.eq_ignore_ascii_case(name),
                _ => false,
            })
    }

    /// Value of an attribute node, if it has one.
    pub fn attribute_value(&self, attribute: NodeId) -> Option<&AttrValue> {
        match self.kind(attribute) {
            NodeKind::Attribute { value, .. } => value.as_ref(),
            _ => None,
        }
    }

    /// Literal text value of the attribute `name` on `element`.
    ///
    /// Returns `None` when the attribute is missing, bare, or expression-valued.
    pub fn attribute_text(&self, element: NodeId, name: &str) -> Option<&str> {
        self.find_attribute(element, name)
            .and_then(|attr| self.attribute_value(attr))
            .and_then(AttrValue::as_text)
    }

    /// Sets a literal attribute value, appending the attribute when missing.
    ///
    /// A new attribute gets a single-space separator in front of it unless the
    /// run already ends in whitespace text.
    pub fn set_attribute(
        &mut self,
        element: NodeId,
        name: &str,
        value: &str,
    ) -> Result<NodeId, TreeError> {
        if let Some(existing) = self.find_attribute(element, name) {
            if let NodeKind::Attribute {
                value: slot, quote, ..
            } = self.kind_mut(existing)
            {
                *slot = Some(AttrValue::Text(value.to_string()));
                quote.get_or_insert('"');
            }
            return Ok(existing);
        }

        let ends_in_whitespace = self
            .attribute_children(element)
            .last()
            .is_some_and(|&last| self.is_whitespace_text(last));
        if !ends_in_whitespace {
            let separator = self.text(SEPARATOR);
            self.append_attribute(element, separator)?;
        }
        let attribute = self.attribute(name, Some(value));
        self.append_attribute(element, attribute)?;
        Ok(attribute)
    }

    /// Content of a text node.
    pub fn text_content(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            NodeKind::Text { content } => Some(content),
            _ => None,
        }
    }

    /// True for text nodes whose content is empty or only whitespace.
    pub fn is_whitespace_text(&self, id: NodeId) -> bool {
        self.text_content(id)
            .is_some_and(|content| content.trim().is_empty())
    }

    /// Replaces a text node's content in place. Identity and position are kept.
    pub fn set_text(&mut self, id: NodeId, content: impl Into<String>) -> Result<(), TreeError> {
        match self.kind_mut(id) {
            NodeKind::Text { content: slot } => {
                *slot = content.into();
                Ok(())
            }
            other => Err(TreeError::WrongKind {
                id,
                expected: "text",
                actual: other.label(),
            }),
        }
    }
}

fn next_id(len: usize) -> NodeId {
    NodeId(u32::try_from(len).expect("node arena overflow"))
}
