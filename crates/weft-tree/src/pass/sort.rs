//! Canonical attribute order.

use crate::error::Result;
use crate::node::{NodeId, NodeKind};
use crate::traverse::{Visit, Visitor};
use crate::tree::SEPARATOR;
use crate::Tree;

/// Ranks attribute names for [`AttributeSort`].
///
/// Lower ranks sort first. Attributes with equal rank are ordered by name,
/// and the sort is stable, so repeated names keep their written order.
pub trait SortPolicy: Send {
    fn rank(&self, name: &str) -> usize;
}

/// Puts a fixed list of names first, then everything else alphabetically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriorityOrder {
    leading: Vec<String>,
}

impl PriorityOrder {
    pub fn new<I, S>(leading: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            leading: leading.into_iter().map(Into::into).collect(),
        }
    }
}

impl Default for PriorityOrder {
    fn default() -> Self {
        Self::new(["id", "class", "style"])
    }
}

impl SortPolicy for PriorityOrder {
    fn rank(&self, name: &str) -> usize {
        self.leading
            .iter()
            .position(|lead| lead.eq_ignore_ascii_case(name))
            .unwrap_or(self.leading.len())
    }
}

/// Reorders each element's attribute run.
///
/// Whitespace separators are dropped and re-synthesized: the rebuilt run is
/// `" " attr " " attr ...`, so there is exactly one space between attributes
/// and nothing after the last one. Children that are neither attributes nor
/// whitespace (inline expressions) follow the attributes in written order.
pub struct AttributeSort {
    policy: Box<dyn SortPolicy>,
}

impl AttributeSort {
    pub fn new(policy: impl SortPolicy + 'static) -> Self {
        Self {
            policy: Box::new(policy),
        }
    }

    /// Computes the canonical layout of `element`'s run as (separator?, node) slots.
    fn layout(&self, tree: &Tree, element: NodeId) -> (Vec<NodeId>, Vec<NodeId>) {
        let mut attributes: Vec<(usize, String, NodeId)> = Vec::new();
        let mut others = Vec::new();

        for &child in tree.attribute_children(element) {
            match tree.kind(child) {
                NodeKind::Attribute { name, .. } => {
                    let key = name.source().to_string();
                    attributes.push((self.policy.rank(&key), key, child));
                }
                NodeKind::Text { .. } if tree.is_whitespace_text(child) => {}
                _ => others.push(child),
            }
        }

        attributes.sort_by(|a, b| (a.0, &a.1).cmp(&(b.0, &b.1)));
        (attributes.into_iter().map(|(_, _, id)| id).collect(), others)
    }

    /// True when the run already has the canonical shape for `sorted`.
    fn is_canonical(tree: &Tree, element: NodeId, sorted: &[NodeId], others: &[NodeId]) -> bool {
        let run = tree.attribute_children(element);
        if run.len() != sorted.len() * 2 + others.len() {
            return false;
        }
        let attributes_match = sorted.iter().enumerate().all(|(i, &attr)| {
            tree.text_content(run[i * 2]) == Some(SEPARATOR) && run[i * 2 + 1] == attr
        });
        attributes_match && run[sorted.len() * 2..] == *others
    }
}

impl Default for AttributeSort {
    fn default() -> Self {
        Self::new(PriorityOrder::default())
    }
}

impl Visitor for AttributeSort {
    fn name(&self) -> &'static str {
        "attribute-sort"
    }

    fn visit(&mut self, tree: &mut Tree, id: NodeId) -> Result<Visit> {
        if tree.element_name(id).is_none() {
            return Ok(Visit::Continue);
        }

        let (sorted, others) = self.layout(tree, id);
        if sorted.is_empty() || Self::is_canonical(tree, id, &sorted, &others) {
            return Ok(Visit::Continue);
        }

        let mut run = Vec::with_capacity(sorted.len() * 2 + others.len());
        for attribute in sorted {
            run.push(tree.text(SEPARATOR));
            run.push(attribute);
        }
        run.extend(others);
        tree.replace_attribute_children(id, run)?;

        Ok(Visit::Continue)
    }
}
