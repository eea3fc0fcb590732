//! Explicit `type` for buttons.

use crate::error::Result;
use crate::node::NodeId;
use crate::traverse::{Visit, Visitor};
use crate::Tree;

/// Adds `type="button"` to `button` elements without a `type`.
///
/// A button that already declares a type is left as written and its subtree is
/// skipped for the rest of this pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonType;

impl Visitor for ButtonType {
    fn name(&self) -> &'static str {
        "button-type"
    }

    fn visit(&mut self, tree: &mut Tree, id: NodeId) -> Result<Visit> {
        if !tree.is_element(id, "button") {
            return Ok(Visit::Continue);
        }

        if tree.find_attribute(id, "type").is_some() {
            return Ok(Visit::SkipChildren);
        }

        tree.set_attribute(id, "type", "button")?;
        Ok(Visit::Continue)
    }
}
