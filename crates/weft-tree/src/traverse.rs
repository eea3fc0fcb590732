//! Pre-order traversal driver and the pass pipeline.
//!
//! A [`Visitor`] is one rewrite pass. [`traverse`] runs a single visitor over
//! the whole tree; [`Pipeline`] runs an ordered list of visitors, each one a
//! complete traversal of its own. Passes never interleave node by node.
//!
//! # Traversal Rules
//!
//! - Pre-order: a node is visited before its children.
//! - Children are read *after* the visit, so a visit that rewrites its own
//!   attribute run is traversed in its rewritten form.
//! - [`Visit::SkipChildren`] prunes the node's subtree for the current pass only.
//! - Expression nodes are visited but never descended into, whatever the
//!   visitor returns.

use crate::error::Result;
use crate::node::NodeId;
use crate::Tree;

/// Traversal control returned by [`Visitor::visit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visit {
    /// Descend into the node's children.
    Continue,
    /// Do not descend into this node's children during the current pass.
    SkipChildren,
}

/// A single rewrite pass over a [`Tree`].
pub trait Visitor {
    /// Stable pass name, used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Visits one node, possibly mutating it or its descendants.
    fn visit(&mut self, tree: &mut Tree, id: NodeId) -> Result<Visit>;
}

/// Runs `visitor` over every reachable node of `tree` once, in pre-order.
pub fn traverse(tree: &mut Tree, visitor: &mut dyn Visitor) -> Result<()> {
    let mut stack = vec![tree.root()];
    let mut visited = 0usize;

    while let Some(id) = stack.pop() {
        let control = visitor.visit(tree, id)?;
        visited += 1;

        if control == Visit::SkipChildren || tree.kind(id).is_expression() {
            continue;
        }

        let children = tree.children(id);
        stack.extend(children.into_iter().rev());
    }

    log::trace!("pass '{}' visited {} nodes", visitor.name(), visited);
    Ok(())
}

/// An ordered list of passes, run one complete traversal at a time.
#[derive(Default)]
pub struct Pipeline {
    passes: Vec<Box<dyn Visitor + Send>>,
}

impl Pipeline {
    /// Creates an empty pipeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a pass (builder style).
    pub fn with_pass(mut self, pass: impl Visitor + Send + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Appends a pass.
    pub fn push(&mut self, pass: Box<dyn Visitor + Send>) {
        self.passes.push(pass);
    }

    /// Names of the registered passes, in run order.
    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|pass| pass.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Runs every pass over `tree` in order, stopping at the first error.
    pub fn run(&mut self, tree: &mut Tree) -> Result<()> {
        for pass in &mut self.passes {
            log::debug!("running pass '{}'", pass.name());
            traverse(tree, pass.as_mut())?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("passes", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PassError;
    use crate::NodeKind;

    /// Records the order in which element names are visited.
    struct Recorder {
        seen: Vec<String>,
        skip: Option<&'static str>,
    }

    impl Visitor for Recorder {
        fn name(&self) -> &'static str {
            "recorder"
        }

        fn visit(&mut self, tree: &mut Tree, id: NodeId) -> Result<Visit> {
            match tree.kind(id) {
                NodeKind::Element { name, .. } => {
                    self.seen.push(name.clone());
                    if Some(name.as_str()) == self.skip {
                        return Ok(Visit::SkipChildren);
                    }
                }
                NodeKind::Text { content } => self.seen.push(format!("'{}'", content)),
                NodeKind::Expression { source, .. } => self.seen.push(format!("{{{}}}", source)),
                _ => {}
            }
            Ok(Visit::Continue)
        }
    }

    fn sample() -> Tree {
        // <section><h1>title</h1>{expr}<p>body</p></section>
        let mut tree = Tree::new();
        let root = tree.root();
        let section = tree.element("section");
        let h1 = tree.element("h1");
        let title = tree.text("title");
        let expr = tree.expression("expr");
        let hidden = tree.element("hidden");
        let p = tree.element("p");
        let body = tree.text("body");
        tree.append_child(root, section).unwrap();
        tree.append_child(section, h1).unwrap();
        tree.append_child(h1, title).unwrap();
        tree.append_child(section, expr).unwrap();
        tree.append_child(expr, hidden).unwrap();
        tree.append_child(section, p).unwrap();
        tree.append_child(p, body).unwrap();
        tree
    }

    #[test]
    fn test_traversal_is_preorder() {
        let mut tree = sample();
        let mut recorder = Recorder {
            seen: Vec::new(),
            skip: None,
        };
        traverse(&mut tree, &mut recorder).unwrap();
        assert_eq!(
            recorder.seen,
            vec!["section", "h1", "'title'", "{expr}", "p", "'body'"]
        );
    }

    #[test]
    fn test_expression_children_are_never_visited() {
        let mut tree = sample();
        let mut recorder = Recorder {
            seen: Vec::new(),
            skip: None,
        };
        traverse(&mut tree, &mut recorder).unwrap();
        assert!(!recorder.seen.contains(&"hidden".to_string()));
    }

    #[test]
    fn test_skip_children_prunes_subtree() {
        let mut tree = sample();
        let mut recorder = Recorder {
            seen: Vec::new(),
            skip: Some("h1"),
        };
        traverse(&mut tree, &mut recorder).unwrap();
        assert!(recorder.seen.contains(&"h1".to_string()));
        assert!(!recorder.seen.contains(&"'title'".to_string()));
        assert!(recorder.seen.contains(&"'body'".to_string()));
    }

    struct Failing;

    impl Visitor for Failing {
        fn name(&self) -> &'static str {
            "failing"
        }

        fn visit(&mut self, _tree: &mut Tree, _id: NodeId) -> Result<Visit> {
            Err(PassError::InvalidArgument {
                pass: "failing",
                message: "always fails".to_string(),
            })
        }
    }

    #[test]
    fn test_pipeline_stops_on_error() {
        let mut tree = sample();
        let mut pipeline = Pipeline::new().with_pass(Failing);
        let err = pipeline.run(&mut tree).unwrap_err();
        assert!(err.to_string().contains("failing"));
    }

    #[test]
    fn test_pipeline_names_in_order() {
        let pipeline = Pipeline::new()
            .with_pass(Recorder {
                seen: Vec::new(),
                skip: None,
            })
            .with_pass(Failing);
        assert_eq!(pipeline.names(), vec!["recorder", "failing"]);
        assert_eq!(pipeline.len(), 2);
    }
}
