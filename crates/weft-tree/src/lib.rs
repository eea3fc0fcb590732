//! Weft Tree - arena node tree and rewrite passes for markup templates.
//!
//! A parser hands over a [`Tree`]: an arena of [`NodeKind`] values linked by
//! [`NodeId`] handles. Rewrite passes are [`Visitor`]s; a [`Pipeline`] runs
//! them in order, each as one complete pre-order traversal.
//!
//! # Quick Start
//!
//! ```rust
//! use weft_tree::{pass, print, Tree};
//!
//! // <h2 class="big"><img></h2>
//! let mut tree = Tree::new();
//! let root = tree.root();
//! let h2 = tree.element("h2");
//! let sep = tree.text(" ");
//! let class = tree.attribute("class", Some("big"));
//! let img = tree.element("img");
//! tree.append_attribute(h2, sep).unwrap();
//! tree.append_attribute(h2, class).unwrap();
//! tree.append_child(h2, img).unwrap();
//! tree.append_child(root, h2).unwrap();
//!
//! let mut pipeline = pass::canonical(&pass::PipelineConfig::default()).unwrap();
//! pipeline.run(&mut tree).unwrap();
//!
//! assert_eq!(
//!     print::to_markup(&tree),
//!     r#"<h2 class="big heading"><img alt=""></h2>"#
//! );
//! ```
//!
//! # Node Kinds
//!
//! | Kind | Holds | Traversed into |
//! |------|-------|----------------|
//! | `Element` | name, attribute fragment, content | yes (attributes first) |
//! | `Attribute` | name, value, quote | no children |
//! | `Text` | content | no children |
//! | `Fragment` | sibling list | yes |
//! | `Expression` | host-language source | never |

mod error;
mod node;
pub mod pass;
pub mod print;
mod traverse;
mod tree;

pub use error::{PassError, Result, TreeError};
pub use node::{AttrValue, Node, NodeId, NodeKind};
pub use pass::PipelineConfig;
pub use traverse::{traverse, Pipeline, Visit, Visitor};
pub use tree::{Tree, SEPARATOR};
