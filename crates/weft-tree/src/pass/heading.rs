//! Structural class markers for headings.

use super::{merge_class, validate_token};
use crate::error::Result;
use crate::node::NodeId;
use crate::traverse::{Visit, Visitor};
use crate::Tree;

/// Tag names treated as headings.
pub const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

const NAME: &str = "heading-class";

fn is_heading(name: &str) -> bool {
    HEADING_TAGS.iter().any(|tag| name.eq_ignore_ascii_case(tag))
}

/// Merges a class marker into every heading element, and a second marker into
/// secondary-heading tags nested directly inside a heading.
///
/// ```text
/// <h2 class="big"><small>sub</small></h2>
/// <h2 class="big heading"><small class="subheading">sub</small></h2>
/// ```
#[derive(Debug, Clone)]
pub struct HeadingClass {
    class: String,
    subheading_tag: String,
    subheading_class: String,
}

impl HeadingClass {
    /// # Errors
    ///
    /// Fails when any argument is empty or contains whitespace.
    pub fn new(class: &str, subheading_tag: &str, subheading_class: &str) -> Result<Self> {
        validate_token(NAME, "heading class", class)?;
        validate_token(NAME, "subheading tag", subheading_tag)?;
        validate_token(NAME, "subheading class", subheading_class)?;
        Ok(Self {
            class: class.to_string(),
            subheading_tag: subheading_tag.to_string(),
            subheading_class: subheading_class.to_string(),
        })
    }

    fn parent_is_heading(tree: &Tree, id: NodeId) -> bool {
        tree.parent(id)
            .and_then(|parent| tree.element_name(parent))
            .is_some_and(is_heading)
    }
}

impl Visitor for HeadingClass {
    fn name(&self) -> &'static str {
        NAME
    }

    fn visit(&mut self, tree: &mut Tree, id: NodeId) -> Result<Visit> {
        let Some(name) = tree.element_name(id) else {
            return Ok(Visit::Continue);
        };

        let heading = is_heading(name);
        let subheading = !heading
            && name.eq_ignore_ascii_case(&self.subheading_tag)
            && Self::parent_is_heading(tree, id);

        if heading {
            merge_class(tree, id, &self.class)?;
        } else if subheading {
            merge_class(tree, id, &self.subheading_class)?;
        }

        Ok(Visit::Continue)
    }
}
