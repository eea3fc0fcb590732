//! Canonical rewrite passes.
//!
//! Each pass is a [`Visitor`](crate::Visitor). [`canonical`] assembles them in
//! their required order from a [`PipelineConfig`]:
//!
//! | Order | Pass | Effect |
//! |-------|------|--------|
//! | 1 | [`HeadingClass`] | Merges structural class markers into headings |
//! | 2 | [`ImageAlt`] | Adds `alt=""` to images without one |
//! | 3 | [`ButtonType`] | Adds `type="button"` to buttons without a type |
//! | 4 | [`AttributeSort`] | Canonical attribute order, single-space separators |
//! | 5 | [`InteriorWhitespace`] | Normalizes separators inside attribute runs |
//! | 6 | [`VerticalWhitespace`] | Collapses runs of line breaks in text |
//! | 7 | [`Compress`] | Optional, collapses all whitespace runs in text |

mod button;
mod heading;
mod image;
mod sort;
mod whitespace;

pub use button::ButtonType;
pub use heading::{HeadingClass, HEADING_TAGS};
pub use image::ImageAlt;
pub use sort::{AttributeSort, PriorityOrder, SortPolicy};
pub use whitespace::{Compress, InteriorWhitespace, VerticalWhitespace};

use crate::error::{PassError, Result};
use crate::node::{AttrValue, NodeId};
use crate::traverse::Pipeline;
use crate::Tree;

/// Settings for the canonical pass list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    /// Class merged into `h1`..`h6`.
    pub heading_class: String,
    /// Tag that marks a secondary heading when nested directly in a heading.
    pub subheading_tag: String,
    /// Class merged into secondary-heading markers.
    pub subheading_class: String,
    /// Collapse vertical whitespace in every text node, not only whitespace-only ones.
    pub normalize_whitespace: bool,
    /// Append the lossy [`Compress`] pass.
    pub compress: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            heading_class: "heading".to_string(),
            subheading_tag: "small".to_string(),
            subheading_class: "subheading".to_string(),
            normalize_whitespace: false,
            compress: false,
        }
    }
}

/// Builds the canonical pipeline in its required order.
///
/// # Errors
///
/// Returns [`PassError::InvalidArgument`] when a configured class marker or
/// tag name is empty or contains whitespace.
pub fn canonical(config: &PipelineConfig) -> Result<Pipeline> {
    let mut pipeline = Pipeline::new()
        .with_pass(HeadingClass::new(
            &config.heading_class,
            &config.subheading_tag,
            &config.subheading_class,
        )?)
        .with_pass(ImageAlt)
        .with_pass(ButtonType)
        .with_pass(AttributeSort::default())
        .with_pass(InteriorWhitespace)
        .with_pass(VerticalWhitespace::new(config.normalize_whitespace));

    if config.compress {
        pipeline = pipeline.with_pass(Compress);
    }

    Ok(pipeline)
}

/// Rejects empty tokens and tokens containing whitespace.
pub(crate) fn validate_token(pass: &'static str, field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(PassError::InvalidArgument {
            pass,
            message: format!("{} is empty", field),
        });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(PassError::InvalidArgument {
            pass,
            message: format!("{} '{}' contains whitespace", field, value),
        });
    }
    Ok(())
}

/// Merges `marker` into the `class` attribute of `element`.
///
/// Existing tokens keep their order and duplicates are dropped; the marker is
/// appended when absent. Expression-valued classes are left untouched.
pub(crate) fn merge_class(tree: &mut Tree, element: NodeId, marker: &str) -> Result<()> {
    let Some(attribute) = tree.find_attribute(element, "class") else {
        tree.set_attribute(element, "class", marker)?;
        return Ok(());
    };

    let existing = match tree.attribute_value(attribute) {
        Some(AttrValue::Text(text)) => text.clone(),
        Some(AttrValue::Expression(_)) => {
            log::debug!("class of element {} is an expression, not merging", element);
            return Ok(());
        }
        None => String::new(),
    };

    let mut tokens: Vec<&str> = Vec::new();
    for token in existing.split_whitespace().chain(std::iter::once(marker)) {
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }

    let merged = tokens.join(" ");
    if merged != existing {
        tree.set_attribute(element, "class", &merged)?;
    }
    Ok(())
}
