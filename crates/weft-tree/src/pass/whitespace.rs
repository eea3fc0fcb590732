//! Whitespace passes: attribute separators, vertical runs, full compression.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::error::Result;
use crate::node::{NodeId, NodeKind};
use crate::traverse::{Visit, Visitor};
use crate::Tree;

static VERTICAL_RUN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\n\r\x0B\x0C\x{85}\x{2028}\x{2029}]+").expect("vertical whitespace pattern")
});

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern"));

fn is_inline_whitespace(c: char) -> bool {
    c.is_whitespace() && c != '\n' && c != '\r'
}

/// Normalizes whitespace separators inside an element's attribute run.
///
/// For each whitespace-only text child:
///
/// - containing a line break: one space, or nothing when it is the last child
/// - containing inline whitespace only: one space, or nothing when the
///   preceding sibling is a text node that is already a single space
#[derive(Debug, Clone, Copy, Default)]
pub struct InteriorWhitespace;

impl Visitor for InteriorWhitespace {
    fn name(&self) -> &'static str {
        "interior-whitespace"
    }

    fn visit(&mut self, tree: &mut Tree, id: NodeId) -> Result<Visit> {
        let run = tree.attribute_children(id).to_vec();
        let Some(last) = run.len().checked_sub(1) else {
            return Ok(Visit::Continue);
        };

        for (index, &child) in run.iter().enumerate() {
            if !tree.is_whitespace_text(child) {
                continue;
            }
            let Some(content) = tree.text_content(child) else {
                continue;
            };

            let replacement = if content.contains('\n') {
                if index == last {
                    ""
                } else {
                    " "
                }
            } else if content.chars().any(is_inline_whitespace) {
                let previous = index
                    .checked_sub(1)
                    .and_then(|prev| tree.text_content(run[prev]));
                match previous {
                    Some(" ") => "",
                    _ => " ",
                }
            } else {
                continue;
            };

            if content != replacement {
                tree.set_text(child, replacement)?;
            }
        }

        Ok(Visit::Continue)
    }
}

/// Collapses each run of line breaks to a single line break.
///
/// Applies to whitespace-only text nodes, or to every text node when
/// `normalize_all` is set. Horizontal whitespace is left alone, and a run
/// keeps its last line-break character (`"\r\n"` becomes `"\n"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct VerticalWhitespace {
    normalize_all: bool,
}

impl VerticalWhitespace {
    pub fn new(normalize_all: bool) -> Self {
        Self { normalize_all }
    }
}

impl Visitor for VerticalWhitespace {
    fn name(&self) -> &'static str {
        "vertical-whitespace"
    }

    fn visit(&mut self, tree: &mut Tree, id: NodeId) -> Result<Visit> {
        if !(self.normalize_all || tree.is_whitespace_text(id)) {
            return Ok(Visit::Continue);
        }
        let NodeKind::Text { content } = tree.kind(id) else {
            return Ok(Visit::Continue);
        };

        let collapsed = VERTICAL_RUN.replace_all(content, |caps: &Captures| {
            caps[0].chars().last().map(String::from).unwrap_or_default()
        });
        if collapsed != content.as_str() {
            let collapsed = collapsed.into_owned();
            tree.set_text(id, collapsed)?;
        }
        Ok(Visit::Continue)
    }
}

/// Collapses every whitespace run in every text node to a single space.
///
/// Lossy: run it after every structural pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Compress;

impl Visitor for Compress {
    fn name(&self) -> &'static str {
        "compress"
    }

    fn visit(&mut self, tree: &mut Tree, id: NodeId) -> Result<Visit> {
        let NodeKind::Text { content } = tree.kind(id) else {
            return Ok(Visit::Continue);
        };

        let collapsed = WHITESPACE_RUN.replace_all(content, " ");
        if collapsed != content.as_str() {
            let collapsed = collapsed.into_owned();
            tree.set_text(id, collapsed)?;
        }
        Ok(Visit::Continue)
    }
}
