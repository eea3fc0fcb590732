//! Shared fixtures: a small markup parser and template directory helpers.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use weft::{BoxError, Parser, Tree};
use weft_tree::print::VOID_ELEMENTS;
use weft_tree::{AttrValue, NodeId};

/// Parses the markup subset used in tests: elements with quoted or bare
/// attributes, text, and `{...}` expressions.
pub struct MiniParser;

impl Parser for MiniParser {
    fn parse(&self, source: &str) -> Result<Tree, BoxError> {
        let mut tree = Tree::new();
        let mut stack = vec![tree.root()];
        let mut rest = source;

        while !rest.is_empty() {
            let current = *stack.last().ok_or("empty stack")?;

            if let Some(after) = rest.strip_prefix("</") {
                let end = after.find('>').ok_or("unclosed end tag")?;
                let name = after[..end].trim();
                if stack.len() < 2 || !tree.is_element(current, name) {
                    return Err(format!("unexpected </{}>", name).into());
                }
                stack.pop();
                rest = &after[end + 1..];
            } else if rest.starts_with('<') {
                let end = tag_end(rest).ok_or("unclosed tag")?;
                let body = &rest[1..end];
                let name_len = body.find(char::is_whitespace).unwrap_or(body.len());
                let name = &body[..name_len];
                let element = tree.element(name);
                parse_attributes(&mut tree, element, &body[name_len..])?;
                tree.append_child(current, element)?;
                if !VOID_ELEMENTS.iter().any(|v| v.eq_ignore_ascii_case(name)) {
                    stack.push(element);
                }
                rest = &rest[end + 1..];
            } else if let Some(after) = rest.strip_prefix('{') {
                let end = after.find('}').ok_or("unclosed expression")?;
                let expression = tree.expression(&after[..end]);
                tree.append_child(current, expression)?;
                rest = &after[end + 1..];
            } else {
                let end = rest.find(['<', '{']).unwrap_or(rest.len());
                let text = tree.text(&rest[..end]);
                tree.append_child(current, text)?;
                rest = &rest[end..];
            }
        }

        if stack.len() != 1 {
            return Err("unclosed element".into());
        }
        Ok(tree)
    }
}

fn tag_end(source: &str) -> Option<usize> {
    let mut quote = None;
    for (index, c) in source.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), c) if c == q => quote = None,
            (None, '>') => return Some(index),
            _ => {}
        }
    }
    None
}

fn parse_attributes(tree: &mut Tree, element: NodeId, mut rest: &str) -> Result<(), BoxError> {
    while !rest.is_empty() {
        let whitespace = rest.len() - rest.trim_start().len();
        if whitespace > 0 {
            let separator = tree.text(&rest[..whitespace]);
            tree.append_attribute(element, separator)?;
            rest = &rest[whitespace..];
            continue;
        }

        let name_end = rest
            .find(|c: char| c.is_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let name = &rest[..name_end];
        rest = &rest[name_end..];

        let Some(after) = rest.strip_prefix('=') else {
            let attribute = tree.attribute(name, None);
            tree.append_attribute(element, attribute)?;
            continue;
        };

        let quote = after.chars().next().ok_or("missing attribute value")?;
        if quote != '"' && quote != '\'' {
            return Err("unquoted attribute value".into());
        }
        let close = after[1..].find(quote).ok_or("unclosed attribute value")?;
        let raw = &after[1..1 + close];
        let value = match raw.strip_prefix('{').and_then(|v| v.strip_suffix('}')) {
            Some(expression) => AttrValue::Expression(expression.to_string()),
            None => AttrValue::from(raw),
        };
        let attribute = tree.attribute_node(AttrValue::from(name), Some(value), Some(quote));
        tree.append_attribute(element, attribute)?;
        rest = &after[close + 2..];
    }
    Ok(())
}

/// Writes `content` to `dir/name`, creating parent directories.
pub fn write_template(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}
