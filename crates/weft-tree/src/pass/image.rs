//! Empty `alt` for images that have none.

use crate::error::Result;
use crate::node::NodeId;
use crate::traverse::{Visit, Visitor};
use crate::Tree;

/// Adds `alt=""` to `img` elements without an `alt` attribute.
///
/// An author-supplied `alt`, empty or not, is never touched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageAlt;

impl Visitor for ImageAlt {
    fn name(&self) -> &'static str {
        "image-alt"
    }

    fn visit(&mut self, tree: &mut Tree, id: NodeId) -> Result<Visit> {
        if tree.is_element(id, "img") && tree.find_attribute(id, "alt").is_none() {
            tree.set_attribute(id, "alt", "")?;
        }
        Ok(Visit::Continue)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::print::to_markup;
    use crate::traverse::traverse;

    #[test]
    fn test_missing_alt_is_added() {
        let mut tree = Tree::new();
        let root = tree.root();
        let img = tree.element("img");
        tree.append_child(root, img).unwrap();

        traverse(&mut tree, &mut ImageAlt).unwrap();
        assert_eq!(to_markup(&tree), r#"<img alt="">"#);
    }

    #[test]
    fn test_existing_alt_kept() {
        let mut tree = Tree::new();
        let root = tree.root();
        let img = tree.element("img");
        let sep = tree.text(" ");
        let alt = tree.attribute("alt", Some("x"));
        tree.append_attribute(img, sep).unwrap();
        tree.append_attribute(img, alt).unwrap();
        tree.append_child(root, img).unwrap();

        traverse(&mut tree, &mut ImageAlt).unwrap();
        assert_eq!(to_markup(&tree), r#"<img alt="x">"#);
    }

    #[test]
    fn test_bare_alt_kept() {
        let mut tree = Tree::new();
        let root = tree.root();
        let img = tree.element("img");
        let sep = tree.text(" ");
        let alt = tree.attribute("alt", None);
        tree.append_attribute(img, sep).unwrap();
        tree.append_attribute(img, alt).unwrap();
        tree.append_child(root, img).unwrap();

        traverse(&mut tree, &mut ImageAlt).unwrap();
        assert_eq!(to_markup(&tree), "<img alt>");
    }
}
