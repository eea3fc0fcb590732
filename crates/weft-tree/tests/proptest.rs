//! Property-based tests for the rewrite passes.

use proptest::prelude::*;
use weft_tree::pass::{AttributeSort, InteriorWhitespace};
use weft_tree::print::to_markup;
use weft_tree::{traverse, Tree};

fn separator_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec![" ", "  ", "\n", "\n    ", "\t", " \n "]).prop_map(String::from)
}

fn attribute_strategy() -> impl Strategy<Value = (String, String, Option<String>)> {
    (
        separator_strategy(),
        "[a-z]{1,6}",
        prop::option::of("[a-z0-9 ]{0,6}"),
    )
}

fn build(attributes: &[(String, String, Option<String>)]) -> Tree {
    let mut tree = Tree::new();
    let root = tree.root();
    let element = tree.element("div");
    for (separator, name, value) in attributes {
        let sep = tree.text(separator.as_str());
        let attr = tree.attribute(name.as_str(), value.as_deref());
        tree.append_attribute(element, sep).unwrap();
        tree.append_attribute(element, attr).unwrap();
    }
    tree.append_child(root, element).unwrap();
    tree
}

proptest! {
    /// Sorting twice gives the same order and spacing as sorting once.
    #[test]
    fn sort_is_idempotent(attributes in prop::collection::vec(attribute_strategy(), 0..8)) {
        let mut tree = build(&attributes);
        traverse(&mut tree, &mut AttributeSort::default()).unwrap();
        let once = to_markup(&tree);
        traverse(&mut tree, &mut AttributeSort::default()).unwrap();
        prop_assert_eq!(to_markup(&tree), once);
    }

    /// After sorting, attributes are separated by exactly one space and
    /// nothing trails the last one.
    #[test]
    fn sort_leaves_single_spaces(attributes in prop::collection::vec(attribute_strategy(), 1..8)) {
        let mut tree = build(&attributes);
        traverse(&mut tree, &mut AttributeSort::default()).unwrap();

        let element = tree.content(tree.root())[0];
        let run = tree.attribute_children(element).to_vec();
        prop_assert_eq!(run.len(), attributes.len() * 2);
        for (index, id) in run.iter().enumerate() {
            if index % 2 == 0 {
                prop_assert_eq!(tree.text_content(*id), Some(" "));
            } else {
                prop_assert!(tree.text_content(*id).is_none());
            }
        }
    }

    /// Interior whitespace never leaves a line break or a double space in the run.
    #[test]
    fn interior_whitespace_removes_breaks(
        attributes in prop::collection::vec(attribute_strategy(), 0..8),
    ) {
        let mut tree = build(&attributes);
        traverse(&mut tree, &mut InteriorWhitespace).unwrap();

        let element = tree.content(tree.root())[0];
        for id in tree.attribute_children(element) {
            if let Some(content) = tree.text_content(*id) {
                prop_assert!(content == " " || content.is_empty());
            }
        }
    }
}
