//! The Clear pass: remove every annotation and restore plain text.
//!
//! Clear is always tree-wide, regardless of which term owns an
//! annotation: matches for different terms interleave and nest, and a
//! partial clear cannot safely tell old boundaries from new ones. It runs
//! before every scan and is idempotent.

use hl_tree::{NodeId, Tree};
use log::trace;

/// Replaces every annotation in the tree with a plain text leaf holding
/// its content, merging with adjacent text siblings.
///
/// Returns the number of annotations removed. Annotations that an outer
/// replacement already detached (one term annotated inside another's
/// wrapper) are skipped via the attachment re-check.
pub(crate) fn clear_annotations(tree: &mut Tree) -> usize {
    let annotations: Vec<NodeId> = tree
        .preorder(tree.root())
        .filter(|&id| tree.annotation(id).is_some())
        .collect();

    let mut removed = 0;
    for target in annotations {
        if !tree.is_attached(target) {
            trace!("skipping detached annotation {target} during clear");
            continue;
        }
        let parent = tree.parent(target);
        let content = tree.text_content(target);
        let replacement = tree.new_text(content);
        if tree.replace_with(target, &[replacement]).is_ok() {
            removed += 1;
            if let Some(parent) = parent {
                tree.normalize(parent);
            }
        } else {
            tree.remove(replacement);
        }
    }
    removed
}

#[cfg(test)]
mod tests {
    use hl_term::{AnnotationStyle, Color, TermId};
    use hl_tree::{AnnotationData, ContentPolicy};

    use super::*;
    use crate::{matcher::Matcher, scan::scan_term};

    fn style() -> AnnotationStyle {
        AnnotationStyle::for_color(Color::new(0x4f, 0xc3, 0xf7), 0.4)
    }

    fn scan(tree: &mut Tree, id: u32, text: &str) -> usize {
        let matcher = Matcher::new(text, true).unwrap();
        scan_term(tree, TermId::new(id), &matcher, style())
    }

    #[test]
    fn test_clear_restores_single_leaf() {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, "one two three").unwrap();

        assert_eq!(scan(&mut tree, 0, "two"), 1);
        assert_eq!(tree.children(p).len(), 3);

        assert_eq!(clear_annotations(&mut tree), 1);
        assert_eq!(tree.children(p).len(), 1);
        assert_eq!(tree.text_of(tree.children(p)[0]), Some("one two three"));
    }

    #[test]
    fn test_clear_removes_all_terms_annotations() {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, "red car, blue car").unwrap();

        assert_eq!(scan(&mut tree, 0, "red"), 1);
        assert_eq!(scan(&mut tree, 1, "blue"), 1);

        assert_eq!(clear_annotations(&mut tree), 2);
        assert_eq!(tree.children(p).len(), 1);
        assert_eq!(tree.text_content(p), "red car, blue car");
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, "a b a").unwrap();

        assert_eq!(scan(&mut tree, 0, "a"), 2);
        assert_eq!(clear_annotations(&mut tree), 2);
        let shape = tree.children(p).to_vec();

        // A second clear finds nothing and changes nothing.
        assert_eq!(clear_annotations(&mut tree), 0);
        assert_eq!(tree.children(p), shape.as_slice());
    }

    #[test]
    fn test_clear_handles_nested_annotations() {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, "red car").unwrap();

        // The second term annotates inside the first term's wrapper.
        assert_eq!(scan(&mut tree, 0, "red car"), 1);
        assert_eq!(scan(&mut tree, 1, "car"), 1);

        clear_annotations(&mut tree);
        assert_eq!(tree.children(p).len(), 1);
        assert_eq!(tree.text_content(p), "red car");
    }

    #[test]
    fn test_clear_skips_detached_annotations() {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, "find me").unwrap();

        assert_eq!(scan(&mut tree, 0, "find"), 1);
        // A collaborator pulls the paragraph out from under the engine.
        tree.detach(p).unwrap();

        assert_eq!(clear_annotations(&mut tree), 0);
        // The detached subtree keeps its annotation untouched.
        assert_eq!(tree.text_content(p), "find me");
    }

    #[test]
    fn test_clear_merges_across_preexisting_boundaries() {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, "aba").unwrap();

        assert_eq!(scan(&mut tree, 0, "b"), 1);
        clear_annotations(&mut tree);

        // "a" + "b" + "a" merged back into one leaf.
        assert_eq!(tree.children(p).len(), 1);
        assert_eq!(tree.text_of(tree.children(p)[0]), Some("aba"));
    }

    #[test]
    fn test_clear_on_plain_tree_is_noop() {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, "plain").unwrap();
        let before = tree.node_count();

        assert_eq!(clear_annotations(&mut tree), 0);
        assert_eq!(tree.node_count(), before);
    }

    #[test]
    fn test_manually_built_annotation_is_cleared() {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        let wrapper = tree.new_annotation(AnnotationData::new(TermId::new(9), style()), "x");
        tree.append_child(p, wrapper).unwrap();

        assert_eq!(clear_annotations(&mut tree), 1);
        assert_eq!(tree.text_content(p), "x");
    }
}
