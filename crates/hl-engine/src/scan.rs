//! The Scan pass: find and annotate every occurrence of one term.
//!
//! Scanning is two-phase, mirroring the shape of the rewrite problem: the
//! tree being mutated is the output of this very pass on earlier input.
//! Phase one walks the clean tree and collects the text leaves that
//! qualify and match; phase two replaces each collected leaf with an
//! alternating sequence of plain text and annotation wrappers. Attachment
//! is re-checked before every replacement so targets that vanished in the
//! meantime are skipped silently.

use hl_term::{AnnotationStyle, TermId};
use hl_tree::{AnnotationData, ContentPolicy, NodeId, NodeKind, Tree};
use log::trace;

use crate::matcher::Matcher;

/// Runs Scan for one active term, annotating every occurrence.
///
/// Returns the number of annotations inserted; their document order is
/// their insertion order.
pub(crate) fn scan_term(
    tree: &mut Tree,
    owner: TermId,
    matcher: &Matcher,
    style: AnnotationStyle,
) -> usize {
    let candidates: Vec<NodeId> = tree
        .preorder(tree.root())
        .filter(|&id| is_searchable(tree, id))
        .filter(|&id| tree.text_of(id).is_some_and(|content| matcher.is_match(content)))
        .collect();

    let mut total = 0;
    for target in candidates {
        // The tree may have been restructured since collection.
        if !tree.is_attached(target) {
            trace!("skipping detached {target} during scan for {owner}");
            continue;
        }
        let Some(content) = tree.text_of(target).map(str::to_owned) else {
            continue;
        };

        let mut replacements = Vec::new();
        let mut inserted = 0;
        for segment in matcher.segments(&content) {
            if segment.is_match {
                let annotation = AnnotationData::new(owner, style);
                replacements.push(tree.new_annotation(annotation, segment.text));
                inserted += 1;
            } else {
                replacements.push(tree.new_text(segment.text));
            }
        }

        if tree.replace_with(target, &replacements).is_ok() {
            total += inserted;
        } else {
            // The target vanished between the check and the splice; drop
            // the nodes built for it.
            trace!("discarding replacement for vanished {target}");
            for replacement in replacements {
                tree.remove(replacement);
            }
        }
    }
    total
}

/// Returns true if a node is a text leaf the scan may rewrite.
///
/// A leaf qualifies unless its immediate structural parent holds raw
/// (non-renderable) content, or any ancestor is the tool's own UI.
fn is_searchable(tree: &Tree, id: NodeId) -> bool {
    if tree.text_of(id).is_none() {
        return false;
    }
    let Some(parent) = tree.parent(id) else {
        return false;
    };
    if element_policy(tree, parent) == Some(ContentPolicy::Raw) {
        return false;
    }
    !tree
        .ancestors(id)
        .any(|ancestor| element_policy(tree, ancestor) == Some(ContentPolicy::ToolUi))
}

/// Returns an element node's content policy, `None` for other kinds.
fn element_policy(tree: &Tree, id: NodeId) -> Option<ContentPolicy> {
    match tree.kind(id)? {
        NodeKind::Element(element) => Some(element.policy),
        _ => None,
    }
}
