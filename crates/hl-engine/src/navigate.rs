//! Stepping through a term's matches in document order.
//!
//! Navigation never re-scans: it re-reads the annotations a term already
//! owns, advances the term's cursor with wraparound, and moves the single
//! "active" marker. The caller brings the returned target into view.

use hl_term::{Registry, TermId, TermSnapshot};
use hl_tree::{NodeId, Tree};
use log::debug;
use serde::Serialize;

/// Direction of a navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Step to the next match in document order.
    Next,
    /// Step to the previous match in document order.
    Prev,
}

impl Direction {
    /// The signed step this direction applies to a cursor.
    pub const fn delta(self) -> isize {
        match self {
            Self::Next => 1,
            Self::Prev => -1,
        }
    }
}

/// Outcome of a successful navigation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Navigation {
    /// The affected term's state after the step.
    pub snapshot: TermSnapshot,
    /// The annotation to bring into the visible viewport.
    pub target: NodeId,
}

/// Advances a term's cursor by one step with wraparound.
///
/// Returns `None` without side effects when the term is unknown, has no
/// matches, or its annotations have vanished from the tree. Other terms'
/// annotations are never touched.
pub(crate) fn navigate(
    tree: &mut Tree,
    registry: &mut Registry,
    id: TermId,
    direction: Direction,
) -> Option<Navigation> {
    let term = registry.get(id)?;
    if term.match_count == 0 {
        return None;
    }
    let annotations = annotations_of(tree, id);
    if annotations.is_empty() {
        return None;
    }

    let count = annotations.len() as isize;
    let current = term.current_index.map_or(-1, |index| index as isize);
    let mut next = current + direction.delta();
    if next >= count {
        next = 0;
    } else if next < 0 {
        next = count - 1;
    }
    let next = next as usize;

    let term = registry.get_mut(id)?;
    term.current_index = Some(next);
    let snapshot = term.snapshot();
    set_active(tree, &annotations, Some(next));

    debug!("navigate {id}: {}", snapshot.display());
    Some(Navigation {
        snapshot,
        target: annotations[next],
    })
}

/// Returns one term's annotations in document order.
pub(crate) fn annotations_of(tree: &Tree, owner: TermId) -> Vec<NodeId> {
    tree.preorder(tree.root())
        .filter(|&id| {
            tree.annotation(id)
                .is_some_and(|annotation| annotation.owner == owner)
        })
        .collect()
}

/// Marks the annotation at `index` active and every other one inactive.
pub(crate) fn set_active(tree: &mut Tree, annotations: &[NodeId], index: Option<usize>) {
    for (position, &annotation) in annotations.iter().enumerate() {
        if let Some(data) = tree.annotation_mut(annotation) {
            data.active = Some(position) == index;
        }
    }
}
