//! Re-scan orchestration across the whole registry.
//!
//! Any change to a term's text or comparison rule invalidates every
//! annotation boundary in the tree, because the tree being scanned is the
//! output of the previous scan. The engine therefore always clears
//! tree-wide first, then re-scans each term from scratch. This
//! re-derive-everything policy is deliberate: with single-threaded
//! run-to-completion execution it is the simplest shape that keeps the
//! round-trip and non-overlap guarantees.

use hl_term::{AnnotationStyle, Registry, TermId, TermSnapshot};
use hl_tree::Tree;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::{
    clear::clear_annotations,
    matcher::Matcher,
    navigate::{self, Direction, Navigation},
    scan::scan_term,
};

/// Default alpha applied over a term's color for highlight backgrounds.
pub const DEFAULT_HIGHLIGHT_ALPHA: f32 = 0.4;

/// Tunables for annotation rendering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineOptions {
    /// Alpha applied over each term's color for annotation backgrounds.
    pub highlight_alpha: f32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            highlight_alpha: DEFAULT_HIGHLIGHT_ALPHA,
        }
    }
}

/// The match-annotation engine.
///
/// The engine is stateless beyond its options: the tree and the registry
/// are owned by the caller and passed in explicitly on every call, so the
/// same engine can serve any number of synthetic trees in tests.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    /// Rendering tunables.
    options: EngineOptions,
}

impl Engine {
    /// Creates an engine with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with the given options.
    pub fn with_options(options: EngineOptions) -> Self {
        Self { options }
    }

    /// Returns the engine's options.
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Clears all annotations, re-scans every active term in registry
    /// order, and reconciles each term's count and cursor.
    ///
    /// Cursor reconciliation follows the registry invariants: a count of
    /// zero forces the cursor out entirely; a count smaller than the old
    /// cursor position resets it to the first match. Terms that keep a
    /// cursor get their active marker re-applied.
    ///
    /// Returns a snapshot for every term, inactive ones included.
    pub fn rescan(&self, tree: &mut Tree, registry: &mut Registry) -> Vec<TermSnapshot> {
        clear_annotations(tree);

        for term in registry.iter_mut() {
            let count = match Matcher::new(&term.text, term.case_sensitive) {
                Some(matcher) => {
                    let style = AnnotationStyle::for_color(term.color, self.options.highlight_alpha);
                    scan_term(tree, term.id, &matcher, style)
                }
                None => 0,
            };

            term.match_count = count;
            if count == 0 {
                term.current_index = None;
            } else if term.current_index.is_some_and(|index| index >= count) {
                term.current_index = Some(0);
            }

            if term.current_index.is_some() {
                let annotations = navigate::annotations_of(tree, term.id);
                navigate::set_active(tree, &annotations, term.current_index);
            }
            debug!("scan {}: {count} matches", term.id);
        }

        registry.snapshots()
    }

    /// Removes every annotation for every term and zeroes match counts.
    ///
    /// Cursors are kept so a subsequent re-scan can restore the user's
    /// position when the same matches reappear.
    pub fn clear(&self, tree: &mut Tree, registry: &mut Registry) {
        let removed = clear_annotations(tree);
        debug!("clear removed {removed} annotations");
        for term in registry.iter_mut() {
            term.match_count = 0;
        }
    }

    /// Steps one term's cursor through its matches with wraparound.
    ///
    /// See [`navigate`](Self::navigate)'s return: `None` means the step
    /// was a no-op (unknown term, no matches, or vanished annotations).
    pub fn navigate(
        &self,
        tree: &mut Tree,
        registry: &mut Registry,
        id: TermId,
        direction: Direction,
    ) -> Option<Navigation> {
        navigate::navigate(tree, registry, id, direction)
    }
}
