//! The collaborator-facing session.
//!
//! A [`Session`] owns the term registry, an engine, and the feature's
//! visibility flag; the document tree stays owned by the caller and is
//! borrowed per call. Every mutation that can change match results
//! triggers a full re-scan, and hiding the feature clears the tree before
//! the collaborator removes its panel.

use hl_term::{Registry, TermId, TermSnapshot};
use hl_tree::Tree;

use crate::{
    engine::{Engine, EngineOptions},
    navigate::{Direction, Navigation},
};

/// Controller owning the registry and engine behind a UI collaborator.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// The ordered term registry; always holds at least one term.
    registry: Registry,
    /// The stateless engine.
    engine: Engine,
    /// Whether the feature is currently shown.
    visible: bool,
}

impl Session {
    /// Creates a hidden session with one empty term and default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session with the given engine options.
    pub fn with_options(options: EngineOptions) -> Self {
        Self {
            registry: Registry::new(),
            engine: Engine::with_options(options),
            visible: false,
        }
    }

    /// Returns the term registry.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Returns true while the feature is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Adds a new empty search row and returns its term id.
    ///
    /// No re-scan runs: an empty term matches nothing.
    pub fn add_term(&mut self) -> TermId {
        self.registry.add()
    }

    /// Removes a search row and re-scans so its annotations disappear.
    ///
    /// The last remaining row cannot be removed; the call then degrades
    /// to a plain re-scan.
    pub fn remove_term(&mut self, tree: &mut Tree, id: TermId) -> Vec<TermSnapshot> {
        self.registry.remove(id);
        self.engine.rescan(tree, &mut self.registry)
    }

    /// Replaces a term's text and re-scans.
    pub fn set_term_text(
        &mut self,
        tree: &mut Tree,
        id: TermId,
        text: impl Into<String>,
    ) -> Vec<TermSnapshot> {
        self.registry.set_text(id, text);
        self.engine.rescan(tree, &mut self.registry)
    }

    /// Toggles a term's case sensitivity and re-scans.
    pub fn set_case_sensitive(
        &mut self,
        tree: &mut Tree,
        id: TermId,
        case_sensitive: bool,
    ) -> Vec<TermSnapshot> {
        self.registry.set_case_sensitive(id, case_sensitive);
        self.engine.rescan(tree, &mut self.registry)
    }

    /// Steps a term's cursor through its matches with wraparound.
    pub fn navigate(
        &mut self,
        tree: &mut Tree,
        id: TermId,
        direction: Direction,
    ) -> Option<Navigation> {
        self.engine.navigate(tree, &mut self.registry, id, direction)
    }

    /// Shows or hides the feature.
    ///
    /// Turning visibility off clears every annotation before the
    /// collaborator hides its panel; turning it on changes nothing until
    /// the next term edit.
    pub fn set_visible(&mut self, tree: &mut Tree, visible: bool) {
        if self.visible && !visible {
            self.engine.clear(tree, &mut self.registry);
        }
        self.visible = visible;
    }

    /// Snapshots every term for count display.
    pub fn snapshots(&self) -> Vec<TermSnapshot> {
        self.registry.snapshots()
    }
}
