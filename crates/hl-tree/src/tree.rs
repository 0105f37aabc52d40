//! The arena-backed tree and its traversal and mutation operations.
//!
//! Nodes live in slots that are never reused: removing a subtree frees its
//! slots permanently, so a stale [`NodeId`] resolves to nothing rather than
//! to an unrelated node. This is what lets the engine hold node handles
//! across rewrites and skip targets that have since vanished.

use crate::{
    error::TreeError,
    node::{AnnotationData, ContentPolicy, ElementData, NodeId, NodeKind},
};

/// Storage for one node: payload plus structural links.
#[derive(Debug, Clone)]
struct NodeData {
    /// What the node is.
    kind: NodeKind,
    /// The parent slot, `None` for the root and for detached nodes.
    parent: Option<NodeId>,
    /// Child slots in document order.
    children: Vec<NodeId>,
}

/// A mutable document tree addressed by stable node ids.
///
/// The tree is created with a single renderable root element; all other
/// nodes are allocated through it. Traversal is pre-order depth-first,
/// which is the document order used everywhere in the engine.
#[derive(Debug, Clone)]
pub struct Tree {
    /// Node slots; freed slots stay `None` forever.
    slots: Vec<Option<NodeData>>,
    /// The permanent root element.
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Creates a tree holding a single renderable root element.
    pub fn new() -> Self {
        let root = NodeData {
            kind: NodeKind::Element(ElementData::new("document", ContentPolicy::Renderable)),
            parent: None,
            children: Vec::new(),
        };
        Self {
            slots: vec![Some(root)],
            root: NodeId(0),
        }
    }

    /// Returns the root element's id.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns true if the id names a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        self.data(id).is_some()
    }

    /// Number of live nodes, attached or not.
    pub fn node_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    // ----- allocation -------------------------------------------------

    /// Allocates a detached element node.
    pub fn new_element(&mut self, name: impl Into<String>, policy: ContentPolicy) -> NodeId {
        self.alloc(NodeKind::Element(ElementData::new(name, policy)))
    }

    /// Allocates a detached text leaf.
    pub fn new_text(&mut self, content: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(content.into()))
    }

    /// Allocates a detached annotation wrapping a text leaf with the given
    /// content, and returns the wrapper's id.
    pub fn new_annotation(
        &mut self,
        annotation: AnnotationData,
        content: impl Into<String>,
    ) -> NodeId {
        let wrapper = self.alloc(NodeKind::Annotation(annotation));
        let text = self.alloc(NodeKind::Text(content.into()));
        self.link(wrapper, text);
        wrapper
    }

    /// Allocates an element and appends it under `parent`.
    pub fn append_element(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        policy: ContentPolicy,
    ) -> Result<NodeId, TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        let id = self.new_element(name, policy);
        self.link(parent, id);
        Ok(id)
    }

    /// Allocates a text leaf and appends it under `parent`.
    pub fn append_text(
        &mut self,
        parent: NodeId,
        content: impl Into<String>,
    ) -> Result<NodeId, TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        let id = self.new_text(content);
        self.link(parent, id);
        Ok(id)
    }

    /// Appends a detached node under `parent`.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        if !self.contains(parent) {
            return Err(TreeError::UnknownNode(parent));
        }
        let child_data = self.data(child).ok_or(TreeError::UnknownNode(child))?;
        if child == self.root || child_data.parent.is_some() {
            return Err(TreeError::AlreadyAttached(child));
        }
        if parent == child || self.ancestors(parent).any(|ancestor| ancestor == child) {
            return Err(TreeError::WouldCycle(child));
        }
        self.link(parent, child);
        Ok(())
    }

    // ----- queries ----------------------------------------------------

    /// Returns a node's kind.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.data(id).map(|data| &data.kind)
    }

    /// Returns a text leaf's content, or `None` for other kinds.
    pub fn text_of(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text(content) => Some(content),
            _ => None,
        }
    }

    /// Returns an annotation node's payload.
    pub fn annotation(&self, id: NodeId) -> Option<&AnnotationData> {
        match self.kind(id)? {
            NodeKind::Annotation(data) => Some(data),
            _ => None,
        }
    }

    /// Returns an annotation node's payload, mutably.
    pub fn annotation_mut(&mut self, id: NodeId) -> Option<&mut AnnotationData> {
        match &mut self.data_mut(id)?.kind {
            NodeKind::Annotation(data) => Some(data),
            _ => None,
        }
    }

    /// Returns a node's parent, or `None` for the root, for detached
    /// nodes, and for unknown ids.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.data(id).and_then(|data| data.parent)
    }

    /// Returns a node's children in document order, empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.data(id).map_or(&[], |data| data.children.as_slice())
    }

    /// Returns true if the node has an unbroken parent chain to the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if current == self.root {
                return self.contains(current);
            }
            match self.data(current).and_then(|data| data.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Iterates over a node's ancestors, nearest first.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterates over a subtree's ids in document order (pre-order,
    /// depth-first, left-to-right), starting with `start` itself.
    pub fn preorder(&self, start: NodeId) -> Preorder<'_> {
        let stack = if self.contains(start) {
            vec![start]
        } else {
            Vec::new()
        };
        Preorder { tree: self, stack }
    }

    /// Concatenates every text leaf under (and including) `id` in document
    /// order.
    pub fn text_content(&self, id: NodeId) -> String {
        self.preorder(id)
            .filter_map(|node| self.text_of(node))
            .collect()
    }

    // ----- mutation ---------------------------------------------------

    /// Detaches a node from its parent, keeping its subtree alive.
    ///
    /// Detaching an already-detached node is a no-op.
    pub fn detach(&mut self, id: NodeId) -> Result<(), TreeError> {
        if id == self.root {
            return Err(TreeError::RootImmovable);
        }
        let parent = self.data(id).ok_or(TreeError::UnknownNode(id))?.parent;
        let Some(parent) = parent else {
            return Ok(());
        };
        if let Some(parent_data) = self.data_mut(parent) {
            parent_data.children.retain(|&child| child != id);
        }
        if let Some(data) = self.data_mut(id) {
            data.parent = None;
        }
        Ok(())
    }

    /// Detaches a node and frees its entire subtree.
    ///
    /// Returns false for unknown ids and for the root. Freed ids resolve
    /// to nothing from then on.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || self.detach(id).is_err() {
            return false;
        }
        self.free_subtree(id);
        true
    }

    /// Replaces an attached node with a sequence of detached nodes,
    /// preserving its position among its siblings.
    ///
    /// The replaced subtree is freed. Replacements must be live, detached,
    /// and distinct; the target must be attached and must not be the root.
    pub fn replace_with(
        &mut self,
        target: NodeId,
        replacements: &[NodeId],
    ) -> Result<(), TreeError> {
        if target == self.root {
            return Err(TreeError::RootImmovable);
        }
        if !self.contains(target) {
            return Err(TreeError::UnknownNode(target));
        }
        if !self.is_attached(target) {
            return Err(TreeError::Detached(target));
        }
        for (position, &replacement) in replacements.iter().enumerate() {
            let data = self
                .data(replacement)
                .ok_or(TreeError::UnknownNode(replacement))?;
            if replacement == self.root
                || data.parent.is_some()
                || replacements[..position].contains(&replacement)
            {
                return Err(TreeError::AlreadyAttached(replacement));
            }
        }

        let parent = self
            .data(target)
            .and_then(|data| data.parent)
            .ok_or(TreeError::Detached(target))?;
        let parent_data = self
            .data_mut(parent)
            .ok_or(TreeError::UnknownNode(parent))?;
        let position = parent_data
            .children
            .iter()
            .position(|&child| child == target)
            .ok_or(TreeError::Detached(target))?;
        parent_data
            .children
            .splice(position..=position, replacements.iter().copied());

        for &replacement in replacements {
            if let Some(data) = self.data_mut(replacement) {
                data.parent = Some(parent);
            }
        }
        if let Some(data) = self.data_mut(target) {
            data.parent = None;
        }
        self.free_subtree(target);
        Ok(())
    }

    /// Merges adjacent text children and drops empty text children,
    /// freeing the nodes that are merged away.
    ///
    /// This restores the flat text shape that leaf replacement split
    /// apart. Unknown ids are a no-op.
    pub fn normalize(&mut self, parent: NodeId) {
        let Some(children) = self.data(parent).map(|data| data.children.clone()) else {
            return;
        };

        let mut kept: Vec<NodeId> = Vec::with_capacity(children.len());
        for child in children {
            let content = match self.kind(child) {
                Some(NodeKind::Text(content)) => Some(content.clone()),
                _ => None,
            };
            let Some(content) = content else {
                kept.push(child);
                continue;
            };
            if content.is_empty() {
                self.free_subtree(child);
                continue;
            }
            // Merge into a directly preceding text leaf, if any.
            if let Some(&previous) = kept.last()
                && let Some(data) = self.data_mut(previous)
                && let NodeKind::Text(previous_content) = &mut data.kind
            {
                previous_content.push_str(&content);
                self.free_subtree(child);
                continue;
            }
            kept.push(child);
        }

        if let Some(data) = self.data_mut(parent) {
            data.children = kept;
        }
    }

    // ----- internals --------------------------------------------------

    /// Allocates a fresh detached slot.
    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.slots.len());
        self.slots.push(Some(NodeData {
            kind,
            parent: None,
            children: Vec::new(),
        }));
        id
    }

    /// Links a detached child under a parent. Callers validate first.
    fn link(&mut self, parent: NodeId, child: NodeId) {
        if let Some(parent_data) = self.data_mut(parent) {
            parent_data.children.push(child);
        }
        if let Some(child_data) = self.data_mut(child) {
            child_data.parent = Some(parent);
        }
    }

    /// Frees a subtree's slots. The root of the subtree must already be
    /// detached from any parent's child list.
    fn free_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(data) = self.slots.get_mut(current.0).and_then(Option::take) {
                stack.extend(data.children);
            }
        }
    }

    fn data(&self, id: NodeId) -> Option<&NodeData> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    fn data_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    /// The tree being walked.
    tree: &'a Tree,
    /// Next ancestor to yield.
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Iterator over a subtree in document order.
pub struct Preorder<'a> {
    /// The tree being walked.
    tree: &'a Tree,
    /// Nodes still to visit (rightmost children pushed first).
    stack: Vec<NodeId>,
}

impl Iterator for Preorder<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        for &child in self.tree.children(id).iter().rev() {
            self.stack.push(child);
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use hl_term::{AnnotationStyle, Color, TermId};

    use super::*;

    fn style() -> AnnotationStyle {
        AnnotationStyle::for_color(Color::new(0xff, 0xd5, 0x4f), 0.4)
    }

    /// document > [p > ["one ", em > ["two"], " three"], pre(raw) > ["four"]]
    fn sample_tree() -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, "one ").unwrap();
        let em = tree
            .append_element(p, "em", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(em, "two").unwrap();
        tree.append_text(p, " three").unwrap();
        let pre = tree
            .append_element(tree.root(), "pre", ContentPolicy::Raw)
            .unwrap();
        tree.append_text(pre, "four").unwrap();
        (tree, p, pre)
    }

    #[test]
    fn test_new_tree_has_root_element() {
        let tree = Tree::new();
        assert!(matches!(
            tree.kind(tree.root()),
            Some(NodeKind::Element(element)) if element.policy == ContentPolicy::Renderable
        ));
        assert_eq!(tree.node_count(), 1);
        assert!(tree.is_attached(tree.root()));
    }

    #[test]
    fn test_preorder_is_document_order() {
        let (tree, _, _) = sample_tree();
        let texts: Vec<&str> = tree
            .preorder(tree.root())
            .filter_map(|id| tree.text_of(id))
            .collect();
        assert_eq!(texts, vec!["one ", "two", " three", "four"]);
    }

    #[test]
    fn test_text_content_concatenates_subtree() {
        let (tree, p, _) = sample_tree();
        assert_eq!(tree.text_content(p), "one two three");
        assert_eq!(tree.text_content(tree.root()), "one two threefour");
    }

    #[test]
    fn test_ancestors_nearest_first() {
        let (tree, p, _) = sample_tree();
        let em = tree.children(p)[1];
        let two = tree.children(em)[0];
        let chain: Vec<NodeId> = tree.ancestors(two).collect();
        assert_eq!(chain, vec![em, p, tree.root()]);
    }

    #[test]
    fn test_append_child_rejects_attached_node() {
        let (mut tree, p, pre) = sample_tree();
        let err = tree.append_child(pre, tree.children(p)[0]).unwrap_err();
        assert!(matches!(err, TreeError::AlreadyAttached(_)));
    }

    #[test]
    fn test_append_child_rejects_cycle() {
        let mut tree = Tree::new();
        let outer = tree.new_element("div", ContentPolicy::Renderable);
        let inner = tree.new_element("span", ContentPolicy::Renderable);
        tree.append_child(outer, inner).unwrap();

        let err = tree.append_child(inner, outer).unwrap_err();
        assert!(matches!(err, TreeError::WouldCycle(_)));
    }

    #[test]
    fn test_replace_with_splices_in_place() {
        let (mut tree, p, _) = sample_tree();
        let target = tree.children(p)[0]; // "one "
        let left = tree.new_text("o");
        let wrapper = tree.new_annotation(
            AnnotationData::new(TermId::new(0), style()),
            "ne",
        );
        let right = tree.new_text(" ");

        tree.replace_with(target, &[left, wrapper, right]).unwrap();

        let children = tree.children(p);
        assert_eq!(children.len(), 5);
        assert_eq!(children[0], left);
        assert_eq!(children[1], wrapper);
        assert_eq!(children[2], right);
        assert_eq!(tree.text_content(p), "one two three");
        // The replaced leaf is gone for good.
        assert!(!tree.contains(target));
    }

    #[test]
    fn test_replace_with_rejects_root() {
        let mut tree = Tree::new();
        let text = tree.new_text("x");
        let err = tree.replace_with(tree.root(), &[text]).unwrap_err();
        assert!(matches!(err, TreeError::RootImmovable));
    }

    #[test]
    fn test_replace_with_rejects_detached_target() {
        let (mut tree, p, _) = sample_tree();
        let target = tree.children(p)[0];
        tree.detach(target).unwrap();

        let text = tree.new_text("x");
        let err = tree.replace_with(target, &[text]).unwrap_err();
        assert!(matches!(err, TreeError::Detached(_)));
    }

    #[test]
    fn test_replace_with_rejects_duplicate_replacement() {
        let (mut tree, p, _) = sample_tree();
        let target = tree.children(p)[0];
        let text = tree.new_text("x");
        let err = tree.replace_with(target, &[text, text]).unwrap_err();
        assert!(matches!(err, TreeError::AlreadyAttached(_)));
    }

    #[test]
    fn test_detach_and_attachment_checks() {
        let (mut tree, p, _) = sample_tree();
        let em = tree.children(p)[1];
        let two = tree.children(em)[0];

        assert!(tree.is_attached(two));
        tree.detach(em).unwrap();

        // The subtree survives but no longer reaches the root.
        assert!(tree.contains(two));
        assert!(!tree.is_attached(em));
        assert!(!tree.is_attached(two));
        assert_eq!(tree.text_content(p), "one  three");

        // Detaching again is a no-op.
        tree.detach(em).unwrap();
    }

    #[test]
    fn test_remove_frees_subtree() {
        let (mut tree, p, _) = sample_tree();
        let em = tree.children(p)[1];
        let two = tree.children(em)[0];

        assert!(tree.remove(em));
        assert!(!tree.contains(em));
        assert!(!tree.contains(two));
        assert!(!tree.remove(em));
    }

    #[test]
    fn test_remove_refuses_root() {
        let mut tree = Tree::new();
        assert!(!tree.remove(tree.root()));
        assert!(tree.contains(tree.root()));
    }

    #[test]
    fn test_normalize_merges_adjacent_text() {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, "one ").unwrap();
        tree.append_text(p, "two").unwrap();
        let em = tree
            .append_element(p, "em", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, " three").unwrap();
        tree.append_text(p, "").unwrap();

        tree.normalize(p);

        let children = tree.children(p).to_vec();
        assert_eq!(children.len(), 3);
        assert_eq!(tree.text_of(children[0]), Some("one two"));
        assert_eq!(children[1], em);
        assert_eq!(tree.text_of(children[2]), Some(" three"));
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let mut tree = Tree::new();
        let p = tree
            .append_element(tree.root(), "p", ContentPolicy::Renderable)
            .unwrap();
        tree.append_text(p, "a").unwrap();
        tree.append_text(p, "b").unwrap();

        tree.normalize(p);
        let first = tree.children(p).to_vec();
        tree.normalize(p);
        assert_eq!(tree.children(p), first.as_slice());
        assert_eq!(tree.text_content(p), "ab");
    }

    #[test]
    fn test_annotation_accessors() {
        let mut tree = Tree::new();
        let wrapper = tree.new_annotation(AnnotationData::new(TermId::new(5), style()), "hit");
        assert_eq!(tree.annotation(wrapper).map(|a| a.owner), Some(TermId::new(5)));
        assert_eq!(tree.text_content(wrapper), "hit");

        tree.annotation_mut(wrapper).unwrap().active = true;
        assert!(tree.annotation(wrapper).is_some_and(|a| a.active));
    }

    #[test]
    fn test_stale_ids_resolve_to_nothing() {
        let (mut tree, p, _) = sample_tree();
        let target = tree.children(p)[0];
        let replacement = tree.new_text("one ");
        tree.replace_with(target, &[replacement]).unwrap();

        assert!(!tree.contains(target));
        assert_eq!(tree.kind(target), None);
        assert_eq!(tree.text_of(target), None);
        assert!(!tree.is_attached(target));
        assert_eq!(tree.preorder(target).count(), 0);
    }
}
