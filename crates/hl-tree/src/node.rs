//! Node identity and the typed node taxonomy.
//!
//! Nodes are one of three kinds: elements (structure), text leaves
//! (content), and annotations (highlight wrappers inserted around matched
//! substrings). Annotation ownership is a typed field on the node, not a
//! naming convention scanned back out of the tree.

use std::fmt;

use hl_term::{AnnotationStyle, TermId};
use serde::Serialize;

/// Stable handle to a node in a [`crate::Tree`].
///
/// Ids index arena slots that are never reused, so a handle kept across
/// mutations either still names the same node or resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Returns the raw slot index.
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

/// How an element's text content participates in scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentPolicy {
    /// Ordinary rendered content; text leaves inside are searchable.
    Renderable,
    /// Executable or styling content (the script/style equivalent); text
    /// directly inside must never be interpreted as document text.
    Raw,
    /// The highlighter's own UI subtree; skipped with all descendants.
    ToolUi,
}

/// Payload of an element node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Element name, e.g. `"p"` or `"section"`. Informational only.
    pub name: String,
    /// Scan policy for content under this element.
    pub policy: ContentPolicy,
}

impl ElementData {
    /// Creates an element payload.
    pub fn new(name: impl Into<String>, policy: ContentPolicy) -> Self {
        Self {
            name: name.into(),
            policy,
        }
    }
}

/// Payload of an annotation node wrapping one matched substring.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnotationData {
    /// The term this annotation belongs to.
    pub owner: TermId,
    /// Display colors derived from the owning term's color.
    pub style: AnnotationStyle,
    /// Whether this is the term's active match (at most one per term).
    pub active: bool,
}

impl AnnotationData {
    /// Creates an inactive annotation payload for a term.
    pub fn new(owner: TermId, style: AnnotationStyle) -> Self {
        Self {
            owner,
            style,
            active: false,
        }
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A structural element.
    Element(ElementData),
    /// A text leaf holding document content.
    Text(String),
    /// A highlight wrapper; its content is its children, normally a single
    /// text leaf holding exactly the matched substring.
    Annotation(AnnotationData),
}

impl NodeKind {
    /// Returns true for text leaves.
    pub fn is_text(&self) -> bool {
        matches!(self, Self::Text(_))
    }

    /// Returns true for annotation wrappers.
    pub fn is_annotation(&self) -> bool {
        matches!(self, Self::Annotation(_))
    }

    /// Returns true for elements.
    pub fn is_element(&self) -> bool {
        matches!(self, Self::Element(_))
    }
}

#[cfg(test)]
mod tests {
    use hl_term::Color;

    use super::*;

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(12).to_string(), "node#12");
    }

    #[test]
    fn test_kind_predicates() {
        let element = NodeKind::Element(ElementData::new("p", ContentPolicy::Renderable));
        let text = NodeKind::Text("hi".to_string());
        let annotation = NodeKind::Annotation(AnnotationData::new(
            TermId::new(0),
            AnnotationStyle::for_color(Color::WHITE, 0.4),
        ));

        assert!(element.is_element() && !element.is_text() && !element.is_annotation());
        assert!(text.is_text());
        assert!(annotation.is_annotation());
    }

    #[test]
    fn test_new_annotation_is_inactive() {
        let data = AnnotationData::new(TermId::new(2), AnnotationStyle::for_color(Color::WHITE, 0.4));
        assert!(!data.active);
        assert_eq!(data.owner, TermId::new(2));
    }
}
