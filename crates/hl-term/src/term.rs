//! Search term records and per-term snapshots.
//!
//! A [`SearchTerm`] is one row of the registry: the literal text to find,
//! its comparison rule, its color, and the navigation state the engine
//! maintains for it. A [`TermSnapshot`] is the read-only view handed to the
//! rendering collaborator after every scan or navigation step.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Identifier for a search term, unique for the registry's lifetime.
///
/// Ids are assigned by the registry and never reused after removal, so an
/// id found on a stale annotation can never refer to a different term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TermId(u32);

impl TermId {
    /// Creates an id from its raw value.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TermId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "term#{}", self.0)
    }
}

/// One user-entered search term with its match and navigation state.
#[derive(Debug, Clone)]
pub struct SearchTerm {
    /// Registry-assigned identifier.
    pub id: TermId,
    /// The literal substring to find. Empty means the term is inactive.
    pub text: String,
    /// Whether matching compares case-sensitively.
    pub case_sensitive: bool,
    /// Display color associated with the term at creation.
    pub color: Color,
    /// Number of annotated occurrences found on the most recent scan.
    pub match_count: usize,
    /// Navigation cursor: `None` means no active match, otherwise an index
    /// into the term's current match list in document order.
    pub current_index: Option<usize>,
}

impl SearchTerm {
    /// Creates an inactive term with the given id and color.
    ///
    /// New terms start case-sensitive with empty text and no cursor.
    pub fn new(id: TermId, color: Color) -> Self {
        Self {
            id,
            text: String::new(),
            case_sensitive: true,
            color,
            match_count: 0,
            current_index: None,
        }
    }

    /// Returns true if this term participates in scans.
    pub fn is_active(&self) -> bool {
        !self.text.is_empty()
    }

    /// Returns the `{match_count, current_index}` view of this term.
    pub fn snapshot(&self) -> TermSnapshot {
        TermSnapshot {
            id: self.id,
            match_count: self.match_count,
            current_index: self.current_index,
        }
    }
}

/// Per-term state handed to the collaborator for count display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TermSnapshot {
    /// The term this snapshot describes.
    pub id: TermId,
    /// Number of matches found on the most recent scan.
    pub match_count: usize,
    /// Navigation cursor, `None` when no match is active.
    pub current_index: Option<usize>,
}

impl TermSnapshot {
    /// Renders the counter text shown next to a search row.
    ///
    /// Produces `current/total` with a one-based current position (`0` when
    /// no match is active), or the empty string when there are no matches.
    pub fn display(&self) -> String {
        if self.match_count == 0 {
            return String::new();
        }
        let current = self.current_index.map_or(0, |index| index + 1);
        format!("{current}/{}", self.match_count)
    }
}
