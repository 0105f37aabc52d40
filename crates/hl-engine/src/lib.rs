//! Match-annotation engine for hl.
//!
//! This crate implements the core of the highlighter over the document
//! tree from `hl-tree` and the term registry from `hl-term`:
//!
//! - **Scan**: find every non-overlapping occurrence of each active term
//!   in document order and wrap it in an annotation node
//! - **Clear**: remove every annotation tree-wide and restore the exact
//!   pre-annotation text content
//! - **Navigate**: step a term's cursor through its matches with
//!   wraparound and move its active marker
//! - **Session**: the controller a UI collaborator drives
//!
//! The engine takes the tree and the registry as explicit parameters on
//! every call; it owns neither, which keeps it testable against synthetic
//! trees with no UI anywhere in sight.
//!
//! # Example
//!
//! ```
//! use hl_engine::{Direction, Engine};
//! use hl_term::Registry;
//! use hl_tree::{ContentPolicy, Tree};
//!
//! let mut tree = Tree::new();
//! let para = tree
//!     .append_element(tree.root(), "p", ContentPolicy::Renderable)
//!     .unwrap();
//! tree.append_text(para, "red car, blue car").unwrap();
//!
//! let mut registry = Registry::new();
//! let id = registry.first().id;
//! registry.set_text(id, "car");
//!
//! let engine = Engine::new();
//! let snapshots = engine.rescan(&mut tree, &mut registry);
//! assert_eq!(snapshots[0].match_count, 2);
//!
//! let step = engine
//!     .navigate(&mut tree, &mut registry, id, Direction::Next)
//!     .unwrap();
//! assert_eq!(step.snapshot.display(), "1/2");
//! ```

#![warn(missing_docs)]

mod clear;
mod engine;
mod matcher;
mod navigate;
mod scan;
mod session;

pub use engine::{DEFAULT_HIGHLIGHT_ALPHA, Engine, EngineOptions};
pub use matcher::{Matcher, Segment};
pub use navigate::{Direction, Navigation};
pub use session::Session;
