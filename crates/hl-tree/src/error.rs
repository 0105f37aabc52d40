//! Error types for structural tree mutation.

use thiserror::Error;

use crate::node::NodeId;

/// Errors that can occur when mutating the tree structure.
///
/// These report API misuse by the caller. The engine never surfaces them:
/// its policy for vanished targets is to skip, not to fail.
#[derive(Debug, Error)]
pub enum TreeError {
    /// The node id does not name a live node in this tree.
    #[error("unknown {0}")]
    UnknownNode(NodeId),

    /// The node already has a parent and cannot be attached again.
    #[error("{0} is already attached to a parent")]
    AlreadyAttached(NodeId),

    /// The node has no path to the root, so it cannot be replaced in place.
    #[error("{0} is detached from the tree")]
    Detached(NodeId),

    /// Attaching here would make a node its own ancestor.
    #[error("attaching {0} would create a cycle")]
    WouldCycle(NodeId),

    /// The root cannot be detached or replaced.
    #[error("the tree root cannot be detached or replaced")]
    RootImmovable,
}
