//! Error types for move operations
//!
//! Every public operation returns a tagged rejection instead of panicking;
//! a rejected move leaves the snapshot exactly as it was.

use thiserror::Error;

/// Rejection reasons for move operations
///
/// Structural violations (`NotFound`, `SelfParent`, `Cycle`) are hard
/// rejections with no partial effect. `NoOpMove` is surfaced distinctly from
/// success so callers can skip a persistence round-trip.
#[derive(Error, Debug)]
pub enum MoveError {
    /// Referenced node ID does not exist in the snapshot
    #[error("Node not found: {id}")]
    NotFound { id: String },

    /// Node cannot be reparented under itself
    #[error("Node '{id}' cannot become its own parent")]
    SelfParent { id: String },

    /// Reparent would create a cycle
    #[error("Circular reference detected: cannot move '{id}' under its descendant '{parent_id}'")]
    Cycle { id: String, parent_id: String },

    /// Resolved placement is identical to the node's current position
    #[error("Move is a no-op: node '{id}' already occupies the requested position")]
    NoOpMove { id: String },
}

impl MoveError {
    /// Create a node not found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    /// Create a self-parent error
    pub fn self_parent(id: impl Into<String>) -> Self {
        Self::SelfParent { id: id.into() }
    }

    /// Create a cycle error
    pub fn cycle(id: impl Into<String>, parent_id: impl Into<String>) -> Self {
        Self::Cycle {
            id: id.into(),
            parent_id: parent_id.into(),
        }
    }

    /// Create a no-op error
    pub fn no_op(id: impl Into<String>) -> Self {
        Self::NoOpMove { id: id.into() }
    }
}
