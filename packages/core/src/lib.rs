//! Questline Core Ordering Engine
//!
//! This crate provides the ordered-forest positioning engine behind
//! drag-and-drop reordering and reparenting of quests in the Questline HUD.
//!
//! # Architecture
//!
//! - **Fractional order keys**: siblings carry real-number keys; inserting
//!   between two quests is a midpoint computation, not a rewrite of the group
//! - **Snapshot in, patch out**: every operation is a pure function over an
//!   immutable snapshot of the forest; the caller owns persistence and cache
//!   updates
//! - **Reindex on exhaustion**: when the numeric gap between two siblings
//!   runs out, the affected group is re-keyed with evenly spaced values as
//!   part of the same move
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, Category) and boundary validation
//! - [`ordering`] - Order-key arithmetic (midpoint, spaced re-key)
//! - [`index`] - Structural queries over a forest snapshot
//! - [`operations`] - Drop resolution, placement planning, move execution

pub mod index;
pub mod models;
pub mod operations;
pub mod ordering;

// Re-export commonly used types
pub use index::ForestIndex;
pub use models::*;
pub use operations::*;
pub use ordering::OrderKeyCalculator;
