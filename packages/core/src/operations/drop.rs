//! Drop Intent Resolution
//!
//! Turns a raw pointer position plus the bounding box of the row under the
//! pointer into a structured placement intent. Pure geometry: no persistence,
//! no state, same inputs always produce the same intent.
//!
//! - The vertical half of the target row decides before/after
//! - The horizontal offset estimates the nesting depth the user is aiming
//!   for, clamped so a drop can at most become the target's own child
//! - A pointer whose vertical offset lands outside the row entirely falls
//!   back to nesting as a child of the target

use serde::{Deserialize, Serialize};

use crate::index::ForestIndex;
use crate::models::Category;
use crate::operations::error::MoveError;

/// Geometry tunables for drop resolution
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementConfig {
    /// Horizontal pixels representing one level of nesting
    pub indent_unit: f64,
    /// Left inset of depth-0 rows
    pub base_inset: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            indent_unit: 24.0,
            base_inset: 0.0,
        }
    }
}

/// Pointer coordinates in the same space as [`TargetBounds`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointerPosition {
    pub x: f64,
    pub y: f64,
}

/// Bounding rectangle of the row currently under the pointer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Whether the moved node lands above or below the reference among siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Place {
    Before,
    After,
}

/// Structured placement intent resolved from pointer geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DropIntent {
    /// Resolved new parent (None = root of the category)
    pub parent_id: Option<String>,
    /// Category of the target row; the moved subtree follows it
    pub category: Category,
    /// Side of the reference row the node lands on
    pub place: Place,
    /// The row the pointer was over
    pub reference_node_id: String,
}

/// Maps pointer geometry onto a placement intent
pub struct DropResolver;

impl DropResolver {
    /// Resolve a drop over `target_id` into a [`DropIntent`].
    ///
    /// `pointer` and `bounds` share a coordinate space; the target's depth is
    /// read from the snapshot. Returns `NotFound` for an unknown target.
    pub fn resolve(
        index: &ForestIndex<'_>,
        target_id: &str,
        pointer: PointerPosition,
        bounds: TargetBounds,
        config: &PlacementConfig,
    ) -> Result<DropIntent, MoveError> {
        let target = index
            .get(target_id)
            .ok_or_else(|| MoveError::not_found(target_id))?;
        // depth_of is Some for any node the lookup above found
        let target_depth = index.depth_of(target_id).unwrap_or(0) as i64;

        let relative_x = pointer.x - bounds.left;
        let relative_y = pointer.y - bounds.top;
        let in_row = relative_y >= 0.0 && relative_y <= bounds.height;

        let place = if relative_y < bounds.height / 2.0 {
            Place::Before
        } else {
            Place::After
        };

        // Horizontal offset, read as the absolute depth the user is aiming at
        let depth_intent = ((relative_x - config.base_inset) / config.indent_unit)
            .round()
            .max(0.0) as i64;

        // Clamp: cannot out-indent past becoming the target's own child.
        // A pointer outside the row vertically has no usable half; nest.
        let desired_depth = if in_row {
            depth_intent.min(target_depth + 1)
        } else {
            target_depth + 1
        };

        let parent_id = if desired_depth > target_depth {
            Some(target_id.to_string())
        } else {
            index
                .ancestor_at_depth(target_id, desired_depth - 1)
                .map(str::to_string)
        };

        Ok(DropIntent {
            parent_id,
            category: target.category,
            place,
            reference_node_id: target_id.to_string(),
        })
    }
}
