//! Move Execution
//!
//! Validates a planned move and packages the final state transition as an
//! immutable patch set. The executor never talks to storage: the caller
//! persists the returned patches (reindex + move as one logical transaction)
//! and refreshes its snapshot afterward. A rejection leaves the forest
//! untouched.
//!
//! Each operation is stateless: resolve, plan, validate, then commit or
//! reject, always against the snapshot the caller handed in.

use serde::{Deserialize, Serialize};

use crate::index::ForestIndex;
use crate::models::{Category, Node};
use crate::operations::drop::{DropIntent, DropResolver, PlacementConfig, PointerPosition, TargetBounds};
use crate::operations::error::MoveError;
use crate::operations::planner::{DirectPlacement, KeyAssignment, PlacementPlan, PlacementPlanner};
use crate::ordering::OrderKeyCalculator;

/// Final position of the moved node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovedNode {
    pub id: String,
    pub parent_id: Option<String>,
    pub category: Category,
    pub order_key: f64,
}

/// Category change cascaded to a descendant of the moved node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryAssignment {
    pub id: String,
    pub category: Category,
}

/// Complete patch set for one committed move.
///
/// The caller persists all three parts as a single unit (a half-applied
/// reindex corrupts ordering for the whole sibling group) and can invert the
/// move by restoring the prior parent/category/key of every listed node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveOutcome {
    /// The moved node's new position
    pub moved: MovedNode,
    /// Nodes re-keyed by a group reindex (empty on the happy path)
    pub reindexed: Vec<KeyAssignment>,
    /// Descendants whose category follows the moved node across lanes
    pub recategorized: Vec<CategoryAssignment>,
}

/// Validates and packages move operations
pub struct MoveExecutor;

impl MoveExecutor {
    /// Resolve pointer geometry and execute the move in one call.
    ///
    /// Convenience pipeline for the common drag-and-drop path:
    /// geometry -> intent -> plan -> validated patch set.
    pub fn move_from_pointer(
        index: &ForestIndex<'_>,
        moving_id: &str,
        target_id: &str,
        pointer: PointerPosition,
        bounds: TargetBounds,
        config: &PlacementConfig,
    ) -> Result<MoveOutcome, MoveError> {
        let intent = DropResolver::resolve(index, target_id, pointer, bounds, config)?;
        Self::execute_drop(index, moving_id, &intent)
    }

    /// Execute a move described by a resolved [`DropIntent`]
    pub fn execute_drop(
        index: &ForestIndex<'_>,
        moving_id: &str,
        intent: &DropIntent,
    ) -> Result<MoveOutcome, MoveError> {
        let moving = index
            .get(moving_id)
            .ok_or_else(|| MoveError::not_found(moving_id))?;
        // Dropping a row onto itself never changes anything
        if moving_id == intent.reference_node_id {
            return Err(MoveError::no_op(moving_id));
        }
        Self::check_parent(index, moving_id, intent.parent_id.as_deref())?;
        let plan = PlacementPlanner::plan_drop(index, moving_id, intent)?;
        Ok(Self::commit(index, moving, plan))
    }

    /// Execute a programmatic move described by a [`DirectPlacement`]
    pub fn execute_direct(
        index: &ForestIndex<'_>,
        moving_id: &str,
        placement: &DirectPlacement,
    ) -> Result<MoveOutcome, MoveError> {
        let moving = index
            .get(moving_id)
            .ok_or_else(|| MoveError::not_found(moving_id))?;
        Self::check_parent(index, moving_id, placement.parent_id.as_deref())?;
        let plan = PlacementPlanner::plan_direct(index, moving_id, placement)?;
        Ok(Self::commit(index, moving, plan))
    }

    /// Order key for a node newly appended to `(parent_id, category)`.
    ///
    /// Creation placement: current group max plus one spacing step, or the
    /// first spaced key in an empty group.
    pub fn plan_insertion(
        index: &ForestIndex<'_>,
        parent_id: Option<&str>,
        category: Category,
    ) -> f64 {
        let last = index
            .siblings_of(parent_id, category)
            .last()
            .map(|n| n.order_key);
        OrderKeyCalculator::trailing_key(last)
    }

    /// IDs to delete when removing `id`, parents before children.
    ///
    /// Deletion cascades to the whole subtree by explicit policy; the caller
    /// deletes the returned IDs as one unit.
    pub fn plan_subtree_removal(
        index: &ForestIndex<'_>,
        id: &str,
    ) -> Result<Vec<String>, MoveError> {
        if !index.contains(id) {
            return Err(MoveError::not_found(id));
        }
        let mut ids = vec![id.to_string()];
        ids.extend(index.descendants_of(id).iter().map(|n| n.id.clone()));
        Ok(ids)
    }

    /// Reject self-parenting and cycles before any planning happens
    fn check_parent(
        index: &ForestIndex<'_>,
        moving_id: &str,
        parent_id: Option<&str>,
    ) -> Result<(), MoveError> {
        if let Some(parent_id) = parent_id {
            if parent_id == moving_id {
                return Err(MoveError::self_parent(moving_id));
            }
            if !index.contains(parent_id) {
                return Err(MoveError::not_found(parent_id));
            }
            if index.is_ancestor(moving_id, parent_id) {
                tracing::debug!(
                    "Rejecting move of '{}' under its descendant '{}'",
                    moving_id,
                    parent_id
                );
                return Err(MoveError::cycle(moving_id, parent_id));
            }
        }
        Ok(())
    }

    fn commit(index: &ForestIndex<'_>, moving: &Node, plan: PlacementPlan) -> MoveOutcome {
        // Cross-category move: the whole subtree follows the new lane
        let recategorized = if moving.category != plan.category {
            index
                .descendants_of(&moving.id)
                .iter()
                .filter(|n| n.category != plan.category)
                .map(|n| CategoryAssignment {
                    id: n.id.clone(),
                    category: plan.category,
                })
                .collect()
        } else {
            Vec::new()
        };

        tracing::debug!(
            "Committing move of '{}' under {:?} ({}) at key {} ({} re-keyed, {} recategorized)",
            moving.id,
            plan.parent_id,
            plan.category.as_str(),
            plan.order_key,
            plan.reindex.len(),
            recategorized.len()
        );

        MoveOutcome {
            moved: MovedNode {
                id: moving.id.clone(),
                parent_id: plan.parent_id,
                category: plan.category,
                order_key: plan.order_key,
            },
            reindexed: plan.reindex,
            recategorized,
        }
    }
}
