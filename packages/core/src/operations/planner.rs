//! Placement Planning
//!
//! Converts a placement intent into the concrete order key for the moved
//! node. The happy path is a single midpoint computation; when the numeric
//! gap between the resolved neighbors is exhausted the planner computes a
//! full reindex plan for the sibling group instead, and the move carries
//! both as one unit.

use serde::{Deserialize, Serialize};

use crate::index::ForestIndex;
use crate::models::{Category, Node};
use crate::operations::drop::{DropIntent, Place};
use crate::operations::error::MoveError;
use crate::ordering::OrderKeyCalculator;

/// Hop cap when climbing from a reference row to its representative in the
/// destination sibling group
const MAX_REFERENCE_HOPS: usize = 1000;

/// One re-keyed node from a group reindex
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyAssignment {
    pub id: String,
    pub order_key: f64,
}

/// Planned placement for a single move
///
/// `reindex` is empty on the happy path; when present it re-keys every other
/// member of the destination group and must be persisted together with the
/// move itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementPlan {
    pub parent_id: Option<String>,
    pub category: Category,
    pub order_key: f64,
    pub reindex: Vec<KeyAssignment>,
}

/// Direct placement request for programmatic (non-pointer) reorders.
///
/// `before_id` names the sibling that ends up immediately before (above) the
/// moved node, `after_id` the one immediately after. With both absent the
/// node is appended at the end of the group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectPlacement {
    pub parent_id: Option<String>,
    pub category: Category,
    pub before_id: Option<String>,
    pub after_id: Option<String>,
}

/// Computes order keys (and reindex plans) for placement intents
pub struct PlacementPlanner;

impl PlacementPlanner {
    /// Plan a pointer-driven move described by a [`DropIntent`].
    ///
    /// The reference row may not itself be a member of the destination group:
    /// an out-dented drop orders the mover against the reference's ancestor
    /// inside that group, and a nest-into-target drop (where the reference is
    /// the new parent) splices the mover at the head of the group.
    pub fn plan_drop(
        index: &ForestIndex<'_>,
        moving_id: &str,
        intent: &DropIntent,
    ) -> Result<PlacementPlan, MoveError> {
        let moving = index
            .get(moving_id)
            .ok_or_else(|| MoveError::not_found(moving_id))?;
        if !index.contains(&intent.reference_node_id) {
            return Err(MoveError::not_found(&intent.reference_node_id));
        }

        let siblings = Self::siblings_without(index, intent.parent_id.as_deref(), intent.category, moving_id);
        let slot = match Self::reference_slot(index, intent, &siblings) {
            Some(position) => match intent.place {
                Place::Before => position,
                Place::After => position + 1,
            },
            None => 0,
        };

        Self::plan_at_slot(
            index,
            moving,
            intent.parent_id.clone(),
            intent.category,
            &siblings,
            slot,
        )
    }

    /// Plan a programmatic move described by a [`DirectPlacement`]
    pub fn plan_direct(
        index: &ForestIndex<'_>,
        moving_id: &str,
        placement: &DirectPlacement,
    ) -> Result<PlacementPlan, MoveError> {
        let moving = index
            .get(moving_id)
            .ok_or_else(|| MoveError::not_found(moving_id))?;

        let siblings =
            Self::siblings_without(index, placement.parent_id.as_deref(), placement.category, moving_id);

        let slot = if let Some(before_id) = placement.before_id.as_deref() {
            Self::position_in_group(&siblings, before_id)? + 1
        } else if let Some(after_id) = placement.after_id.as_deref() {
            Self::position_in_group(&siblings, after_id)?
        } else {
            siblings.len()
        };

        Self::plan_at_slot(
            index,
            moving,
            placement.parent_id.clone(),
            placement.category,
            &siblings,
            slot,
        )
    }

    fn siblings_without<'a>(
        index: &ForestIndex<'a>,
        parent_id: Option<&str>,
        category: Category,
        moving_id: &str,
    ) -> Vec<&'a Node> {
        index
            .siblings_of(parent_id, category)
            .iter()
            .copied()
            .filter(|n| n.id != moving_id)
            .collect()
    }

    /// Position of the reference's representative inside the destination
    /// group, climbing the ancestor chain until a group member is found.
    fn reference_slot(
        index: &ForestIndex<'_>,
        intent: &DropIntent,
        siblings: &[&Node],
    ) -> Option<usize> {
        let mut current = intent.reference_node_id.as_str();
        for _ in 0..MAX_REFERENCE_HOPS {
            if let Some(position) = siblings.iter().position(|n| n.id == current) {
                return Some(position);
            }
            current = index.get(current)?.parent_id.as_deref()?;
        }
        None
    }

    fn position_in_group(siblings: &[&Node], id: &str) -> Result<usize, MoveError> {
        siblings
            .iter()
            .position(|n| n.id == id)
            .ok_or_else(|| MoveError::not_found(id))
    }

    /// Produce the plan for splicing `moving` into `siblings` at `slot`.
    ///
    /// `siblings` excludes the moving node; `slot` is the index the node will
    /// occupy in the final ordering of the group.
    fn plan_at_slot(
        index: &ForestIndex<'_>,
        moving: &Node,
        parent_id: Option<String>,
        category: Category,
        siblings: &[&Node],
        slot: usize,
    ) -> Result<PlacementPlan, MoveError> {
        let before = slot.checked_sub(1).and_then(|i| siblings.get(i)).copied();
        let after = siblings.get(slot).copied();

        // Same group, same neighbors: nothing would change, skip the write
        if moving.parent_id.as_deref() == parent_id.as_deref() && moving.category == category {
            let current = index.siblings_of(parent_id.as_deref(), category);
            if let Some(position) = current.iter().position(|n| n.id == moving.id) {
                let current_before = position.checked_sub(1).map(|i| current[i].id.as_str());
                let current_after = current.get(position + 1).map(|n| n.id.as_str());
                if current_before == before.map(|n| n.id.as_str())
                    && current_after == after.map(|n| n.id.as_str())
                {
                    return Err(MoveError::no_op(&moving.id));
                }
            }
        }

        if let Some(order_key) = OrderKeyCalculator::midpoint(
            before.map(|n| n.order_key),
            after.map(|n| n.order_key),
        ) {
            return Ok(PlacementPlan {
                parent_id,
                category,
                order_key,
                reindex: Vec::new(),
            });
        }

        // Gap exhausted: re-key the whole group with the mover spliced into
        // its slot, so the final ordering is densely spaced again
        tracing::debug!(
            "Order-key gap exhausted under parent {:?} ({}); re-keying {} siblings",
            parent_id,
            category.as_str(),
            siblings.len() + 1
        );

        let mut final_order: Vec<&Node> = siblings.to_vec();
        final_order.insert(slot.min(final_order.len()), moving);
        let keys = OrderKeyCalculator::spaced_sequence(final_order.len());

        let mut moved_key = 0.0;
        let mut reindex = Vec::with_capacity(siblings.len());
        for (node, key) in final_order.iter().zip(keys) {
            if node.id == moving.id {
                moved_key = key;
            } else {
                reindex.push(KeyAssignment {
                    id: node.id.clone(),
                    order_key: key,
                });
            }
        }

        Ok(PlacementPlan {
            parent_id,
            category,
            order_key: moved_key,
            reindex,
        })
    }
}
