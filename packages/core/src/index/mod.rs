//! Forest Snapshot Index
//!
//! Read-only structural queries over an immutable snapshot of the quest
//! forest. The index holds no mutable state: the caller rebuilds it (or
//! re-supplies a fresh snapshot) after each committed move, and must not
//! mutate the underlying node set while a resolve/plan/execute sequence is
//! in flight.
//!
//! Sibling groups are keyed by exact `(parent_id, category)` and ordered by
//! ascending `(order_key, created_at)` so that equal keys still produce a
//! stable, unique sequence.

use std::collections::{HashMap, VecDeque};

use crate::models::{Category, Node};

/// Upper bound on ancestor-chain walks. Protects the pure queries from
/// corrupt snapshots (a parent cycle persisted by an older client) without
/// making them fallible.
const MAX_ANCESTOR_HOPS: usize = 1000;

/// In-memory view of all nodes grouped by `(parent_id, category)`
#[derive(Debug)]
pub struct ForestIndex<'a> {
    by_id: HashMap<&'a str, &'a Node>,
    groups: HashMap<(Option<&'a str>, Category), Vec<&'a Node>>,
}

impl<'a> ForestIndex<'a> {
    /// Build the index from a snapshot.
    ///
    /// Nodes with a duplicate `id` keep the last occurrence; sibling lists
    /// are sorted once here so every query sees the same total order.
    pub fn new(nodes: &'a [Node]) -> Self {
        let mut by_id: HashMap<&'a str, &'a Node> = HashMap::with_capacity(nodes.len());
        let mut groups: HashMap<(Option<&'a str>, Category), Vec<&'a Node>> = HashMap::new();

        for node in nodes {
            by_id.insert(node.id.as_str(), node);
            groups
                .entry((node.parent_id.as_deref(), node.category))
                .or_default()
                .push(node);
        }

        for siblings in groups.values_mut() {
            siblings.sort_by(|a, b| {
                a.order_key
                    .total_cmp(&b.order_key)
                    .then_with(|| a.created_at.cmp(&b.created_at))
                    .then_with(|| a.id.cmp(&b.id))
            });
        }

        Self { by_id, groups }
    }

    /// Look up a node by ID
    pub fn get(&self, id: &str) -> Option<&'a Node> {
        self.by_id.get(id).copied()
    }

    /// Whether the snapshot contains `id`
    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Ordered siblings for an exact `(parent_id, category)` group.
    ///
    /// Ascending `(order_key, created_at)`; an unknown group is empty.
    pub fn siblings_of(&self, parent_id: Option<&str>, category: Category) -> &[&'a Node] {
        self.groups
            .iter()
            .find(|((pid, cat), _)| pid.as_deref() == parent_id && *cat == category)
            .map(|(_, siblings)| siblings.as_slice())
            .unwrap_or(&[])
    }

    /// Hops from `id` up to a `None` parent; roots are depth 0.
    ///
    /// Returns `None` for an unknown ID. A parent reference pointing at a
    /// node missing from the snapshot terminates the walk (the node is
    /// treated as a root at that point).
    pub fn depth_of(&self, id: &str) -> Option<usize> {
        let mut node = self.get(id)?;
        let mut depth = 0;
        for _ in 0..MAX_ANCESTOR_HOPS {
            match node.parent_id.as_deref().and_then(|pid| self.get(pid)) {
                Some(parent) => {
                    node = parent;
                    depth += 1;
                }
                None => break,
            }
        }
        Some(depth)
    }

    /// Ancestor of `id` sitting at absolute depth `target_depth`.
    ///
    /// Answers "if a drop resolves to this depth, which ancestor becomes the
    /// new parent". Any `target_depth <= 0` means "promote to root" and
    /// returns `None`, as does a depth at or below the node itself.
    pub fn ancestor_at_depth(&self, id: &str, target_depth: i64) -> Option<&'a str> {
        if target_depth <= 0 {
            return None;
        }
        let depth = self.depth_of(id)? as i64;
        if target_depth >= depth {
            return None;
        }
        let mut node = self.get(id)?;
        for _ in 0..(depth - target_depth) {
            node = self.get(node.parent_id.as_deref()?)?;
        }
        Some(node.id.as_str())
    }

    /// Whether `candidate_id` appears in the ancestor chain of `id`.
    ///
    /// The chain includes `id` itself. This is the sole cycle guard and is
    /// checked on every reparent before a move commits.
    pub fn is_ancestor(&self, candidate_id: &str, id: &str) -> bool {
        let mut current = id;
        for _ in 0..MAX_ANCESTOR_HOPS {
            if current == candidate_id {
                return true;
            }
            match self.get(current).and_then(|n| n.parent_id.as_deref()) {
                Some(parent_id) => current = parent_id,
                None => return false,
            }
        }
        false
    }

    /// Full subtree below `id`, parents before children.
    ///
    /// Children are collected across all categories so that a subtree whose
    /// lanes drifted out of sync (a stale cascade) is still covered.
    pub fn descendants_of(&self, id: &str) -> Vec<&'a Node> {
        let mut out = Vec::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            for category in Category::ALL {
                for child in self.siblings_of(Some(current), category) {
                    out.push(*child);
                    queue.push_back(child.id.as_str());
                }
            }
        }
        out
    }
}
