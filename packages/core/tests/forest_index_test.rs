//! Integration tests for ForestIndex
//!
//! Tests cover:
//! - Sibling ordering (key sort + created_at tie-break)
//! - Group isolation by (parent, category)
//! - Depth and ancestor-chain queries
//! - Cycle guard (is_ancestor)
//! - Subtree enumeration

use chrono::{Duration, TimeZone, Utc};
use questline_core::index::ForestIndex;
use questline_core::models::{Category, Node};
use serde_json::json;

fn node_created(
    id: &str,
    parent: Option<&str>,
    category: Category,
    order_key: f64,
    seq: i64,
) -> Node {
    let created = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap() + Duration::seconds(seq);
    Node {
        id: id.to_string(),
        parent_id: parent.map(str::to_string),
        category,
        order_key,
        created_at: created,
        modified_at: created,
        title: format!("Quest {id}"),
        properties: json!({}),
    }
}

fn node(id: &str, parent: Option<&str>, category: Category, order_key: f64) -> Node {
    node_created(id, parent, category, order_key, 0)
}

fn ids(nodes: &[&Node]) -> Vec<String> {
    nodes.iter().map(|n| n.id.clone()).collect()
}

// =========================================================================
// Sibling Ordering Tests
// =========================================================================

#[test]
fn test_siblings_sorted_by_order_key() {
    let nodes = vec![
        node("c", None, Category::Main, 300.0),
        node("a", None, Category::Main, 100.0),
        node("b", None, Category::Main, 200.0),
    ];
    let index = ForestIndex::new(&nodes);
    assert_eq!(
        ids(index.siblings_of(None, Category::Main)),
        vec!["a", "b", "c"]
    );
}

#[test]
fn test_equal_keys_tie_break_on_created_at() {
    // "late" was inserted into the vec first; only created_at may decide
    let nodes = vec![
        node_created("late", None, Category::Main, 100.0, 30),
        node_created("early", None, Category::Main, 100.0, 10),
    ];
    let index = ForestIndex::new(&nodes);
    assert_eq!(
        ids(index.siblings_of(None, Category::Main)),
        vec!["early", "late"]
    );
}

#[test]
fn test_sibling_order_is_unique_and_stable() {
    let nodes = vec![
        node_created("a", None, Category::Main, 100.0, 1),
        node_created("b", None, Category::Main, 100.0, 2),
        node_created("c", None, Category::Main, 100.0, 3),
    ];
    let index = ForestIndex::new(&nodes);
    let first = ids(index.siblings_of(None, Category::Main));
    let again = ids(index.siblings_of(None, Category::Main));
    assert_eq!(first, again);
    assert_eq!(first.len(), 3);
}

#[test]
fn test_groups_do_not_mix_parents_or_categories() {
    let nodes = vec![
        node("root-main", None, Category::Main, 100.0),
        node("root-side", None, Category::Side, 100.0),
        node("child", Some("root-main"), Category::Main, 100.0),
    ];
    let index = ForestIndex::new(&nodes);
    assert_eq!(ids(index.siblings_of(None, Category::Main)), vec!["root-main"]);
    assert_eq!(ids(index.siblings_of(None, Category::Side)), vec!["root-side"]);
    assert_eq!(
        ids(index.siblings_of(Some("root-main"), Category::Main)),
        vec!["child"]
    );
    assert!(index.siblings_of(Some("root-side"), Category::Main).is_empty());
}

// =========================================================================
// Depth and Ancestor Tests
// =========================================================================

fn chain() -> Vec<Node> {
    vec![
        node("r", None, Category::Main, 100.0),
        node("c", Some("r"), Category::Main, 100.0),
        node("g", Some("c"), Category::Main, 100.0),
    ]
}

#[test]
fn test_depth_of() {
    let nodes = chain();
    let index = ForestIndex::new(&nodes);
    assert_eq!(index.depth_of("r"), Some(0));
    assert_eq!(index.depth_of("c"), Some(1));
    assert_eq!(index.depth_of("g"), Some(2));
    assert_eq!(index.depth_of("missing"), None);
}

#[test]
fn test_ancestor_at_depth_walks_to_absolute_depth() {
    let nodes = chain();
    let index = ForestIndex::new(&nodes);
    assert_eq!(index.ancestor_at_depth("g", 1), Some("c"));
}

#[test]
fn test_ancestor_at_depth_zero_or_negative_promotes_to_root() {
    let nodes = chain();
    let index = ForestIndex::new(&nodes);
    assert_eq!(index.ancestor_at_depth("g", 0), None);
    assert_eq!(index.ancestor_at_depth("g", -1), None);
}

#[test]
fn test_ancestor_at_depth_unreachable() {
    let nodes = chain();
    let index = ForestIndex::new(&nodes);
    // A node is not its own ancestor, and deeper levels do not exist
    assert_eq!(index.ancestor_at_depth("g", 2), None);
    assert_eq!(index.ancestor_at_depth("g", 5), None);
    assert_eq!(index.ancestor_at_depth("c", 1), None);
}

#[test]
fn test_is_ancestor() {
    let nodes = chain();
    let index = ForestIndex::new(&nodes);
    assert!(index.is_ancestor("r", "g"));
    assert!(index.is_ancestor("c", "g"));
    assert!(!index.is_ancestor("g", "r"));
    // The chain starts at the node itself
    assert!(index.is_ancestor("g", "g"));
    assert!(!index.is_ancestor("missing", "g"));
}

// =========================================================================
// Subtree Tests
// =========================================================================

#[test]
fn test_descendants_parents_before_children() {
    let nodes = vec![
        node("r", None, Category::Main, 100.0),
        node("c1", Some("r"), Category::Main, 100.0),
        node("c2", Some("r"), Category::Main, 200.0),
        node("g", Some("c1"), Category::Main, 100.0),
    ];
    let index = ForestIndex::new(&nodes);
    let descendants = ids(&index.descendants_of("r"));
    assert_eq!(descendants, vec!["c1", "c2", "g"]);
}

#[test]
fn test_descendants_cover_stale_categories() {
    // A child whose lane drifted out of sync must still be found
    let nodes = vec![
        node("r", None, Category::Main, 100.0),
        node("stale", Some("r"), Category::Side, 100.0),
    ];
    let index = ForestIndex::new(&nodes);
    assert_eq!(ids(&index.descendants_of("r")), vec!["stale"]);
}

#[test]
fn test_get_and_contains() {
    let nodes = chain();
    let index = ForestIndex::new(&nodes);
    assert!(index.contains("r"));
    assert!(!index.contains("missing"));
    assert_eq!(index.get("c").map(|n| n.id.as_str()), Some("c"));
    assert!(index.get("missing").is_none());
}
