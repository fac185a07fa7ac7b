//! Node Data Structures
//!
//! This module defines the core `Node` struct and the `Category` lane enum
//! for Questline's quest forest.
//!
//! # Architecture
//!
//! - **Strict record**: the engine only ever operates on fully-typed nodes;
//!   duck-typed rows from the remote store are converted via [`Node::from_row`]
//! - **Forest shape**: `parent_id = None` makes a node a root of its category;
//!   a node shares its category with its whole subtree
//! - **Sibling order**: ascending `order_key`, ties broken by `created_at`
//!   (never by insertion order into memory)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::ordering::OrderKeyCalculator;

/// Validation errors for Node boundary conversion
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid node ID format: {0}")]
    InvalidId(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid parent reference: {0}")]
    InvalidParent(String),

    #[error("Invalid row shape: {0}")]
    InvalidRow(String),
}

/// Lane a quest lives in.
///
/// A node's category is shared with all of its descendants; moving a node
/// across categories moves its whole subtree (see the executor's cascade
/// output). Sibling groups never mix categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Main,
    Side,
    Inactive,
}

impl Category {
    /// All lanes, in display order
    pub const ALL: [Self; 3] = [Self::Main, Self::Side, Self::Inactive];

    /// Stable string form, matching the stored row value
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Side => "side",
            Self::Inactive => "inactive",
        }
    }

    /// Parse a stored category value
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        match raw {
            "main" => Ok(Self::Main),
            "side" => Ok(Self::Side),
            "inactive" => Ok(Self::Inactive),
            other => Err(ValidationError::InvalidCategory(other.to_string())),
        }
    }
}

/// A single quest in the forest.
///
/// # Fields
///
/// - `id`: Unique identifier (UUID v4 for locally created nodes)
/// - `parent_id`: Optional reference to the parent node; `None` = root of
///   its category
/// - `category`: Lane shared by the node and its subtree
/// - `order_key`: Real-number sibling sort key (see [`crate::ordering`])
/// - `created_at` / `modified_at`: Timestamps; `created_at` is the stable
///   tie-break for equal order keys
/// - `title`: Display title (opaque to the engine)
/// - `properties`: Arbitrary payload fields (opaque to the engine)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier
    pub id: String,

    /// Parent node ID (None = root of its category)
    pub parent_id: Option<String>,

    /// Lane the node (and its subtree) lives in
    pub category: Category,

    /// Fractional sibling sort key
    pub order_key: f64,

    /// Creation timestamp (sibling tie-break key)
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub modified_at: DateTime<Utc>,

    /// Display title
    pub title: String,

    /// Entity-specific payload, opaque to the engine
    #[serde(default)]
    pub properties: serde_json::Value,
}

impl Node {
    /// Create a new Node with an auto-generated UUID.
    ///
    /// The caller supplies the order key; use
    /// [`crate::operations::MoveExecutor::plan_insertion`] to append at the
    /// end of a sibling group.
    pub fn new(
        title: String,
        category: Category,
        parent_id: Option<String>,
        order_key: f64,
        properties: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            parent_id,
            category,
            order_key,
            created_at: now,
            modified_at: now,
            title,
            properties,
        }
    }

    /// Create a new Node with an explicit ID.
    ///
    /// Used when the frontend pre-generates IDs for optimistic updates.
    pub fn new_with_id(
        id: String,
        title: String,
        category: Category,
        parent_id: Option<String>,
        order_key: f64,
        properties: serde_json::Value,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            parent_id,
            category,
            order_key,
            created_at: now,
            modified_at: now,
            title,
            properties,
        }
    }

    /// Convert a duck-typed row from the remote store into a strict `Node`.
    ///
    /// Coercion rules:
    ///
    /// - `id` and `category` are required; a malformed category is rejected
    /// - `orderKey` degrades to `0.0` when missing or non-finite (the engine
    ///   re-keys such rows on the next reindex rather than failing reads)
    /// - timestamps fall back to "now" when missing or unparsable
    /// - `title` defaults to empty, `properties` to an empty object
    ///
    /// # Examples
    ///
    /// ```rust
    /// use questline_core::models::{Category, Node};
    /// use serde_json::json;
    ///
    /// let node = Node::from_row(json!({
    ///     "id": "quest-1",
    ///     "parentId": null,
    ///     "category": "main",
    ///     "orderKey": "100",
    ///     "title": "Fix the beacon"
    /// }))
    /// .unwrap();
    /// assert_eq!(node.order_key, 100.0);
    /// assert_eq!(node.category, Category::Main);
    /// ```
    pub fn from_row(row: serde_json::Value) -> Result<Self, ValidationError> {
        let obj = row
            .as_object()
            .ok_or_else(|| ValidationError::InvalidRow("expected a JSON object".to_string()))?;

        let id = match obj.get("id") {
            Some(serde_json::Value::String(s)) if !s.is_empty() => s.clone(),
            Some(other) => return Err(ValidationError::InvalidId(other.to_string())),
            None => return Err(ValidationError::MissingField("id".to_string())),
        };

        let parent_id = match obj.get("parentId") {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Some(other) => return Err(ValidationError::InvalidParent(other.to_string())),
        };

        let category = match obj.get("category") {
            Some(serde_json::Value::String(s)) => Category::parse(s)?,
            Some(other) => return Err(ValidationError::InvalidCategory(other.to_string())),
            None => return Err(ValidationError::MissingField("category".to_string())),
        };

        let order_key = obj
            .get("orderKey")
            .map(|raw| OrderKeyCalculator::coerce_key(raw, 0.0))
            .unwrap_or(0.0);

        let created_at = parse_timestamp(obj.get("createdAt"));
        let modified_at = parse_timestamp(obj.get("modifiedAt"));

        let title = obj
            .get("title")
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default()
            .to_string();

        let properties = obj
            .get("properties")
            .cloned()
            .unwrap_or_else(|| serde_json::Value::Object(serde_json::Map::new()));

        Ok(Self {
            id,
            parent_id,
            category,
            order_key,
            created_at,
            modified_at,
            title,
            properties,
        })
    }
}

fn parse_timestamp(raw: Option<&serde_json::Value>) -> DateTime<Utc> {
    raw.and_then(serde_json::Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}
