//! Item type mirrored from the backend.

use crate::{ItemId, Timestamp};
use serde::{Deserialize, Serialize};

/// A collection item as the backend reports it.
///
/// Content fields are owned by the backend; the engine only ever changes
/// whether an item is a member of the collection and where it sits in the
/// order. Fields the engine does not interpret are kept in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Unique identifier for this item
    pub id: ItemId,
    /// Owner of the item (user or team reference)
    pub owner_ref: String,
    /// When the item was added (milliseconds since epoch)
    pub created_at: Timestamp,
    /// Category label used by the category filter
    pub category: String,
    /// Display title
    pub title: String,
    /// Optional free-text description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Remaining backend fields, untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Item {
    /// Create a new item without description or extra fields.
    pub fn new(
        id: impl Into<ItemId>,
        owner_ref: impl Into<String>,
        created_at: Timestamp,
        category: impl Into<String>,
        title: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            owner_ref: owner_ref.into(),
            created_at,
            category: category.into(),
            title: title.into(),
            description: None,
            extra: serde_json::Map::new(),
        }
    }

    /// Attach a description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Case-insensitive substring match against title, description and
    /// category. `needle` must already be lowercased.
    pub fn matches_query(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle)
            || self.category.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}
