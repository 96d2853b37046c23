//! JSON bodies exchanged with the collection backend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shelf_engine::{Item, ItemId};

/// Response of `GET /collections/{id}/items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemsResponse {
    pub items: Vec<WireItem>,
}

/// An item as the backend sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireItem {
    pub id: ItemId,
    pub owner_ref: String,
    pub created_at: DateTime<Utc>,
    pub category: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<WireItem> for Item {
    fn from(wire: WireItem) -> Self {
        // Timestamps before the epoch sort as the oldest possible item
        let created_at = wire.created_at.timestamp_millis().max(0) as u64;
        let mut item = Item::new(
            wire.id,
            wire.owner_ref,
            created_at,
            wire.category,
            wire.title,
        );
        item.description = wire.description;
        item.extra = wire.extra;
        item
    }
}

impl From<&Item> for WireItem {
    fn from(item: &Item) -> Self {
        let created_at =
            DateTime::<Utc>::from_timestamp_millis(item.created_at as i64).unwrap_or_default();
        Self {
            id: item.id.clone(),
            owner_ref: item.owner_ref.clone(),
            created_at,
            category: item.category.clone(),
            title: item.title.clone(),
            description: item.description.clone(),
            extra: item.extra.clone(),
        }
    }
}

/// Body of `DELETE /collections/{id}/items`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteItemBody {
    pub item_id: ItemId,
}

/// Body of `PUT /collections/{id}/reorder`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderBody {
    pub item_ids: Vec<ItemId>,
}

/// Body of `POST /collections/{id}/items/{item_id}/favorite`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteBody {
    pub favorite: bool,
}

/// Body of `POST /collections/{id}/items/{item_id}/note`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteBody {
    pub note: String,
}
