//! Snapshots taken before an optimistic effect is applied.
//!
//! A snapshot holds exactly the state one effect touches, never the whole
//! store, so rolling back one mutation leaves concurrent mutations on other
//! items alone.

use crate::{error::Result, Item, ItemId, ItemStore, Overlay};
use serde::{Deserialize, Serialize};

/// Pre-effect state for one mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Snapshot {
    /// A removed item and where it sat
    #[serde(rename_all = "camelCase")]
    Item { item: Item, index: usize, rank: usize },
    /// The canonical order before a reorder
    #[serde(rename_all = "camelCase")]
    Order { order: Vec<ItemId> },
    /// Previous favorite entry
    #[serde(rename_all = "camelCase")]
    Favorite { id: ItemId, previous: Option<bool> },
    /// Previous note
    #[serde(rename_all = "camelCase")]
    Note { id: ItemId, previous: Option<String> },
}

impl Snapshot {
    /// Put the captured state back.
    ///
    /// Restoring a removed item that is already present again (because a
    /// resync brought it back) is a no-op.
    pub fn restore(self, store: &mut ItemStore, overlay: &mut Overlay) -> Result<()> {
        match self {
            Snapshot::Item { item, index, rank } => {
                if store.contains(&item.id) {
                    return Ok(());
                }
                store.restore_item(item, index, rank)
            }
            Snapshot::Order { order } => store.apply_reorder(&order),
            Snapshot::Favorite { id, previous } => {
                overlay.put_favorite(&id, previous);
                Ok(())
            }
            Snapshot::Note { id, previous } => {
                overlay.put_note(&id, previous);
                Ok(())
            }
        }
    }

    /// The item this snapshot belongs to, if any.
    pub fn item_id(&self) -> Option<&str> {
        match self {
            Snapshot::Item { item, .. } => Some(&item.id),
            Snapshot::Favorite { id, .. } | Snapshot::Note { id, .. } => Some(id),
            Snapshot::Order { .. } => None,
        }
    }
}
