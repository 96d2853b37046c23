//! Local effects describing optimistic changes.
//!
//! Changes are expressed as descriptors rather than closures, so the ledger
//! can snapshot exactly what an effect touches before applying it.

use crate::ItemId;
use serde::{Deserialize, Serialize};

/// A change applied to local state ahead of backend confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum LocalEffect {
    /// Remove one item from the collection
    Remove(ItemId),
    /// Replace the canonical order
    Reorder(Vec<ItemId>),
    /// Flip the favorite flag; resolved to `SetFavorite` when applied
    ToggleFavorite(ItemId),
    /// Set the favorite flag
    SetFavorite { id: ItemId, favorite: bool },
    /// Set the note text; empty text clears it
    SetNote { id: ItemId, note: String },
}

impl LocalEffect {
    /// The single item this effect targets, if any.
    ///
    /// Reorders touch the whole order and have no target.
    pub fn target(&self) -> Option<&ItemId> {
        match self {
            LocalEffect::Remove(id) | LocalEffect::ToggleFavorite(id) => Some(id),
            LocalEffect::SetFavorite { id, .. } | LocalEffect::SetNote { id, .. } => Some(id),
            LocalEffect::Reorder(_) => None,
        }
    }

    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            LocalEffect::Remove(_) => "remove",
            LocalEffect::Reorder(_) => "reorder",
            LocalEffect::ToggleFavorite(_) => "toggleFavorite",
            LocalEffect::SetFavorite { .. } => "setFavorite",
            LocalEffect::SetNote { .. } => "setNote",
        }
    }
}
