//! Favorite and note overlays.
//!
//! Client-local per-item state that is merged into the view at read time and
//! never written into [`crate::ItemStore`].

use crate::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    favorites: HashMap<ItemId, bool>,
    notes: HashMap<ItemId, String>,
}

impl Overlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.get(id).copied().unwrap_or(false)
    }

    /// Raw favorite entry, `None` if never set.
    pub fn favorite_entry(&self, id: &str) -> Option<bool> {
        self.favorites.get(id).copied()
    }

    pub fn note(&self, id: &str) -> Option<&str> {
        self.notes.get(id).map(String::as_str)
    }

    /// Set or clear (`None`) the favorite entry for an item.
    pub fn put_favorite(&mut self, id: &str, favorite: Option<bool>) {
        match favorite {
            Some(value) => {
                self.favorites.insert(id.to_string(), value);
            }
            None => {
                self.favorites.remove(id);
            }
        }
    }

    /// Set or clear the note for an item. Empty text clears it.
    pub fn put_note(&mut self, id: &str, note: Option<String>) {
        match note {
            Some(text) if !text.is_empty() => {
                self.notes.insert(id.to_string(), text);
            }
            _ => {
                self.notes.remove(id);
            }
        }
    }

    /// Forget everything (full reload).
    pub fn clear(&mut self) {
        self.favorites.clear();
        self.notes.clear();
    }
}
