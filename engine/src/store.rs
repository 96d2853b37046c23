//! ItemStore - the canonical in-memory mirror of a collection.
//!
//! The store holds every item the backend reported plus the canonical order.
//! It is a reducer: state changes only through the named operations below,
//! and each change bumps a revision counter that identifies the current
//! `(items, order)` tuple.

use crate::{error::Result, Error, Item, ItemId, Revision};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Arena of items plus their canonical order.
///
/// Invariant: the ids in `order` are exactly the keys of `items`, without
/// duplicates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStore {
    /// Items by id
    items: HashMap<ItemId, Item>,
    /// Canonical display order
    order: Vec<ItemId>,
    /// Position of each item in the load payload it arrived with
    ranks: HashMap<ItemId, usize>,
    /// Bumped on every mutation
    revision: Revision,
}

impl ItemStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire canonical set and order.
    ///
    /// Used for the initial fetch and for full resyncs. The payload order
    /// becomes the canonical order. Rejects payloads with duplicate ids and
    /// leaves the store untouched in that case.
    pub fn load(&mut self, items: Vec<Item>) -> Result<()> {
        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(Error::DuplicateItem(item.id.clone()));
            }
        }

        self.order = items.iter().map(|item| item.id.clone()).collect();
        self.ranks = self
            .order
            .iter()
            .enumerate()
            .map(|(rank, id)| (id.clone(), rank))
            .collect();
        self.items = items
            .into_iter()
            .map(|item| (item.id.clone(), item))
            .collect();
        self.revision += 1;

        Ok(())
    }

    /// Remove an item and its slot in the order.
    ///
    /// Returns the removed item with the index and rank it had, which is
    /// everything needed to put it back.
    pub fn apply_removal(&mut self, id: &str) -> Result<(Item, usize, usize)> {
        let index = self
            .position(id)
            .ok_or_else(|| Error::ItemNotFound(id.to_string()))?;

        self.order.remove(index);
        let item = self
            .items
            .remove(id)
            .ok_or_else(|| Error::ItemNotFound(id.to_string()))?;
        let rank = self.ranks.remove(id).unwrap_or(index);
        self.revision += 1;

        Ok((item, index, rank))
    }

    /// Replace the canonical order.
    ///
    /// The new order must be a permutation of the current membership.
    pub fn apply_reorder(&mut self, ordered_ids: &[ItemId]) -> Result<()> {
        if ordered_ids.len() != self.order.len() {
            return Err(Error::OrderMismatch {
                expected: self.order.len(),
                actual: ordered_ids.len(),
            });
        }

        let mut seen = HashSet::with_capacity(ordered_ids.len());
        for id in ordered_ids {
            if !self.items.contains_key(id) {
                return Err(Error::UnknownOrderEntry(id.clone()));
            }
            if !seen.insert(id.as_str()) {
                return Err(Error::DuplicateItem(id.clone()));
            }
        }

        self.order = ordered_ids.to_vec();
        self.revision += 1;

        Ok(())
    }

    /// Put a previously removed item back at `index` (clamped to the end).
    pub fn restore_item(&mut self, item: Item, index: usize, rank: usize) -> Result<()> {
        if self.items.contains_key(&item.id) {
            return Err(Error::DuplicateItem(item.id));
        }

        let index = index.min(self.order.len());
        self.order.insert(index, item.id.clone());
        self.ranks.insert(item.id.clone(), rank);
        self.items.insert(item.id.clone(), item);
        self.revision += 1;

        Ok(())
    }

    /// Current `(items, order)`.
    pub fn view(&self) -> (&HashMap<ItemId, Item>, &[ItemId]) {
        (&self.items, &self.order)
    }

    /// Get an item by ID.
    pub fn get(&self, id: &str) -> Option<&Item> {
        self.items.get(id)
    }

    /// Check if an item is a member.
    pub fn contains(&self, id: &str) -> bool {
        self.items.contains_key(id)
    }

    /// Index of an item in the canonical order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.order.iter().position(|candidate| candidate == id)
    }

    /// Load-order rank of an item, used as the date tie-break.
    pub fn rank(&self, id: &str) -> Option<usize> {
        self.ranks.get(id).copied()
    }

    /// Canonical order.
    pub fn order(&self) -> &[ItemId] {
        &self.order
    }

    /// Items by id.
    pub fn items(&self) -> &HashMap<ItemId, Item> {
        &self.items
    }

    /// Items in canonical order.
    pub fn items_in_order(&self) -> impl Iterator<Item = &Item> {
        self.order.iter().filter_map(|id| self.items.get(id))
    }

    /// Identity of the current `(items, order)` tuple.
    pub fn revision(&self) -> Revision {
        self.revision
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the store holds no items.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
