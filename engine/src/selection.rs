//! SelectionManager state.

use crate::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

/// The set of selected item ids.
///
/// Invariant: a subset of the ids in the most recently computed view. The
/// owner calls [`SelectionSet::retain_visible`] whenever the view changes.
/// Uses a BTreeSet so iteration order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    ids: BTreeSet<ItemId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the selection state of one id. Returns whether it is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    /// Select everything currently visible, and only that.
    pub fn select_all<'a>(&mut self, visible_ids: impl IntoIterator<Item = &'a ItemId>) {
        self.ids = visible_ids.into_iter().cloned().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Drop ids that are no longer visible. Returns how many were pruned.
    pub fn retain_visible(&mut self, visible_ids: &[ItemId]) -> usize {
        let before = self.ids.len();
        let visible: HashSet<&str> = visible_ids.iter().map(String::as_str).collect();
        self.ids.retain(|id| visible.contains(id.as_str()));
        before - self.ids.len()
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Selected ids in sorted order.
    pub fn ids(&self) -> Vec<ItemId> {
        self.ids.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
