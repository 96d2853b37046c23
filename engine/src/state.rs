//! CollectionState - everything one collection page keeps in memory.
//!
//! Combines the store, the derived view, the selection, the overlays and the
//! mutation ledger, and is the only place optimistic effects are applied and
//! reverted.

use crate::{
    error::Result, Error, FilterCriteria, Item, ItemId, ItemStore, LocalEffect, MutationId,
    MutationLedger, MutationStatus, MutationTicket, Overlay, PendingMutation, SelectionSet,
    Sequence, Snapshot, SortCriteria, ViewMemo,
};
use serde::Serialize;

/// One visible item with its client-local decorations merged in.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecoratedItem<'a> {
    #[serde(flatten)]
    pub item: &'a Item,
    pub favorite: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<&'a str>,
    pub selected: bool,
}

/// In-memory state for one collection.
#[derive(Debug, Clone, Default)]
pub struct CollectionState {
    store: ItemStore,
    overlay: Overlay,
    selection: SelectionSet,
    filter: FilterCriteria,
    sort: SortCriteria,
    memo: ViewMemo,
    ledger: MutationLedger,
    /// Sequence of the most recent reorder mutation
    latest_reorder: Sequence,
}

impl CollectionState {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Loading
    // ------------------------------------------------------------------

    /// Full reload: replace the store and reset client-local state
    /// (selection and overlays).
    pub fn load(&mut self, items: Vec<Item>) -> Result<()> {
        self.store.load(items)?;
        self.overlay.clear();
        self.selection.clear();
        Ok(())
    }

    /// Resync after a failed reorder: replace the store with the backend's
    /// authoritative list, keeping overlays. Selection is pruned on the next
    /// view computation.
    pub fn resync(&mut self, items: Vec<Item>) -> Result<()> {
        self.store.load(items)
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    pub fn filter(&self) -> &FilterCriteria {
        &self.filter
    }

    pub fn sort(&self) -> SortCriteria {
        self.sort
    }

    pub fn set_filter(&mut self, filter: FilterCriteria) {
        self.filter = filter;
    }

    pub fn set_search_query(&mut self, query: impl Into<String>) {
        self.filter.search_query = query.into();
    }

    pub fn set_category(&mut self, category: impl Into<String>) {
        self.filter.category = category.into();
    }

    pub fn set_sort(&mut self, sort: SortCriteria) {
        self.sort = sort;
    }

    /// Current visible ids. Prunes the selection whenever the view had to be
    /// recomputed.
    pub fn view(&mut self) -> Vec<ItemId> {
        let (view, recomputed) = self.memo.get(&self.store, &self.filter, &self.sort);
        if recomputed {
            self.selection.retain_visible(view);
        }
        view.to_vec()
    }

    /// Visible items with favorite, note and selection merged in.
    pub fn decorated_view(&mut self) -> Vec<DecoratedItem<'_>> {
        let ids = self.view();
        ids.iter()
            .filter_map(|id| self.store.get(id))
            .map(|item| DecoratedItem {
                item,
                favorite: self.overlay.is_favorite(&item.id),
                note: self.overlay.note(&item.id),
                selected: self.selection.is_selected(&item.id),
            })
            .collect()
    }

    /// How many times the view has been derived from scratch.
    pub fn view_recomputations(&self) -> u64 {
        self.memo.recomputations()
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    /// Toggle one visible item. Ids outside the current view are rejected.
    pub fn toggle_selection(&mut self, id: &str) -> Result<bool> {
        let visible = self.view();
        if !visible.iter().any(|candidate| candidate == id) {
            return Err(Error::ItemNotFound(id.to_string()));
        }
        Ok(self.selection.toggle(id))
    }

    /// Select everything currently visible.
    pub fn select_all_visible(&mut self) {
        let visible = self.view();
        self.selection.select_all(&visible);
    }

    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    pub fn selection(&self) -> &SelectionSet {
        &self.selection
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    /// Snapshot what `effect` touches, apply it, and record it as pending.
    ///
    /// Nothing is recorded if the effect cannot be applied.
    pub fn begin(&mut self, effect: LocalEffect) -> Result<MutationTicket> {
        let (applied, snapshot) = match effect {
            LocalEffect::Remove(id) => {
                let (item, index, rank) = self.store.apply_removal(&id)?;
                (LocalEffect::Remove(id), Snapshot::Item { item, index, rank })
            }
            LocalEffect::Reorder(order) => {
                let previous = self.store.order().to_vec();
                self.store.apply_reorder(&order)?;
                (LocalEffect::Reorder(order), Snapshot::Order { order: previous })
            }
            LocalEffect::ToggleFavorite(id) => {
                let favorite = !self.overlay.is_favorite(&id);
                return self.begin(LocalEffect::SetFavorite { id, favorite });
            }
            LocalEffect::SetFavorite { id, favorite } => {
                self.require_member(&id)?;
                let previous = self.overlay.favorite_entry(&id);
                self.overlay.put_favorite(&id, Some(favorite));
                (
                    LocalEffect::SetFavorite {
                        id: id.clone(),
                        favorite,
                    },
                    Snapshot::Favorite { id, previous },
                )
            }
            LocalEffect::SetNote { id, note } => {
                self.require_member(&id)?;
                let previous = self.overlay.note(&id).map(str::to_string);
                self.overlay.put_note(&id, Some(note.clone()));
                (
                    LocalEffect::SetNote {
                        id: id.clone(),
                        note,
                    },
                    Snapshot::Note { id, previous },
                )
            }
        };

        let ticket = self.ledger.record(applied, snapshot);
        if matches!(ticket.effect, LocalEffect::Reorder(_)) {
            self.latest_reorder = ticket.sequence;
        }
        Ok(ticket)
    }

    /// Optimistically remove several items at once.
    ///
    /// Rejects an empty id list before touching anything. Ids that are no
    /// longer members are skipped, duplicates are removed once.
    ///
    /// Items are removed front to back in canonical order, so each snapshot
    /// index counts only the unselected items before it. Rolling back any
    /// subset of the returned tickets in reverse issue order therefore puts
    /// every item back at its original position relative to the items that
    /// stayed.
    pub fn begin_removals(&mut self, ids: &[ItemId]) -> Result<Vec<(ItemId, MutationTicket)>> {
        if ids.is_empty() {
            return Err(Error::EmptySelection);
        }

        let mut targets: Vec<(usize, &ItemId)> = ids
            .iter()
            .filter_map(|id| self.store.position(id).map(|position| (position, id)))
            .collect();
        targets.sort_unstable_by_key(|(position, _)| *position);
        targets.dedup_by_key(|(position, _)| *position);

        let mut tickets = Vec::with_capacity(targets.len());
        for (_, id) in targets {
            let ticket = self.begin(LocalEffect::Remove(id.clone()))?;
            tickets.push((id.clone(), ticket));
        }
        Ok(tickets)
    }

    /// Confirm a mutation and drop its snapshot.
    pub fn commit(&mut self, id: MutationId) -> Result<PendingMutation> {
        self.ledger.settle(id, MutationStatus::Committed)
    }

    /// Revert a mutation to its snapshot.
    pub fn rollback(&mut self, id: MutationId) -> Result<PendingMutation> {
        let mutation = self.ledger.settle(id, MutationStatus::RolledBack)?;
        mutation
            .snapshot
            .clone()
            .restore(&mut self.store, &mut self.overlay)?;
        Ok(mutation)
    }

    /// Mark a mutation rolled back without restoring its snapshot, because a
    /// resync is replacing the state it touched.
    pub fn abandon(&mut self, id: MutationId) -> Result<PendingMutation> {
        self.ledger.settle(id, MutationStatus::RolledBack)
    }

    /// Retire a mutation that a newer one made irrelevant.
    pub fn supersede(&mut self, id: MutationId) -> Result<PendingMutation> {
        self.ledger.settle(id, MutationStatus::Superseded)
    }

    /// Whether `sequence` belongs to the most recent reorder.
    pub fn is_current_reorder(&self, sequence: Sequence) -> bool {
        sequence != 0 && sequence == self.latest_reorder
    }

    pub fn latest_reorder(&self) -> Sequence {
        self.latest_reorder
    }

    pub fn ledger(&self) -> &MutationLedger {
        &self.ledger
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn store(&self) -> &ItemStore {
        &self.store
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    fn require_member(&self, id: &str) -> Result<()> {
        if self.store.contains(id) {
            Ok(())
        } else {
            Err(Error::ItemNotFound(id.to_string()))
        }
    }
}
