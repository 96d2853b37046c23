//! One open collection.
//!
//! [`CollectionSession`] wires the shared state, the backend, the debouncer
//! and the coordinators together behind the operations a collection page
//! offers. All methods take `&self`, so a session behind an `Rc` can serve
//! several concurrent operations on the same thread.

use crate::api::{CollectionApi, RemoteCollection};
use crate::bulk::{BulkOperationCoordinator, BulkReport};
use crate::config::ClientConfig;
use crate::debounce::SearchDebouncer;
use crate::error::{ApiError, Result, SyncError};
use crate::mutator::{MutationReport, OptimisticMutator, SharedState};
use crate::reorder::{ReorderCoordinator, ReorderOutcome};
use shelf_engine::{
    CollectionId, CollectionState, DecoratedItem, ItemId, LocalEffect, SortCriteria,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Client-side state and operations for one collection.
#[derive(Debug)]
pub struct CollectionSession<A> {
    state: SharedState,
    remote: RemoteCollection<A>,
    mutator: OptimisticMutator<A>,
    reorders: ReorderCoordinator<A>,
    bulk: BulkOperationCoordinator<A>,
    debouncer: SearchDebouncer,
    unrecoverable: Cell<bool>,
}

impl<A: CollectionApi> CollectionSession<A> {
    pub fn new(api: Rc<A>, collection: impl Into<CollectionId>, config: &ClientConfig) -> Self {
        let state: SharedState = Rc::new(RefCell::new(CollectionState::new()));
        let remote = RemoteCollection::new(api, collection, config.request_timeout);
        let mutator = OptimisticMutator::new(Rc::clone(&state), remote.clone());

        Self {
            reorders: ReorderCoordinator::new(mutator.clone()),
            bulk: BulkOperationCoordinator::new(mutator.clone(), config.bulk_failure_policy),
            debouncer: SearchDebouncer::new(config.debounce),
            unrecoverable: Cell::new(false),
            state,
            remote,
            mutator,
        }
    }

    pub fn collection(&self) -> &str {
        self.remote.collection()
    }

    /// Whether the collection was found to be gone. Every operation fails
    /// with [`SyncError::Unrecoverable`] from then on.
    pub fn is_unrecoverable(&self) -> bool {
        self.unrecoverable.get()
    }

    fn ensure_recoverable(&self) -> Result<()> {
        if self.is_unrecoverable() {
            return Err(SyncError::Unrecoverable(self.collection().to_string()));
        }
        Ok(())
    }

    /// Replace everything with the backend's item list. Selection and
    /// overlays are reset.
    pub async fn load(&self) -> Result<usize> {
        self.ensure_recoverable()?;

        match self.remote.fetch().await {
            Ok(items) => {
                let count = items.len();
                self.state.borrow_mut().load(items)?;
                tracing::info!(collection = %self.collection(), items = count, "Collection loaded");
                Ok(count)
            }
            Err(ApiError::NotFound(_)) => {
                self.unrecoverable.set(true);
                tracing::error!(collection = %self.collection(), "Collection not found");
                Err(SyncError::Unrecoverable(self.collection().to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    // ------------------------------------------------------------------
    // View
    // ------------------------------------------------------------------

    /// Debounced search input. Resolves to the query that took effect, or
    /// `None` if this keystroke was superseded or changed nothing.
    pub async fn search(&self, raw: &str) -> Option<String> {
        let query = self.debouncer.submit(raw).await?;
        self.state.borrow_mut().set_search_query(query.clone());
        tracing::debug!(query = %query, "Search query applied");
        Some(query)
    }

    pub fn set_category(&self, category: &str) {
        self.state.borrow_mut().set_category(category);
    }

    pub fn set_sort(&self, sort: SortCriteria) {
        self.state.borrow_mut().set_sort(sort);
    }

    /// Visible ids in display order.
    pub fn view(&self) -> Vec<ItemId> {
        self.state.borrow_mut().view()
    }

    /// Run `f` over the decorated view.
    ///
    /// The state stays borrowed while `f` runs; `f` must not call back into
    /// the session.
    pub fn with_decorated_view<R>(&self, f: impl FnOnce(&[DecoratedItem<'_>]) -> R) -> R {
        let mut state = self.state.borrow_mut();
        let view = state.decorated_view();
        f(&view)
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn toggle_selection(&self, id: &str) -> Result<bool> {
        Ok(self.state.borrow_mut().toggle_selection(id)?)
    }

    pub fn select_all_visible(&self) {
        self.state.borrow_mut().select_all_visible();
    }

    pub fn clear_selection(&self) {
        self.state.borrow_mut().clear_selection();
    }

    pub fn selected(&self) -> Vec<ItemId> {
        self.state.borrow().selection().ids()
    }

    // ------------------------------------------------------------------
    // Mutations
    // ------------------------------------------------------------------

    pub async fn reorder(&self, order: Vec<ItemId>) -> Result<ReorderOutcome> {
        self.ensure_recoverable()?;
        self.guard(self.reorders.reorder(order).await)
    }

    pub async fn move_item(&self, from: usize, to: usize) -> Result<ReorderOutcome> {
        self.ensure_recoverable()?;
        self.guard(self.reorders.move_item(from, to).await)
    }

    pub async fn remove_item(&self, id: &str) -> Result<MutationReport> {
        self.ensure_recoverable()?;
        self.mutator.run(LocalEffect::Remove(id.to_string())).await
    }

    /// Remove every selected item.
    pub async fn bulk_remove(&self) -> Result<BulkReport> {
        self.ensure_recoverable()?;
        self.bulk.remove_selected().await
    }

    pub async fn toggle_favorite(&self, id: &str) -> Result<MutationReport> {
        self.ensure_recoverable()?;
        self.mutator
            .run(LocalEffect::ToggleFavorite(id.to_string()))
            .await
    }

    /// Set the note for one item; empty text clears it.
    pub async fn set_note(&self, id: &str, note: &str) -> Result<MutationReport> {
        self.ensure_recoverable()?;
        self.mutator
            .run(LocalEffect::SetNote {
                id: id.to_string(),
                note: note.to_string(),
            })
            .await
    }

    /// Number of mutations applied locally and still waiting on the backend.
    pub fn pending_mutations(&self) -> usize {
        self.state.borrow().ledger().len()
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    /// Latch the unrecoverable flag when a coordinator finds the collection
    /// gone.
    fn guard<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(SyncError::Unrecoverable(_)) = &result {
            self.unrecoverable.set(true);
        }
        result
    }
}
