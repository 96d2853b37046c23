//! Drag-and-drop reordering with last-write-wins semantics.
//!
//! Every reorder is applied locally right away and gets a fresh sequence
//! number. When its response arrives, it is acted on only if no newer
//! reorder was issued in the meantime. A current reorder that fails is not
//! rolled back to its snapshot; the collection is refetched instead, since
//! other mutations may have landed on top of the old order. The snapshot is
//! only restored when that refetch fails as well.

use crate::api::CollectionApi;
use crate::error::{ApiError, Result, SyncError};
use crate::mutator::OptimisticMutator;
use shelf_engine::{Error, ItemId, LocalEffect, MutationTicket, Sequence};

/// What happened to a reorder that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorderOutcome {
    /// The backend accepted the latest order
    Committed(Sequence),
    /// A newer reorder was issued before the response arrived
    Superseded(Sequence),
}

impl ReorderOutcome {
    pub fn sequence(&self) -> Sequence {
        match self {
            ReorderOutcome::Committed(sequence) | ReorderOutcome::Superseded(sequence) => *sequence,
        }
    }
}

/// Issues reorders for one collection.
#[derive(Debug)]
pub struct ReorderCoordinator<A> {
    mutator: OptimisticMutator<A>,
}

impl<A> Clone for ReorderCoordinator<A> {
    fn clone(&self) -> Self {
        Self {
            mutator: self.mutator.clone(),
        }
    }
}

impl<A: CollectionApi> ReorderCoordinator<A> {
    pub fn new(mutator: OptimisticMutator<A>) -> Self {
        Self { mutator }
    }

    /// Replace the canonical order with `order`.
    ///
    /// # Errors
    ///
    /// - [`SyncError::Validation`] if `order` is not a permutation of the
    ///   current items; nothing is sent.
    /// - [`SyncError::Network`] carrying the reorder's own failure if the
    ///   backend rejected the current reorder. By the time this returns the
    ///   collection has been resynced, or, if the resync fetch failed as
    ///   well, the previous order has been restored.
    /// - [`SyncError::Stale`] if the reorder failed but a newer one was
    ///   issued while the resync was in flight.
    /// - [`SyncError::Unrecoverable`] if the resync found the collection gone.
    pub async fn reorder(&self, order: Vec<ItemId>) -> Result<ReorderOutcome> {
        let ticket = self.mutator.begin(LocalEffect::Reorder(order))?;
        let sequence = ticket.sequence;
        tracing::debug!(sequence, "Reorder applied locally");

        let outcome = self.mutator.dispatch(&ticket).await;

        let state = self.mutator.state();
        if !state.borrow().is_current_reorder(sequence) {
            state.borrow_mut().supersede(ticket.id)?;
            tracing::debug!(
                sequence,
                latest = state.borrow().latest_reorder(),
                "Reorder response superseded"
            );
            return Ok(ReorderOutcome::Superseded(sequence));
        }

        match outcome {
            Ok(()) => {
                state.borrow_mut().commit(ticket.id)?;
                tracing::debug!(sequence, "Reorder committed");
                Ok(ReorderOutcome::Committed(sequence))
            }
            Err(error) => self.resync(ticket, error).await,
        }
    }

    /// Move the item at `from` to `to` in the canonical order.
    pub async fn move_item(&self, from: usize, to: usize) -> Result<ReorderOutcome> {
        let mut order = self.mutator.state().borrow().store().order().to_vec();
        let len = order.len();
        for index in [from, to] {
            if index >= len {
                return Err(SyncError::Validation(Error::MoveOutOfBounds { index, len }));
            }
        }

        let id = order.remove(from);
        order.insert(to, id);
        self.reorder(order).await
    }

    /// Replace local state with the backend's after a failed reorder.
    ///
    /// The mutation stays pending while the fetch is in flight. If the fetch
    /// fails too, its snapshot is restored, so the store never keeps an
    /// order the backend rejected.
    async fn resync(&self, ticket: MutationTicket, cause: ApiError) -> Result<ReorderOutcome> {
        let sequence = ticket.sequence;
        let state = self.mutator.state();
        tracing::warn!(sequence, error = %cause, "Reorder failed, resyncing collection");

        let fetched = self.mutator.remote().fetch().await;

        if let Err(ApiError::NotFound(_)) = fetched {
            state.borrow_mut().abandon(ticket.id)?;
            return Err(SyncError::Unrecoverable(
                self.mutator.remote().collection().to_string(),
            ));
        }

        if !state.borrow().is_current_reorder(sequence) {
            state.borrow_mut().abandon(ticket.id)?;
            tracing::debug!(sequence, "Resync result discarded, newer reorder issued");
            return Err(SyncError::Stale(sequence));
        }

        let items = match fetched {
            Ok(items) => items,
            Err(fetch_error) => {
                let restored = state.borrow_mut().rollback(ticket.id);
                tracing::warn!(
                    sequence,
                    error = %fetch_error,
                    "Resync failed, previous order restored"
                );
                if let Err(e) = restored {
                    tracing::warn!(sequence, error = %e, "Previous order not restored");
                }
                return Err(SyncError::Network(cause));
            }
        };

        state.borrow_mut().abandon(ticket.id)?;
        let count = items.len();
        state.borrow_mut().resync(items)?;
        tracing::info!(sequence, items = count, "Collection resynced");

        Err(SyncError::Network(cause))
    }
}
