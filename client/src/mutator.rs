//! Optimistic mutation runner.
//!
//! Drives one [`LocalEffect`] through its lifecycle: wait for the item's
//! slot, apply locally, push to the backend, then commit or roll back.

use crate::api::{CollectionApi, RemoteCollection};
use crate::error::{ApiError, Result, SyncError};
use crate::queue::ItemQueues;
use shelf_engine::{CollectionState, LocalEffect, MutationId, MutationStatus, MutationTicket};
use std::cell::RefCell;
use std::rc::Rc;

/// State shared by everything working on one collection.
///
/// Borrows are always released before an `.await`.
pub type SharedState = Rc<RefCell<CollectionState>>;

/// Outcome of a settled mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationReport {
    pub mutation_id: MutationId,
    /// The effect as applied
    pub effect: LocalEffect,
    pub status: MutationStatus,
}

/// Applies effects optimistically and settles them against the backend.
#[derive(Debug)]
pub struct OptimisticMutator<A> {
    state: SharedState,
    remote: RemoteCollection<A>,
    queues: Rc<ItemQueues>,
}

impl<A> Clone for OptimisticMutator<A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            remote: self.remote.clone(),
            queues: Rc::clone(&self.queues),
        }
    }
}

impl<A: CollectionApi> OptimisticMutator<A> {
    pub fn new(state: SharedState, remote: RemoteCollection<A>) -> Self {
        Self {
            state,
            remote,
            queues: ItemQueues::new_shared(),
        }
    }

    /// Run a single-item mutation to settlement.
    ///
    /// Waits behind any in-flight mutation on the same item, so the effect
    /// is resolved against settled state. On failure the snapshot is
    /// restored before the error is returned.
    pub async fn run(&self, effect: LocalEffect) -> Result<MutationReport> {
        let _slot = match effect.target() {
            Some(id) => Some(self.queues.acquire(id).await),
            None => None,
        };

        let ticket = self.begin(effect)?;
        tracing::debug!(
            mutation_id = ticket.id,
            item_id = ?ticket.effect.target(),
            kind = ticket.effect.kind(),
            "Mutation applied locally"
        );

        let outcome = self.dispatch(&ticket).await;
        self.settle(ticket, outcome)
    }

    /// Apply an effect locally and record it as pending, without queueing.
    pub fn begin(&self, effect: LocalEffect) -> Result<MutationTicket> {
        Ok(self.state.borrow_mut().begin(effect)?)
    }

    /// Send the remote call for an applied mutation. The mutation stays
    /// pending; the caller settles it.
    pub async fn dispatch(&self, ticket: &MutationTicket) -> std::result::Result<(), ApiError> {
        self.remote.push(&ticket.effect).await
    }

    /// Commit on success, roll back on failure.
    pub fn settle(
        &self,
        ticket: MutationTicket,
        outcome: std::result::Result<(), ApiError>,
    ) -> Result<MutationReport> {
        match outcome {
            Ok(()) => {
                let settled = self.state.borrow_mut().commit(ticket.id)?;
                tracing::debug!(mutation_id = ticket.id, "Mutation committed");
                Ok(MutationReport {
                    mutation_id: settled.id,
                    effect: settled.effect,
                    status: settled.status,
                })
            }
            Err(error) => {
                let restored = self.state.borrow_mut().rollback(ticket.id);
                tracing::warn!(
                    mutation_id = ticket.id,
                    item_id = ?ticket.effect.target(),
                    kind = ticket.effect.kind(),
                    error = %error,
                    "Mutation rolled back"
                );
                if let Err(e) = restored {
                    tracing::warn!(mutation_id = ticket.id, error = %e, "Snapshot not restored");
                }
                Err(SyncError::Network(error))
            }
        }
    }

    pub fn state(&self) -> &SharedState {
        &self.state
    }

    pub fn remote(&self) -> &RemoteCollection<A> {
        &self.remote
    }

    pub fn queues(&self) -> &Rc<ItemQueues> {
        &self.queues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use shelf_engine::{Item, ItemId};
    use std::time::Duration;

    /// Backend that accepts everything except deletes.
    struct RejectDeletes;

    #[async_trait(?Send)]
    impl CollectionApi for RejectDeletes {
        async fn fetch_items(&self, _: &str) -> std::result::Result<Vec<Item>, ApiError> {
            Ok(Vec::new())
        }

        async fn delete_item(&self, _: &str, item_id: &str) -> std::result::Result<(), ApiError> {
            Err(ApiError::Status {
                status: 500,
                body: item_id.to_string(),
            })
        }

        async fn reorder(&self, _: &str, _: &[ItemId]) -> std::result::Result<(), ApiError> {
            Ok(())
        }

        async fn set_favorite(&self, _: &str, _: &str, _: bool) -> std::result::Result<(), ApiError> {
            Ok(())
        }

        async fn set_note(&self, _: &str, _: &str, _: &str) -> std::result::Result<(), ApiError> {
            Ok(())
        }
    }

    fn mutator() -> OptimisticMutator<RejectDeletes> {
        let mut state = CollectionState::new();
        state
            .load(vec![
                Item::new("a", "u", 1, "docs", "alpha"),
                Item::new("b", "u", 2, "docs", "beta"),
            ])
            .unwrap();

        let remote = RemoteCollection::new(Rc::new(RejectDeletes), "c1", Duration::from_secs(10));
        OptimisticMutator::new(Rc::new(RefCell::new(state)), remote)
    }

    #[tokio::test]
    async fn success_commits() {
        let mutator = mutator();
        let report = mutator
            .run(LocalEffect::ToggleFavorite("a".into()))
            .await
            .unwrap();

        assert_eq!(report.status, MutationStatus::Committed);
        assert_eq!(
            report.effect,
            LocalEffect::SetFavorite {
                id: "a".into(),
                favorite: true
            }
        );
        assert!(mutator.state().borrow().overlay().is_favorite("a"));
        assert!(!mutator.queues().is_busy("a"));
    }

    #[tokio::test]
    async fn failure_rolls_back() {
        let mutator = mutator();
        let result = mutator.run(LocalEffect::Remove("a".into())).await;

        assert!(matches!(
            result,
            Err(SyncError::Network(ApiError::Status { status: 500, .. }))
        ));
        let state = mutator.state().borrow();
        assert_eq!(state.store().position("a"), Some(0));
        assert!(state.ledger().is_empty());
        assert_eq!(state.ledger().rolled_back_count(), 1);
    }

    #[tokio::test]
    async fn invalid_effect_never_reaches_backend() {
        let mutator = mutator();
        let result = mutator.run(LocalEffect::Remove("missing".into())).await;

        assert!(matches!(result, Err(SyncError::Validation(_))));
        assert!(!mutator.queues().is_busy("missing"));
    }
}
