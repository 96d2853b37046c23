//! Bulk removal of the selection.

use crate::api::CollectionApi;
use crate::error::{Result, SyncError};
use crate::mutator::OptimisticMutator;
use futures::future::join_all;
use shelf_engine::{Error, ItemId};
use std::fmt;
use std::str::FromStr;

/// What to do with items whose remote delete failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulkFailurePolicy {
    /// Keep them removed locally; the backend still has them until the
    /// next reload.
    #[default]
    LeaveDivergent,
    /// Restore them from their snapshots.
    CompensateFailed,
}

impl fmt::Display for BulkFailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkFailurePolicy::LeaveDivergent => write!(f, "divergent"),
            BulkFailurePolicy::CompensateFailed => write!(f, "compensate"),
        }
    }
}

/// Unrecognized policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown bulk failure policy: {0}")]
pub struct UnknownPolicy(pub String);

impl FromStr for BulkFailurePolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "divergent" | "leave-divergent" => Ok(BulkFailurePolicy::LeaveDivergent),
            "compensate" | "compensate-failed" => Ok(BulkFailurePolicy::CompensateFailed),
            other => Err(UnknownPolicy(other.to_string())),
        }
    }
}

/// Per-id results of a bulk removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// Deleted on the backend
    pub succeeded: Vec<ItemId>,
    /// Backend delete failed
    pub failed: Vec<ItemId>,
    /// Failed ids put back locally
    pub restored: Vec<ItemId>,
}

impl BulkReport {
    /// Ids removed locally but still present on the backend.
    pub fn diverged(&self) -> Vec<ItemId> {
        self.failed
            .iter()
            .filter(|id| !self.restored.contains(id))
            .cloned()
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Removes many items with one optimistic step and concurrent deletes.
#[derive(Debug)]
pub struct BulkOperationCoordinator<A> {
    mutator: OptimisticMutator<A>,
    policy: BulkFailurePolicy,
}

impl<A> Clone for BulkOperationCoordinator<A> {
    fn clone(&self) -> Self {
        Self {
            mutator: self.mutator.clone(),
            policy: self.policy,
        }
    }
}

impl<A: CollectionApi> BulkOperationCoordinator<A> {
    pub fn new(mutator: OptimisticMutator<A>, policy: BulkFailurePolicy) -> Self {
        Self { mutator, policy }
    }

    pub fn policy(&self) -> BulkFailurePolicy {
        self.policy
    }

    /// Remove every selected item and clear the selection.
    pub async fn remove_selected(&self) -> Result<BulkReport> {
        let ids = {
            let mut state = self.mutator.state().borrow_mut();
            let ids = state.selection().ids();
            if ids.is_empty() {
                return Err(SyncError::Validation(Error::EmptySelection));
            }
            state.clear_selection();
            ids
        };
        self.remove(ids).await
    }

    /// Remove `ids` optimistically, then delete each one on the backend
    /// concurrently. Ids that are no longer in the collection are skipped.
    ///
    /// Every mutation is settled before returning, even when settling one
    /// of them fails; the first such error is returned.
    pub async fn remove(&self, ids: Vec<ItemId>) -> Result<BulkReport> {
        let removals = self.mutator.state().borrow_mut().begin_removals(&ids)?;
        tracing::debug!(count = removals.len(), "Bulk removal applied locally");

        let outcomes = join_all(
            removals
                .iter()
                .map(|(_, ticket)| self.mutator.dispatch(ticket)),
        )
        .await;

        let state = self.mutator.state();
        let mut report = BulkReport::default();
        let mut failed = Vec::new();
        let mut first_error = None;

        for ((id, ticket), outcome) in removals.into_iter().zip(outcomes) {
            match outcome {
                Ok(()) => {
                    keep_first(&mut first_error, state.borrow_mut().commit(ticket.id));
                    report.succeeded.push(id);
                }
                Err(error) => {
                    tracing::warn!(
                        mutation_id = ticket.id,
                        item_id = %id,
                        error = %error,
                        "Bulk delete failed"
                    );
                    report.failed.push(id.clone());
                    failed.push((id, ticket));
                }
            }
        }

        match self.policy {
            BulkFailurePolicy::LeaveDivergent => {
                for (_, ticket) in &failed {
                    keep_first(&mut first_error, state.borrow_mut().commit(ticket.id));
                }
                if !failed.is_empty() {
                    tracing::warn!(
                        diverged = failed.len(),
                        "Local state diverges from backend until next reload"
                    );
                }
            }
            BulkFailurePolicy::CompensateFailed => {
                // Reverse issue order: each snapshot index counts only the
                // items before it that were not part of this removal
                for (id, ticket) in failed.iter().rev() {
                    let restored = state.borrow_mut().rollback(ticket.id);
                    if restored.is_ok() {
                        report.restored.push(id.clone());
                    }
                    keep_first(&mut first_error, restored);
                }
                report.restored.reverse();
            }
        }

        match first_error {
            Some(e) => Err(SyncError::Validation(e)),
            None => Ok(report),
        }
    }
}

fn keep_first<T>(slot: &mut Option<Error>, result: shelf_engine::error::Result<T>) {
    if let Err(e) = result {
        slot.get_or_insert(e);
    }
}
