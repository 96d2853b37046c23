//! Ledger of optimistic mutations awaiting the backend.
//!
//! A mutation is created when its effect is applied locally and leaves the
//! ledger as soon as it reaches a terminal status:
//!
//! ```text
//! PENDING ──► COMMITTED
//!    │
//!    ├──────► ROLLED_BACK
//!    │
//!    └──────► SUPERSEDED   (reorders only, network result never inspected)
//! ```

use crate::{
    error::Result, Error, ItemId, LocalEffect, MutationId, Sequence, SequenceTracker, Snapshot,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Lifecycle status of a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationStatus {
    Pending,
    Committed,
    RolledBack,
    Superseded,
}

impl MutationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MutationStatus::Pending)
    }
}

/// A mutation whose effect is applied locally but not yet confirmed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMutation {
    pub id: MutationId,
    /// Item the mutation targets, `None` for whole-order changes
    pub target: Option<ItemId>,
    /// Issue order across all mutations
    pub sequence: Sequence,
    /// The effect as actually applied (toggles resolved)
    pub effect: LocalEffect,
    /// What restores the state the effect touched
    pub snapshot: Snapshot,
    pub status: MutationStatus,
}

/// Handle returned to the caller that started a mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationTicket {
    pub id: MutationId,
    pub sequence: Sequence,
    /// The effect as actually applied; remote calls are built from this
    pub effect: LocalEffect,
}

/// Pending mutations by id, plus settlement counters.
#[derive(Debug, Clone, Default)]
pub struct MutationLedger {
    sequences: SequenceTracker,
    pending: BTreeMap<MutationId, PendingMutation>,
    committed: u64,
    rolled_back: u64,
    superseded: u64,
}

impl MutationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an applied effect with its snapshot.
    pub fn record(&mut self, effect: LocalEffect, snapshot: Snapshot) -> MutationTicket {
        let sequence = self.sequences.issue();
        // Sequences are unique and increasing, so they double as ids
        let id = sequence;

        self.pending.insert(
            id,
            PendingMutation {
                id,
                target: effect.target().cloned(),
                sequence,
                effect: effect.clone(),
                snapshot,
                status: MutationStatus::Pending,
            },
        );

        MutationTicket {
            id,
            sequence,
            effect,
        }
    }

    /// Remove a mutation from the ledger, marking it with its terminal status.
    pub fn settle(&mut self, id: MutationId, status: MutationStatus) -> Result<PendingMutation> {
        if !status.is_terminal() {
            return Err(Error::NonTerminalSettlement(id));
        }

        let mut mutation = self
            .pending
            .remove(&id)
            .ok_or(Error::MutationNotFound(id))?;

        match status {
            MutationStatus::Committed => self.committed += 1,
            MutationStatus::RolledBack => self.rolled_back += 1,
            MutationStatus::Superseded => self.superseded += 1,
            MutationStatus::Pending => {}
        }
        mutation.status = status;

        Ok(mutation)
    }

    pub fn get(&self, id: MutationId) -> Option<&PendingMutation> {
        self.pending.get(&id)
    }

    /// Pending mutations in issue order.
    pub fn pending(&self) -> impl Iterator<Item = &PendingMutation> {
        self.pending.values()
    }

    /// Number of pending mutations targeting one item.
    pub fn pending_for(&self, item_id: &str) -> usize {
        self.pending
            .values()
            .filter(|m| m.target.as_deref() == Some(item_id))
            .count()
    }

    /// Highest sequence issued so far.
    pub fn latest_sequence(&self) -> Sequence {
        self.sequences.latest()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn committed_count(&self) -> u64 {
        self.committed
    }

    pub fn rolled_back_count(&self) -> u64 {
        self.rolled_back
    }

    pub fn superseded_count(&self) -> u64 {
        self.superseded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn favorite_snapshot(id: &str) -> Snapshot {
        Snapshot::Favorite {
            id: id.into(),
            previous: None,
        }
    }

    #[test]
    fn record_issues_increasing_sequences() {
        let mut ledger = MutationLedger::new();
        let first = ledger.record(LocalEffect::ToggleFavorite("a".into()), favorite_snapshot("a"));
        let second = ledger.record(LocalEffect::ToggleFavorite("b".into()), favorite_snapshot("b"));

        assert!(second.sequence > first.sequence);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.latest_sequence(), second.sequence);
        assert_eq!(ledger.get(first.id).unwrap().status, MutationStatus::Pending);
    }

    #[test]
    fn settle_removes_and_counts() {
        let mut ledger = MutationLedger::new();
        let ticket = ledger.record(LocalEffect::Remove("a".into()), favorite_snapshot("a"));
        assert_eq!(ledger.pending_for("a"), 1);

        let settled = ledger.settle(ticket.id, MutationStatus::Committed).unwrap();
        assert_eq!(settled.status, MutationStatus::Committed);
        assert!(ledger.is_empty());
        assert_eq!(ledger.committed_count(), 1);
    }

    #[test]
    fn settle_twice_fails() {
        let mut ledger = MutationLedger::new();
        let ticket = ledger.record(LocalEffect::Remove("a".into()), favorite_snapshot("a"));
        ledger.settle(ticket.id, MutationStatus::RolledBack).unwrap();

        assert_eq!(
            ledger.settle(ticket.id, MutationStatus::Committed),
            Err(Error::MutationNotFound(ticket.id))
        );
        assert_eq!(ledger.rolled_back_count(), 1);
    }

    #[test]
    fn settle_requires_terminal_status() {
        let mut ledger = MutationLedger::new();
        let ticket = ledger.record(LocalEffect::Remove("a".into()), favorite_snapshot("a"));

        assert_eq!(
            ledger.settle(ticket.id, MutationStatus::Pending),
            Err(Error::NonTerminalSettlement(ticket.id))
        );
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn reorder_has_no_target() {
        let mut ledger = MutationLedger::new();
        let ticket = ledger.record(
            LocalEffect::Reorder(vec!["a".into()]),
            Snapshot::Order { order: vec![] },
        );
        assert_eq!(ledger.get(ticket.id).unwrap().target, None);

        ledger.settle(ticket.id, MutationStatus::Superseded).unwrap();
        assert_eq!(ledger.superseded_count(), 1);
    }
}
