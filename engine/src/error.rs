//! Error types for the Shelf engine.

use crate::{ItemId, MutationId};
use thiserror::Error;

/// All possible errors from the Shelf engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Membership errors
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    #[error("duplicate item: {0}")]
    DuplicateItem(ItemId),

    #[error("order mismatch: expected {expected} ids, got {actual}")]
    OrderMismatch { expected: usize, actual: usize },

    #[error("order contains unknown item: {0}")]
    UnknownOrderEntry(ItemId),

    #[error("move out of bounds: index {index} in list of {len}")]
    MoveOutOfBounds { index: usize, len: usize },

    // Validation errors
    #[error("selection is empty")]
    EmptySelection,

    // Ledger errors
    #[error("mutation not found: {0}")]
    MutationNotFound(MutationId),

    #[error("mutation {0} can only settle to a terminal status")]
    NonTerminalSettlement(MutationId),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
