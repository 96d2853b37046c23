//! Unified error handling for the client.

use shelf_engine::Sequence;
use std::time::Duration;

/// Failure of a single remote call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Could not decode response: {0}")]
    Decode(String),

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid url: {0}")]
    InvalidUrl(String),

    #[error("Effect cannot be sent before it is resolved: {0}")]
    Unresolved(&'static str),
}

/// Client error taxonomy.
///
/// Only [`SyncError::Unrecoverable`] invalidates the whole collection; every
/// other variant is contained to the mutation that produced it.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    /// A remote call rejected or timed out. Local state has already been
    /// rolled back or resynced.
    #[error("Network failure: {0}")]
    Network(#[from] ApiError),

    /// A result whose sequence was superseded. Never shown to the user.
    #[error("Stale result for sequence {0}")]
    Stale(Sequence),

    /// Rejected locally before any remote call was issued.
    #[error("Validation failed: {0}")]
    Validation(#[from] shelf_engine::Error),

    /// The collection itself is gone.
    #[error("Collection unavailable: {0}")]
    Unrecoverable(String),
}

impl SyncError {
    /// Whether the session can keep going after this error.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, SyncError::Unrecoverable(_))
    }

    /// Whether this error should reach the user at all.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, SyncError::Stale(_))
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, SyncError>;
