//! # Shelf Client
//!
//! Async shell around [`shelf_engine`] for one collection page.
//!
//! The engine decides what the collection looks like; this crate decides
//! when. It talks to the backend through [`CollectionApi`], debounces search
//! input, serializes mutations per item, resolves racing reorders by
//! sequence number and runs bulk removals concurrently.
//!
//! Everything runs on a single-threaded tokio runtime. State lives in an
//! `Rc<RefCell<CollectionState>>` that is never borrowed across an `.await`,
//! and every asynchronous continuation re-checks its sequence or generation
//! before touching it.

pub mod api;
pub mod bulk;
pub mod config;
pub mod debounce;
pub mod error;
pub mod mutator;
pub mod queue;
pub mod reorder;
pub mod session;

pub use api::{CollectionApi, HttpCollectionApi, RemoteCollection};
pub use bulk::{BulkFailurePolicy, BulkOperationCoordinator, BulkReport};
pub use config::{ClientConfig, ConfigError};
pub use debounce::SearchDebouncer;
pub use error::{ApiError, Result, SyncError};
pub use mutator::{MutationReport, OptimisticMutator, SharedState};
pub use queue::{ItemQueues, SlotGuard};
pub use reorder::{ReorderCoordinator, ReorderOutcome};
pub use session::CollectionSession;
