//! # Shelf Engine
//!
//! A deterministic view engine for client-side collections.
//!
//! This crate holds the state a collection page keeps in memory: the canonical
//! item set and its order, the derived (filtered and sorted) view, the user's
//! selection, per-item favorite/note overlays, and the ledger of optimistic
//! mutations that are still waiting on the backend.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine never touches the network, timers or a runtime
//! - **Deterministic**: same inputs always produce the same outputs
//! - **Reversible**: every optimistic effect is applied together with a
//!   snapshot that restores exactly what it touched
//! - **Portable**: the async shell (`shelf-client`) drives it, but any event
//!   loop can
//!
//! ## Core Concepts
//!
//! ### Items and the store
//!
//! [`ItemStore`] is an arena of [`Item`]s plus an ordered id list. It is
//! mutated only through named operations: [`ItemStore::load`],
//! [`ItemStore::apply_removal`] and [`ItemStore::apply_reorder`].
//!
//! ### Effects and mutations
//!
//! Local changes are described as [`LocalEffect`]s, not applied directly.
//! [`CollectionState::begin`] snapshots the touched state, applies the effect
//! and records a [`PendingMutation`]. The mutation is then settled with
//! [`CollectionState::commit`], [`CollectionState::rollback`] or
//! [`CollectionState::supersede`].
//!
//! ### Sequence tokens
//!
//! [`SequenceTracker`] hands out strictly increasing [`Sequence`] numbers so
//! that asynchronous results can be checked for staleness before they are
//! allowed to touch shared state.
//!
//! ## Quick Start
//!
//! ```rust
//! use shelf_engine::{CollectionState, Item, LocalEffect, SortCriteria};
//!
//! let mut state = CollectionState::new();
//! state
//!     .load(vec![
//!         Item::new("a", "user-1", 1_000, "docs", "Alpha"),
//!         Item::new("b", "user-1", 2_000, "docs", "Beta"),
//!     ])
//!     .unwrap();
//! state.set_sort(SortCriteria::name_asc());
//!
//! // Optimistically remove "a", then the backend rejects the request.
//! let ticket = state.begin(LocalEffect::Remove("a".into())).unwrap();
//! assert_eq!(state.view(), vec!["b".to_string()]);
//!
//! state.rollback(ticket.id).unwrap();
//! assert_eq!(state.view(), vec!["a".to_string(), "b".to_string()]);
//! ```

pub mod criteria;
pub mod effect;
pub mod error;
pub mod item;
pub mod mutation;
pub mod overlay;
pub mod pipeline;
pub mod selection;
pub mod sequence;
pub mod snapshot;
pub mod state;
pub mod store;

// Re-export main types at crate root
pub use criteria::{FilterCriteria, SortCriteria, SortDirection, SortField, ALL_CATEGORIES};
pub use effect::LocalEffect;
pub use error::Error;
pub use item::Item;
pub use mutation::{MutationLedger, MutationStatus, MutationTicket, PendingMutation};
pub use overlay::Overlay;
pub use pipeline::{derive_view, ViewMemo};
pub use selection::SelectionSet;
pub use sequence::{Generation, Sequence, SequenceTracker};
pub use snapshot::Snapshot;
pub use state::{CollectionState, DecoratedItem};
pub use store::ItemStore;

/// Type aliases for clarity
pub type ItemId = String;
pub type CollectionId = String;
pub type MutationId = u64;
pub type Timestamp = u64;
pub type Revision = u64;
