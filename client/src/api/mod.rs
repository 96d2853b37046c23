//! Backend access for one collection.
//!
//! [`CollectionApi`] is the seam between the client and the network. The
//! production implementation is [`HttpCollectionApi`]; tests script their
//! own. [`RemoteCollection`] binds an implementation to one collection id,
//! bounds every call with the request timeout and turns applied
//! [`LocalEffect`]s into the matching call.

mod http;
pub mod wire;

pub use http::HttpCollectionApi;

use crate::error::ApiError;
use async_trait::async_trait;
use shelf_engine::{CollectionId, Item, ItemId, LocalEffect};
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

/// Remote operations on a collection.
///
/// Futures are not `Send`: the client runs on a single-threaded runtime.
#[async_trait(?Send)]
pub trait CollectionApi {
    /// Fetch the full item list in canonical order.
    async fn fetch_items(&self, collection: &str) -> Result<Vec<Item>, ApiError>;

    async fn delete_item(&self, collection: &str, item_id: &str) -> Result<(), ApiError>;

    /// Persist a full order. Idempotent.
    async fn reorder(&self, collection: &str, item_ids: &[ItemId]) -> Result<(), ApiError>;

    async fn set_favorite(
        &self,
        collection: &str,
        item_id: &str,
        favorite: bool,
    ) -> Result<(), ApiError>;

    async fn set_note(&self, collection: &str, item_id: &str, note: &str)
        -> Result<(), ApiError>;
}

/// A [`CollectionApi`] bound to one collection.
#[derive(Debug)]
pub struct RemoteCollection<A> {
    api: Rc<A>,
    collection: CollectionId,
    timeout: Duration,
}

impl<A> Clone for RemoteCollection<A> {
    fn clone(&self) -> Self {
        Self {
            api: Rc::clone(&self.api),
            collection: self.collection.clone(),
            timeout: self.timeout,
        }
    }
}

impl<A: CollectionApi> RemoteCollection<A> {
    pub fn new(api: Rc<A>, collection: impl Into<CollectionId>, timeout: Duration) -> Self {
        Self {
            api,
            collection: collection.into(),
            timeout,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn api(&self) -> &Rc<A> {
        &self.api
    }

    /// Fetch the authoritative item list.
    pub async fn fetch(&self) -> Result<Vec<Item>, ApiError> {
        self.bounded(self.api.fetch_items(&self.collection)).await
    }

    /// Send the remote call matching an applied effect.
    pub async fn push(&self, effect: &LocalEffect) -> Result<(), ApiError> {
        let collection = self.collection.as_str();
        match effect {
            LocalEffect::Remove(id) => self.bounded(self.api.delete_item(collection, id)).await,
            LocalEffect::Reorder(order) => self.bounded(self.api.reorder(collection, order)).await,
            LocalEffect::SetFavorite { id, favorite } => {
                self.bounded(self.api.set_favorite(collection, id, *favorite))
                    .await
            }
            LocalEffect::SetNote { id, note } => {
                self.bounded(self.api.set_note(collection, id, note)).await
            }
            // Toggles are resolved to `SetFavorite` when applied
            LocalEffect::ToggleFavorite(_) => Err(ApiError::Unresolved("toggleFavorite")),
        }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, ApiError>>,
    ) -> Result<T, ApiError> {
        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ApiError::Timeout(self.timeout))?
    }
}
