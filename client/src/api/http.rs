//! HTTP implementation of [`CollectionApi`] over reqwest.

use super::wire::{DeleteItemBody, FavoriteBody, ItemsResponse, NoteBody, ReorderBody};
use super::CollectionApi;
use crate::error::ApiError;
use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use shelf_engine::{Item, ItemId};

/// JSON-over-HTTP client for the collection backend.
#[derive(Debug, Clone)]
pub struct HttpCollectionApi {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpCollectionApi {
    /// Create a client for the backend at `base_url`.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing connection pool.
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ApiError> {
        let parsed =
            Url::parse(base_url).map_err(|e| ApiError::InvalidUrl(format!("{base_url}: {e}")))?;
        if parsed.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `{base}/collections/{collection}/{rest..}` with each segment
    /// percent-encoded.
    fn endpoint(&self, collection: &str, rest: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?;
            segments
                .pop_if_empty()
                .push("collections")
                .push(collection)
                .extend(rest);
        }
        Ok(url)
    }

    async fn send(request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(response.url().path().to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait(?Send)]
impl CollectionApi for HttpCollectionApi {
    async fn fetch_items(&self, collection: &str) -> Result<Vec<Item>, ApiError> {
        let url = self.endpoint(collection, &["items"])?;
        tracing::debug!(collection = %collection, "GET items");

        let response = Self::send(self.client.get(url)).await?;
        let text = response.text().await?;
        let body: ItemsResponse =
            serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))?;

        Ok(body.items.into_iter().map(Item::from).collect())
    }

    async fn delete_item(&self, collection: &str, item_id: &str) -> Result<(), ApiError> {
        let url = self.endpoint(collection, &["items"])?;
        let body = DeleteItemBody {
            item_id: item_id.to_string(),
        };

        Self::send(self.client.delete(url).json(&body)).await?;
        Ok(())
    }

    async fn reorder(&self, collection: &str, item_ids: &[ItemId]) -> Result<(), ApiError> {
        let url = self.endpoint(collection, &["reorder"])?;
        let body = ReorderBody {
            item_ids: item_ids.to_vec(),
        };

        Self::send(self.client.put(url).json(&body)).await?;
        Ok(())
    }

    async fn set_favorite(
        &self,
        collection: &str,
        item_id: &str,
        favorite: bool,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(collection, &["items", item_id, "favorite"])?;

        Self::send(self.client.post(url).json(&FavoriteBody { favorite })).await?;
        Ok(())
    }

    async fn set_note(
        &self,
        collection: &str,
        item_id: &str,
        note: &str,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(collection, &["items", item_id, "note"])?;
        let body = NoteBody {
            note: note.to_string(),
        };

        Self::send(self.client.post(url).json(&body)).await?;
        Ok(())
    }
}
