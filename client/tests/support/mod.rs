//! Scripted in-memory backend for client tests.

#![allow(dead_code)]

use async_trait::async_trait;
use shelf_client::{ApiError, ClientConfig, CollectionApi, CollectionSession};
use shelf_engine::{Item, ItemId};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;
use tokio::sync::oneshot;

/// Backend double. Every call is recorded under a key such as
/// `delete:A`, `reorder:B,A,C`, `favorite:A=true`, `note:A` or `fetch`.
///
/// - `fail(key)` makes matching calls answer 500.
/// - `gate(key)` holds the next matching call until the returned sender
///   fires (or is dropped).
#[derive(Debug, Default)]
pub struct FakeApi {
    items: RefCell<Vec<Item>>,
    failures: RefCell<HashSet<String>>,
    gates: RefCell<HashMap<String, oneshot::Receiver<()>>>,
    calls: RefCell<Vec<String>>,
    missing: Cell<bool>,
}

impl FakeApi {
    pub fn with_items(items: Vec<Item>) -> Rc<Self> {
        let api = Self::default();
        *api.items.borrow_mut() = items;
        Rc::new(api)
    }

    pub fn fail(&self, key: &str) {
        self.failures.borrow_mut().insert(key.to_string());
    }

    pub fn gate(&self, key: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().insert(key.to_string(), rx);
        tx
    }

    /// Make every fetch answer 404.
    pub fn remove_collection(&self) {
        self.missing.set(true);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn backend_order(&self) -> Vec<ItemId> {
        self.items.borrow().iter().map(|i| i.id.clone()).collect()
    }

    async fn call(&self, key: String) -> Result<(), ApiError> {
        self.calls.borrow_mut().push(key.clone());

        let gate = self.gates.borrow_mut().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        if self.failures.borrow().contains(&key) {
            return Err(ApiError::Status {
                status: 500,
                body: key,
            });
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl CollectionApi for FakeApi {
    async fn fetch_items(&self, collection: &str) -> Result<Vec<Item>, ApiError> {
        if self.missing.get() {
            return Err(ApiError::NotFound(format!("/collections/{collection}/items")));
        }
        self.call("fetch".to_string()).await?;
        Ok(self.items.borrow().clone())
    }

    async fn delete_item(&self, _collection: &str, item_id: &str) -> Result<(), ApiError> {
        self.call(format!("delete:{item_id}")).await?;
        self.items.borrow_mut().retain(|item| item.id != item_id);
        Ok(())
    }

    async fn reorder(&self, _collection: &str, item_ids: &[ItemId]) -> Result<(), ApiError> {
        self.call(format!("reorder:{}", item_ids.join(","))).await?;
        let mut items = self.items.borrow_mut();
        items.sort_by_key(|item| item_ids.iter().position(|id| *id == item.id));
        Ok(())
    }

    async fn set_favorite(
        &self,
        _collection: &str,
        item_id: &str,
        favorite: bool,
    ) -> Result<(), ApiError> {
        self.call(format!("favorite:{item_id}={favorite}")).await
    }

    async fn set_note(&self, _collection: &str, item_id: &str, _note: &str) -> Result<(), ApiError> {
        self.call(format!("note:{item_id}")).await
    }
}

/// `[A(t1, "A"), B(t2, "b"), C(t3, "c")]`
pub fn abc() -> Vec<Item> {
    vec![
        Item::new("A", "user-1", 1, "articles", "A"),
        Item::new("B", "user-1", 2, "videos", "b"),
        Item::new("C", "user-1", 3, "articles", "c"),
    ]
}

pub fn ids(values: &[&str]) -> Vec<ItemId> {
    values.iter().map(|v| v.to_string()).collect()
}

/// A loaded session over `api` with default config.
pub async fn open(api: &Rc<FakeApi>) -> CollectionSession<FakeApi> {
    open_with(api, ClientConfig::default()).await
}

pub async fn open_with(api: &Rc<FakeApi>, config: ClientConfig) -> CollectionSession<FakeApi> {
    let session = CollectionSession::new(Rc::clone(api), "reading-list", &config);
    session.load().await.unwrap();
    session
}
