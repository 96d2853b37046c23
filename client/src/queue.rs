//! Per-item mutation queues.
//!
//! At most one mutation per item id is between local apply and settlement.
//! Later mutations on the same id wait in FIFO order; mutations on other ids
//! never wait.

use shelf_engine::ItemId;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;
use tokio::sync::oneshot;

/// Busy item ids and the mutations waiting on each.
///
/// An id present in the map is busy; its queue holds the waiters.
#[derive(Debug, Default)]
pub struct ItemQueues {
    slots: RefCell<HashMap<ItemId, VecDeque<oneshot::Sender<()>>>>,
}

impl ItemQueues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a queue set wrapped in `Rc` for sharing.
    pub fn new_shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Wait until `id` is free and claim it. The slot is released when the
    /// returned guard is dropped.
    pub async fn acquire(self: &Rc<Self>, id: &str) -> SlotGuard {
        let waiter = {
            let mut slots = self.slots.borrow_mut();
            match slots.get_mut(id) {
                Some(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push_back(tx);
                    Some(rx)
                }
                None => {
                    slots.insert(id.to_string(), VecDeque::new());
                    None
                }
            }
        };

        if let Some(rx) = waiter {
            tracing::debug!(item_id = %id, "Waiting for in-flight mutation");
            // The sender only disappears along with the queue set
            let _ = rx.await;
        }

        SlotGuard {
            queues: Rc::clone(self),
            id: id.to_string(),
        }
    }

    /// Hand the slot to the next live waiter, or free it.
    fn release(&self, id: &str) {
        let mut slots = self.slots.borrow_mut();
        let Some(waiters) = slots.get_mut(id) else {
            return;
        };

        while let Some(next) = waiters.pop_front() {
            if next.send(()).is_ok() {
                return;
            }
        }
        slots.remove(id);
    }

    /// Whether a mutation on `id` is in flight.
    pub fn is_busy(&self, id: &str) -> bool {
        self.slots.borrow().contains_key(id)
    }

    /// Number of mutations waiting behind the in-flight one for `id`.
    pub fn waiting(&self, id: &str) -> usize {
        self.slots.borrow().get(id).map_or(0, VecDeque::len)
    }

    /// Number of ids with a mutation in flight.
    pub fn busy_count(&self) -> usize {
        self.slots.borrow().len()
    }
}

/// Exclusive claim on one item id.
#[derive(Debug)]
pub struct SlotGuard {
    queues: Rc<ItemQueues>,
    id: ItemId,
}

impl SlotGuard {
    pub fn item_id(&self) -> &str {
        &self.id
    }
}

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.queues.release(&self.id);
    }
}
