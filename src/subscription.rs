use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use crate::data_loader::MatchRecord;
use crate::error::StoreError;

pub type ChangeCallback = Box<dyn Fn(&[MatchRecord]) + Send + Sync>;
pub type ErrorCallback = Box<dyn Fn(&StoreError) + Send + Sync>;

struct Subscriber {
    id: u64,
    on_change: Arc<dyn Fn(&[MatchRecord]) + Send + Sync>,
    on_error: Arc<dyn Fn(&StoreError) + Send + Sync>,
}

#[derive(Default)]
struct SubscriberTable {
    next_id: u64,
    entries: Vec<Subscriber>,
}

/// Callback registry shared by the store implementations.
///
/// Callbacks are cloned out of the table before they run, so a callback is free to call back into
/// the store (or drop its own subscription) without deadlocking.
#[derive(Default)]
pub struct Subscribers {
    table: Arc<Mutex<SubscriberTable>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, on_change: ChangeCallback, on_error: ErrorCallback) -> Subscription {
        let mut table = self.table.lock();
        let id = table.next_id;
        table.next_id += 1;
        table.entries.push(Subscriber {
            id,
            on_change: Arc::from(on_change),
            on_error: Arc::from(on_error),
        });

        Subscription { id, table: Arc::downgrade(&self.table) }
    }

    pub fn notify(&self, matches: &[MatchRecord]) {
        let callbacks: Vec<_> = self.table.lock().entries.iter()
            .map(|s| Arc::clone(&s.on_change))
            .collect();

        for callback in callbacks {
            callback(matches);
        }
    }

    pub fn notify_error(&self, error: &StoreError) {
        let callbacks: Vec<_> = self.table.lock().entries.iter()
            .map(|s| Arc::clone(&s.on_error))
            .collect();

        for callback in callbacks {
            callback(error);
        }
    }

    pub fn clear(&self) {
        self.table.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.table.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle for a live subscription. Notifications stop when it is dropped or `unsubscribe` is called.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    table: Weak<Mutex<SubscriberTable>>,
}

impl Subscription {
    /// A handle that was never attached, e.g. when subscribing to a closed store.
    pub fn detached() -> Self {
        Self { id: u64::MAX, table: Weak::new() }
    }

    pub fn unsubscribe(self) {}

    pub fn is_active(&self) -> bool {
        match self.table.upgrade() {
            Some(table) => table.lock().entries.iter().any(|s| s.id == self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            table.lock().entries.retain(|s| s.id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
