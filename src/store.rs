//! Match storage behind a small document-collection interface.
//!
//! Callers hold a store instance and pass it to whatever needs it; there is no process-wide handle.

use parking_lot::Mutex;

use crate::data_loader::{MatchDocument, MatchId, MatchRecord};
use crate::error::StoreError;
use crate::subscription::{ChangeCallback, ErrorCallback, Subscribers, Subscription};

/// Collection of match records.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - Ids are assigned by the store and never reused
/// - Subscribers always receive the full current list, never a delta
pub trait MatchStore: Send + Sync {
    /// Store a new match and return the id it was given.
    fn add_match(&self, document: MatchDocument) -> Result<MatchId, StoreError>;

    /// Remove a match. Fails with `NotFound` if the id is unknown.
    fn delete_match(&self, id: &str) -> Result<(), StoreError>;

    /// Every stored match, in creation order.
    fn list_matches(&self) -> Result<Vec<MatchRecord>, StoreError>;

    /// Calls `on_change` right away with the current matches and again after every change.
    fn subscribe(&self, on_change: ChangeCallback, on_error: ErrorCallback) -> Subscription;
}

pub(crate) fn new_match_id() -> MatchId {
    uuid::Uuid::new_v4().to_string()
}

struct MemoryState {
    matches: Vec<MatchRecord>,
    closed: bool,
}

/// Store that lives only as long as the process.
pub struct MemoryStore {
    state: Mutex<MemoryState>,
    subscribers: Subscribers,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_matches(Vec::new())
    }

    pub fn with_matches(matches: Vec<MatchRecord>) -> Self {
        Self {
            state: Mutex::new(MemoryState { matches, closed: false }),
            subscribers: Subscribers::new(),
        }
    }

    /// Detach all subscribers and refuse further requests.
    pub fn close(&self) {
        self.state.lock().closed = true;
        self.subscribers.clear();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchStore for MemoryStore {
    fn add_match(&self, document: MatchDocument) -> Result<MatchId, StoreError> {
        let id = new_match_id();
        let snapshot = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(StoreError::Closed);
            }
            state.matches.push(MatchRecord::from_document(id.clone(), document));
            state.matches.clone()
        };

        tracing::info!(%id, "match added");
        self.subscribers.notify(&snapshot);
        Ok(id)
    }

    fn delete_match(&self, id: &str) -> Result<(), StoreError> {
        let snapshot = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(StoreError::Closed);
            }
            let idx = state.matches.iter()
                .position(|m| m.id == id)
                .ok_or_else(|| StoreError::NotFound(id.to_owned()))?;
            state.matches.remove(idx);
            state.matches.clone()
        };

        tracing::info!(%id, "match deleted");
        self.subscribers.notify(&snapshot);
        Ok(())
    }

    fn list_matches(&self) -> Result<Vec<MatchRecord>, StoreError> {
        let state = self.state.lock();
        if state.closed {
            return Err(StoreError::Closed);
        }
        Ok(state.matches.clone())
    }

    fn subscribe(&self, on_change: ChangeCallback, on_error: ErrorCallback) -> Subscription {
        let snapshot = match self.list_matches() {
            Ok(matches) => matches,
            Err(e) => {
                on_error(&StoreError::Subscription(e.to_string()));
                return Subscription::detached();
            }
        };

        on_change(&snapshot);
        self.subscribers.register(on_change, on_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn doc(a: &str, b: &str) -> MatchDocument {
        MatchDocument::new(a, b, 1, 0, "2025-02-02")
    }

    fn recorder() -> (Arc<Mutex<Vec<usize>>>, ChangeCallback) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let on_change: ChangeCallback = Box::new(move |m: &[MatchRecord]| s.lock().push(m.len()));
        (seen, on_change)
    }

    #[test]
    fn ids_are_unique_and_order_is_creation_order() {
        let store = MemoryStore::new();
        let first = store.add_match(doc("ERON", "ARIN")).unwrap();
        let second = store.add_match(doc("ARIN", "LAWIN")).unwrap();

        assert_ne!(first, second);
        let ids: Vec<String> = store.list_matches().unwrap().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, [first, second]);
    }

    #[test]
    fn delete_of_unknown_id_is_a_write_error() {
        let store = MemoryStore::new();
        let err = store.delete_match("nope").unwrap_err();

        assert_eq!(err, StoreError::NotFound("nope".into()));
        assert!(err.is_write_error());
    }

    #[test]
    fn subscribe_sees_initial_state_then_every_change() {
        let store = MemoryStore::new();
        store.add_match(doc("ERON", "ARIN")).unwrap();

        let (seen, on_change) = recorder();
        let sub = store.subscribe(on_change, Box::new(|_: &StoreError| {}));

        let id = store.add_match(doc("ARIN", "LAWIN")).unwrap();
        store.delete_match(&id).unwrap();
        drop(sub);
        store.add_match(doc("LAWIN", "ERON")).unwrap();

        assert_eq!(*seen.lock(), vec![1, 2, 1]);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn closed_store_rejects_everything() {
        let store = MemoryStore::new();
        let (seen, on_change) = recorder();
        let sub = store.subscribe(on_change, Box::new(|_: &StoreError| {}));
        store.close();

        assert!(!sub.is_active());
        assert_eq!(store.add_match(doc("ERON", "ARIN")), Err(StoreError::Closed));
        assert_eq!(store.list_matches(), Err(StoreError::Closed));

        let errors = Arc::new(Mutex::new(Vec::new()));
        let e = Arc::clone(&errors);
        let late = store.subscribe(
            Box::new(|_: &[MatchRecord]| {}),
            Box::new(move |err: &StoreError| e.lock().push(err.clone())),
        );
        assert!(!late.is_active());
        assert_eq!(errors.lock().len(), 1);
        assert_eq!(*seen.lock(), vec![0]);
    }
}
