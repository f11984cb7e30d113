use parking_lot::Mutex;
use std::path::PathBuf;

use crate::data_loader::*;
use crate::error::{Result, StoreError};
use crate::store::{new_match_id, MatchStore};
use crate::subscription::{ChangeCallback, ErrorCallback, Subscribers, Subscription};

struct FileState {
    matches: Vec<MatchRecord>,
    // File contents as of our last read or write
    last_seen: String,
    closed: bool,
}

/// Match store persisted as a JSON array of documents in a single file.
///
/// Other processes may write the same file. Mutations re-read it first so they don't clobber
/// those writes, and `refresh` picks up changes made elsewhere and notifies subscribers.
/// Documents that can't be decoded are left out of every listing but are written back as they were.
pub struct JsonFileStore {
    path: PathBuf,
    state: Mutex<FileState>,
    subscribers: Subscribers,
}

impl JsonFileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let raw = read_raw(&path)?;
        let matches = load_documents(&raw)?;

        tracing::debug!(path = %path.display(), count = matches.len(), "opened match store");

        Ok(Self {
            path,
            state: Mutex::new(FileState { matches, last_seen: raw, closed: false }),
            subscribers: Subscribers::new(),
        })
    }

    pub fn close(&self) {
        self.state.lock().closed = true;
        self.subscribers.clear();
    }

    /// Re-reads the backing file. Returns true if it changed, in which case subscribers have been
    /// notified. Failures go to every subscriber's error callback as well as to the caller.
    pub fn refresh(&self) -> std::result::Result<bool, StoreError> {
        let snapshot = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(StoreError::Closed);
            }

            let decoded = read_raw(&self.path)
                .and_then(|raw| load_documents(&raw).map(|matches| (raw, matches)));
            let (raw, matches) = match decoded {
                Ok(decoded) => decoded,
                Err(e) => {
                    drop(state);
                    let err = StoreError::Subscription(e.to_string());
                    tracing::warn!(error = %err, path = %self.path.display(), "failed to refresh match store");
                    self.subscribers.notify_error(&err);
                    return Err(err);
                }
            };

            if raw == state.last_seen {
                return Ok(false);
            }

            state.last_seen = raw;
            state.matches = matches;
            state.matches.clone()
        };

        tracing::debug!(count = snapshot.len(), "match store changed on disk");
        self.subscribers.notify(&snapshot);
        Ok(true)
    }

    // Applies `change` to the raw documents on disk, writes them back and notifies subscribers.
    fn mutate<F>(&self, change: F) -> std::result::Result<(), StoreError>
    where
        F: FnOnce(&mut Vec<serde_json::Value>) -> std::result::Result<(), StoreError>,
    {
        let snapshot = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(StoreError::Closed);
            }

            let mut documents = read_raw(&self.path)
                .and_then(|raw| parse_documents(&raw))
                .map_err(|e| StoreError::Write(e.to_string()))?;
            change(&mut documents)?;

            let written = save_data(&self.path, &documents).map_err(|e| StoreError::Write(e.to_string()))?;
            state.last_seen = written;
            state.matches = decode_documents(&documents);
            state.matches.clone()
        };

        self.subscribers.notify(&snapshot);
        Ok(())
    }
}

impl MatchStore for JsonFileStore {
    fn add_match(&self, document: MatchDocument) -> std::result::Result<MatchId, StoreError> {
        let id = new_match_id();
        let record = MatchRecord::from_document(id.clone(), document);
        let value = serde_json::to_value(&record).map_err(|e| StoreError::Write(e.to_string()))?;
        self.mutate(|documents| {
            documents.push(value);
            Ok(())
        })?;

        tracing::info!(%id, path = %self.path.display(), "match added");
        Ok(id)
    }

    fn delete_match(&self, id: &str) -> std::result::Result<(), StoreError> {
        self.mutate(|documents| {
            let idx = documents.iter()
                .position(|d| d.get("id").and_then(|v| v.as_str()) == Some(id))
                .ok_or_else(|| StoreError::NotFound(id.to_owned()))?;
            documents.remove(idx);
            Ok(())
        })?;

        tracing::info!(%id, path = %self.path.display(), "match deleted");
        Ok(())
    }

    fn list_matches(&self) -> std::result::Result<Vec<MatchRecord>, StoreError> {
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
