//! Bounded, newest-first log of past classification sessions.

use crate::error::{ClientError, Result, StorageError};
use crate::model::{ClassificationSession, SessionId};
use crate::storage::KeyValueStore;
use chrono::{DateTime, Utc};

/// Storage key holding the JSON array of sessions.
pub const HISTORY_KEY: &str = "classification_history";
pub const HISTORY_CAPACITY: usize = 50;

/// Hands out strictly increasing session ids derived from the clock.
///
/// An id is `milliseconds * 1000`, bumped past the previous id when two
/// sessions land in the same millisecond or the clock steps backwards.
#[derive(Debug, Clone, Default)]
pub struct SessionIdGenerator {
    last: u64,
}

impl SessionIdGenerator {
    pub fn resuming_after(last: Option<SessionId>) -> Self {
        Self {
            last: last.map(SessionId::value).unwrap_or(0),
        }
    }

    pub fn next(&mut self, now: DateTime<Utc>) -> SessionId {
        let stamp = (now.timestamp_millis().max(0) as u64).saturating_mul(1000);
        let id = stamp.max(self.last.saturating_add(1));
        self.last = id;
        SessionId::from(id)
    }

    /// Keeps later ids above one that was issued elsewhere.
    pub fn observe(&mut self, id: SessionId) {
        self.last = self.last.max(id.value());
    }
}

pub struct HistoryStore<S: KeyValueStore> {
    backend: S,
    entries: Vec<ClassificationSession>,
    ids: SessionIdGenerator,
    persistent: bool,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Loads history from `backend`. A missing or corrupt record opens as an
    /// empty history. An unreadable one also opens empty, but memory-only, so
    /// the record that could not be read is never overwritten.
    pub fn open(backend: S) -> Self {
        let mut persistent = true;
        let entries = match backend.get(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<ClassificationSession>>(&raw) {
                Ok(entries) => sanitize(entries),
                Err(e) => {
                    log::warn!("Discarding corrupt history record: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("History could not be read, continuing in memory: {}", e);
                persistent = false;
                Vec::new()
            }
        };

        let ids = SessionIdGenerator::resuming_after(entries.iter().map(|s| s.id).max());
        log::debug!("Opened history with {} sessions", entries.len());

        Self {
            backend,
            entries,
            ids,
            persistent,
        }
    }

    pub fn next_id(&mut self, now: DateTime<Utc>) -> SessionId {
        self.ids.next(now)
    }

    /// Inserts at the head, evicting the oldest session past capacity.
    ///
    /// The in-memory list is updated even when persisting fails; the error then
    /// reports that history has fallen back to memory only.
    pub fn append(&mut self, session: ClassificationSession) -> Result<()> {
        if self.get(session.id).is_some() {
            return Err(ClientError::DuplicateSession(session.id));
        }

        self.ids.observe(session.id);
        self.entries.insert(0, session);
        while self.entries.len() > HISTORY_CAPACITY {
            if let Some(evicted) = self.entries.pop() {
                log::debug!("Evicted session {} from history", evicted.id);
            }
        }

        self.persist()
    }

    /// Newest first.
    pub fn list(&self) -> &[ClassificationSession] {
        &self.entries
    }

    pub fn get(&self, id: SessionId) -> Option<&ClassificationSession> {
        self.entries.iter().find(|session| session.id == id)
    }

    /// Returns whether a session was removed. Unknown ids leave the store untouched.
    pub fn remove(&mut self, id: SessionId) -> Result<bool> {
        let before = self.entries.len();
        self.entries.retain(|session| session.id != id);
        if self.entries.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.entries.clear();
        if !self.persistent {
            return Ok(());
        }
        let outcome = self.backend.delete(HISTORY_KEY);
        self.record_outcome(outcome)
    }

    /// Releases the backend. In-memory entries are dropped.
    pub fn dispose(self) -> S {
        self.backend
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// False once a write has failed and history lives in memory only.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    fn persist(&mut self) -> Result<()> {
        if !self.persistent {
            log::debug!("History is memory-only, skipping persist");
            return Ok(());
        }
        let outcome = serde_json::to_string(&self.entries)
            .map_err(StorageError::from)
            .and_then(|encoded| self.backend.set(HISTORY_KEY, &encoded));
        self.record_outcome(outcome)
    }

    fn record_outcome(&mut self, outcome: std::result::Result<(), StorageError>) -> Result<()> {
        outcome.map_err(|e| {
            log::warn!("History storage unavailable, continuing in memory: {}", e);
            self.persistent = false;
            ClientError::from(e)
        })
    }
}

/// Drops duplicate ids (first occurrence wins) and anything past capacity.
fn sanitize(entries: Vec<ClassificationSession>) -> Vec<ClassificationSession> {
    let mut kept: Vec<ClassificationSession> = Vec::with_capacity(entries.len());
    for session in entries {
        if kept.iter().any(|k| k.id == session.id) {
            log::warn!("Dropping duplicate history session {}", session.id);
            continue;
        }
        kept.push(session);
    }
    kept.truncate(HISTORY_CAPACITY);
    kept
}
