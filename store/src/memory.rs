//! In-memory session store — the bundled backend for development and tests.

use crate::error::StoreError;
use crate::session::SessionStore;
use curia_types::SessionId;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

/// A `SessionStore` backed by process memory.
///
/// BTree containers keep listing order stable across runs.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    sessions: BTreeMap<SessionId, Vec<u8>>,
    open: BTreeSet<SessionId>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn put_session(&self, id: &SessionId, data: &[u8]) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        let is_new = inner.sessions.insert(id.clone(), data.to_vec()).is_none();
        if is_new {
            inner.open.insert(id.clone());
        }
        Ok(())
    }

    fn get_session(&self, id: &SessionId) -> Result<Vec<u8>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        inner
            .sessions
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn list_open_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        let inner = self.inner.lock().expect("store mutex poisoned");
        Ok(inner.open.iter().cloned().collect())
    }

    fn archive_session(&self, id: &SessionId) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("store mutex poisoned");
        if !inner.sessions.contains_key(id) {
            return Err(StoreError::NotFound(id.to_string()));
        }
        inner.open.remove(id);
        Ok(())
    }
}
