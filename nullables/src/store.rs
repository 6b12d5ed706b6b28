//! Failing session store — exercises host error paths.

use curia_store::{SessionStore, StoreError};
use curia_types::SessionId;

/// A `SessionStore` whose every operation fails with a backend error.
#[derive(Default)]
pub struct FailingSessionStore;

impl FailingSessionStore {
    pub fn new() -> Self {
        Self
    }
}

impl SessionStore for FailingSessionStore {
    fn put_session(&self, id: &SessionId, _data: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::Backend(format!("injected failure for {id}")))
    }

    fn get_session(&self, id: &SessionId) -> Result<Vec<u8>, StoreError> {
        Err(StoreError::Backend(format!("injected failure for {id}")))
    }

    fn list_open_sessions(&self) -> Result<Vec<SessionId>, StoreError> {
        Err(StoreError::Backend("injected failure".into()))
    }

    fn archive_session(&self, id: &SessionId) -> Result<(), StoreError> {
        Err(StoreError::Backend(format!("injected failure for {id}")))
    }
}
