//! Session storage trait.

use crate::StoreError;
use curia_types::SessionId;

/// Trait for persisting moderation sessions.
///
/// Payloads are opaque bytes; callers serialize with bincode at the call
/// site so backends stay format-agnostic.
pub trait SessionStore: Send + Sync {
    /// Store (insert or overwrite) a session snapshot.
    fn put_session(&self, id: &SessionId, data: &[u8]) -> Result<(), StoreError>;

    /// Load a session snapshot by id.
    fn get_session(&self, id: &SessionId) -> Result<Vec<u8>, StoreError>;

    /// List all sessions still open for voting, for scheduled
    /// window-expiry re-evaluation.
    fn list_open_sessions(&self) -> Result<Vec<SessionId>, StoreError>;

    /// Mark a session terminal. The final snapshot stays readable via
    /// [`get_session`](Self::get_session) but the id no longer appears in
    /// [`list_open_sessions`](Self::list_open_sessions).
    fn archive_session(&self, id: &SessionId) -> Result<(), StoreError>;
}
