use curia_session::SessionError;
use curia_store::StoreError;
use curia_types::ValidationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("a session with id {0} already exists")]
    DuplicateSession(String),

    #[error("session capacity reached ({0} concurrent sessions)")]
    CapacityReached(usize),

    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serialization(String),
}
