use curia_types::{ConfigError, Verdict};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// Vote submitted to a terminal session. Reported to the caller, the
    /// vote is discarded, no state mutation occurs.
    #[error("session {id} is closed (verdict: {verdict})")]
    SessionClosed { id: String, verdict: Verdict },

    /// The voting window has elapsed but the session has not yet been
    /// swept; the vote is rejected and the sweep will finalize the session.
    #[error("voting window for session {0} has elapsed")]
    WindowElapsed(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
