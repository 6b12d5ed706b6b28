//! Moderation host for Curia.
//!
//! Wires the session state machine to its collaborators: a persistence
//! store, a notification sink, and a timer-driven expiry sweeper. Each
//! session is serialized behind its own async mutex — there is no global
//! session lock, so sessions for different campaigns evaluate in parallel.

pub mod config;
pub mod error;
pub mod hub;
pub mod logging;
pub mod shutdown;
pub mod sink;

pub use config::ServiceConfig;
pub use error::ServiceError;
pub use hub::{spawn_sweeper, ModerationHub, SessionSummary};
pub use logging::{init_logging, LogFormat};
pub use shutdown::ShutdownController;
pub use sink::TracingSink;
