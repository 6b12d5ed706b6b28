//! Nullable collaborators for deterministic testing.
//!
//! The host's external dependencies (persistence, notification) are
//! abstracted behind traits in `curia-store`. This crate provides
//! test-friendly implementations that are deterministic, programmatically
//! inspectable, and never touch the filesystem or network.

pub mod sink;
pub mod store;

pub use sink::RecordingSink;
pub use store::FailingSessionStore;
