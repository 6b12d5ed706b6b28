//! Abstract collaborator traits for the moderation host.
//!
//! The engine performs no I/O; persistence and notification live behind
//! these traits. Every backend (in-memory, a database, a message bus)
//! implements them, and the host depends only on the traits. Retries belong
//! to the implementing layer, never to the engine.

pub mod error;
pub mod memory;
pub mod session;
pub mod sink;

pub use error::StoreError;
pub use memory::MemorySessionStore;
pub use session::SessionStore;
pub use sink::DecisionSink;
