//! HTTP API for the Curia moderation host.
//!
//! Provides endpoints for:
//! - Stateless decision preview (stakers + params in, decision out — no
//!   persistence, usable for what-if computation)
//! - Opening moderation sessions
//! - Submitting and replacing votes
//! - Session inspection (live or archived)
//! - Operator escalation

pub mod error;
pub mod handlers;
pub mod server;

pub use error::RpcError;
pub use server::{RpcServer, RpcState};
