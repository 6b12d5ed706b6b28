//! Fundamental types for the Curia moderation engine.
//!
//! This crate defines the core types shared across every other crate in the
//! workspace: wallet identifiers, timestamps, votes, staker positions,
//! staking parameters, and the shared validation/configuration errors.

pub mod error;
pub mod ids;
pub mod params;
pub mod staker;
pub mod time;
pub mod vote;
pub mod wallet;

pub use error::{ConfigError, ValidationError};
pub use ids::{CampaignId, SessionId};
pub use params::StakingParams;
pub use staker::{StakerInput, StakerRecord};
pub use time::Timestamp;
pub use vote::{Verdict, VoteChoice};
pub use wallet::Wallet;
