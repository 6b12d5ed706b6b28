//! Shared validation and configuration errors.
//!
//! These two error families cover the pure layers (weight model, aggregator,
//! decision rule). Session-level state errors live in `curia-session`.

use thiserror::Error;

/// A malformed staker record.
///
/// Note that an unrecognized vote label is NOT a validation error — it
/// normalizes to PASSIVE per the documented ingestion policy. Only numerics
/// that cannot be interpreted at all (non-finite, negative) reject the
/// record.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("staker {wallet}: stake must be a finite non-negative number, got {value}")]
    BadStake { wallet: String, value: f64 },

    #[error("staker {wallet}: xp must be a finite non-negative number, got {value}")]
    BadXp { wallet: String, value: f64 },

    #[error("staker record has an empty wallet identifier")]
    EmptyWallet,
}

/// An out-of-range staking parameter.
///
/// Raised fail-fast at session open (or at the preview entry point), never
/// silently clamped — a bad parameter here changes real economic outcomes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be > 0, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must be within [0, 1], got {value}")]
    OutOfUnitRange { field: &'static str, value: f64 },

    #[error("{field} must be a finite non-negative number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("vote window must be at least one hour")]
    EmptyVoteWindow,
}
