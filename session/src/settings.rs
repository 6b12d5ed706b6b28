//! Per-session configuration snapshot.
//!
//! Settings are captured by value when a session opens and never change for
//! the session's lifetime: configuration pushed by the surrounding dev
//! controls applies to newly opened sessions only, so there are no
//! retroactive rule changes mid-vote.

use crate::error::SessionError;
use curia_engine::DecisionPolicy;
use curia_types::{ConfigError, StakingParams};
use serde::{Deserialize, Serialize};

/// Everything a session needs to evaluate votes, frozen at open time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Length of the voting window, in whole hours from `opened_at`.
    pub vote_window_hours: u32,

    /// Stake-weighting framework parameters.
    pub params: StakingParams,

    /// Quorum, ratio threshold, and auto-resolve policy.
    pub policy: DecisionPolicy,
}

impl SessionSettings {
    /// Fail-fast validation, run at session open.
    pub fn validate(&self) -> Result<(), SessionError> {
        if self.vote_window_hours == 0 {
            return Err(SessionError::Config(ConfigError::EmptyVoteWindow));
        }
        self.params.validate()?;
        self.policy.validate()?;
        Ok(())
    }

    /// The window length in seconds.
    pub fn window_secs(&self) -> u64 {
        u64::from(self.vote_window_hours) * 3600
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            vote_window_hours: 48,
            params: StakingParams::default(),
            policy: DecisionPolicy::default(),
        }
    }
}
