//! Staker positions — one record per wallet per decision round.

use crate::error::ValidationError;
use crate::vote::VoteChoice;
use crate::wallet::Wallet;
use serde::{Deserialize, Serialize};

/// One staker's validated position at vote time.
///
/// Immutable once recorded for a round; a replacement vote supersedes the
/// prior one for the same wallet (last-write-wins, keyed by wallet).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StakerInput {
    pub wallet: Wallet,
    /// Economic stake backing the vote. Non-negative, finite.
    pub stake: f64,
    /// Whole days the stake has been held.
    pub stake_age_days: u32,
    /// Experience-point score. Non-negative, finite.
    pub xp: f64,
    pub vote: VoteChoice,
}

/// A raw, wire-facing staker record as submitted by the host.
///
/// The vote arrives as a free-form label; numerics arrive unchecked.
/// [`StakerRecord::validate`] turns this into a [`StakerInput`] or a
/// [`ValidationError`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StakerRecord {
    pub wallet: String,
    pub stake: f64,
    #[serde(default)]
    pub stake_age_days: u32,
    #[serde(default)]
    pub xp: f64,
    #[serde(default)]
    pub vote: String,
}

impl StakerRecord {
    /// Validate this record into a typed staker position.
    ///
    /// Non-finite or negative stake/xp rejects the record; an unrecognized
    /// vote label normalizes to PASSIVE.
    pub fn validate(&self) -> Result<StakerInput, ValidationError> {
        let wallet = Wallet::new(self.wallet.as_str());
        if !wallet.is_valid() {
            return Err(ValidationError::EmptyWallet);
        }
        if !self.stake.is_finite() || self.stake < 0.0 {
            return Err(ValidationError::BadStake {
                wallet: wallet.as_str().to_string(),
                value: self.stake,
            });
        }
        if !self.xp.is_finite() || self.xp < 0.0 {
            return Err(ValidationError::BadXp {
                wallet: wallet.as_str().to_string(),
                value: self.xp,
            });
        }
        Ok(StakerInput {
            wallet,
            stake: self.stake,
            stake_age_days: self.stake_age_days,
            xp: self.xp,
            vote: VoteChoice::from_label(&self.vote),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(wallet: &str, stake: f64, xp: f64, vote: &str) -> StakerRecord {
        StakerRecord {
            wallet: wallet.to_string(),
            stake,
            stake_age_days: 10,
            xp,
            vote: vote.to_string(),
        }
    }

    #[test]
    fn valid_record_passes() {
        let input = record("0xAAA", 100.0, 50.0, "YES").validate().unwrap();
        assert_eq!(input.wallet, Wallet::new("0xaaa"));
        assert_eq!(input.vote, VoteChoice::Yes);
        assert_eq!(input.stake, 100.0);
    }

    #[test]
    fn unknown_vote_becomes_passive_not_error() {
        let input = record("0xAAA", 100.0, 50.0, "banana").validate().unwrap();
        assert_eq!(input.vote, VoteChoice::Passive);
    }

    #[test]
    fn nan_stake_rejected() {
        let err = record("0xAAA", f64::NAN, 50.0, "YES").validate().unwrap_err();
        assert!(matches!(err, ValidationError::BadStake { .. }));
    }

    #[test]
    fn negative_stake_rejected() {
        let err = record("0xAAA", -1.0, 50.0, "YES").validate().unwrap_err();
        assert!(matches!(err, ValidationError::BadStake { .. }));
    }

    #[test]
    fn infinite_xp_rejected() {
        let err = record("0xAAA", 10.0, f64::INFINITY, "NO").validate().unwrap_err();
        assert!(matches!(err, ValidationError::BadXp { .. }));
    }

    #[test]
    fn empty_wallet_rejected() {
        let err = record("", 10.0, 0.0, "YES").validate().unwrap_err();
        assert_eq!(err, ValidationError::EmptyWallet);
    }
}
