//! Staking-framework parameters — the configuration governing one decision
//! computation.
//!
//! All threshold/ratio fields are fractions in [0, 1] unless documented
//! otherwise. Validation is fail-fast: an out-of-range value is rejected at
//! session open (or preview), never silently clamped.

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Parameters of the stake-weighting framework.
///
/// Missing fields deserialize to the documented example defaults, so a
/// partial `[staking]` config table is enough to override one knob.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakingParams {
    // ── Eligibility floor ────────────────────────────────────────────────
    /// Minimum stake required to cast a counted vote.
    pub min_stake_to_vote: f64,

    /// Minimum stake age (whole days) required to cast a counted vote.
    pub stake_age_min_days: u32,

    // ── Weight normalization ─────────────────────────────────────────────
    /// Stake normalization constant: `stake_norm = min(stake / k, 1)`.
    pub threshold_stake_k: f64,

    /// Age normalization cap in days: `age_norm = min(age / cap, 1)`.
    pub age_max_days: u32,

    /// XP normalization constant: `xp_norm = min(xp / scale, 1)`.
    pub xp_scale: f64,

    /// Blend weight of the stake component.
    pub alpha: f64,

    /// Blend weight of the age component. The XP component receives
    /// `1 - alpha - beta`; `alpha + beta <= 1` by convention.
    pub beta: f64,

    // ── Cohorts & overrides ──────────────────────────────────────────────
    /// Stake-share cutoff below which a staker belongs to the "small
    /// staker" cohort (consumed by the adaptive-democracy side only).
    pub fraction_small_threshold: f64,

    /// Supermajority short-circuit: if one side's weighted share of total
    /// weighted participation reaches this fraction, that side wins
    /// regardless of the ratio test. 0 disables the short-circuit.
    pub stake_fraction_threshold: f64,

    // ── Adaptive democracy ───────────────────────────────────────────────
    /// Whether the reward pool is split between majority and minority.
    pub enable_adaptive_democracy: bool,

    /// Total reward pool for the session, in EUR.
    pub total_pool_eur: f64,

    /// Fraction of the pool routed to the majority side.
    pub majority_pool_ratio: f64,
}

impl StakingParams {
    /// Check every field against its documented range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_finite("min_stake_to_vote", self.min_stake_to_vote)?;
        check_positive("threshold_stake_k", self.threshold_stake_k)?;
        if self.age_max_days == 0 {
            return Err(ConfigError::NotPositive {
                field: "age_max_days",
                value: 0.0,
            });
        }
        check_positive("xp_scale", self.xp_scale)?;
        check_unit_range("alpha", self.alpha)?;
        check_unit_range("beta", self.beta)?;
        check_unit_range("fraction_small_threshold", self.fraction_small_threshold)?;
        check_unit_range("stake_fraction_threshold", self.stake_fraction_threshold)?;
        check_finite("total_pool_eur", self.total_pool_eur)?;
        check_unit_range("majority_pool_ratio", self.majority_pool_ratio)?;
        Ok(())
    }
}

/// The documented example configuration from the staking framework docs.
impl Default for StakingParams {
    fn default() -> Self {
        Self {
            min_stake_to_vote: 50.0,
            stake_age_min_days: 7,
            threshold_stake_k: 50.0,
            age_max_days: 365,
            xp_scale: 100.0,
            alpha: 0.5,
            beta: 0.5,
            fraction_small_threshold: 0.05,
            stake_fraction_threshold: 0.8,
            enable_adaptive_democracy: false,
            total_pool_eur: 0.0,
            majority_pool_ratio: 0.9,
        }
    }
}

fn check_finite(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::NotFinite { field, value });
    }
    Ok(())
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || value <= 0.0 {
        return Err(ConfigError::NotPositive { field, value });
    }
    Ok(())
}

fn check_unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::OutOfUnitRange { field, value });
    }
    Ok(())
}
