//! Weight model — maps a staker's position into a bounded vote weight.
//!
//! `weight = alpha * stake_norm + beta * age_norm + (1 - alpha - beta) * xp_norm`
//! with each component normalized into [0, 1] against its configured
//! constant. The blend is clamped to [0, 1] as a safety net against
//! misconfigured `alpha + beta > 1`.

use curia_types::{StakerInput, StakingParams};

/// Whether this staker clears the eligibility floor.
///
/// Ineligible stakers contribute weight 0 regardless of vote and appear only
/// in participation statistics, never in weighted totals.
pub fn is_eligible(staker: &StakerInput, params: &StakingParams) -> bool {
    staker.stake >= params.min_stake_to_vote
        && staker.stake_age_days >= params.stake_age_min_days
}

/// Compute the staker's vote weight.
///
/// Pure and deterministic: identical input yields identical output. Returns
/// 0 for ineligible stakers.
pub fn weight(staker: &StakerInput, params: &StakingParams) -> f64 {
    if !is_eligible(staker, params) {
        return 0.0;
    }

    let stake_norm = (staker.stake / params.threshold_stake_k).min(1.0);
    let age_norm = (staker.stake_age_days as f64 / params.age_max_days as f64).min(1.0);
    let xp_norm = (staker.xp / params.xp_scale).min(1.0);

    let xp_coeff = 1.0 - params.alpha - params.beta;
    let blended = params.alpha * stake_norm + params.beta * age_norm + xp_coeff * xp_norm;

    blended.clamp(0.0, 1.0)
}
