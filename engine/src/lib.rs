//! Pure decision core for Curia moderation.
//!
//! ## Module overview
//!
//! - [`weight`] — staker eligibility and the bounded [0,1] vote weight.
//! - [`aggregate`] — fold a vote set into weighted YES/NO/PASSIVE totals.
//! - [`decision`] — threshold rules producing a [`Ruling`].
//! - [`pool`] — adaptive-democracy reward pool split.
//!
//! Every function in this crate is pure: no I/O, no clock, no randomness.
//! The stateful session wrapper lives in `curia-session`.

pub mod aggregate;
pub mod decision;
pub mod pool;
pub mod weight;

pub use aggregate::{aggregate, dedup_by_wallet, VoteTally};
pub use decision::{resolve, AutoResolvePolicy, DecisionPolicy, Ruling, RATIO_EPSILON};
pub use pool::{split_pool, PoolSplit};
pub use weight::{is_eligible, weight};

use curia_types::{ConfigError, StakerInput, StakingParams, Verdict};
use serde::{Deserialize, Serialize};

/// The computed moderation outcome — a derived, recomputable view over one
/// vote set. Never persisted as mutable state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,
    pub weighted_yes: f64,
    pub weighted_no: f64,
    pub weighted_passive: f64,
    /// Everyone recorded for the round, eligible or not.
    pub participant_count: u32,
    /// Present only when adaptive democracy is enabled and the verdict is
    /// non-escalated.
    pub pool_split: Option<PoolSplit>,
}

/// Build a [`Decision`] from a tally and a settled verdict.
pub fn finalize(tally: &VoteTally, params: &StakingParams, verdict: Verdict) -> Decision {
    let pool_split = if params.enable_adaptive_democracy && verdict != Verdict::Escalated {
        Some(split_pool(params))
    } else {
        None
    };
    Decision {
        verdict,
        weighted_yes: tally.weighted_yes,
        weighted_no: tally.weighted_no,
        weighted_passive: tally.weighted_passive,
        participant_count: tally.eligible_count + tally.ineligible_count,
        pool_split,
    }
}

/// Stateless decision computation over a vote set.
///
/// This is the preview/what-if entry point: no session, no persistence.
/// When votes alone cannot settle the round (quorum unmet or an all-zero
/// deadlock), the policy's auto-resolve verdict is reported — i.e. the
/// answer to "what would this session resolve to if its window expired
/// now".
pub fn compute_decision(
    stakers: &[StakerInput],
    params: &StakingParams,
    policy: &DecisionPolicy,
) -> Result<Decision, ConfigError> {
    params.validate()?;
    policy.validate()?;

    let tally = aggregate(stakers, params);
    let verdict = match resolve(&tally, params, policy) {
        Ruling::Verdict(v) => v,
        Ruling::QuorumUnmet | Ruling::Deadlocked => policy.auto_resolve.verdict(),
    };
    Ok(finalize(&tally, params, verdict))
}
