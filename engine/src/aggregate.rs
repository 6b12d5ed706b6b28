//! Aggregator — folds the vote set into weighted per-category totals.

use crate::weight::{is_eligible, weight};
use curia_types::{StakerInput, StakingParams, VoteChoice, Wallet};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weighted totals and participation counts for one vote set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub weighted_yes: f64,
    pub weighted_no: f64,
    pub weighted_passive: f64,
    /// Stakers clearing the eligibility floor (quorum counts these,
    /// including PASSIVE voters).
    pub eligible_count: u32,
    /// Stakers below the floor — participation statistics only.
    pub ineligible_count: u32,
    /// Eligible stakers whose share of total eligible stake falls below
    /// `fraction_small_threshold`. Consumed by the adaptive-democracy side,
    /// never by the base decision.
    pub small_staker_count: u32,
}

impl VoteTally {
    /// Total weighted participation across all three categories.
    pub fn total_weight(&self) -> f64 {
        self.weighted_yes + self.weighted_no + self.weighted_passive
    }
}

/// Deduplicate a vote set by wallet, last record winning, and return the
/// survivors in ascending wallet order.
///
/// The stable order matters: f64 addition is not associative, and the
/// decision contract requires bit-identical recomputation over an unchanged
/// vote set.
pub fn dedup_by_wallet(stakers: &[StakerInput]) -> Vec<&StakerInput> {
    let mut latest: HashMap<&Wallet, &StakerInput> = HashMap::new();
    for staker in stakers {
        latest.insert(&staker.wallet, staker);
    }
    let mut survivors: Vec<&StakerInput> = latest.into_values().collect();
    survivors.sort_by(|a, b| a.wallet.cmp(&b.wallet));
    survivors
}

/// Fold the vote set into a [`VoteTally`].
///
/// Pure aggregation over the current set: no side effects, no clock.
pub fn aggregate(stakers: &[StakerInput], params: &StakingParams) -> VoteTally {
    let survivors = dedup_by_wallet(stakers);

    let mut tally = VoteTally {
        weighted_yes: 0.0,
        weighted_no: 0.0,
        weighted_passive: 0.0,
        eligible_count: 0,
        ineligible_count: 0,
        small_staker_count: 0,
    };

    let eligible_stake: f64 = survivors
        .iter()
        .filter(|s| is_eligible(s, params))
        .map(|s| s.stake)
        .sum();

    for staker in &survivors {
        if !is_eligible(staker, params) {
            tally.ineligible_count += 1;
            continue;
        }
        tally.eligible_count += 1;

        if eligible_stake > 0.0 && staker.stake / eligible_stake < params.fraction_small_threshold
        {
            tally.small_staker_count += 1;
        }

        let w = weight(staker, params);
        match staker.vote {
            VoteChoice::Yes => tally.weighted_yes += w,
            VoteChoice::No => tally.weighted_no += w,
            VoteChoice::Passive => tally.weighted_passive += w,
        }
    }

    tally
}
