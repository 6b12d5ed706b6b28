//! Decision rule — applies configured thresholds to a tally.
//!
//! Precedence is fixed: supermajority short-circuit, quorum gate,
//! no-opposition approval, all-zero deadlock, ratio test. The short-circuit
//! runs before the quorum gate so a dominant side can settle a session
//! before the voter-count quorum is reached.

use crate::aggregate::VoteTally;
use curia_types::{ConfigError, StakingParams, Verdict};
use serde::{Deserialize, Serialize};

/// Denominator floor for the YES:NO ratio test.
pub const RATIO_EPSILON: f64 = 1e-9;

/// Fallback verdict applied when the voting window expires without a clear
/// quorum-backed decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AutoResolvePolicy {
    /// Hand the completion to external human/governance review.
    Escalate,
    /// Approve when the community could not decide.
    ApproveDefault,
    /// Reject when the community could not decide.
    RejectDefault,
}

impl AutoResolvePolicy {
    /// The verdict this policy resolves to.
    pub fn verdict(&self) -> Verdict {
        match self {
            Self::Escalate => Verdict::Escalated,
            Self::ApproveDefault => Verdict::Approved,
            Self::RejectDefault => Verdict::Rejected,
        }
    }
}

/// Session-level decision thresholds, snapshotted at session open.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionPolicy {
    /// Minimum eligible participants before a decision can finalize on
    /// votes alone.
    pub min_voters: u32,

    /// YES:NO weighted ratio required for approval. Not a fraction: 1.0
    /// means simple weighted majority, 2.0 means yes must double no.
    pub threshold_ratio: f64,

    pub auto_resolve: AutoResolvePolicy,
}

impl DecisionPolicy {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold_ratio.is_finite() || self.threshold_ratio < 0.0 {
            return Err(ConfigError::NotFinite {
                field: "threshold_ratio",
                value: self.threshold_ratio,
            });
        }
        Ok(())
    }
}

impl Default for DecisionPolicy {
    fn default() -> Self {
        Self {
            min_voters: 3,
            threshold_ratio: 1.0,
            auto_resolve: AutoResolvePolicy::Escalate,
        }
    }
}

/// What the decision rule concluded from the current tally.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ruling {
    /// Votes alone settle the round.
    Verdict(Verdict),
    /// Not enough eligible participants; the session stays open until the
    /// window expires (then the auto-resolve policy applies).
    QuorumUnmet,
    /// Quorum met but all weighted YES/NO totals are zero (all PASSIVE or
    /// no eligible votes); defer to the auto-resolve policy.
    Deadlocked,
}

/// Apply the decision rule to a tally.
pub fn resolve(tally: &VoteTally, params: &StakingParams, policy: &DecisionPolicy) -> Ruling {
    // Supermajority short-circuit: a side holding >= stake_fraction_threshold
    // of total weighted participation wins outright, quorum or not. A zero
    // threshold disables the check (it would otherwise fire on the first
    // vote).
    let threshold = params.stake_fraction_threshold;
    if threshold > 0.0 {
        let total = tally.total_weight();
        if total > 0.0 {
            if tally.weighted_yes / total >= threshold {
                return Ruling::Verdict(Verdict::Approved);
            }
            if tally.weighted_no / total >= threshold {
                return Ruling::Verdict(Verdict::Rejected);
            }
        }
    }

    if tally.eligible_count < policy.min_voters {
        return Ruling::QuorumUnmet;
    }

    if tally.weighted_yes == 0.0 && tally.weighted_no == 0.0 {
        return Ruling::Deadlocked;
    }

    // No opposition: approve unconditionally.
    if tally.weighted_no == 0.0 {
        return Ruling::Verdict(Verdict::Approved);
    }

    let ratio = tally.weighted_yes / tally.weighted_no.max(RATIO_EPSILON);
    if ratio >= policy.threshold_ratio {
        Ruling::Verdict(Verdict::Approved)
    } else {
        Ruling::Verdict(Verdict::Rejected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(yes: f64, no: f64, passive: f64, eligible: u32) -> VoteTally {
        VoteTally {
            weighted_yes: yes,
            weighted_no: no,
            weighted_passive: passive,
            eligible_count: eligible,
            ineligible_count: 0,
            small_staker_count: 0,
        }
    }

    fn params_with_supermajority(threshold: f64) -> StakingParams {
        StakingParams {
            stake_fraction_threshold: threshold,
            ..Default::default()
        }
    }

    #[test]
    fn quorum_unmet_stays_open() {
        let ruling = resolve(
            &tally(1.0, 0.2, 0.0, 2),
            &params_with_supermajority(0.0),
            &DecisionPolicy::default(), // min_voters = 3
        );
        assert_eq!(ruling, Ruling::QuorumUnmet);
    }

    #[test]
    fn ratio_meets_threshold_approves() {
        let ruling = resolve(
            &tally(1.5, 1.0, 0.0, 5),
            &params_with_supermajority(0.0),
            &DecisionPolicy {
                threshold_ratio: 1.5,
                ..Default::default()
            },
        );
        assert_eq!(ruling, Ruling::Verdict(Verdict::Approved));
    }

    #[test]
    fn ratio_below_threshold_rejects() {
        let ruling = resolve(
            &tally(1.0, 1.0, 0.0, 5),
            &params_with_supermajority(0.0),
            &DecisionPolicy {
                threshold_ratio: 1.5,
                ..Default::default()
            },
        );
        assert_eq!(ruling, Ruling::Verdict(Verdict::Rejected));
    }

    #[test]
    fn no_opposition_approves_unconditionally() {
        // Even with an absurd ratio requirement, zero NO weight approves.
        let ruling = resolve(
            &tally(0.1, 0.0, 0.0, 5),
            &params_with_supermajority(0.0),
            &DecisionPolicy {
                threshold_ratio: 1_000.0,
                ..Default::default()
            },
        );
        assert_eq!(ruling, Ruling::Verdict(Verdict::Approved));
    }

    #[test]
    fn all_zero_is_deadlocked() {
        let ruling = resolve(
            &tally(0.0, 0.0, 1.2, 5),
            &params_with_supermajority(0.0),
            &DecisionPolicy::default(),
        );
        assert_eq!(ruling, Ruling::Deadlocked);
    }

    #[test]
    fn supermajority_bypasses_quorum() {
        // One voter holding 100% of weighted participation settles the
        // round before min_voters is reached.
        let ruling = resolve(
            &tally(0.9, 0.0, 0.0, 1),
            &params_with_supermajority(0.8),
            &DecisionPolicy {
                min_voters: 5,
                ..Default::default()
            },
        );
        assert_eq!(ruling, Ruling::Verdict(Verdict::Approved));
    }

    #[test]
    fn supermajority_no_side_rejects() {
        let ruling = resolve(
            &tally(0.1, 0.9, 0.0, 2),
            &params_with_supermajority(0.8),
            &DecisionPolicy {
                min_voters: 5,
                ..Default::default()
            },
        );
        assert_eq!(ruling, Ruling::Verdict(Verdict::Rejected));
    }

    #[test]
    fn passive_weight_dilutes_supermajority() {
        // YES holds 0.5/1.0 of participation — below the 0.8 cutoff even
        // though it dwarfs NO.
        let ruling = resolve(
            &tally(0.5, 0.0, 0.5, 2),
            &params_with_supermajority(0.8),
            &DecisionPolicy {
                min_voters: 5,
                ..Default::default()
            },
        );
        assert_eq!(ruling, Ruling::QuorumUnmet);
    }

    #[test]
    fn zero_threshold_disables_short_circuit() {
        let ruling = resolve(
            &tally(0.9, 0.0, 0.0, 1),
            &params_with_supermajority(0.0),
            &DecisionPolicy {
                min_voters: 5,
                ..Default::default()
            },
        );
        assert_eq!(ruling, Ruling::QuorumUnmet);
    }

    #[test]
    fn yes_zero_no_positive_rejects() {
        let ruling = resolve(
            &tally(0.0, 0.4, 0.0, 5),
            &params_with_supermajority(0.0),
            &DecisionPolicy::default(),
        );
        assert_eq!(ruling, Ruling::Verdict(Verdict::Rejected));
    }

    #[test]
    fn negative_threshold_ratio_rejected_by_validation() {
        let policy = DecisionPolicy {
            threshold_ratio: -1.0,
            ..Default::default()
        };
        assert!(policy.validate().is_err());
    }
}
