//! Vote choices and moderation verdicts.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A staker's vote on a campaign completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteChoice {
    /// The completion is legitimate and should be approved.
    Yes,
    /// The completion should be rejected.
    No,
    /// Abstain — weighted and counted toward quorum, excluded from the
    /// YES:NO ratio.
    Passive,
}

impl VoteChoice {
    /// Normalize a free-form vote label.
    ///
    /// Ingestion policy: an unrecognized label becomes `Passive` rather than
    /// rejecting the whole batch. This is the one place that normalization
    /// happens, so the behavior stays auditable.
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "YES" | "Y" => Self::Yes,
            "NO" | "N" => Self::No,
            _ => Self::Passive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Passive => "PASSIVE",
        }
    }
}

impl fmt::Display for VoteChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The final outcome of a moderation round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The completion passes moderation.
    Approved,
    /// The completion fails moderation.
    Rejected,
    /// No community decision — handed to external human/governance review.
    Escalated,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Escalated => "ESCALATED",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
