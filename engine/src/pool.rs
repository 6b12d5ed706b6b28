//! Adaptive democracy splitter — divides the session reward pool between
//! majority and minority voters.
//!
//! The split is an equal per-session allocation, not per-voter: even the
//! losing side receives `(1 - majority_pool_ratio)` of the pool, which keeps
//! honest minority participation worthwhile. Distribution of each share to
//! individual wallets belongs to the external reward disbursement service.

use curia_types::StakingParams;
use serde::{Deserialize, Serialize};

/// How the fixed reward pool divides between the two sides.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PoolSplit {
    pub majority_share_eur: f64,
    pub minority_share_eur: f64,
}

/// Compute the pool split.
///
/// Conservation holds by construction: the minority share is the remainder,
/// so `majority + minority == total_pool_eur` up to f64 rounding.
pub fn split_pool(params: &StakingParams) -> PoolSplit {
    let majority_share_eur = params.total_pool_eur * params.majority_pool_ratio;
    PoolSplit {
        majority_share_eur,
        minority_share_eur: params.total_pool_eur - majority_share_eur,
    }
}
