//! Decision-finalized event emitted to the notification collaborator.

use curia_engine::PoolSplit;
use curia_types::{CampaignId, SessionId, Timestamp, Verdict};
use serde::{Deserialize, Serialize};

/// Emitted once per session, when it reaches a terminal state.
///
/// Downstream consumers: reward disbursement (via `pool_split`) and
/// user-facing notifications.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionEvent {
    pub session_id: SessionId,
    pub campaign_id: CampaignId,
    pub verdict: Verdict,
    pub pool_split: Option<PoolSplit>,
    pub decided_at: Timestamp,
}
