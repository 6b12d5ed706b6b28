//! Log-based decision sink.

use curia_session::DecisionEvent;
use curia_store::{DecisionSink, StoreError};

/// A `DecisionSink` that emits each finalized decision as a structured log
/// line. The default sink for deployments where downstream consumers tail
/// the log stream instead of subscribing to a bus.
#[derive(Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl DecisionSink for TracingSink {
    fn publish(&self, event: &DecisionEvent) -> Result<(), StoreError> {
        match event.pool_split {
            Some(split) => tracing::info!(
                session = %event.session_id,
                campaign = %event.campaign_id,
                verdict = %event.verdict,
                majority_share_eur = split.majority_share_eur,
                minority_share_eur = split.minority_share_eur,
                "decision finalized"
            ),
            None => tracing::info!(
                session = %event.session_id,
                campaign = %event.campaign_id,
                verdict = %event.verdict,
                "decision finalized"
            ),
        }
        Ok(())
    }
}
