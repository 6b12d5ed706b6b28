//! Notification sink trait.

use crate::StoreError;
use curia_session::DecisionEvent;

/// Receives decision-finalized events for downstream reward disbursement
/// and user-facing notifications.
pub trait DecisionSink: Send + Sync {
    fn publish(&self, event: &DecisionEvent) -> Result<(), StoreError>;
}
