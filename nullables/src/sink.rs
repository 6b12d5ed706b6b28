//! Recording notification sink.

use curia_session::DecisionEvent;
use curia_store::{DecisionSink, StoreError};
use std::sync::Mutex;

/// A `DecisionSink` that records every published event for inspection.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<DecisionEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All events published so far, in order.
    pub fn events(&self) -> Vec<DecisionEvent> {
        self.events.lock().expect("sink mutex poisoned").clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().expect("sink mutex poisoned").len()
    }
}

impl DecisionSink for RecordingSink {
    fn publish(&self, event: &DecisionEvent) -> Result<(), StoreError> {
        self.events
            .lock()
            .expect("sink mutex poisoned")
            .push(event.clone());
        Ok(())
    }
}
