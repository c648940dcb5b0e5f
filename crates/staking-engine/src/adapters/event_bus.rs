//! Event bus adapter.
//!
//! Implements the EventSink port by recording events in memory, for tests
//! and in-process observers.

use crate::events::StakingEvent;
use crate::ports::EventSink;
use async_trait::async_trait;

pub struct InMemoryEventBus {
    events: parking_lot::RwLock<Vec<StakingEvent>>,
}

impl InMemoryEventBus {
    pub fn new() -> Self {
        Self {
            events: parking_lot::RwLock::new(Vec::new()),
        }
    }

    pub fn get_events(&self) -> Vec<StakingEvent> {
        self.events.read().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    pub fn events_of_kind(&self, kind: &str) -> Vec<StakingEvent> {
        self.events
            .read()
            .iter()
            .filter(|event| event.kind() == kind)
            .cloned()
            .collect()
    }
}

impl Default for InMemoryEventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventSink for InMemoryEventBus {
    async fn publish(&self, event: StakingEvent) -> Result<(), String> {
        self.events.write().push(event);
        Ok(())
    }
}
