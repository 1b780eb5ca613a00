//! Event sink adapter
//!
//! Implements the EventSink port by recording events in memory.

use crate::events::ValidatorSetEvent;
use crate::ports::EventSink;
use parking_lot::RwLock;

/// In-memory event sink for testing and for hosts without subscribers
pub struct InMemoryEventSink {
    events: RwLock<Vec<ValidatorSetEvent>>,
}

impl InMemoryEventSink {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(Vec::new()),
        }
    }

    pub fn get_events(&self) -> Vec<ValidatorSetEvent> {
        self.events.read().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.read().len()
    }

    pub fn clear(&self) {
        self.events.write().clear();
    }
}

impl Default for InMemoryEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for InMemoryEventSink {
    fn publish(&self, event: ValidatorSetEvent) {
        tracing::trace!(event = event.name(), "validator set event");
        self.events.write().push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ValidatorId;

    #[test]
    fn test_in_memory_event_sink() {
        let sink = InMemoryEventSink::new();
        sink.publish(ValidatorSetEvent::ValidatorUnbonded {
            id: ValidatorId([1u8; 32]),
            height: 3,
        });

        assert_eq!(sink.event_count(), 1);
        sink.clear();
        assert_eq!(sink.event_count(), 0);
    }
}
