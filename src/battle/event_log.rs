use crate::battle::state::{EventBus, LoggedEvent};
use serde::{Deserialize, Serialize};

/// The ordered event list handed to the presentation layer.
///
/// Faint events are moved behind every other event of the turn. Each entry
/// keeps the timestamp it was recorded with, so sorting by timestamp
/// recovers the causal order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventLog {
    events: Vec<LoggedEvent>,
}

impl EventLog {
    pub fn build(bus: EventBus) -> Self {
        Self::from_events(bus.into_events())
    }

    pub fn from_events(events: Vec<LoggedEvent>) -> Self {
        let (mut ordered, faints): (Vec<_>, Vec<_>) =
            events.into_iter().partition(|e| !e.event.is_faint());
        ordered.extend(faints);
        Self { events: ordered }
    }

    pub fn events(&self) -> &[LoggedEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<LoggedEvent> {
        self.events
    }

    /// The events in the order they actually happened.
    pub fn chronological(&self) -> Vec<&LoggedEvent> {
        let mut events: Vec<&LoggedEvent> = self.events.iter().collect();
        events.sort_by_key(|e| e.timestamp);
        events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
