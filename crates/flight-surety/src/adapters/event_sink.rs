//! # Event Sink Adapters
//!
//! Receivers for committed state changes.

use crate::events::EventEnvelope;
use crate::ports::outbound::EventSink;
use std::sync::{Mutex, PoisonError};
use tracing::info;

// =============================================================================
// TRACING SINK
// =============================================================================

/// Logs every event at `info` under the `flight_surety::events` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn publish(&self, envelope: &EventEnvelope) {
        let payload = serde_json::to_string(&envelope.event).unwrap_or_default();
        info!(
            target: "flight_surety::events",
            sequence = envelope.sequence,
            correlation_id = %envelope.correlation_id,
            topic = %envelope.topic(),
            %payload,
            "Event published"
        );
    }
}

// =============================================================================
// RECORDING SINK
// =============================================================================

/// Keeps every envelope in publish order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<EventEnvelope>>,
}

impl RecordingEventSink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<EventEnvelope> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of recorded events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// True if nothing was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes and returns everything recorded so far.
    pub fn take(&self) -> Vec<EventEnvelope> {
        std::mem::take(&mut *self.events.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

impl EventSink for RecordingEventSink {
    fn publish(&self, envelope: &EventEnvelope) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(envelope.clone());
    }
}

// =============================================================================
// TESTS
// =============================================================================
