//! # Driven Ports (SPI - Outbound)
//!
//! The core publishes every committed state change through an `EventSink`.
//! Indexers, loggers and tests plug in here; the core never depends on what
//! they do with the events.

use crate::events::EventEnvelope;

/// Receiver of committed state changes.
///
/// Called with the state lock held, in commit order. Implementations must
/// not block and must not call back into the service.
pub trait EventSink: Send + Sync {
    /// Publish one event.
    fn publish(&self, envelope: &EventEnvelope);
}

impl<T: EventSink + ?Sized> EventSink for std::sync::Arc<T> {
    fn publish(&self, envelope: &EventEnvelope) {
        (**self).publish(envelope);
    }
}
