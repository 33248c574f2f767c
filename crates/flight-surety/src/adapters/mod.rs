//! # Adapters Layer (Outer Hexagon)
//!
//! Concrete `EventSink` implementations.
//!
//! - `TracingEventSink`: forwards every committed event to `tracing`
//! - `RecordingEventSink`: keeps events in memory for tests and replays

pub mod event_sink;

pub use event_sink::*;
