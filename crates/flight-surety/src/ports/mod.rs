//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the surety core and its collaborators.
//!
//! - **Driving Ports (Inbound)**: `FlightSuretyApi` (application layer),
//!   `OracleApi` (flight-status reporter), `AdminApi` (owner)
//! - **Driven Ports (Outbound)**: `EventSink` (state-change hooks)
//! - No concrete implementations in this module

pub mod inbound;
pub mod outbound;

pub use inbound::*;
pub use outbound::*;
