//! # Domain Layer (Inner Hexagon)
//!
//! The governance-and-escrow state machine.
//! NO I/O, NO async. Every call is a synchronous, terminating transition.
//!
//! - Dependencies point INWARD only (ports, adapters and the service depend on
//!   this module, never the reverse).

pub mod access;
pub mod airlines;
pub mod entities;
pub mod events;
pub mod flights;
pub mod insurance;
pub mod invariants;
pub mod ledger;
pub mod services;
pub mod state;
pub mod value_objects;

pub use airlines::{DepositRoute, VoteOutcome};
pub use entities::*;
pub use events::SuretyEvent;
pub use insurance::CreditSummary;
pub use invariants::*;
pub use ledger::{Account, BalanceLedger};
pub use services::*;
pub use state::{AccountBalance, AirlineView, SuretySnapshot, SuretyState};
pub use value_objects::*;
