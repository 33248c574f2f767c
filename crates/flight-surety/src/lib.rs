//! # Flight Surety - Delay Insurance Engine
//!
//! **Status:** Production-Ready
//!
//! ## Purpose
//!
//! A deterministic state machine that admits airlines by multi-party vote,
//! registers their flights, sells delay insurance to passengers and pays a
//! fixed multiple of the premium when an authorized oracle reports a flight
//! late. Funds are tracked in an internal escrow ledger.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement Location |
//! |----|-----------|---------------------|
//! | INVARIANT-1 | `votes == |voters|` | `domain/entities.rs` - `Airline::record_vote()` |
//! | INVARIANT-2 | Funded implies `balance >= min_funding` | `domain/airlines.rs` - `credit_airline_funds()` |
//! | INVARIANT-3 | Ledger accounts sum to `total_held` | `domain/ledger.rs` - `BalanceLedger` |
//! | INVARIANT-4 | Pool equals outstanding premiums | `domain/insurance.rs` - `buy()`, `credit_insurees()` |
//! | INVARIANT-5 | Payable equals credited, unwithdrawn payouts | `domain/insurance.rs` - `pay()` |
//! | INVARIANT-6 | Credited amount is `premium * multiplier` | `domain/services.rs` - `payout_for()` |
//! | INVARIANT-7 | Flight key matches its derivation | `domain/services.rs` - `flight_key()` |
//! | INVARIANT-8 | Policies refer to existing flights | `domain/insurance.rs` - `buy()` |
//! | INVARIANT-9 | Reserve equals open bonuses, within equity | `domain/insurance.rs` - `buy()`, `credit_insurees()` |
//!
//! All nine are re-checked by `domain/invariants.rs` - `check_all_invariants()`.
//!
//! ## Access Matrix
//!
//! | Operation | Caller |
//! |-----------|--------|
//! | `set_operating_status`, `authorize_caller`, `deauthorize_caller` | Owner |
//! | `init_airline` (new address) | Owner or registered airline |
//! | `init_airline` (reset) | Owner |
//! | `vote`, `register_flight` | Registered / funded airline |
//! | `fund_airline` | The airline itself or owner |
//! | `set_flight_status`, `credit_insurees` | Authorized caller |
//! | `buy`, `pay` | Any passenger |
//!
//! ## Components
//!
//! | Component | Location | Purpose |
//! |-----------|----------|---------|
//! | Access gate | `domain/access.rs` | Operational switch, roles |
//! | Airline registry | `domain/airlines.rs` | Nomination, quorum voting, funding |
//! | Flight registry | `domain/flights.rs` | Keyed flights, oracle outcomes |
//! | Insurance escrow | `domain/insurance.rs` | Purchase, credit, withdrawal |
//! | Ledger | `domain/ledger.rs` | Checked, per-account balances |
//! | Service | `service.rs` | Async façade, events, stats |
//!
//! ## Usage Example
//!
//! ```ignore
//! use flight_surety::prelude::*;
//!
//! let service = FlightSuretyService::create(
//!     SuretyConfig::default(), owner, first_airline, "First Air", TracingEventSink,
//! )?;
//! service.fund_airline(first_airline, first_airline, ether(10)).await?;
//! let key = service.register_flight(first_airline, "ND1309".into(), 1_700_000_000).await?;
//! service.buy(passenger, key, ether(1)).await?;
//! ```

// Crate-level lints
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

// =============================================================================
// MODULES
// =============================================================================

pub mod adapters;
pub mod config;
pub mod domain;
pub mod errors;
pub mod events;
pub mod ports;
pub mod service;

// =============================================================================
// PRELUDE
// =============================================================================

/// Convenient re-exports for common usage.
pub mod prelude {
    // Domain entities
    pub use crate::domain::entities::{
        Airline, AirlineStatus, Flight, FlightOutcome, FlightStatus, InsurancePolicy, Payout,
        PolicyStatus, StatusUpdate,
    };

    // Value objects
    pub use crate::domain::value_objects::{
        ether, Address, Amount, FlightKey, PayoutMultiplier, PolicyKey, U256,
    };

    // Domain services
    pub use crate::domain::services::{flight_key, payout_for, quorum_threshold};

    // State
    pub use crate::domain::airlines::{DepositRoute, VoteOutcome};
    pub use crate::domain::insurance::CreditSummary;
    pub use crate::domain::ledger::{Account, BalanceLedger};
    pub use crate::domain::state::{AccountBalance, AirlineView, SuretySnapshot, SuretyState};

    // Invariants
    pub use crate::domain::invariants::{
        check_all_invariants, InvariantCheckResult, InvariantViolation,
    };

    // Ports
    pub use crate::ports::inbound::{AdminApi, FlightSuretyApi, OracleApi};
    pub use crate::ports::outbound::EventSink;

    // Events
    pub use crate::domain::events::SuretyEvent;
    pub use crate::events::{CallOutput, EventEnvelope, FlightRef, SuretyCall};

    // Errors
    pub use crate::errors::{ConfigError, ErrorKind, SuretyError};

    // Config
    pub use crate::config::SuretyConfig;

    // Adapters
    pub use crate::adapters::{RecordingEventSink, TracingEventSink};

    // Service
    pub use crate::service::{FlightSuretyService, ServiceStats};
}

// =============================================================================
// CRATE INFO
// =============================================================================

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Flight Surety";

// =============================================================================
// TESTS
// =============================================================================
