//! # Event Schema
//!
//! Wire forms for the engine's two directions of traffic:
//!
//! - [`SuretyCall`]: one inbound call with the acting address, as written in
//!   call logs and forwarded by the application layer.
//! - [`CallOutput`]: the typed return of a committed call.
//! - [`EventEnvelope`]: one committed [`SuretyEvent`] as handed to an
//!   [`EventSink`](crate::ports::outbound::EventSink).
//!
//! Amounts are serialised as `0x`-prefixed hexadecimal wei.

use crate::domain::airlines::{DepositRoute, VoteOutcome};
use crate::domain::entities::{AirlineStatus, FlightOutcome, Payout, StatusUpdate};
use crate::domain::events::SuretyEvent;
use crate::domain::insurance::CreditSummary;
use crate::domain::services::flight_key;
use crate::domain::value_objects::{Address, Amount, FlightKey};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// OUTBOUND EVENTS
// =============================================================================

/// A committed event with its position in the global commit order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope {
    /// Monotonic sequence number, starting at 1.
    pub sequence: u64,
    /// Identifier of the call that produced the event.
    pub correlation_id: Uuid,
    /// The state change.
    pub event: SuretyEvent,
}

impl EventEnvelope {
    /// Topic the event is published under, e.g. `flight_surety.VoteCast`.
    #[must_use]
    pub fn topic(&self) -> String {
        format!("{}.{}", topics::PREFIX, self.event.name())
    }
}

/// Topic naming.
pub mod topics {
    /// Prefix shared by every event topic.
    pub const PREFIX: &str = "flight_surety";
}

// =============================================================================
// INBOUND CALLS
// =============================================================================

/// How a call names a flight: by key, or by the triple the key derives from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FlightRef {
    /// Precomputed key.
    Key(FlightKey),
    /// `(airline, name, timestamp)` triple.
    Triple {
        /// Operating airline.
        airline: Address,
        /// Flight name.
        name: String,
        /// Departure time.
        timestamp: u64,
    },
}

impl FlightRef {
    /// Resolves to the flight key.
    #[must_use]
    pub fn key(&self) -> FlightKey {
        match self {
            Self::Key(key) => *key,
            Self::Triple {
                airline,
                name,
                timestamp,
            } => flight_key(airline, name, *timestamp),
        }
    }
}

impl From<FlightKey> for FlightRef {
    fn from(key: FlightKey) -> Self {
        Self::Key(key)
    }
}

/// One inbound call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
#[allow(missing_docs)]
pub enum SuretyCall {
    SetOperatingStatus {
        caller: Address,
        operational: bool,
    },
    AuthorizeCaller {
        caller: Address,
        target: Address,
    },
    DeauthorizeCaller {
        caller: Address,
        target: Address,
    },
    InitAirline {
        caller: Address,
        airline: Address,
        name: String,
    },
    Vote {
        voter: Address,
        candidate: Address,
    },
    FundAirline {
        caller: Address,
        airline: Address,
        value: Amount,
    },
    FundContract {
        sender: Address,
        value: Amount,
    },
    RegisterFlight {
        airline: Address,
        name: String,
        timestamp: u64,
    },
    SetFlightStatus {
        caller: Address,
        flight: FlightRef,
        outcome: FlightOutcome,
    },
    CreditInsurees {
        caller: Address,
        flight: FlightRef,
    },
    Buy {
        passenger: Address,
        flight: FlightRef,
        premium: Amount,
    },
    Pay {
        passenger: Address,
        flight: FlightRef,
    },
}

impl SuretyCall {
    /// Operation name, used as the tracing span's `operation` field.
    #[must_use]
    pub fn operation(&self) -> &'static str {
        match self {
            Self::SetOperatingStatus { .. } => "set_operating_status",
            Self::AuthorizeCaller { .. } => "authorize_caller",
            Self::DeauthorizeCaller { .. } => "deauthorize_caller",
            Self::InitAirline { .. } => "init_airline",
            Self::Vote { .. } => "vote",
            Self::FundAirline { .. } => "fund_airline",
            Self::FundContract { .. } => "fund_contract",
            Self::RegisterFlight { .. } => "register_flight",
            Self::SetFlightStatus { .. } => "set_flight_status",
            Self::CreditInsurees { .. } => "credit_insurees",
            Self::Buy { .. } => "buy",
            Self::Pay { .. } => "pay",
        }
    }
}

/// Typed return of a committed call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", content = "value", rename_all = "snake_case")]
pub enum CallOutput {
    /// Whether the switch, or the authorized set, changed.
    Changed(bool),
    /// Airline nominated or reset.
    AirlineInitialized,
    /// Vote recorded.
    Vote(VoteOutcome),
    /// Airline status after funding.
    AirlineFunded(AirlineStatus),
    /// Pooled deposit route.
    Deposit(DepositRoute),
    /// Key of the registered flight.
    FlightRegistered(FlightKey),
    /// Oracle report result.
    FlightStatus(StatusUpdate),
    /// Credit batch result.
    Credited(CreditSummary),
    /// Policy purchased.
    Purchased,
    /// Withdrawal receipt.
    Paid(Payout),
}

// =============================================================================
// TESTS
// =============================================================================
