//! # Domain Events
//!
//! State-change hooks. Each committed call records the events below in the
//! state's journal; a rejected call records none.

use crate::domain::entities::FlightStatus;
use crate::domain::value_objects::{Address, Amount, FlightKey};
use serde::{Deserialize, Serialize};

/// A committed state change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SuretyEvent {
    /// Operational switch flipped.
    OperationalStatusChanged { operational: bool },
    /// Address added to the oracle/application caller set.
    CallerAuthorized { caller: Address },
    /// Address removed from the caller set.
    CallerDeauthorized { caller: Address },
    /// Airline record created or reset to `Init`.
    AirlineInitialized {
        airline: Address,
        name: String,
        nominated_by: Address,
        reset: bool,
    },
    /// A registered airline voted for a candidate.
    VoteCast {
        candidate: Address,
        voter: Address,
        votes: u64,
        threshold: u64,
    },
    /// Candidate admitted.
    AirlineRegistered { airline: Address, votes: u64 },
    /// Funds added to an airline.
    AirlineFundsDeposited {
        airline: Address,
        amount: Amount,
        balance: Amount,
    },
    /// Airline crossed the funding threshold.
    AirlineFunded { airline: Address, balance: Amount },
    /// Deposit routed to the owner account.
    OwnerDeposit { amount: Amount },
    /// Flight registered (or an unresolved record overwritten).
    FlightRegistered {
        key: FlightKey,
        airline: Address,
        name: String,
        timestamp: u64,
        replaced: bool,
    },
    /// Oracle outcome recorded.
    FlightStatusUpdated { key: FlightKey, status: FlightStatus },
    /// Policy bought.
    InsurancePurchased {
        passenger: Address,
        flight: FlightKey,
        premium: Amount,
    },
    /// Policy credited after a delay.
    InsureeCredited {
        passenger: Address,
        flight: FlightKey,
        amount: Amount,
    },
    /// Payout left escrow.
    InsuranceWithdrawn {
        passenger: Address,
        flight: FlightKey,
        amount: Amount,
    },
}

impl SuretyEvent {
    /// Short name used as a log/topic label.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::OperationalStatusChanged { .. } => "OperationalStatusChanged",
            Self::CallerAuthorized { .. } => "CallerAuthorized",
            Self::CallerDeauthorized { .. } => "CallerDeauthorized",
            Self::AirlineInitialized { .. } => "AirlineInitialized",
            Self::VoteCast { .. } => "VoteCast",
            Self::AirlineRegistered { .. } => "AirlineRegistered",
            Self::AirlineFundsDeposited { .. } => "AirlineFundsDeposited",
            Self::AirlineFunded { .. } => "AirlineFunded",
            Self::OwnerDeposit { .. } => "OwnerDeposit",
            Self::FlightRegistered { .. } => "FlightRegistered",
            Self::FlightStatusUpdated { .. } => "FlightStatusUpdated",
            Self::InsurancePurchased { .. } => "InsurancePurchased",
            Self::InsureeCredited { .. } => "InsureeCredited",
            Self::InsuranceWithdrawn { .. } => "InsuranceWithdrawn",
        }
    }
}
