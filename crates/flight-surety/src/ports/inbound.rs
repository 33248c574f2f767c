//! # Driving Ports (API - Inbound)
//!
//! Interfaces the excluded outer layers call. Each collaborator gets the
//! trait matching its role; the service implements all three.

use crate::domain::airlines::{DepositRoute, VoteOutcome};
use crate::domain::entities::{AirlineStatus, FlightOutcome, Payout, StatusUpdate};
use crate::domain::insurance::CreditSummary;
use crate::domain::value_objects::{Address, Amount, FlightKey};
use crate::errors::SuretyError;
use async_trait::async_trait;

/// Calls forwarded by the application layer on behalf of airlines and
/// passengers.
#[async_trait]
pub trait FlightSuretyApi: Send + Sync {
    /// Nominate (or, as owner, reset) an airline.
    async fn init_airline(
        &self,
        caller: Address,
        airline: Address,
        name: String,
    ) -> Result<(), SuretyError>;

    /// Registered airline votes for a candidate.
    async fn vote(&self, voter: Address, candidate: Address) -> Result<VoteOutcome, SuretyError>;

    /// Add funds to a registered airline.
    async fn fund_airline(
        &self,
        caller: Address,
        airline: Address,
        value: Amount,
    ) -> Result<AirlineStatus, SuretyError>;

    /// Pooled deposit not tied to a purchase.
    async fn fund_contract(&self, sender: Address, value: Amount)
        -> Result<DepositRoute, SuretyError>;

    /// Funded airline offers a flight.
    async fn register_flight(
        &self,
        airline: Address,
        name: String,
        timestamp: u64,
    ) -> Result<FlightKey, SuretyError>;

    /// Passenger buys insurance.
    async fn buy(
        &self,
        passenger: Address,
        flight: FlightKey,
        premium: Amount,
    ) -> Result<(), SuretyError>;

    /// Passenger withdraws a credited payout.
    async fn pay(&self, passenger: Address, flight: FlightKey) -> Result<Payout, SuretyError>;
}

/// Calls made by the flight-status oracle collaborator.
#[async_trait]
pub trait OracleApi: Send + Sync {
    /// Report a flight outcome. Retries are harmless.
    async fn set_flight_status(
        &self,
        caller: Address,
        flight: FlightKey,
        outcome: FlightOutcome,
    ) -> Result<StatusUpdate, SuretyError>;

    /// Credit all purchased policies of a late flight. Retries are harmless.
    async fn credit_insurees(
        &self,
        caller: Address,
        flight: FlightKey,
    ) -> Result<CreditSummary, SuretyError>;
}

/// Owner-only administration.
#[async_trait]
pub trait AdminApi: Send + Sync {
    /// Flip the operational switch.
    async fn set_operating_status(
        &self,
        caller: Address,
        operational: bool,
    ) -> Result<bool, SuretyError>;

    /// Allow an oracle / application address.
    async fn authorize_caller(&self, caller: Address, target: Address)
        -> Result<bool, SuretyError>;

    /// Revoke an oracle / application address.
    async fn deauthorize_caller(
        &self,
        caller: Address,
        target: Address,
    ) -> Result<bool, SuretyError>;
}
