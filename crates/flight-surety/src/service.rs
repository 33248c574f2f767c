//! # Flight Surety Service
//!
//! Async façade over the single-threaded state machine. Every call takes the
//! state write lock, runs one synchronous transition, publishes the events it
//! committed and releases the lock. Calls are therefore totally ordered and
//! event sequence numbers follow commit order.
//!
//! ## Observability
//!
//! - Each call runs in a `surety_call` span carrying `operation` and a fresh
//!   `correlation_id`
//! - Rejected calls are logged at `warn` with their `ErrorKind`
//! - `ServiceStats` counts committed calls, rejections per kind and events

use crate::config::SuretyConfig;
use crate::domain::airlines::{DepositRoute, VoteOutcome};
use crate::domain::entities::{
    Airline, AirlineStatus, Flight, FlightOutcome, InsurancePolicy, Payout, StatusUpdate,
};
use crate::domain::insurance::CreditSummary;
use crate::domain::invariants::{check_all_invariants, InvariantCheckResult};
use crate::domain::ledger::Account;
use crate::domain::state::{SuretySnapshot, SuretyState};
use crate::domain::value_objects::{Address, Amount, FlightKey};
use crate::errors::{ConfigError, ErrorKind, SuretyError};
use crate::events::{CallOutput, EventEnvelope, SuretyCall};
use crate::ports::inbound::{AdminApi, FlightSuretyApi, OracleApi};
use crate::ports::outbound::EventSink;

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

/// Counters for the service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Calls that committed.
    pub calls_committed: u64,
    /// Calls rejected without effect.
    pub calls_rejected: u64,
    /// Rejections grouped by error kind.
    pub rejections_by_kind: BTreeMap<ErrorKind, u64>,
    /// Events handed to the sink.
    pub events_published: u64,
}

struct Engine {
    state: SuretyState,
    next_sequence: u64,
}

/// The main Flight Surety service.
pub struct FlightSuretyService<E: EventSink> {
    engine: Arc<RwLock<Engine>>,
    sink: Arc<E>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl<E: EventSink> FlightSuretyService<E> {
    /// Wraps an existing state.
    pub fn new(state: SuretyState, sink: E) -> Self {
        Self {
            engine: Arc::new(RwLock::new(Engine {
                state,
                next_sequence: 1,
            })),
            sink: Arc::new(sink),
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Builds a fresh state and wraps it.
    pub fn create(
        config: SuretyConfig,
        owner: Address,
        bootstrap_airline: Address,
        bootstrap_name: impl Into<String>,
        sink: E,
    ) -> Result<Self, ConfigError> {
        let state = SuretyState::new(config, owner, bootstrap_airline, bootstrap_name)?;
        Ok(Self::new(state, sink))
    }

    /// The event sink.
    pub fn sink(&self) -> &E {
        &self.sink
    }

    /// Get current service statistics.
    pub async fn stats(&self) -> ServiceStats {
        self.stats.read().await.clone()
    }

    // =========================================================================
    // READS
    // =========================================================================

    /// Runs `f` against a consistent view of the state.
    pub async fn read<R>(&self, f: impl FnOnce(&SuretyState) -> R) -> R {
        let engine = self.engine.read().await;
        f(&engine.state)
    }

    /// Serialisable dump of the whole state.
    pub async fn snapshot(&self) -> SuretySnapshot {
        self.read(SuretyState::snapshot).await
    }

    /// Runs every invariant check.
    pub async fn check_invariants(&self) -> InvariantCheckResult {
        self.read(check_all_invariants).await
    }

    /// Whether mutating calls are accepted.
    pub async fn is_operational(&self) -> bool {
        self.read(SuretyState::is_operational).await
    }

    /// Airline record, if any.
    pub async fn airline(&self, address: Address) -> Option<Airline> {
        self.read(|s| s.airline(&address).cloned()).await
    }

    /// Flight record, if any.
    pub async fn flight(&self, key: FlightKey) -> Option<Flight> {
        self.read(|s| s.flight(&key).cloned()).await
    }

    /// Policy record, if any.
    pub async fn policy(&self, passenger: Address, flight: FlightKey) -> Option<InsurancePolicy> {
        self.read(|s| s.policy(&passenger, &flight).cloned()).await
    }

    /// Balance of one ledger account.
    pub async fn account_balance(&self, account: Account) -> Amount {
        self.read(|s| s.account_balance(&account)).await
    }

    /// Total funds held in escrow.
    pub async fn total_held(&self) -> Amount {
        self.read(SuretyState::total_held).await
    }

    // =========================================================================
    // CALLS
    // =========================================================================

    /// Applies one wire-form call.
    pub async fn dispatch(&self, call: SuretyCall) -> Result<CallOutput, SuretyError> {
        let operation = call.operation();
        self.execute(operation, move |state| apply_call(state, call))
            .await
    }

    async fn execute<T, F>(&self, operation: &'static str, call: F) -> Result<T, SuretyError>
    where
        F: FnOnce(&mut SuretyState) -> Result<T, SuretyError> + Send,
        T: Send,
    {
        let correlation_id = Uuid::new_v4();
        let span = info_span!("surety_call", operation, correlation_id = %correlation_id);

        async move {
            let (result, published) = {
                let mut engine = self.engine.write().await;
                let result = call(&mut engine.state);
                let events = engine.state.drain_events();

                let mut published = 0u64;
                if result.is_ok() {
                    for event in events {
                        let envelope = EventEnvelope {
                            sequence: engine.next_sequence,
                            correlation_id,
                            event,
                        };
                        engine.next_sequence += 1;
                        self.sink.publish(&envelope);
                        published += 1;
                    }
                }
                (result, published)
            };

            let mut stats = self.stats.write().await;
            match &result {
                Ok(_) => {
                    stats.calls_committed += 1;
                    stats.events_published += published;
                    debug!(events = published, "Call committed");
                }
                Err(err) => {
                    stats.calls_rejected += 1;
                    *stats.rejections_by_kind.entry(err.kind()).or_default() += 1;
                    warn!(kind = ?err.kind(), error = %err, "Call rejected");
                }
            }
            result
        }
        .instrument(span)
        .await
    }
}

fn apply_call(state: &mut SuretyState, call: SuretyCall) -> Result<CallOutput, SuretyError> {
    match call {
        SuretyCall::SetOperatingStatus {
            caller,
            operational,
        } => state
            .set_operating_status(caller, operational)
            .map(CallOutput::Changed),
        SuretyCall::AuthorizeCaller { caller, target } => {
            state.authorize_caller(caller, target).map(CallOutput::Changed)
        }
        SuretyCall::DeauthorizeCaller { caller, target } => state
            .deauthorize_caller(caller, target)
            .map(CallOutput::Changed),
        SuretyCall::InitAirline {
            caller,
            airline,
            name,
        } => state
            .init_airline(caller, airline, name)
            .map(|()| CallOutput::AirlineInitialized),
        SuretyCall::Vote { voter, candidate } => state.vote(voter, candidate).map(CallOutput::Vote),
        SuretyCall::FundAirline {
            caller,
            airline,
            value,
        } => state
            .fund_airline(caller, airline, value)
            .map(CallOutput::AirlineFunded),
        SuretyCall::FundContract { sender, value } => {
            state.fund_contract(sender, value).map(CallOutput::Deposit)
        }
        SuretyCall::RegisterFlight {
            airline,
            name,
            timestamp,
        } => state
            .register_flight(airline, name, timestamp)
            .map(CallOutput::FlightRegistered),
        SuretyCall::SetFlightStatus {
            caller,
            flight,
            outcome,
        } => state
            .set_flight_status(caller, flight.key(), outcome)
            .map(CallOutput::FlightStatus),
        SuretyCall::CreditInsurees { caller, flight } => state
            .credit_insurees(caller, flight.key())
            .map(CallOutput::Credited),
        SuretyCall::Buy {
            passenger,
            flight,
            premium,
        } => state
            .buy(passenger, flight.key(), premium)
            .map(|()| CallOutput::Purchased),
        SuretyCall::Pay { passenger, flight } => {
            state.pay(passenger, flight.key()).map(CallOutput::Paid)
        }
    }
}

// =============================================================================
// PORT IMPLEMENTATIONS
// =============================================================================

#[async_trait]
impl<E: EventSink> FlightSuretyApi for FlightSuretyService<E> {
    async fn init_airline(
        &self,
        caller: Address,
        airline: Address,
        name: String,
    ) -> Result<(), SuretyError> {
        self.execute("init_airline", move |s| s.init_airline(caller, airline, name))
            .await
    }

    async fn vote(&self, voter: Address, candidate: Address) -> Result<VoteOutcome, SuretyError> {
        self.execute("vote", move |s| s.vote(voter, candidate)).await
    }

    async fn fund_airline(
        &self,
        caller: Address,
        airline: Address,
        value: Amount,
    ) -> Result<AirlineStatus, SuretyError> {
        self.execute("fund_airline", move |s| s.fund_airline(caller, airline, value))
            .await
    }

    async fn fund_contract(
        &self,
        sender: Address,
        value: Amount,
    ) -> Result<DepositRoute, SuretyError> {
        self.execute("fund_contract", move |s| s.fund_contract(sender, value))
            .await
    }

    async fn register_flight(
        &self,
        airline: Address,
        name: String,
        timestamp: u64,
    ) -> Result<FlightKey, SuretyError> {
        self.execute("register_flight", move |s| {
            s.register_flight(airline, name, timestamp)
        })
        .await
    }

    async fn buy(
        &self,
        passenger: Address,
        flight: FlightKey,
        premium: Amount,
    ) -> Result<(), SuretyError> {
        self.execute("buy", move |s| s.buy(passenger, flight, premium))
            .await
    }

    async fn pay(&self, passenger: Address, flight: FlightKey) -> Result<Payout, SuretyError> {
        self.execute("pay", move |s| s.pay(passenger, flight)).await
    }
}

#[async_trait]
impl<E: EventSink> OracleApi for FlightSuretyService<E> {
    async fn set_flight_status(
        &self,
        caller: Address,
        flight: FlightKey,
        outcome: FlightOutcome,
    ) -> Result<StatusUpdate, SuretyError> {
        self.execute("set_flight_status", move |s| {
            s.set_flight_status(caller, flight, outcome)
        })
        .await
    }

    async fn credit_insurees(
        &self,
        caller: Address,
        flight: FlightKey,
    ) -> Result<CreditSummary, SuretyError> {
        self.execute("credit_insurees", move |s| s.credit_insurees(caller, flight))
            .await
    }
}

#[async_trait]
impl<E: EventSink> AdminApi for FlightSuretyService<E> {
    async fn set_operating_status(
        &self,
        caller: Address,
        operational: bool,
    ) -> Result<bool, SuretyError> {
        self.execute("set_operating_status", move |s| {
            s.set_operating_status(caller, operational)
        })
        .await
    }

    async fn authorize_caller(
        &self,
        caller: Address,
        target: Address,
    ) -> Result<bool, SuretyError> {
        self.execute("authorize_caller", move |s| s.authorize_caller(caller, target))
            .await
    }

    async fn deauthorize_caller(
        &self,
        caller: Address,
        target: Address,
    ) -> Result<bool, SuretyError> {
        self.execute("deauthorize_caller", move |s| {
            s.deauthorize_caller(caller, target)
        })
        .await
    }
}

// =============================================================================
// TESTS
// =============================================================================
