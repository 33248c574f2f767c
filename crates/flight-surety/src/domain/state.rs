//! # Surety State
//!
//! The single deterministic state machine. Every mutating call follows the
//! same shape: gate checks, then validation of every precondition (including
//! ledger arithmetic), then mutation. Nothing is written before the last
//! check passes, so a rejected call leaves the state unchanged.
//!
//! Operations are split by component:
//!
//! | Component | File |
//! |-----------|------|
//! | Access control gate | `domain/access.rs` |
//! | Airline registry & voting | `domain/airlines.rs` |
//! | Flight registry | `domain/flights.rs` |
//! | Insurance escrow | `domain/insurance.rs` |

use crate::config::SuretyConfig;
use crate::domain::entities::{Airline, AirlineStatus, Flight, InsurancePolicy};
use crate::domain::events::SuretyEvent;
use crate::domain::ledger::{Account, BalanceLedger};
use crate::domain::value_objects::{Address, Amount, FlightKey, PolicyKey};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Complete engine state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SuretyState {
    pub(crate) config: SuretyConfig,
    pub(crate) owner: Address,
    pub(crate) operational: bool,
    pub(crate) authorized_callers: BTreeSet<Address>,
    pub(crate) airlines: HashMap<Address, Airline>,
    pub(crate) flights: HashMap<FlightKey, Flight>,
    pub(crate) policies: HashMap<PolicyKey, InsurancePolicy>,
    /// Passengers per flight in purchase order.
    pub(crate) flight_passengers: HashMap<FlightKey, Vec<Address>>,
    pub(crate) ledger: BalanceLedger,
    journal: Vec<SuretyEvent>,
}

impl SuretyState {
    /// Builds the state and registers `bootstrap_airline` without a vote.
    ///
    /// The bootstrap airline is the root of the airline chain of trust.
    pub fn new(
        config: SuretyConfig,
        owner: Address,
        bootstrap_airline: Address,
        bootstrap_name: impl Into<String>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut bootstrap = Airline::new(bootstrap_airline, bootstrap_name);
        bootstrap.status = AirlineStatus::Registered;

        let mut airlines = HashMap::new();
        airlines.insert(bootstrap_airline, bootstrap);

        Ok(Self {
            config,
            owner,
            operational: true,
            authorized_callers: BTreeSet::new(),
            airlines,
            flights: HashMap::new(),
            policies: HashMap::new(),
            flight_passengers: HashMap::new(),
            ledger: BalanceLedger::new(),
            journal: Vec::new(),
        })
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SuretyConfig {
        &self.config
    }

    /// Contract owner, fixed at construction.
    #[must_use]
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Balance ledger (read-only).
    #[must_use]
    pub fn ledger(&self) -> &BalanceLedger {
        &self.ledger
    }

    /// Balance of one ledger account.
    #[must_use]
    pub fn account_balance(&self, account: &Account) -> Amount {
        self.ledger.balance(account)
    }

    /// Total funds held in escrow.
    #[must_use]
    pub fn total_held(&self) -> Amount {
        self.ledger.total_held()
    }

    /// Cumulative amount paid out to `passenger`.
    #[must_use]
    pub fn paid_out(&self, passenger: &Address) -> Amount {
        self.ledger.paid_out(passenger)
    }

    pub(crate) fn emit(&mut self, event: SuretyEvent) {
        self.journal.push(event);
    }

    /// Takes the events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<SuretyEvent> {
        std::mem::take(&mut self.journal)
    }

    /// Serialisable dump with deterministic ordering.
    #[must_use]
    pub fn snapshot(&self) -> SuretySnapshot {
        let mut airlines: Vec<AirlineView> = self.airlines.values().map(AirlineView::from).collect();
        airlines.sort_by_key(|a| a.address);

        let mut flights: Vec<Flight> = self.flights.values().cloned().collect();
        flights.sort_by_key(|f| f.key);

        let mut policies: Vec<InsurancePolicy> = self.policies.values().cloned().collect();
        policies.sort_by_key(|p| PolicyKey::new(p.passenger, p.flight));

        let accounts = self
            .ledger
            .accounts()
            .map(|(account, balance)| AccountBalance {
                account: *account,
                balance: *balance,
            })
            .collect();

        SuretySnapshot {
            owner: self.owner,
            operational: self.operational,
            authorized_callers: self.authorized_callers.iter().copied().collect(),
            airlines,
            flights,
            policies,
            accounts,
            total_held: self.ledger.total_held(),
        }
    }
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// Airline as shown in a snapshot (voters sorted).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirlineView {
    /// Address.
    pub address: Address,
    /// Name.
    pub name: String,
    /// Status.
    pub status: AirlineStatus,
    /// Cumulative funding.
    pub balance: Amount,
    /// Equity reserved for open policies.
    pub reserved: Amount,
    /// Vote count.
    pub votes: u64,
    /// Voters, sorted.
    pub voters: Vec<Address>,
}

impl From<&Airline> for AirlineView {
    fn from(airline: &Airline) -> Self {
        let mut voters: Vec<Address> = airline.voters.iter().copied().collect();
        voters.sort();
        Self {
            address: airline.address,
            name: airline.name.clone(),
            status: airline.status,
            balance: airline.balance,
            reserved: airline.reserved,
            votes: airline.votes,
            voters,
        }
    }
}

/// One non-zero ledger account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Account.
    pub account: Account,
    /// Balance.
    pub balance: Amount,
}

/// Full state dump.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuretySnapshot {
    /// Contract owner.
    pub owner: Address,
    /// Operational switch.
    pub operational: bool,
    /// Oracle / application callers.
    pub authorized_callers: Vec<Address>,
    /// Airlines by address.
    pub airlines: Vec<AirlineView>,
    /// Flights by key.
    pub flights: Vec<Flight>,
    /// Policies by (passenger, flight).
    pub policies: Vec<InsurancePolicy>,
    /// Non-zero ledger accounts.
    pub accounts: Vec<AccountBalance>,
    /// Total escrow.
    pub total_held: Amount,
}

// =============================================================================
// TESTS
// =============================================================================
