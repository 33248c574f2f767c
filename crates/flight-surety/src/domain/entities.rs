//! # Core Domain Entities
//!
//! Airlines, flights and insurance policies as held in the surety state.

use crate::domain::value_objects::{Address, Amount, FlightKey, U256};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

// =============================================================================
// AIRLINE
// =============================================================================

/// Lifecycle of an airline record.
///
/// `Init -> Registered -> Funded`. Only an administrative re-init goes back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AirlineStatus {
    /// Nominated, collecting votes.
    Init,
    /// Admitted by quorum (or bootstrap); may vote, may fund.
    Registered,
    /// Registered and funded past the minimum; may offer flights.
    Funded,
}

impl AirlineStatus {
    /// Registered or Funded. Funded implies Registered.
    #[must_use]
    pub fn is_registered(self) -> bool {
        matches!(self, Self::Registered | Self::Funded)
    }
}

impl fmt::Display for AirlineStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Init => "Init",
            Self::Registered => "Registered",
            Self::Funded => "Funded",
        };
        f.write_str(s)
    }
}

/// Set of addresses that already voted for a candidate.
///
/// Membership only; the vote count is always `len()`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoterSet(HashSet<Address>);

impl VoterSet {
    /// Empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a voter. Returns false if the voter was already present.
    pub fn insert(&mut self, voter: Address) -> bool {
        self.0.insert(voter)
    }

    /// O(1) membership test.
    #[must_use]
    pub fn contains(&self, voter: &Address) -> bool {
        self.0.contains(voter)
    }

    /// Number of distinct voters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nobody voted yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates voters in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &Address> {
        self.0.iter()
    }
}

/// An airline record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Airline {
    /// Airline address (record key).
    pub address: Address,
    /// Display name.
    pub name: String,
    /// Lifecycle status.
    pub status: AirlineStatus,
    /// Cumulative funds contributed. Only `fund` increases it.
    pub balance: Amount,
    /// Equity held back for the payout bonus of policies on this airline's
    /// flights that are still awaiting an outcome or a credit.
    #[serde(default)]
    pub reserved: Amount,
    /// Who voted for this airline.
    pub voters: VoterSet,
    /// Vote count, always `voters.len()`.
    pub votes: u64,
}

impl Airline {
    /// Fresh record in `Init` with no funds and no votes.
    #[must_use]
    pub fn new(address: Address, name: impl Into<String>) -> Self {
        Self {
            address,
            name: name.into(),
            status: AirlineStatus::Init,
            balance: U256::zero(),
            reserved: U256::zero(),
            voters: VoterSet::new(),
            votes: 0,
        }
    }

    /// Registered or Funded.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.status.is_registered()
    }

    /// Records a vote. Returns false (and changes nothing) on a repeat voter.
    pub fn record_vote(&mut self, voter: Address) -> bool {
        if !self.voters.insert(voter) {
            return false;
        }
        self.votes = self.voters.len() as u64;
        true
    }
}

// =============================================================================
// FLIGHT
// =============================================================================

/// Flight status as stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightStatus {
    /// Not yet reported.
    Unknown,
    /// Departed on time.
    OnTime,
    /// Delayed; policies become creditable.
    Late,
}

impl FlightStatus {
    /// True once an outcome has been recorded.
    #[must_use]
    pub fn is_resolved(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Unknown => "Unknown",
            Self::OnTime => "OnTime",
            Self::Late => "Late",
        };
        f.write_str(s)
    }
}

/// Outcome an oracle may report. `Unknown` is not representable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlightOutcome {
    /// Departed on time.
    OnTime,
    /// Delayed.
    Late,
}

impl From<FlightOutcome> for FlightStatus {
    fn from(outcome: FlightOutcome) -> Self {
        match outcome {
            FlightOutcome::OnTime => Self::OnTime,
            FlightOutcome::Late => Self::Late,
        }
    }
}

/// A registered flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    /// Derived key.
    pub key: FlightKey,
    /// Owning airline.
    pub airline: Address,
    /// Flight designator, e.g. `ND1309`.
    pub name: String,
    /// Scheduled departure (caller-supplied unix seconds, untrusted).
    pub timestamp: u64,
    /// Current status.
    pub status: FlightStatus,
}

// =============================================================================
// INSURANCE POLICY
// =============================================================================

/// Policy lifecycle: `Purchased -> Credited -> Withdrawn`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyStatus {
    /// Premium escrowed, outcome pending.
    Purchased,
    /// Flight was late, payout owed.
    Credited,
    /// Payout transferred.
    Withdrawn,
}

/// One passenger's insurance on one flight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InsurancePolicy {
    /// Insured passenger.
    pub passenger: Address,
    /// Insured flight.
    pub flight: FlightKey,
    /// Premium paid.
    pub premium: Amount,
    /// Amount owed after a qualifying delay; zero until credited.
    pub credited_amount: Amount,
    /// Set once the payout left escrow.
    pub withdrawn: bool,
    /// Lifecycle status.
    pub status: PolicyStatus,
}

impl InsurancePolicy {
    /// New policy in `Purchased`.
    #[must_use]
    pub fn purchased(passenger: Address, flight: FlightKey, premium: Amount) -> Self {
        Self {
            passenger,
            flight,
            premium,
            credited_amount: U256::zero(),
            withdrawn: false,
            status: PolicyStatus::Purchased,
        }
    }

    /// True if a payout is owed and not yet taken.
    #[must_use]
    pub fn is_payable(&self) -> bool {
        self.status == PolicyStatus::Credited && !self.withdrawn
    }
}

/// Result of an oracle status report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusUpdate {
    /// Status recorded.
    Applied(FlightStatus),
    /// Flight already had an outcome; nothing changed.
    AlreadyResolved(FlightStatus),
}

/// Receipt for a completed withdrawal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payout {
    /// Recipient.
    pub passenger: Address,
    /// Flight the policy covered.
    pub flight: FlightKey,
    /// Amount transferred out of escrow.
    pub amount: Amount,
}

// =============================================================================
// TESTS
// =============================================================================
