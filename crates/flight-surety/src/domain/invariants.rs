//! # Domain Invariants
//!
//! Properties that MUST hold after every committed call. The state machine
//! enforces them by construction; these checks exist for tests, the replay
//! tool and post-upgrade audits.
//!
//! - INVARIANT-1: `votes == |voters|` for every airline
//! - INVARIANT-2: a Funded airline has `balance >= min_funding`
//! - INVARIANT-3: sum of ledger accounts == `total_held`
//! - INVARIANT-4: insurance pool == premiums of purchased policies
//! - INVARIANT-5: payable(p) == credited, unwithdrawn amounts of p
//! - INVARIANT-6: credited/withdrawn policies carry `payout(premium)`
//! - INVARIANT-7: every stored flight key matches its derivation
//! - INVARIANT-8: every policy refers to an existing flight
//! - INVARIANT-9: an airline's reserve equals the bonus of its open policies
//!   and never exceeds its ledger equity

use crate::domain::entities::{
    Airline, AirlineStatus, Flight, FlightStatus, InsurancePolicy, PolicyStatus,
};
use crate::domain::ledger::Account;
use crate::domain::services::{flight_key, payout_for};
use crate::domain::state::SuretyState;
use crate::domain::value_objects::{Address, Amount, FlightKey, PayoutMultiplier, U256};
use std::collections::BTreeMap;

// =============================================================================
// INVARIANT CHECKS
// =============================================================================

/// INVARIANT-1: the vote count is the size of the voter set.
#[must_use]
pub fn check_vote_count_invariant(airline: &Airline) -> bool {
    airline.votes == airline.voters.len() as u64
}

/// INVARIANT-2: Funded implies the minimum was reached.
#[must_use]
pub fn check_funding_invariant(airline: &Airline, min_funding: Amount) -> bool {
    airline.status != AirlineStatus::Funded || airline.balance >= min_funding
}

/// INVARIANT-6: credited amount matches the multiplier.
#[must_use]
pub fn check_policy_payout_invariant(policy: &InsurancePolicy, multiplier: PayoutMultiplier) -> bool {
    match policy.status {
        PolicyStatus::Purchased => policy.credited_amount.is_zero() && !policy.withdrawn,
        PolicyStatus::Credited | PolicyStatus::Withdrawn => {
            let expected = payout_for(policy.premium, multiplier).ok();
            expected == Some(policy.credited_amount)
                && policy.withdrawn == (policy.status == PolicyStatus::Withdrawn)
        }
    }
}

/// INVARIANT-7: key derivation is reproducible.
#[must_use]
pub fn check_flight_key_invariant(flight: &Flight) -> bool {
    flight.key == flight_key(&flight.airline, &flight.name, flight.timestamp)
}

/// Runs every check against the whole state.
#[must_use]
pub fn check_all_invariants(state: &SuretyState) -> InvariantCheckResult {
    let mut violations = Vec::new();
    let config = state.config();

    for airline in state.airlines.values() {
        if !check_vote_count_invariant(airline) {
            violations.push(InvariantViolation::VoteCountMismatch {
                airline: airline.address,
                votes: airline.votes,
                voters: airline.voters.len(),
            });
        }
        if !check_funding_invariant(airline, config.min_funding) {
            violations.push(InvariantViolation::UnderfundedAirline {
                airline: airline.address,
                balance: airline.balance,
            });
        }
    }

    for flight in state.flights.values() {
        if !check_flight_key_invariant(flight) {
            violations.push(InvariantViolation::FlightKeyMismatch { key: flight.key });
        }
    }

    let ledger = state.ledger();
    match ledger.sum_of_accounts() {
        Some(sum) if sum == ledger.total_held() => {}
        sum => violations.push(InvariantViolation::LedgerImbalance {
            total_held: ledger.total_held(),
            sum_of_accounts: sum,
        }),
    }

    let mut pool = U256::zero();
    let mut payable: BTreeMap<Address, Amount> = BTreeMap::new();
    let mut reserves: BTreeMap<Address, Amount> = BTreeMap::new();
    for policy in state.policies.values() {
        match state.flights.get(&policy.flight) {
            None => violations.push(InvariantViolation::OrphanPolicy {
                passenger: policy.passenger,
                flight: policy.flight,
            }),
            Some(flight)
                if policy.status == PolicyStatus::Purchased
                    && flight.status != FlightStatus::OnTime =>
            {
                let bonus = payout_for(policy.premium, config.payout_multiplier)
                    .map_or_else(|_| U256::zero(), |p| p.saturating_sub(policy.premium));
                let reserved = reserves.entry(flight.airline).or_default();
                *reserved = reserved.saturating_add(bonus);
            }
            Some(_) => {}
        }
        if !check_policy_payout_invariant(policy, config.payout_multiplier) {
            violations.push(InvariantViolation::PolicyPayoutMismatch {
                passenger: policy.passenger,
                flight: policy.flight,
            });
        }
        match policy.status {
            PolicyStatus::Purchased => pool = pool.saturating_add(policy.premium),
            PolicyStatus::Credited => {
                let owed = payable.entry(policy.passenger).or_default();
                *owed = owed.saturating_add(policy.credited_amount);
            }
            PolicyStatus::Withdrawn => {}
        }
    }

    let pool_balance = ledger.balance(&Account::InsurancePool);
    if pool_balance != pool {
        violations.push(InvariantViolation::PoolMismatch {
            expected: pool,
            actual: pool_balance,
        });
    }

    for airline in state.airlines.values() {
        let expected = reserves.remove(&airline.address).unwrap_or_default();
        let equity = ledger.balance(&Account::Airline(airline.address));
        if airline.reserved != expected || airline.reserved > equity {
            violations.push(InvariantViolation::ReserveMismatch {
                airline: airline.address,
                expected,
                actual: airline.reserved,
                equity,
            });
        }
    }
    for (airline, expected) in reserves {
        violations.push(InvariantViolation::ReserveMismatch {
            airline,
            expected,
            actual: U256::zero(),
            equity: ledger.balance(&Account::Airline(airline)),
        });
    }

    for (account, _) in ledger.accounts() {
        if let Account::Payable(passenger) = account {
            payable.entry(*passenger).or_default();
        }
    }
    for (passenger, expected) in payable {
        let actual = ledger.balance(&Account::Payable(passenger));
        if actual != expected {
            violations.push(InvariantViolation::PayableMismatch {
                passenger,
                expected,
                actual,
            });
        }
    }

    if violations.is_empty() {
        InvariantCheckResult::Valid
    } else {
        InvariantCheckResult::Invalid(violations)
    }
}

// =============================================================================
// INVARIANT TYPES
// =============================================================================

/// Result of checking all invariants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantCheckResult {
    /// All invariants hold.
    Valid,
    /// One or more invariants violated.
    Invalid(Vec<InvariantViolation>),
}

impl InvariantCheckResult {
    /// Returns true if all invariants hold.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Specific invariant violation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvariantViolation {
    /// `votes != |voters|`.
    VoteCountMismatch {
        airline: Address,
        votes: u64,
        voters: usize,
    },
    /// Funded below the minimum.
    UnderfundedAirline { airline: Address, balance: Amount },
    /// Stored key differs from the derived one.
    FlightKeyMismatch { key: FlightKey },
    /// Account sum differs from `total_held`.
    LedgerImbalance {
        total_held: Amount,
        sum_of_accounts: Option<Amount>,
    },
    /// Pool differs from outstanding premiums.
    PoolMismatch { expected: Amount, actual: Amount },
    /// Payable account differs from credited policies.
    PayableMismatch {
        passenger: Address,
        expected: Amount,
        actual: Amount,
    },
    /// Credited amount inconsistent with the premium.
    PolicyPayoutMismatch { passenger: Address, flight: FlightKey },
    /// Policy on an unknown flight.
    OrphanPolicy { passenger: Address, flight: FlightKey },
    /// Reserve differs from open bonuses, or exceeds equity.
    ReserveMismatch {
        airline: Address,
        expected: Amount,
        actual: Amount,
        equity: Amount,
    },
}

impl std::fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::VoteCountMismatch {
                airline,
                votes,
                voters,
            } => write!(f, "airline {airline}: votes {votes} != voters {voters}"),
            Self::UnderfundedAirline { airline, balance } => {
                write!(f, "airline {airline} Funded with balance {balance}")
            }
            Self::FlightKeyMismatch { key } => write!(f, "flight {key}: key mismatch"),
            Self::LedgerImbalance {
                total_held,
                sum_of_accounts,
            } => write!(
                f,
                "ledger imbalance: total held {total_held}, accounts {sum_of_accounts:?}"
            ),
            Self::PoolMismatch { expected, actual } => {
                write!(f, "insurance pool {actual}, outstanding premiums {expected}")
            }
            Self::PayableMismatch {
                passenger,
                expected,
                actual,
            } => write!(f, "payable {passenger}: {actual}, credited {expected}"),
            Self::PolicyPayoutMismatch { passenger, flight } => {
                write!(f, "policy {passenger}/{flight}: credited amount mismatch")
            }
            Self::OrphanPolicy { passenger, flight } => {
                write!(f, "policy {passenger}/{flight}: flight missing")
            }
            Self::ReserveMismatch {
                airline,
                expected,
                actual,
                equity,
            } => write!(
                f,
                "airline {airline}: reserved {actual}, open bonus {expected}, equity {equity}"
            ),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
