//! # Airline Registry & Voting Protocol
//!
//! Lifecycle `Init -> Registered -> Funded`, driven by nomination, quorum
//! voting and funding. Quorum is recomputed against the registered
//! population at the moment of each vote.

use crate::domain::entities::{Airline, AirlineStatus};
use crate::domain::events::SuretyEvent;
use crate::domain::ledger::Account;
use crate::domain::services::quorum_threshold;
use crate::domain::state::SuretyState;
use crate::domain::value_objects::{Address, Amount};
use crate::errors::SuretyError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Result of a vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteOutcome {
    /// Votes after this one.
    pub votes: u64,
    /// Quorum in force when the vote was cast.
    pub threshold: u64,
    /// Whether this vote admitted the candidate.
    pub registered: bool,
}

/// Where a pooled deposit landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum DepositRoute {
    /// Credited to the sender's airline funding.
    Airline(AirlineStatus),
    /// Credited to the owner account.
    Owner,
}

impl SuretyState {
    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Airline record, if any.
    #[must_use]
    pub fn airline(&self, address: &Address) -> Option<&Airline> {
        self.airlines.get(address)
    }

    /// True if `address` is a registered (or funded) airline.
    #[must_use]
    pub fn is_airline(&self, address: &Address) -> bool {
        self.airlines
            .get(address)
            .is_some_and(Airline::is_registered)
    }

    /// Number of airlines in Registered or Funded.
    #[must_use]
    pub fn registered_airline_count(&self) -> usize {
        self.airlines.values().filter(|a| a.is_registered()).count()
    }

    /// Votes a candidate needs right now.
    #[must_use]
    pub fn quorum_threshold(&self) -> u64 {
        quorum_threshold(
            self.registered_airline_count(),
            self.config.quorum_bootstrap_size,
        )
    }

    // =========================================================================
    // NOMINATION
    // =========================================================================

    /// Creates an airline record in `Init`, or resets an existing one.
    ///
    /// A new address may be nominated by the owner or any registered airline.
    /// Resetting an existing record is an owner-only recovery path; the
    /// airline's ledger equity moves to the owner account. A reset is refused
    /// while the airline's equity is reserved for open policies.
    pub fn init_airline(
        &mut self,
        caller: Address,
        address: Address,
        name: impl Into<String>,
    ) -> Result<(), SuretyError> {
        self.require_operational()?;

        let existing = self.airlines.get(&address);
        let reset = existing.is_some();
        if reset {
            self.require_owner(caller, "re-initialize an airline")?;
        } else if caller != self.owner {
            self.require_registered_airline(caller)?;
        }
        if let Some(airline) = existing.filter(|a| !a.reserved.is_zero()) {
            return Err(SuretyError::OpenPolicies {
                airline: address,
                reserved: airline.reserved,
            });
        }

        let equity_account = Account::Airline(address);
        let equity = self.ledger.balance(&equity_account);
        let mut ledger = self.ledger.clone();
        if !equity.is_zero() {
            ledger.transfer(equity_account, Account::Owner, equity)?;
        }

        let name = name.into();
        self.ledger = ledger;
        self.airlines.insert(address, Airline::new(address, name.clone()));

        info!(airline = %address, %name, reset, "Airline initialized");
        self.emit(SuretyEvent::AirlineInitialized {
            airline: address,
            name,
            nominated_by: caller,
            reset,
        });
        Ok(())
    }

    // =========================================================================
    // VOTING
    // =========================================================================

    /// Casts `voter`'s vote for `candidate`, promoting it on quorum.
    pub fn vote(&mut self, voter: Address, candidate: Address) -> Result<VoteOutcome, SuretyError> {
        self.require_operational()?;
        self.require_registered_airline(voter)?;

        let threshold = self.quorum_threshold();
        let airline = self
            .airlines
            .get(&candidate)
            .ok_or(SuretyError::InvalidAirlineState {
                airline: candidate,
                actual: None,
                expected: "Init",
            })?;
        if airline.status != AirlineStatus::Init {
            return Err(SuretyError::InvalidAirlineState {
                airline: candidate,
                actual: Some(airline.status),
                expected: "Init",
            });
        }
        if airline.voters.contains(&voter) {
            return Err(SuretyError::DuplicateVote { voter, candidate });
        }

        let airline = self
            .airlines
            .get_mut(&candidate)
            .ok_or(SuretyError::InvalidAirlineState {
                airline: candidate,
                actual: None,
                expected: "Init",
            })?;
        airline.record_vote(voter);
        let votes = airline.votes;
        let registered = votes >= threshold;
        if registered {
            airline.status = AirlineStatus::Registered;
        }

        debug!(candidate = %candidate, voter = %voter, votes, threshold, "Vote cast");
        self.emit(SuretyEvent::VoteCast {
            candidate,
            voter,
            votes,
            threshold,
        });
        if registered {
            info!(airline = %candidate, votes, "Airline registered by quorum");
            self.emit(SuretyEvent::AirlineRegistered {
                airline: candidate,
                votes,
            });
        }

        Ok(VoteOutcome {
            votes,
            threshold,
            registered,
        })
    }

    // =========================================================================
    // FUNDING
    // =========================================================================

    /// Adds `value` to a registered airline's funding. Caller is the airline
    /// itself or the owner. Crossing `min_funding` moves it to `Funded`.
    pub fn fund_airline(
        &mut self,
        caller: Address,
        address: Address,
        value: Amount,
    ) -> Result<AirlineStatus, SuretyError> {
        self.require_operational()?;
        if caller != address && caller != self.owner {
            return Err(SuretyError::Unauthorized {
                caller,
                action: "fund another airline",
            });
        }
        self.credit_airline_funds(address, value)
    }

    /// Pooled receive path: a deposit not tied to a purchase.
    ///
    /// Registered airlines fund themselves, the owner's deposit goes to the
    /// owner account, anyone else is rejected.
    pub fn fund_contract(
        &mut self,
        sender: Address,
        value: Amount,
    ) -> Result<DepositRoute, SuretyError> {
        self.require_operational()?;

        if self.is_airline(&sender) {
            return self.credit_airline_funds(sender, value).map(DepositRoute::Airline);
        }
        if sender != self.owner {
            return Err(SuretyError::CallerNotRegisteredAirline { caller: sender });
        }
        if value.is_zero() {
            return Err(SuretyError::InvalidAmount);
        }

        self.ledger.deposit(Account::Owner, value)?;
        info!(amount = %value, "Owner deposit received");
        self.emit(SuretyEvent::OwnerDeposit { amount: value });
        Ok(DepositRoute::Owner)
    }

    fn credit_airline_funds(
        &mut self,
        address: Address,
        value: Amount,
    ) -> Result<AirlineStatus, SuretyError> {
        if value.is_zero() {
            return Err(SuretyError::InvalidAmount);
        }
        let min_funding = self.config.min_funding;
        let airline = self
            .airlines
            .get(&address)
            .ok_or(SuretyError::InvalidAirlineState {
                airline: address,
                actual: None,
                expected: "Registered",
            })?;
        if !airline.is_registered() {
            return Err(SuretyError::InvalidAirlineState {
                airline: address,
                actual: Some(airline.status),
                expected: "Registered",
            });
        }
        let balance = airline
            .balance
            .checked_add(value)
            .ok_or(SuretyError::overflow("airline balance"))?;
        let becomes_funded = airline.status == AirlineStatus::Registered && balance >= min_funding;
        let status = if becomes_funded {
            AirlineStatus::Funded
        } else {
            airline.status
        };
        self.ledger.can_deposit(Account::Airline(address), value)?;

        if let Some(airline) = self.airlines.get_mut(&address) {
            airline.balance = balance;
            airline.status = status;
        }
        self.ledger.deposit(Account::Airline(address), value)?;

        debug!(airline = %address, amount = %value, balance = %balance, "Airline funds deposited");
        self.emit(SuretyEvent::AirlineFundsDeposited {
            airline: address,
            amount: value,
            balance,
        });
        if becomes_funded {
            info!(airline = %address, balance = %balance, "Airline funded");
            self.emit(SuretyEvent::AirlineFunded {
                airline: address,
                balance,
            });
        }
        Ok(status)
    }
}

// =============================================================================
// TESTS
// =============================================================================
