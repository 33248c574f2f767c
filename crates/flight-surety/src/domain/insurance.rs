//! # Insurance Escrow
//!
//! Per-policy state machine `Purchased -> Credited -> Withdrawn` on top of
//! the balance ledger.
//!
//! | Step | Ledger effect |
//! |------|---------------|
//! | `buy` | premium deposited into the insurance pool; bonus reserved on airline equity |
//! | `credit_insurees` | premium: pool -> payable; bonus: airline equity -> payable, reserve released |
//! | `pay` | payable -> passenger, leaves escrow |
//!
//! A purchase is accepted only while the airline's unreserved equity covers
//! the payout bonus, so a late flight can always be credited in full. An
//! on-time outcome releases the reserve of that flight's policies.
//!
//! Credit and pay stage their ledger moves on a copy and commit only once
//! every move succeeded, so a batch never half-applies.

use crate::domain::entities::{FlightStatus, InsurancePolicy, Payout, PolicyStatus};
use crate::domain::events::SuretyEvent;
use crate::domain::ledger::Account;
use crate::domain::services::payout_for;
use crate::domain::state::SuretyState;
use crate::domain::value_objects::{Address, Amount, FlightKey, PolicyKey, U256};
use crate::errors::SuretyError;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Result of a credit batch.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditSummary {
    /// Passengers credited by this call.
    pub credited: Vec<Address>,
    /// Sum of credited amounts in this call.
    pub total: Amount,
}

impl SuretyState {
    // =========================================================================
    // VIEWS
    // =========================================================================

    /// Policy held by `passenger` on `flight`.
    #[must_use]
    pub fn policy(&self, passenger: &Address, flight: &FlightKey) -> Option<&InsurancePolicy> {
        self.policies.get(&PolicyKey::new(*passenger, *flight))
    }

    /// Policies on a flight in purchase order.
    #[must_use]
    pub fn policies_for_flight(&self, flight: &FlightKey) -> Vec<&InsurancePolicy> {
        self.flight_passengers
            .get(flight)
            .map(|passengers| {
                passengers
                    .iter()
                    .filter_map(|p| self.policies.get(&PolicyKey::new(*p, *flight)))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Equity of `airline` that is not reserved for open policies.
    #[must_use]
    pub fn underwriting_capacity(&self, airline: &Address) -> Amount {
        let reserved = self
            .airlines
            .get(airline)
            .map_or_else(U256::zero, |a| a.reserved);
        self.ledger
            .balance(&Account::Airline(*airline))
            .saturating_sub(reserved)
    }

    /// Part of the payout for `premium` drawn from airline equity.
    pub(crate) fn payout_bonus(&self, premium: Amount) -> Result<Amount, SuretyError> {
        payout_for(premium, self.config.payout_multiplier)?
            .checked_sub(premium)
            .ok_or(SuretyError::overflow("payout bonus"))
    }

    /// Bonus still reserved for the purchased policies on `flight`.
    pub(crate) fn open_bonus_for_flight(&self, flight: &FlightKey) -> Result<Amount, SuretyError> {
        let mut total = U256::zero();
        for policy in self.policies_for_flight(flight) {
            if policy.status != PolicyStatus::Purchased {
                continue;
            }
            total = total
                .checked_add(self.payout_bonus(policy.premium)?)
                .ok_or(SuretyError::overflow("open bonus"))?;
        }
        Ok(total)
    }

    // =========================================================================
    // PURCHASE
    // =========================================================================

    /// Buys insurance for `passenger` on an unresolved flight.
    pub fn buy(
        &mut self,
        passenger: Address,
        flight: FlightKey,
        premium: Amount,
    ) -> Result<(), SuretyError> {
        self.require_operational()?;

        let record = self
            .flights
            .get(&flight)
            .ok_or(SuretyError::FlightNotFound { key: flight })?;
        if record.status != FlightStatus::Unknown {
            return Err(SuretyError::FlightAlreadyResolved {
                key: flight,
                status: record.status,
            });
        }
        if premium.is_zero() {
            return Err(SuretyError::InvalidPremium);
        }
        if premium > self.config.max_premium {
            return Err(SuretyError::PremiumExceedsCap {
                premium,
                cap: self.config.max_premium,
            });
        }
        let airline = record.airline;
        let key = PolicyKey::new(passenger, flight);
        if self.policies.contains_key(&key) {
            return Err(SuretyError::DuplicatePolicy { passenger, flight });
        }

        let bonus = self.payout_bonus(premium)?;
        let available = self.underwriting_capacity(&airline);
        if bonus > available {
            return Err(SuretyError::InsufficientCapacity {
                airline,
                required: bonus,
                available,
            });
        }
        let reserved = self
            .airlines
            .get(&airline)
            .ok_or(SuretyError::InvalidAirlineState {
                airline,
                actual: None,
                expected: "Funded",
            })?
            .reserved
            .checked_add(bonus)
            .ok_or(SuretyError::overflow("reserved bonus"))?;

        self.ledger.deposit(Account::InsurancePool, premium)?;
        if let Some(entry) = self.airlines.get_mut(&airline) {
            entry.reserved = reserved;
        }
        self.policies
            .insert(key, InsurancePolicy::purchased(passenger, flight, premium));
        self.flight_passengers
            .entry(flight)
            .or_default()
            .push(passenger);

        debug!(passenger = %passenger, flight = %flight, premium = %premium, "Insurance purchased");
        self.emit(SuretyEvent::InsurancePurchased {
            passenger,
            flight,
            premium,
        });
        Ok(())
    }

    // =========================================================================
    // CREDIT
    // =========================================================================

    /// Credits every purchased policy on a late flight.
    ///
    /// Idempotent: policies already credited are skipped, so a retry credits
    /// nothing new. The bonus above the premium comes out of the equity the
    /// flight's airline reserved at purchase.
    pub fn credit_insurees(
        &mut self,
        caller: Address,
        flight: FlightKey,
    ) -> Result<CreditSummary, SuretyError> {
        self.require_operational()?;
        self.require_authorized_caller(caller, "credit insurees")?;

        let record = self
            .flights
            .get(&flight)
            .ok_or(SuretyError::FlightNotFound { key: flight })?;
        if record.status != FlightStatus::Late {
            return Err(SuretyError::FlightNotLate {
                key: flight,
                status: record.status,
            });
        }
        let airline = record.airline;
        let airline_account = Account::Airline(airline);

        let mut staged = self.ledger.clone();
        let mut credits = Vec::new();
        let mut total = U256::zero();
        let mut released = U256::zero();
        for policy in self.policies_for_flight(&flight) {
            if policy.status != PolicyStatus::Purchased {
                continue;
            }
            let bonus = self.payout_bonus(policy.premium)?;
            let amount = policy
                .premium
                .checked_add(bonus)
                .ok_or(SuretyError::overflow("payout"))?;
            let payable = Account::Payable(policy.passenger);

            staged.transfer(Account::InsurancePool, payable, policy.premium)?;
            if !bonus.is_zero() {
                staged.transfer(airline_account, payable, bonus)?;
            }
            total = total
                .checked_add(amount)
                .ok_or(SuretyError::overflow("credit total"))?;
            released = released
                .checked_add(bonus)
                .ok_or(SuretyError::overflow("released bonus"))?;
            credits.push((policy.passenger, amount));
        }
        let reserved = self
            .airlines
            .get(&airline)
            .map_or_else(U256::zero, |a| a.reserved)
            .checked_sub(released)
            .ok_or(SuretyError::overflow("reserved bonus"))?;

        self.ledger = staged;
        if let Some(entry) = self.airlines.get_mut(&airline) {
            entry.reserved = reserved;
        }
        let mut summary = CreditSummary {
            credited: Vec::with_capacity(credits.len()),
            total,
        };
        for (passenger, amount) in credits {
            if let Some(policy) = self.policies.get_mut(&PolicyKey::new(passenger, flight)) {
                policy.credited_amount = amount;
                policy.status = PolicyStatus::Credited;
            }
            debug!(passenger = %passenger, flight = %flight, amount = %amount, "Insuree credited");
            self.emit(SuretyEvent::InsureeCredited {
                passenger,
                flight,
                amount,
            });
            summary.credited.push(passenger);
        }

        if !summary.credited.is_empty() {
            info!(
                flight = %flight,
                policies = summary.credited.len(),
                total = %summary.total,
                "Insurees credited"
            );
        }
        Ok(summary)
    }

    // =========================================================================
    // WITHDRAWAL
    // =========================================================================

    /// Pays a credited policy out of escrow to the passenger.
    ///
    /// The amount is fixed from the policy before anything moves, and the
    /// policy is marked withdrawn before the funds leave the ledger, so a
    /// second call can never observe a payable balance.
    pub fn pay(&mut self, passenger: Address, flight: FlightKey) -> Result<Payout, SuretyError> {
        self.require_operational()?;

        let key = PolicyKey::new(passenger, flight);
        let amount = match self.policies.get(&key) {
            Some(policy) if policy.is_payable() => policy.credited_amount,
            _ => return Err(SuretyError::NothingToWithdraw { passenger, flight }),
        };

        let mut staged = self.ledger.clone();
        staged.withdraw(Account::Payable(passenger), passenger, amount)?;

        if let Some(policy) = self.policies.get_mut(&key) {
            policy.withdrawn = true;
            policy.status = PolicyStatus::Withdrawn;
        }
        self.ledger = staged;

        info!(passenger = %passenger, flight = %flight, amount = %amount, "Insurance paid out");
        self.emit(SuretyEvent::InsuranceWithdrawn {
            passenger,
            flight,
            amount,
        });
        Ok(Payout {
            passenger,
            flight,
            amount,
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
