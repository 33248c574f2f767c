//! # Balance Ledger
//!
//! Per-account bookkeeping of the funds the engine holds.
//!
//! `total_held` is everything received minus everything paid out; it always
//! equals the sum of account balances. Every mutation is a checked delta:
//! callers validate with [`BalanceLedger::can_debit`] first, and the mutating
//! methods fail closed without touching state.

use crate::domain::value_objects::{Address, Amount, U256};
use crate::errors::SuretyError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A ledger account.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Account {
    /// Airline equity, backs the payout bonus above the premium.
    Airline(Address),
    /// Premiums of policies not yet credited.
    InsurancePool,
    /// Credited, unwithdrawn payouts owed to a passenger.
    Payable(Address),
    /// Funds routed to the contract owner.
    Owner,
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Airline(addr) => write!(f, "airline:{addr}"),
            Self::InsurancePool => f.write_str("insurance-pool"),
            Self::Payable(addr) => write!(f, "payable:{addr}"),
            Self::Owner => f.write_str("owner"),
        }
    }
}

/// Account balances plus the running total held in escrow.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BalanceLedger {
    balances: BTreeMap<Account, Amount>,
    total_held: Amount,
    paid_out: BTreeMap<Address, Amount>,
}

impl BalanceLedger {
    /// Empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `account` (zero if never touched).
    #[must_use]
    pub fn balance(&self, account: &Account) -> Amount {
        self.balances.get(account).copied().unwrap_or_default()
    }

    /// Total funds held.
    #[must_use]
    pub fn total_held(&self) -> Amount {
        self.total_held
    }

    /// Cumulative amount paid out to `passenger`.
    #[must_use]
    pub fn paid_out(&self, passenger: &Address) -> Amount {
        self.paid_out.get(passenger).copied().unwrap_or_default()
    }

    /// Sum of all account balances, `None` on overflow.
    #[must_use]
    pub fn sum_of_accounts(&self) -> Option<Amount> {
        self.balances
            .values()
            .try_fold(U256::zero(), |acc, v| acc.checked_add(*v))
    }

    /// Iterates non-zero accounts in key order.
    pub fn accounts(&self) -> impl Iterator<Item = (&Account, &Amount)> {
        self.balances.iter().filter(|(_, v)| !v.is_zero())
    }

    /// Checks a debit of `amount` from `account` would succeed.
    pub fn can_debit(&self, account: Account, amount: Amount) -> Result<(), SuretyError> {
        let available = self.balance(&account);
        if available < amount {
            return Err(SuretyError::InsufficientFunds {
                account,
                required: amount,
                available,
            });
        }
        Ok(())
    }

    /// Checks a deposit of `amount` into `account` would not overflow.
    pub fn can_deposit(&self, account: Account, amount: Amount) -> Result<(), SuretyError> {
        self.total_held
            .checked_add(amount)
            .ok_or(SuretyError::overflow("ledger total"))?;
        self.balance(&account)
            .checked_add(amount)
            .ok_or(SuretyError::overflow("ledger deposit"))?;
        Ok(())
    }

    /// Funds entering escrow from outside.
    pub fn deposit(&mut self, account: Account, amount: Amount) -> Result<(), SuretyError> {
        let total = self
            .total_held
            .checked_add(amount)
            .ok_or(SuretyError::overflow("ledger total"))?;
        let balance = self
            .balance(&account)
            .checked_add(amount)
            .ok_or(SuretyError::overflow("ledger deposit"))?;
        self.total_held = total;
        self.balances.insert(account, balance);
        Ok(())
    }

    /// Moves `amount` between two accounts; `total_held` unchanged.
    pub fn transfer(&mut self, from: Account, to: Account, amount: Amount) -> Result<(), SuretyError> {
        if from == to {
            return self.can_debit(from, amount);
        }
        self.can_debit(from, amount)?;
        let to_balance = self
            .balance(&to)
            .checked_add(amount)
            .ok_or(SuretyError::overflow("ledger transfer"))?;
        let from_balance = self
            .balance(&from)
            .checked_sub(amount)
            .ok_or(SuretyError::overflow("ledger transfer"))?;
        self.balances.insert(from, from_balance);
        self.balances.insert(to, to_balance);
        Ok(())
    }

    /// Funds leaving escrow to `passenger`'s external balance.
    pub fn withdraw(
        &mut self,
        from: Account,
        passenger: Address,
        amount: Amount,
    ) -> Result<(), SuretyError> {
        self.can_debit(from, amount)?;
        let paid = self
            .paid_out(&passenger)
            .checked_add(amount)
            .ok_or(SuretyError::overflow("payout total"))?;
        let from_balance = self
            .balance(&from)
            .checked_sub(amount)
            .ok_or(SuretyError::overflow("ledger withdraw"))?;
        let total = self
            .total_held
            .checked_sub(amount)
            .ok_or(SuretyError::overflow("ledger total"))?;
        self.balances.insert(from, from_balance);
        self.total_held = total;
        self.paid_out.insert(passenger, paid);
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
