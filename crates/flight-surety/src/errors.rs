//! # Error Types
//!
//! Every rejected call surfaces as a [`SuretyError`]. Errors are raised before
//! any mutation, so a failed call leaves the state untouched.

use crate::domain::entities::{AirlineStatus, FlightStatus};
use crate::domain::ledger::Account;
use crate::domain::value_objects::{Address, Amount, FlightKey};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// SURETY ERRORS
// =============================================================================

/// Errors returned by state-transition calls.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SuretyError {
    /// The operational switch is off.
    #[error("contract is not operational")]
    NotOperational,

    /// Caller lacks the role the operation needs.
    #[error("unauthorized: {caller} may not {action}")]
    Unauthorized {
        caller: Address,
        action: &'static str,
    },

    /// Caller must be a registered airline.
    #[error("caller {caller} is not a registered airline")]
    CallerNotRegisteredAirline { caller: Address },

    /// Airline is missing or in the wrong lifecycle state.
    #[error("airline {airline} in state {actual:?}, expected {expected}")]
    InvalidAirlineState {
        airline: Address,
        actual: Option<AirlineStatus>,
        expected: &'static str,
    },

    /// Voter already voted for this candidate.
    #[error("{voter} already voted for {candidate}")]
    DuplicateVote { voter: Address, candidate: Address },

    /// No flight under this key.
    #[error("flight {key} not found")]
    FlightNotFound { key: FlightKey },

    /// Flight outcome already known.
    #[error("flight {key} already resolved as {status}")]
    FlightAlreadyResolved { key: FlightKey, status: FlightStatus },

    /// Crediting requires a late flight.
    #[error("flight {key} is {status}, not Late")]
    FlightNotLate { key: FlightKey, status: FlightStatus },

    /// Premium must be positive.
    #[error("premium must be greater than zero")]
    InvalidPremium,

    /// Premium above the purchase cap.
    #[error("premium {premium} exceeds cap {cap}")]
    PremiumExceedsCap { premium: Amount, cap: Amount },

    /// Passenger already insured on this flight.
    #[error("{passenger} already holds a policy on flight {flight}")]
    DuplicatePolicy {
        passenger: Address,
        flight: FlightKey,
    },

    /// Airline equity not yet reserved cannot back the policy's payout bonus.
    #[error("airline {airline} cannot underwrite bonus {required}: {available} unreserved")]
    InsufficientCapacity {
        airline: Address,
        required: Amount,
        available: Amount,
    },

    /// Airline equity still backs policies awaiting an outcome or credit.
    #[error("airline {airline} backs open policies with {reserved} reserved")]
    OpenPolicies { airline: Address, reserved: Amount },

    /// Nothing credited, or already withdrawn.
    #[error("nothing to withdraw for {passenger} on flight {flight}")]
    NothingToWithdraw {
        passenger: Address,
        flight: FlightKey,
    },

    /// Deposits must be positive.
    #[error("amount must be greater than zero")]
    InvalidAmount,

    /// Ledger account cannot cover a debit.
    #[error("insufficient funds in {account}: required {required}, available {available}")]
    InsufficientFunds {
        account: Account,
        required: Amount,
        available: Amount,
    },

    /// Checked arithmetic failed.
    #[error("arithmetic overflow in {context}")]
    ArithmeticOverflow { context: &'static str },
}

/// Fieldless error category, for callers that branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ErrorKind {
    /// See [`SuretyError::NotOperational`].
    NotOperational,
    /// See [`SuretyError::Unauthorized`].
    Unauthorized,
    /// See [`SuretyError::CallerNotRegisteredAirline`].
    CallerNotRegisteredAirline,
    /// See [`SuretyError::InvalidAirlineState`].
    InvalidAirlineState,
    /// See [`SuretyError::DuplicateVote`].
    DuplicateVote,
    /// See [`SuretyError::FlightNotFound`].
    FlightNotFound,
    /// See [`SuretyError::FlightAlreadyResolved`].
    FlightAlreadyResolved,
    /// See [`SuretyError::FlightNotLate`].
    FlightNotLate,
    /// See [`SuretyError::InvalidPremium`].
    InvalidPremium,
    /// See [`SuretyError::PremiumExceedsCap`].
    PremiumExceedsCap,
    /// See [`SuretyError::DuplicatePolicy`].
    DuplicatePolicy,
    /// See [`SuretyError::InsufficientCapacity`].
    InsufficientCapacity,
    /// See [`SuretyError::OpenPolicies`].
    OpenPolicies,
    /// See [`SuretyError::NothingToWithdraw`].
    NothingToWithdraw,
    /// See [`SuretyError::InvalidAmount`].
    InvalidAmount,
    /// See [`SuretyError::InsufficientFunds`].
    InsufficientFunds,
    /// See [`SuretyError::ArithmeticOverflow`].
    ArithmeticOverflow,
}

impl SuretyError {
    /// The error category.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotOperational => ErrorKind::NotOperational,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::CallerNotRegisteredAirline { .. } => ErrorKind::CallerNotRegisteredAirline,
            Self::InvalidAirlineState { .. } => ErrorKind::InvalidAirlineState,
            Self::DuplicateVote { .. } => ErrorKind::DuplicateVote,
            Self::FlightNotFound { .. } => ErrorKind::FlightNotFound,
            Self::FlightAlreadyResolved { .. } => ErrorKind::FlightAlreadyResolved,
            Self::FlightNotLate { .. } => ErrorKind::FlightNotLate,
            Self::InvalidPremium => ErrorKind::InvalidPremium,
            Self::PremiumExceedsCap { .. } => ErrorKind::PremiumExceedsCap,
            Self::DuplicatePolicy { .. } => ErrorKind::DuplicatePolicy,
            Self::InsufficientCapacity { .. } => ErrorKind::InsufficientCapacity,
            Self::OpenPolicies { .. } => ErrorKind::OpenPolicies,
            Self::NothingToWithdraw { .. } => ErrorKind::NothingToWithdraw,
            Self::InvalidAmount => ErrorKind::InvalidAmount,
            Self::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            Self::ArithmeticOverflow { .. } => ErrorKind::ArithmeticOverflow,
        }
    }

    /// Shorthand for an overflow in `context`.
    #[must_use]
    pub const fn overflow(context: &'static str) -> Self {
        Self::ArithmeticOverflow { context }
    }
}

// =============================================================================
// CONFIG ERRORS
// =============================================================================

/// Rejected configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Purchase cap of zero would refuse every policy.
    #[error("max_premium must be greater than zero")]
    ZeroPremiumCap,

    /// Denominator of zero.
    #[error("payout multiplier denominator must be non-zero")]
    ZeroMultiplierDenominator,

    /// Payout below the premium.
    #[error("payout multiplier {numerator}/{denominator} is below 1")]
    MultiplierBelowOne { numerator: u64, denominator: u64 },

    /// Minimum funding of zero would fund on any deposit.
    #[error("min_funding must be greater than zero")]
    ZeroMinFunding,

    /// Parsing failed.
    #[error("invalid configuration: {0}")]
    Parse(String),
}

// =============================================================================
// TESTS
// =============================================================================
