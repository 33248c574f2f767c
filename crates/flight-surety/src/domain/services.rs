//! # Domain Services
//!
//! Pure functions used by the state machine: key derivation, quorum and
//! payout arithmetic. Deterministic, no side effects.

use crate::domain::value_objects::{Address, Amount, FlightKey, PayoutMultiplier};
use crate::errors::SuretyError;
use sha3::{Digest, Keccak256};

// =============================================================================
// FLIGHT KEY DERIVATION
// =============================================================================

/// Derives the flight key.
///
/// `keccak256(airline ‖ name ‖ timestamp_be)`. The airline and timestamp are
/// fixed width, so the packed encoding is unambiguous.
#[must_use]
pub fn flight_key(airline: &Address, name: &str, timestamp: u64) -> FlightKey {
    let mut hasher = Keccak256::new();
    hasher.update(airline.as_bytes());
    hasher.update(name.as_bytes());
    hasher.update(timestamp.to_be_bytes());
    FlightKey::new(hasher.finalize().into())
}

// =============================================================================
// QUORUM
// =============================================================================

/// Votes needed to admit a candidate given the current registered population.
///
/// Below `bootstrap_size` one vote is enough; from there on it is a
/// majority, `ceil(registered / 2)`. Never less than one.
#[must_use]
pub fn quorum_threshold(registered: usize, bootstrap_size: usize) -> u64 {
    if registered < bootstrap_size {
        return 1;
    }
    (registered as u64).div_ceil(2).max(1)
}

// =============================================================================
// PAYOUT
// =============================================================================

/// Amount credited for `premium` under `multiplier`.
pub fn payout_for(premium: Amount, multiplier: PayoutMultiplier) -> Result<Amount, SuretyError> {
    multiplier
        .apply(premium)
        .ok_or(SuretyError::overflow("payout multiplier"))
}

// =============================================================================
// TESTS
// =============================================================================
