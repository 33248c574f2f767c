//! # Access Control Gate
//!
//! Authorization checks consulted first by every mutating call, plus the
//! owner-only administrative operations.
//!
//! | Check | Error |
//! |-------|-------|
//! | operational switch on | `NotOperational` |
//! | caller is owner | `Unauthorized` |
//! | caller is a registered airline | `CallerNotRegisteredAirline` |
//! | caller is an authorized oracle / application | `Unauthorized` |

use crate::domain::entities::Airline;
use crate::domain::events::SuretyEvent;
use crate::domain::state::SuretyState;
use crate::domain::value_objects::Address;
use crate::errors::SuretyError;
use tracing::info;

impl SuretyState {
    // =========================================================================
    // GATE CHECKS
    // =========================================================================

    pub(crate) fn require_operational(&self) -> Result<(), SuretyError> {
        if !self.operational {
            return Err(SuretyError::NotOperational);
        }
        Ok(())
    }

    pub(crate) fn require_owner(
        &self,
        caller: Address,
        action: &'static str,
    ) -> Result<(), SuretyError> {
        if caller != self.owner {
            return Err(SuretyError::Unauthorized { caller, action });
        }
        Ok(())
    }

    pub(crate) fn require_registered_airline(
        &self,
        caller: Address,
    ) -> Result<&Airline, SuretyError> {
        self.airlines
            .get(&caller)
            .filter(|airline| airline.is_registered())
            .ok_or(SuretyError::CallerNotRegisteredAirline { caller })
    }

    pub(crate) fn require_authorized_caller(
        &self,
        caller: Address,
        action: &'static str,
    ) -> Result<(), SuretyError> {
        if !self.authorized_callers.contains(&caller) {
            return Err(SuretyError::Unauthorized { caller, action });
        }
        Ok(())
    }

    // =========================================================================
    // ADMINISTRATION
    // =========================================================================

    /// Whether mutating calls are accepted.
    #[must_use]
    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Whether `caller` may report flight status and trigger credits.
    #[must_use]
    pub fn is_authorized_caller(&self, caller: &Address) -> bool {
        self.authorized_callers.contains(caller)
    }

    /// Flips the operational switch. Owner only; the one call allowed while
    /// not operational. Returns whether the value changed.
    pub fn set_operating_status(
        &mut self,
        caller: Address,
        operational: bool,
    ) -> Result<bool, SuretyError> {
        self.require_owner(caller, "toggle operational mode")?;

        if self.operational == operational {
            return Ok(false);
        }
        self.operational = operational;
        info!(operational, "Operational status changed");
        self.emit(SuretyEvent::OperationalStatusChanged { operational });
        Ok(true)
    }

    /// Adds an oracle / application caller. Returns false if already present.
    pub fn authorize_caller(
        &mut self,
        caller: Address,
        target: Address,
    ) -> Result<bool, SuretyError> {
        self.require_operational()?;
        self.require_owner(caller, "authorize callers")?;

        if !self.authorized_callers.insert(target) {
            return Ok(false);
        }
        info!(caller = %target, "Caller authorized");
        self.emit(SuretyEvent::CallerAuthorized { caller: target });
        Ok(true)
    }

    /// Removes an oracle / application caller. Returns false if absent.
    pub fn deauthorize_caller(
        &mut self,
        caller: Address,
        target: Address,
    ) -> Result<bool, SuretyError> {
        self.require_operational()?;
        self.require_owner(caller, "deauthorize callers")?;

        if !self.authorized_callers.remove(&target) {
            return Ok(false);
        }
        info!(caller = %target, "Caller deauthorized");
        self.emit(SuretyEvent::CallerDeauthorized { caller: target });
        Ok(true)
    }
}

// =============================================================================
// TESTS
// =============================================================================
