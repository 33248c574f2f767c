//! # Flight Registry
//!
//! Flights are keyed by `flight_key(airline, name, timestamp)`, so the same
//! triple always lands on the same record. Status moves from `Unknown` to
//! `OnTime` or `Late` once and never back.

use crate::domain::entities::{AirlineStatus, Flight, FlightOutcome, FlightStatus, StatusUpdate};
use crate::domain::events::SuretyEvent;
use crate::domain::services::flight_key;
use crate::domain::state::SuretyState;
use crate::domain::value_objects::{Address, FlightKey};
use crate::errors::SuretyError;
use tracing::{debug, info};

impl SuretyState {
    /// Flight record, if any.
    #[must_use]
    pub fn flight(&self, key: &FlightKey) -> Option<&Flight> {
        self.flights.get(key)
    }

    /// Registers a flight offered by `caller`, which must be a funded airline.
    ///
    /// Registering the same triple again overwrites the record while it is
    /// still `Unknown`; once resolved it fails with `FlightAlreadyResolved`.
    pub fn register_flight(
        &mut self,
        caller: Address,
        name: impl Into<String>,
        timestamp: u64,
    ) -> Result<FlightKey, SuretyError> {
        self.require_operational()?;
        let airline = self.require_registered_airline(caller)?;
        if airline.status != AirlineStatus::Funded {
            return Err(SuretyError::InvalidAirlineState {
                airline: caller,
                actual: Some(airline.status),
                expected: "Funded",
            });
        }

        let name = name.into();
        let key = flight_key(&caller, &name, timestamp);
        let replaced = match self.flights.get(&key) {
            Some(existing) if existing.status.is_resolved() => {
                return Err(SuretyError::FlightAlreadyResolved {
                    key,
                    status: existing.status,
                });
            }
            Some(_) => true,
            None => false,
        };

        self.flights.insert(
            key,
            Flight {
                key,
                airline: caller,
                name: name.clone(),
                timestamp,
                status: FlightStatus::Unknown,
            },
        );

        info!(flight = %key, airline = %caller, %name, timestamp, replaced, "Flight registered");
        self.emit(SuretyEvent::FlightRegistered {
            key,
            airline: caller,
            name,
            timestamp,
            replaced,
        });
        Ok(key)
    }

    /// Records the oracle's outcome for a flight.
    ///
    /// Only authorized callers may report. A report for a flight that already
    /// has an outcome is a no-op so oracle retries are harmless. An on-time
    /// outcome releases the bonus reserved for the flight's policies.
    pub fn set_flight_status(
        &mut self,
        caller: Address,
        key: FlightKey,
        outcome: FlightOutcome,
    ) -> Result<StatusUpdate, SuretyError> {
        self.require_operational()?;
        self.require_authorized_caller(caller, "report flight status")?;

        let flight = self
            .flights
            .get(&key)
            .ok_or(SuretyError::FlightNotFound { key })?;
        if flight.status.is_resolved() {
            debug!(flight = %key, status = %flight.status, "Flight already resolved, ignoring report");
            return Ok(StatusUpdate::AlreadyResolved(flight.status));
        }
        let airline = flight.airline;
        let status = FlightStatus::from(outcome);

        // An on-time flight never pays out, so its bonus reserve is freed.
        let reserved = if status == FlightStatus::OnTime {
            let released = self.open_bonus_for_flight(&key)?;
            self.airlines
                .get(&airline)
                .map(|a| {
                    a.reserved
                        .checked_sub(released)
                        .ok_or(SuretyError::overflow("reserved bonus"))
                })
                .transpose()?
        } else {
            None
        };

        if let Some(flight) = self.flights.get_mut(&key) {
            flight.status = status;
        }
        if let (Some(reserved), Some(entry)) = (reserved, self.airlines.get_mut(&airline)) {
            entry.reserved = reserved;
        }

        info!(flight = %key, %status, "Flight status updated");
        self.emit(SuretyEvent::FlightStatusUpdated { key, status });
        Ok(StatusUpdate::Applied(status))
    }
}

// =============================================================================
// TESTS
// =============================================================================
