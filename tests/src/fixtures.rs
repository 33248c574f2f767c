//! # Test Fixtures
//!
//! Well-known addresses and ready-made deployments shared by every suite.

use flight_surety::prelude::*;
use std::sync::Arc;

/// Contract owner.
pub const OWNER: Address = Address::repeat(0xAA);
/// Bootstrap airline.
pub const A1: Address = Address::repeat(0x01);
/// Second airline.
pub const A2: Address = Address::repeat(0x02);
/// Third airline.
pub const A3: Address = Address::repeat(0x03);
/// Authorized flight-status oracle.
pub const ORACLE: Address = Address::repeat(0x0C);
/// Address with no role at all.
pub const MALLORY: Address = Address::repeat(0x66);

/// Flight name used across suites.
pub const FLIGHT: &str = "ND1309";
/// Departure time used across suites.
pub const DEPARTURE: u64 = 1_700_000_000;

/// Service type used by the suites.
pub type TestService = FlightSuretyService<RecordingEventSink>;

/// `n`th passenger.
#[must_use]
pub fn passenger(n: u8) -> Address {
    Address::repeat(0x50 + n)
}

/// Fresh deployment: A1 registered, nothing funded.
#[must_use]
pub fn deploy() -> Arc<TestService> {
    deploy_with(SuretyConfig::default())
}

/// Fresh deployment with custom parameters.
#[must_use]
pub fn deploy_with(config: SuretyConfig) -> Arc<TestService> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("flight_surety=debug")
        .with_test_writer()
        .try_init();
    let service = FlightSuretyService::create(
        config,
        OWNER,
        A1,
        "Bootstrap Air",
        RecordingEventSink::new(),
    )
    .expect("default config is valid");
    Arc::new(service)
}

/// A1 funded, oracle authorized, `FLIGHT` registered. Returns the flight key.
pub async fn deploy_with_flight() -> (Arc<TestService>, FlightKey) {
    let service = deploy();
    service
        .fund_airline(A1, A1, ether(10))
        .await
        .expect("bootstrap funding");
    service
        .authorize_caller(OWNER, ORACLE)
        .await
        .expect("authorize oracle");
    let key = service
        .register_flight(A1, FLIGHT.to_string(), DEPARTURE)
        .await
        .expect("register flight");
    (service, key)
}

/// Asserts that every invariant holds.
pub async fn assert_invariants(service: &TestService) {
    let check = service.check_invariants().await;
    assert!(check.is_valid(), "invariants violated: {check:?}");
}
