//! # Surety Replay
//!
//! Replays a recorded call log against a fresh engine. Rejected calls are
//! reported and the replay moves on, as the host ledger would.
//!
//! ## Call Log Format
//!
//! ```json
//! {
//!   "config": { "min_funding": "0x8ac7230489e80000" },
//!   "owner": "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
//!   "bootstrap_airline": "0x0101010101010101010101010101010101010101",
//!   "calls": [
//!     { "op": "fund_airline", "caller": "0x0101...", "airline": "0x0101...", "value": "0x8ac7230489e80000" }
//!   ]
//! }
//! ```

use anyhow::{Context, Result};
use flight_surety::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

/// Name given to the bootstrap airline when the log omits one.
pub const DEFAULT_BOOTSTRAP_NAME: &str = "Bootstrap Airline";

/// A recorded deployment plus its calls, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallLog {
    /// Engine parameters; missing fields take their defaults.
    #[serde(default)]
    pub config: SuretyConfig,
    /// Deployer.
    pub owner: Address,
    /// Airline registered at construction.
    pub bootstrap_airline: Address,
    /// Its display name.
    #[serde(default = "default_bootstrap_name")]
    pub bootstrap_name: String,
    /// Calls to apply.
    #[serde(default)]
    pub calls: Vec<SuretyCall>,
}

fn default_bootstrap_name() -> String {
    DEFAULT_BOOTSTRAP_NAME.to_string()
}

/// What happened to one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CallOutcome {
    /// Call took effect.
    Committed {
        /// Typed return value.
        output: CallOutput,
    },
    /// Call was reverted without effect.
    Rejected {
        /// Error category.
        kind: ErrorKind,
        /// Rendered error.
        error: String,
    },
}

/// One line of the replay report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Position in the log.
    pub index: usize,
    /// Operation name.
    pub operation: String,
    /// Result.
    #[serde(flatten)]
    pub outcome: CallOutcome,
}

/// Everything the replay produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    /// One record per call.
    pub calls: Vec<CallRecord>,
    /// Calls that committed.
    pub committed: u64,
    /// Calls that were rejected.
    pub rejected: u64,
    /// Final state.
    pub snapshot: SuretySnapshot,
    /// Rendered invariant violations; empty when all hold.
    pub violations: Vec<String>,
    /// Published events, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<EventEnvelope>>,
}

impl ReplayReport {
    /// True if every invariant held at the end of the replay.
    #[must_use]
    pub fn invariants_hold(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Reads and parses a call log.
pub fn load_call_log(path: &Path) -> Result<CallLog> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read call log {}", path.display()))?;
    let log: CallLog = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse call log {}", path.display()))?;
    log.config
        .validate()
        .context("Invalid engine configuration in call log")?;
    Ok(log)
}

/// Applies every call in `log` to a fresh engine.
pub async fn replay(log: CallLog, include_events: bool) -> Result<ReplayReport> {
    let service = FlightSuretyService::create(
        log.config,
        log.owner,
        log.bootstrap_airline,
        log.bootstrap_name,
        RecordingEventSink::new(),
    )
    .context("Failed to construct engine")?;

    let mut calls = Vec::with_capacity(log.calls.len());
    for (index, call) in log.calls.into_iter().enumerate() {
        let operation = call.operation().to_string();
        let outcome = match service.dispatch(call).await {
            Ok(output) => CallOutcome::Committed { output },
            Err(err) => CallOutcome::Rejected {
                kind: err.kind(),
                error: err.to_string(),
            },
        };
        calls.push(CallRecord {
            index,
            operation,
            outcome,
        });
    }

    let stats = service.stats().await;
    let violations = match service.check_invariants().await {
        InvariantCheckResult::Valid => Vec::new(),
        InvariantCheckResult::Invalid(violations) => {
            violations.iter().map(ToString::to_string).collect()
        }
    };
    info!(
        committed = stats.calls_committed,
        rejected = stats.calls_rejected,
        events = stats.events_published,
        violations = violations.len(),
        "Replay finished"
    );

    Ok(ReplayReport {
        calls,
        committed: stats.calls_committed,
        rejected: stats.calls_rejected,
        snapshot: service.snapshot().await,
        violations,
        events: include_events.then(|| service.sink().take()),
    })
}

// =============================================================================
// TESTS
// =============================================================================
