//! # Surety Configuration
//!
//! Economic and governance parameters. Fixed at construction; the state
//! machine never re-reads or reinitialises them.
//!
//! All fields have defaults, so a JSON document only needs the overrides:
//!
//! ```json
//! { "max_premium": "0xde0b6b3a7640000", "quorum_bootstrap_size": 4 }
//! ```

use crate::domain::value_objects::{ether, Amount, PayoutMultiplier};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// Default registered-airline count from which quorum becomes a majority.
pub const DEFAULT_QUORUM_BOOTSTRAP_SIZE: usize = 4;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SuretyConfig {
    /// Largest premium accepted by `buy` (wei).
    pub max_premium: Amount,
    /// Factor applied to a premium when a flight is late.
    pub payout_multiplier: PayoutMultiplier,
    /// Below this many registered airlines a single vote admits a candidate.
    pub quorum_bootstrap_size: usize,
    /// Cumulative funding that moves an airline to `Funded` (wei).
    pub min_funding: Amount,
}

impl Default for SuretyConfig {
    fn default() -> Self {
        Self {
            max_premium: ether(1),
            payout_multiplier: PayoutMultiplier::ONE_AND_A_HALF,
            quorum_bootstrap_size: DEFAULT_QUORUM_BOOTSTRAP_SIZE,
            min_funding: ether(10),
        }
    }
}

impl SuretyConfig {
    /// Rejects parameters that would make the engine unusable or unsound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_premium.is_zero() {
            return Err(ConfigError::ZeroPremiumCap);
        }
        let PayoutMultiplier {
            numerator,
            denominator,
        } = self.payout_multiplier;
        if denominator == 0 {
            return Err(ConfigError::ZeroMultiplierDenominator);
        }
        if numerator < denominator {
            return Err(ConfigError::MultiplierBelowOne {
                numerator,
                denominator,
            });
        }
        if self.min_funding.is_zero() {
            return Err(ConfigError::ZeroMinFunding);
        }
        Ok(())
    }

    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
