//! Staking parameters and block context
//!
//! Parameters are loaded externally (genesis file, governance, environment).
//! A changed `max_validators` only takes effect through an explicit full
//! reconciliation; nothing here is polled.

use crate::error::{ValidatorSetError, ValidatorSetResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Three weeks, in seconds
pub const DEFAULT_UNBONDING_TIME_SECS: u64 = 60 * 60 * 24 * 7 * 3;

/// Default bonded set size
pub const DEFAULT_MAX_VALIDATORS: u16 = 100;

/// Staking configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StakingParams {
    /// Upper bound on the bonded set
    pub max_validators: u16,
    /// Time between leaving the bonded set and unbonding completion
    pub unbonding_time_secs: u64,
    /// Tokens backing one unit of voting power
    pub tokens_per_power: u128,
}

impl Default for StakingParams {
    fn default() -> Self {
        Self {
            max_validators: DEFAULT_MAX_VALIDATORS,
            unbonding_time_secs: DEFAULT_UNBONDING_TIME_SECS,
            tokens_per_power: 1,
        }
    }
}

impl StakingParams {
    pub fn with_max_validators(mut self, max_validators: u16) -> Self {
        self.max_validators = max_validators;
        self
    }

    pub fn with_unbonding_time_secs(mut self, secs: u64) -> Self {
        self.unbonding_time_secs = secs;
        self
    }

    /// Reject parameter sets the engine cannot run with.
    ///
    /// `max_validators == 0` is allowed: nothing ever bonds.
    pub fn validate(&self) -> ValidatorSetResult<()> {
        if self.tokens_per_power == 0 {
            return Err(ValidatorSetError::InvalidParams(
                "tokens_per_power must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Tokens backing `power`.
    pub fn tokens_for(&self, power: u64) -> u128 {
        (power as u128).saturating_mul(self.tokens_per_power)
    }

    /// Load from a JSON document (genesis or governance proposal).
    pub fn from_json(json: &str) -> ValidatorSetResult<Self> {
        let params: Self = serde_json::from_str(json)
            .map_err(|e| ValidatorSetError::InvalidParams(e.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Create parameters from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `QC_MAX_VALIDATORS`: bonded set size (default: 100)
    /// - `QC_UNBONDING_TIME_SECS`: unbonding period (default: 3 weeks)
    /// - `QC_TOKENS_PER_POWER`: tokens per unit of power (default: 1)
    pub fn from_env() -> ValidatorSetResult<Self> {
        let defaults = Self::default();
        let params = Self {
            max_validators: parse_env("QC_MAX_VALIDATORS", defaults.max_validators)?,
            unbonding_time_secs: parse_env(
                "QC_UNBONDING_TIME_SECS",
                defaults.unbonding_time_secs,
            )?,
            tokens_per_power: parse_env("QC_TOKENS_PER_POWER", defaults.tokens_per_power)?,
        };
        params.validate()?;
        Ok(params)
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> ValidatorSetResult<T> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ValidatorSetError::InvalidParams(format!("{key}={raw} is not valid"))),
        Err(_) => Ok(default),
    }
}

/// Header fields of the block being processed
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockContext {
    pub height: u64,
    /// Block time (unix seconds)
    pub time: u64,
}

impl BlockContext {
    pub fn new(height: u64, time: u64) -> Self {
        Self { height, time }
    }
}
