use std::env;

use thiserror::Error;

use crate::engine::amount::AmountError;
use crate::engine::{Amount, SuspicionConfig};

pub const LARGE_TRANSACTION_THRESHOLD_VAR: &str = "TXN_LARGE_TRANSACTION_THRESHOLD";
pub const UNCOMMON_CURRENCIES_VAR: &str = "TXN_UNCOMMON_CURRENCIES";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {source}")]
    InvalidThreshold {
        var: &'static str,
        #[source]
        source: AmountError,
    },

    #[error("Invalid value for {var}: threshold must not be negative")]
    NegativeThreshold { var: &'static str },
}

/// Runtime settings. Every variable is optional and falls back to the
/// built-in suspicion rules.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub suspicion: SuspicionConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut suspicion = SuspicionConfig::default();

        if let Some(value) = lookup(LARGE_TRANSACTION_THRESHOLD_VAR) {
            let threshold: Amount = value.parse().map_err(|source| ConfigError::InvalidThreshold {
                var: LARGE_TRANSACTION_THRESHOLD_VAR,
                source,
            })?;
            if threshold.is_negative() {
                return Err(ConfigError::NegativeThreshold {
                    var: LARGE_TRANSACTION_THRESHOLD_VAR,
                });
            }
            suspicion.large_transaction_threshold = threshold;
        }

        if let Some(value) = lookup(UNCOMMON_CURRENCIES_VAR) {
            suspicion.uncommon_currencies = value
                .split(',')
                .map(str::trim)
                .filter(|code| !code.is_empty())
                .map(String::from)
                .collect();
        }

        log::debug!("Loaded configuration: {suspicion:?}");
        Ok(Config { suspicion })
    }
}
