//! # Configuration State
//!
//! Stores application configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`QUOTE_*`)
//! 2. Defaults (this file)
//!
//! ## Variables
//! | Variable                 | Default                                | Meaning                      |
//! |--------------------------|----------------------------------------|------------------------------|
//! | `QUOTE_TENANT_ID`        | `00000000-0000-0000-0000-000000000001` | Tenant stamped on new drafts |
//! | `QUOTE_CURRENCY_CODE`    | `USD`                                  | ISO 4217 code                |
//! | `QUOTE_CURRENCY_SYMBOL`  | `$`                                    | Symbol for text output       |
//! | `QUOTE_DEFAULT_TAX_NAME` | unset                                  | Tax added to new rows        |
//! | `QUOTE_DEFAULT_TAX_RATE` | unset                                  | Its rate, in percent         |
//! | `QUOTE_VALIDITY_DAYS`    | `30`                                   | Default expiry offset        |
//!
//! Configuration is read-only after initialization.

use std::env;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use quote_core::{TaxEntry, TaxRate, DEFAULT_TENANT_ID};

/// Longest accepted `QUOTE_VALIDITY_DAYS`.
pub const MAX_VALIDITY_DAYS: i64 = 3650;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Tenant ID for multi-tenant support.
    pub tenant_id: String,

    /// Currency code (ISO 4217)
    pub currency_code: String,

    /// Currency symbol (for text output)
    pub currency_symbol: String,

    /// Tax pre-filled on every newly added row
    pub default_tax: Option<TaxEntry>,

    /// Days between issue date and default expiry date
    pub validity_days: i64,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    fn default() -> Self {
        ConfigState {
            tenant_id: DEFAULT_TENANT_ID.to_string(),
            currency_code: "USD".to_string(),
            currency_symbol: "$".to_string(),
            default_tax: None,
            validity_days: 30,
        }
    }
}

impl ConfigState {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// `load()` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ConfigState::default();

        let currency_code = lookup("QUOTE_CURRENCY_CODE")
            .map(|code| code.trim().to_uppercase())
            .unwrap_or(defaults.currency_code);
        if currency_code.len() != 3 || !currency_code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(ConfigError::InvalidValue("QUOTE_CURRENCY_CODE".to_string()));
        }

        let default_tax = match (lookup("QUOTE_DEFAULT_TAX_NAME"), lookup("QUOTE_DEFAULT_TAX_RATE")) {
            (Some(name), Some(rate)) => {
                let rate = Decimal::from_str(rate.trim())
                    .map_err(|_| ConfigError::InvalidValue("QUOTE_DEFAULT_TAX_RATE".to_string()))?;
                if rate < Decimal::ZERO {
                    return Err(ConfigError::InvalidValue("QUOTE_DEFAULT_TAX_RATE".to_string()));
                }
                Some(TaxEntry::new(name.trim(), TaxRate::from_percentage(rate)))
            }
            (Some(_), None) => {
                return Err(ConfigError::MissingRequired("QUOTE_DEFAULT_TAX_RATE".to_string()))
            }
            (None, Some(_)) => {
                return Err(ConfigError::MissingRequired("QUOTE_DEFAULT_TAX_NAME".to_string()))
            }
            (None, None) => None,
        };

        let validity_days = match lookup("QUOTE_VALIDITY_DAYS") {
            Some(raw) => raw
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|days| (1..=MAX_VALIDITY_DAYS).contains(days))
                .ok_or_else(|| ConfigError::InvalidValue("QUOTE_VALIDITY_DAYS".to_string()))?,
            None => defaults.validity_days,
        };

        Ok(ConfigState {
            tenant_id: lookup("QUOTE_TENANT_ID").unwrap_or(defaults.tenant_id),
            currency_code,
            currency_symbol: lookup("QUOTE_CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            default_tax,
            validity_days,
        })
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),
}
