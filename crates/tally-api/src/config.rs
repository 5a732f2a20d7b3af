//! # Client Configuration
//!
//! Where the API lives and how amounts are shown.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     TALLY_API_BASE=https://example.com/api                             │
//! │     TALLY_TIMEOUT_SECS=30                                              │
//! │     TALLY_CURRENCY_SYMBOL=₹                                            │
//! │     TALLY_TAX_PERCENT=18                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/tally/tally.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.tally.tally/tally.toml (macOS)   │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! base_url = "https://alitinvoiceappapi.azurewebsites.net/api"
//! timeout_secs = 30
//! currency_symbol = "$"
//! default_tax_percentage = 10
//! ```

use std::path::{Path, PathBuf};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tally_core::Money;
use thiserror::Error;
use tracing::{debug, info};

/// Default API root.
pub const DEFAULT_BASE_URL: &str = "https://alitinvoiceappapi.azurewebsites.net/api";

const CONFIG_FILE_NAME: &str = "tally.toml";

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: String, reason: String },
}

// =============================================================================
// Client Configuration
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root, without a trailing slash.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout_secs: u64,

    /// Prefix for displayed amounts.
    pub currency_symbol: String,

    /// Tax percentage for new drafts.
    pub default_tax_percentage: Decimal,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
            currency_symbol: "$".to_string(),
            default_tax_percentage: tally_core::DEFAULT_TAX_PERCENTAGE,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// An explicit `config_path` must exist; the platform default path is
    /// optional.
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path)),
            Some(path) => Self::from_file(&path)?,
            None => match Self::default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                Some(path) => {
                    debug!(?path, "Config file not found, using defaults");
                    Self::default()
                }
                None => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        info!(?path, "Loading client config from file");
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Applies `TALLY_*` overrides read through `var`.
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var("TALLY_API_BASE") {
            debug!(url = %url, "Overriding API base from environment");
            self.base_url = url;
        }

        if let Some(raw) = var("TALLY_TIMEOUT_SECS") {
            self.timeout_secs = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                key: "TALLY_TIMEOUT_SECS".into(),
                reason: format!("'{}' is not a whole number of seconds", raw),
            })?;
        }

        if let Some(symbol) = var("TALLY_CURRENCY_SYMBOL") {
            self.currency_symbol = symbol;
        }

        if let Some(raw) = var("TALLY_TAX_PERCENT") {
            self.default_tax_percentage =
                raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "TALLY_TAX_PERCENT".into(),
                    reason: format!("'{}' is not a number", raw),
                })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.base_url).map_err(|e| ConfigError::Invalid {
            key: "base_url".into(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                key: "base_url".into(),
                reason: format!("must be http or https, got {}", url.scheme()),
            });
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "timeout_secs".into(),
                reason: "must be greater than 0".into(),
            });
        }

        tally_core::validation::validate_percentage(
            "default_tax_percentage",
            self.default_tax_percentage,
        )
        .map_err(|e| ConfigError::Invalid {
            key: "default_tax_percentage".into(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    /// `base_url` without a trailing slash.
    pub fn api_root(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "tally", "tally")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Formats an amount with the configured symbol and thousands separators.
    ///
    /// ## Example
    /// ```rust
    /// use tally_api::config::ClientConfig;
    /// use tally_core::Money;
    ///
    /// let config = ClientConfig::default();
    /// assert_eq!(config.format_currency(Money::from_cents(123456)), "$1,234.56");
    /// ```
    pub fn format_currency(&self, amount: Money) -> String {
        let whole = amount.dollars().unsigned_abs().to_string();
        let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
        for (i, ch) in whole.chars().enumerate() {
            if i > 0 && (whole.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        format!(
            "{}{}{}.{:02}",
            if amount.is_negative() { "-" } else { "" },
            self.currency_symbol,
            grouped,
            amount.cents_part()
        )
    }

    /// Formats a unit rate. Whole-cent rates look like amounts; finer
    /// rates keep every digit (`$1.125`).
    pub fn format_rate(&self, rate: Decimal) -> String {
        let normalized = rate.normalize();
        if normalized.scale() <= 2 {
            return self.format_currency(Money::from_decimal(rate));
        }
        let sign = if rate.is_sign_negative() { "-" } else { "" };
        format!("{}{}{}", sign, self.currency_symbol, normalized.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.default_tax_percentage, dec!(10));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ClientConfig::default();
        config
            .apply_overrides(env(&[
                ("TALLY_API_BASE", "http://localhost:5000/api/"),
                ("TALLY_TIMEOUT_SECS", "5"),
                ("TALLY_CURRENCY_SYMBOL", "₹"),
                ("TALLY_TAX_PERCENT", "18"),
            ]))
            .unwrap();

        assert_eq!(config.api_root(), "http://localhost:5000/api");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.currency_symbol, "₹");
        assert_eq!(config.default_tax_percentage, dec!(18));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_env_value_is_error() {
        let mut config = ClientConfig::default();
        let err = config
            .apply_overrides(env(&[("TALLY_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_validation() {
        let mut config = ClientConfig::default();

        config.base_url = "ftp://example.com".into();
        assert!(config.validate().is_err());

        config.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.base_url = DEFAULT_BASE_URL.into();
        config.default_tax_percentage = dec!(150);
        assert!(config.validate().is_err());

        config.default_tax_percentage = dec!(10);
        config.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_file() {
        let config: ClientConfig = toml::from_str("currency_symbol = \"€\"").unwrap();
        assert_eq!(config.currency_symbol, "€");
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = ClientConfig::load(Some(PathBuf::from("/definitely/not/here/tally.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_format_currency() {
        let config = ClientConfig::default();
        assert_eq!(config.format_currency(Money::from_cents(0)), "$0.00");
        assert_eq!(config.format_currency(Money::from_cents(2970)), "$29.70");
        assert_eq!(config.format_currency(Money::from_cents(100_000)), "$1,000.00");
        assert_eq!(config.format_currency(Money::from_cents(123_456_789)), "$1,234,567.89");
        assert_eq!(config.format_currency(Money::from_cents(-123_456)), "-$1,234.56");
    }

    #[test]
    fn test_format_rate_keeps_sub_cent_digits() {
        let config = ClientConfig::default();
        assert_eq!(config.format_rate(dec!(10)), "$10.00");
        assert_eq!(config.format_rate(dec!(1250.50)), "$1,250.50");
        assert_eq!(config.format_rate(dec!(1.125)), "$1.125");
        assert_eq!(config.format_rate(dec!(0.0050)), "$0.005");
    }
}
