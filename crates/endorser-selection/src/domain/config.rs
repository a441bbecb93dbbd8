//! Selection configuration and validation
//!
//! # Example
//!
//! ```rust
//! use endorser_selection::domain::{LoadBalanceKind, SelectionConfig};
//!
//! let config = SelectionConfig::from_toml_str(
//!     r#"
//!     [selection]
//!     membership_cache_ttl_ms = 250
//!     load_balance = "random"
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.load_balance, LoadBalanceKind::Random);
//! ```

use super::errors::{SelectionError, SelectionResult};
use serde::{Deserialize, Deserializer};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Default membership cache lifetime.
pub const DEFAULT_MEMBERSHIP_CACHE_TTL: Duration = Duration::from_millis(500);

/// Default event hub port.
pub const DEFAULT_EVENT_PORT: u16 = 7053;

/// Built-in load-balance strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadBalanceKind {
    /// Uniform random pick per call
    Random,
    /// Cycle through candidates starting at a random offset
    RoundRobin,
}

impl FromStr for LoadBalanceKind {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "random" => Ok(Self::Random),
            "round_robin" | "roundrobin" | "round-robin" => Ok(Self::RoundRobin),
            other => Err(SelectionError::InvalidConfig(format!(
                "unknown load balance policy: {other}"
            ))),
        }
    }
}

/// Endorser selection configuration.
///
/// Deserializes from a `[selection]`-style table; omitted keys keep their
/// defaults and the TTL is read as `membership_cache_ttl_ms`.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Lifetime of cached membership answers
    #[serde(rename = "membership_cache_ttl_ms", deserialize_with = "duration_from_millis")]
    pub membership_cache_ttl: Duration,
    /// Strategy used by new resolvers
    pub load_balance: LoadBalanceKind,
    /// Local event port advertised to event consumers
    pub event_port: u16,
    /// Whether membership is polled in the background
    pub polling_enabled: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            membership_cache_ttl: DEFAULT_MEMBERSHIP_CACHE_TTL,
            load_balance: LoadBalanceKind::RoundRobin,
            event_port: DEFAULT_EVENT_PORT,
            polling_enabled: true,
        }
    }
}

fn duration_from_millis<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    u64::deserialize(deserializer).map(Duration::from_millis)
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    selection: SelectionConfig,
}

impl SelectionConfig {
    /// Check invariants.
    pub fn validate(&self) -> SelectionResult<()> {
        if self.membership_cache_ttl.is_zero() {
            return Err(SelectionError::InvalidConfig(
                "membership cache TTL must be positive".to_string(),
            ));
        }
        if self.event_port == 0 {
            return Err(SelectionError::InvalidConfig(
                "event port must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Load from environment variables, falling back to defaults.
    ///
    /// - `ES_MEMBERSHIP_CACHE_TTL_MS`
    /// - `ES_LOAD_BALANCE_POLICY` (`random` | `round_robin`)
    /// - `ES_EVENT_PORT`
    /// - `ES_POLLING_ENABLED`
    pub fn from_env() -> SelectionResult<Self> {
        let mut config = Self::default();

        if let Ok(ttl) = env::var("ES_MEMBERSHIP_CACHE_TTL_MS") {
            let ms: u64 = ttl.parse().map_err(|_| {
                SelectionError::InvalidConfig(format!("bad ES_MEMBERSHIP_CACHE_TTL_MS: {ttl}"))
            })?;
            config.membership_cache_ttl = Duration::from_millis(ms);
        }
        if let Ok(policy) = env::var("ES_LOAD_BALANCE_POLICY") {
            config.load_balance = policy.parse()?;
        }
        if let Ok(port) = env::var("ES_EVENT_PORT") {
            config.event_port = port
                .parse()
                .map_err(|_| SelectionError::InvalidConfig(format!("bad ES_EVENT_PORT: {port}")))?;
        }
        if let Ok(polling) = env::var("ES_POLLING_ENABLED") {
            config.polling_enabled = polling.to_lowercase() != "false" && polling != "0";
        }

        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML document with a `[selection]` table.
    pub fn from_toml_str(contents: &str) -> SelectionResult<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| SelectionError::InvalidConfig(e.to_string()))?;
        let config = file.selection;
        config.validate()?;
        Ok(config)
    }
}
