//! # Selection Telemetry
//!
//! Logging bootstrap for processes embedding endorser selection.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use selection_telemetry::{init_logging, TelemetryConfig};
//!
//! fn main() {
//!     let config = TelemetryConfig::from_env();
//!     init_logging(&config).expect("Failed to init logging");
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `ES_LOG_LEVEL` / `RUST_LOG` | `info` | Log filter directives |
//! | `ES_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `ES_CONSOLE_OUTPUT` | `true` | Write logs to stdout |
//! | `ES_SERVICE_NAME` | `endorser-selection` | Service name in startup log |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{env_filter, init_logging, try_init_for_tests};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    AlreadyInitialized(String),

    /// Filter directives could not be parsed.
    #[error("Invalid configuration: {0}")]
    Config(String),
}
