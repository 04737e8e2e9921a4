//! # Omni Telemetry
//!
//! Structured logging for applications built on the Omni client crates.
//! Library crates only emit `tracing` events; the application installs one
//! subscriber at startup with [`init_telemetry`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use omni_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("Failed to init telemetry");
//!     // ...
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `omni-client` | Service name attached to every event |
//! | `OC_LOG_LEVEL` / `RUST_LOG` | `info` | Filter directives |
//! | `OC_JSON_LOGS` | `false` | JSON lines instead of pretty output |
//! | `OC_CONSOLE_OUTPUT` | `true` | Write events to stdout at all |

#![warn(missing_docs)]

mod config;
mod logging;

pub use config::TelemetryConfig;
pub use logging::{build_filter, init_logging};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// The filter directives did not parse.
    #[error("Invalid log filter: {0}")]
    Filter(String),

    /// A global subscriber is already installed.
    #[error("Failed to install subscriber: {0}")]
    Subscriber(String),
}

/// Install the global subscriber.
///
/// Returns a guard to hold for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    init_logging(&config)?;
    tracing::info!(
        service = %config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
    Ok(TelemetryGuard {
        service_name: config.service_name,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    service_name: String,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        tracing::info!(service = %self.service_name, "Shutting down telemetry...");
    }
}

/// Span carrying the subsystem name.
///
/// ```rust,ignore
/// let _span = omni_telemetry::subsystem_span!("resolve", subsystem = "async-poller").entered();
/// ```
#[macro_export]
macro_rules! subsystem_span {
    ($name:expr, $($field:tt)*) => {
        tracing::info_span!($name, $($field)*)
    };
}
