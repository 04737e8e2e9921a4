//! Structured logging.
//!
//! JSON lines carry `timestamp`, `level`, `target`, the message and every
//! event field, so log shippers can index them without parsing text.

use crate::{TelemetryConfig, TelemetryError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Filter from `RUST_LOG` if set, else from the configured directives.
pub fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .map_err(|e| TelemetryError::Filter(e.to_string()))
}

/// Install the global subscriber described by `config`.
pub fn init_logging(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = build_filter(config)?;

    let output = match (config.console_output, config.json_logs) {
        (false, _) => None,
        // JSON output for containers/production
        (true, true) => Some(
            tracing_subscriber::fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true)
                .boxed(),
        ),
        // Pretty output for development
        (true, false) => Some(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_ansi(true)
                .boxed(),
        ),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(output)
        .try_init()
        .map_err(|e| TelemetryError::Subscriber(e.to_string()))
}

/// Helper to create structured log entries with consistent formatting.
///
/// ```rust,ignore
/// omni_telemetry::log_event!(warn, "async-poller", "Deferred call timed out", attempts = 9);
/// ```
#[macro_export]
macro_rules! log_event {
    // Info level with subsystem
    (info, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Warn level with subsystem
    (warn, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::warn!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Error level with subsystem
    (error, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::error!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };

    // Debug level with subsystem
    (debug, $subsystem:expr, $msg:expr $(, $($field:tt)*)?) => {
        tracing::debug!(
            subsystem = $subsystem,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a message-related event with the peer address.
#[macro_export]
macro_rules! log_message_event {
    ($level:ident, $subsystem:expr, $msg:expr, $address:expr $(, $($field:tt)*)?) => {
        tracing::$level!(
            subsystem = $subsystem,
            address = %$address,
            $($($field)*,)?
            $msg
        )
    };
}
