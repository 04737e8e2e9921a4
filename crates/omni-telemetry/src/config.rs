//! Telemetry configuration from environment variables.

use serde::{Deserialize, Serialize};
use std::env;

/// Configuration for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Service name attached to every event
    pub service_name: String,

    /// Filter directives (`info`, `oc_03_async_poller=trace`, ...)
    pub log_level: String,

    /// Whether to write events to stdout
    pub console_output: bool,

    /// Whether to format events as JSON lines
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "omni-client".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `OTEL_SERVICE_NAME`: Service name (default: omni-client)
    /// - `OC_LOG_LEVEL` or `RUST_LOG`: Filter directives (default: info)
    /// - `OC_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `OC_JSON_LOGS`: Enable JSON logs (default: false, true in containers)
    pub fn from_env() -> Self {
        let is_container =
            env::var("KUBERNETES_SERVICE_HOST").is_ok() || env::var("DOCKER_CONTAINER").is_ok();

        Self {
            service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "omni-client".to_string()),

            log_level: env::var("OC_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| "info".to_string()),

            console_output: env::var("OC_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: env::var("OC_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }

    /// Configuration for one component, e.g. `("03", "async-poller")`.
    pub fn for_subsystem(subsystem_id: &str, subsystem_name: &str) -> Self {
        let mut config = Self::from_env();
        config.service_name = format!("oc-{}-{}", subsystem_id, subsystem_name);
        config
    }

    /// Verbose, human-readable output for test runs.
    pub fn for_testing() -> Self {
        Self {
            service_name: "omni-client-tests".to_string(),
            log_level: "debug".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}
