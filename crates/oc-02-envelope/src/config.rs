//! # Client Configuration

use crate::domain::payload::PROTOCOL_VERSION;
use serde::{Deserialize, Serialize};
use shared_types::Identity;
use tracing::warn;

/// Settings of a [`MessageClient`](crate::MessageClient).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Protocol version written into requests.
    pub protocol_version: u64,

    /// Check the signature of every response before opening it.
    ///
    /// Unsigned responses are then rejected, and so are responses signed by
    /// anyone other than `destination` when one is set.
    pub verify_responses: bool,

    /// Destination written into requests, if the server expects one.
    pub destination: Option<Identity>,

    /// Stamp requests with the system clock.
    pub timestamp_requests: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION,
            verify_responses: true,
            destination: None,
            timestamp_requests: true,
        }
    }
}

impl ClientConfig {
    /// Deterministic requests: no timestamps.
    pub fn for_testing() -> Self {
        Self {
            timestamp_requests: false,
            ..Self::default()
        }
    }

    /// Read overrides from the environment.
    ///
    /// - `OC_VERIFY_RESPONSES`: `true` / `false`
    /// - `OC_DESTINATION`: destination address
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var("OC_VERIFY_RESPONSES") {
            match value.parse() {
                Ok(verify) => config.verify_responses = verify,
                Err(_) => warn!(%value, "Ignoring invalid OC_VERIFY_RESPONSES"),
            }
        }
        if let Ok(value) = std::env::var("OC_DESTINATION") {
            match value.parse::<Identity>() {
                Ok(destination) => config.destination = Some(destination),
                Err(e) => warn!(%value, error = %e, "Ignoring invalid OC_DESTINATION"),
            }
        }

        config
    }
}
