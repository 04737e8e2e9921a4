//! # Poller Errors

use oc_02_envelope::EnvelopeError;
use thiserror::Error;

/// Errors while resolving a deferred call.
///
/// Running out of time is not one of them; see
/// [`PollOutcome::TimedOut`](crate::PollOutcome::TimedOut).
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PollError {
    /// A status call failed, or the result envelope could not be opened.
    #[error(transparent)]
    Envelope(#[from] EnvelopeError),

    /// The server reported completion with an unusable result field.
    #[error("Invalid deferred result: {0}")]
    InvalidResult(String),

    /// The poller configuration cannot produce a growing wait.
    #[error("Invalid poller configuration: {0}")]
    InvalidConfig(String),
}
