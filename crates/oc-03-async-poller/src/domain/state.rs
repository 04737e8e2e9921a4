//! # Poll State Machine
//!
//! ```text
//!            status ≠ done, time left
//!               ┌──────────┐
//!               ▼          │
//! start ──► Polling ───────┘
//!               │ status = done         │ deadline reached
//!               ▼                       ▼
//!          Done(result)          TimedOut(last status)
//! ```
//!
//! Transitions are pure: the caller supplies the elapsed time and performs
//! the status call and the wait.

use crate::config::{PollerConfig, MIN_WAIT_MS};
use crate::domain::errors::PollError;
use oc_02_envelope::{decode_envelope, Payload};
use shared_types::{CborMap, CborValue};
use std::time::Duration;

/// Status key of an `async.status` response body.
pub const STATUS_FIELD: i64 = 0;
/// Result key of an `async.status` response body.
pub const RESULT_FIELD: i64 = 1;
/// Status code of a finished call.
pub const STATUS_DONE: i128 = 3;
/// Token key of the `async.status` argument.
pub const TOKEN_FIELD: i64 = 0;

/// Argument of a status call: `{0: token}`.
pub fn status_argument(token: &[u8]) -> CborValue {
    CborMap::new().with(TOKEN_FIELD, token).into()
}

/// Final result of resolving a response.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// The result message (or the original response when nothing was deferred).
    Ready(Payload),
    /// The deadline passed; carries the last status response.
    TimedOut(Payload),
}

impl PollOutcome {
    /// Whether the result is available.
    pub fn is_ready(&self) -> bool {
        matches!(self, PollOutcome::Ready(_))
    }

    /// The carried payload.
    pub fn into_payload(self) -> Payload {
        match self {
            PollOutcome::Ready(payload) | PollOutcome::TimedOut(payload) => payload,
        }
    }
}

/// Where a deferred call stands.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    /// Still waiting.
    Polling {
        /// Wait after the next unfinished status.
        interval: Duration,
        /// Status calls made so far.
        attempts: u32,
        /// Most recent response (the original one before the first call).
        last: Payload,
    },
    /// The server finished; carries the decoded result message.
    Done(Payload),
    /// Deadline reached; carries the last status response.
    TimedOut(Payload),
}

impl PollState {
    /// Initial state for a response carrying a deferred-call token.
    pub fn start(response: Payload, config: &PollerConfig) -> Self {
        PollState::Polling {
            interval: config.initial_wait().max(Duration::from_millis(MIN_WAIT_MS)),
            attempts: 0,
            last: response,
        }
    }

    /// Whether more status calls are needed.
    pub fn is_polling(&self) -> bool {
        matches!(self, PollState::Polling { .. })
    }

    /// Number of status calls made, for a state still polling.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            PollState::Polling { attempts, .. } => Some(*attempts),
            _ => None,
        }
    }

    /// Give up once `elapsed` has reached the deadline.
    pub fn check_deadline(self, elapsed: Duration, config: &PollerConfig) -> Self {
        match self {
            PollState::Polling { last, .. } if elapsed >= config.deadline() => {
                PollState::TimedOut(last)
            }
            other => other,
        }
    }

    /// Feed a status response received `elapsed` after the start.
    ///
    /// Returns the next state and, when still polling, how long to wait
    /// before the next call. The wait never extends past the deadline.
    pub fn on_status(
        self,
        response: Payload,
        elapsed: Duration,
        config: &PollerConfig,
    ) -> Result<(Self, Option<Duration>), PollError> {
        let PollState::Polling {
            interval, attempts, ..
        } = self
        else {
            return Ok((self, None));
        };

        if let Some(result) = completed_result(&response)? {
            return Ok((PollState::Done(decode_envelope(result)?), None));
        }

        let remaining = config.deadline().saturating_sub(elapsed);
        if remaining.is_zero() {
            return Ok((PollState::TimedOut(response), None));
        }

        let wait = interval.min(remaining);
        // Unusable multipliers jump straight to the deadline.
        let next_interval = Duration::try_from_secs_f64(interval.as_secs_f64() * config.backoff)
            .ok()
            .map_or(remaining, |next| next.max(interval));
        let next = PollState::Polling {
            interval: next_interval,
            attempts: attempts + 1,
            last: response,
        };
        Ok((next, Some(wait)))
    }

    /// Terminal outcome, if reached.
    pub fn outcome(self) -> Result<PollOutcome, Self> {
        match self {
            PollState::Done(result) => Ok(PollOutcome::Ready(result)),
            PollState::TimedOut(last) => Ok(PollOutcome::TimedOut(last)),
            polling => Err(polling),
        }
    }
}

/// The encoded result of a finished call, if `response` reports one.
fn completed_result(response: &Payload) -> Result<Option<&[u8]>, PollError> {
    let Some(body) = response.data().and_then(CborValue::as_map) else {
        return Ok(None);
    };
    let done = body.get(STATUS_FIELD).and_then(CborValue::as_integer) == Some(STATUS_DONE);
    match (done, body.get(RESULT_FIELD)) {
        (true, Some(CborValue::Bytes(result))) => Ok(Some(result)),
        (true, Some(other)) => Err(PollError::InvalidResult(format!(
            "result is {}, expected an encoded message",
            other.kind()
        ))),
        _ => Ok(None),
    }
}
