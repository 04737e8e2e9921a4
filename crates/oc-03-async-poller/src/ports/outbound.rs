//! # Outbound Ports
//!
//! Time, and the mocks the tests drive the poller with.

use async_trait::async_trait;
use oc_02_envelope::{EnvelopeError, MethodCaller, Payload};
use parking_lot::Mutex;
use shared_types::CborValue;
use std::collections::VecDeque;
use std::time::Duration;

/// Monotonic time source with an async wait.
#[async_trait]
pub trait PollClock: Send + Sync {
    /// Time since an arbitrary fixed origin.
    fn now(&self) -> Duration;

    /// Suspend the calling task.
    async fn sleep(&self, duration: Duration);
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Clock that only moves when slept on.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Mutex<Duration>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    /// Clock at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward without a sleep.
    pub fn advance(&self, duration: Duration) {
        *self.now.lock() += duration;
    }

    /// Every sleep requested so far.
    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().clone()
    }
}

#[async_trait]
impl PollClock for ManualClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().push(duration);
        self.advance(duration);
    }
}

/// Method caller answering from a script, then repeating a fallback.
#[derive(Debug, Default)]
pub struct ScriptedCaller {
    script: Mutex<VecDeque<Result<Payload, EnvelopeError>>>,
    fallback: Mutex<Option<Payload>>,
    calls: Mutex<Vec<(String, CborValue)>>,
}

impl ScriptedCaller {
    /// Caller with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Caller that answers every call with `response`.
    pub fn repeating(response: Payload) -> Self {
        let caller = Self::new();
        *caller.fallback.lock() = Some(response);
        caller
    }

    /// Queue a response.
    pub fn push(&self, response: Result<Payload, EnvelopeError>) {
        self.script.lock().push_back(response);
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<(String, CborValue)> {
        self.calls.lock().clone()
    }

    /// Number of calls received.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl MethodCaller for ScriptedCaller {
    async fn call(&self, method: &str, argument: CborValue) -> Result<Payload, EnvelopeError> {
        self.calls.lock().push((method.to_string(), argument));
        if let Some(response) = self.script.lock().pop_front() {
            return response;
        }
        self.fallback
            .lock()
            .clone()
            .ok_or_else(|| EnvelopeError::Malformed(format!("no scripted reply for {method}")))
    }
}
