//! # Async Poller Service
//!
//! Drives [`PollState`] with real status calls and a [`PollClock`].

use crate::config::PollerConfig;
use crate::domain::errors::PollError;
use crate::domain::state::{status_argument, PollOutcome, PollState};
use crate::ports::inbound::DeferredCallResolver;
use crate::ports::outbound::PollClock;
use async_trait::async_trait;
use oc_02_envelope::{MethodCaller, Payload};
use tracing::{debug, trace, warn};

/// Resolves deferred calls by polling their status.
///
/// Holds no per-call state, so one poller can serve concurrent resolutions.
pub struct AsyncPoller<C: MethodCaller, K: PollClock> {
    caller: C,
    clock: K,
    config: PollerConfig,
}

impl<C: MethodCaller, K: PollClock> AsyncPoller<C, K> {
    /// Create a poller, rejecting configurations that cannot back off.
    pub fn new(caller: C, clock: K, config: PollerConfig) -> Result<Self, PollError> {
        config.validate()?;
        Ok(Self {
            caller,
            clock,
            config,
        })
    }

    /// Poller configuration.
    pub fn config(&self) -> &PollerConfig {
        &self.config
    }

    /// Status call target.
    pub fn caller(&self) -> &C {
        &self.caller
    }

    /// Time source.
    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Poll `token` until done or out of time.
    ///
    /// `response` is the message that carried the token; it is what
    /// [`PollOutcome::TimedOut`] holds if no status call completes.
    pub async fn poll(&self, token: &[u8], response: Payload) -> Result<PollOutcome, PollError> {
        let start = self.clock.now();
        let argument = status_argument(token);
        let mut state = PollState::start(response, &self.config);

        loop {
            let elapsed = self.clock.now().saturating_sub(start);
            state = match state.check_deadline(elapsed, &self.config).outcome() {
                Ok(outcome) => return Ok(self.finish(outcome)),
                Err(polling) => polling,
            };

            let status = self
                .caller
                .call(&self.config.status_method, argument.clone())
                .await?;

            let elapsed = self.clock.now().saturating_sub(start);
            let (next, wait) = state.on_status(status, elapsed, &self.config)?;
            state = next;

            if let Some(wait) = wait {
                trace!(
                    attempts = state.attempts().unwrap_or_default(),
                    wait_ms = wait.as_millis() as u64,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Deferred call pending"
                );
                self.clock.sleep(wait).await;
            }
        }
    }

    fn finish(&self, outcome: PollOutcome) -> PollOutcome {
        match &outcome {
            PollOutcome::Ready(_) => debug!("Deferred call completed"),
            PollOutcome::TimedOut(_) => warn!(
                deadline_ms = self.config.deadline_ms,
                "Deferred call still pending at deadline"
            ),
        }
        outcome
    }
}

#[async_trait]
impl<C: MethodCaller, K: PollClock> DeferredCallResolver for AsyncPoller<C, K> {
    async fn resolve(&self, response: Payload) -> Result<PollOutcome, PollError> {
        let Some(token) = response.async_token().map(<[u8]>::to_vec) else {
            return Ok(PollOutcome::Ready(response));
        };
        debug!(token_len = token.len(), "Polling deferred call");
        self.poll(&token, response).await
    }
}
