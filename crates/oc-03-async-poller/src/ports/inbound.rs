//! # Inbound Ports

use crate::domain::errors::PollError;
use crate::domain::state::PollOutcome;
use async_trait::async_trait;
use oc_02_envelope::Payload;

/// Turns a response that may carry a deferred-call token into a final result.
#[async_trait]
pub trait DeferredCallResolver: Send + Sync {
    /// Resolve `response`.
    ///
    /// Without a token the response is returned as [`PollOutcome::Ready`]
    /// unchanged and nothing is called.
    async fn resolve(&self, response: Payload) -> Result<PollOutcome, PollError>;
}
