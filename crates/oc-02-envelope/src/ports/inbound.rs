//! # Inbound Ports
//!
//! What the rest of the client uses to talk to a server.

use crate::domain::errors::EnvelopeError;
use crate::domain::payload::Payload;
use async_trait::async_trait;
use shared_types::CborValue;

/// Calls a remote method and returns the opened response.
///
/// Implementations encode `argument` into the request body, send the
/// envelope and decode the reply. A remote error surfaces as
/// [`EnvelopeError::Remote`].
#[async_trait]
pub trait MethodCaller: Send + Sync {
    /// Call `method` with `argument`.
    async fn call(&self, method: &str, argument: CborValue) -> Result<Payload, EnvelopeError>;
}

#[async_trait]
impl<T: MethodCaller + ?Sized> MethodCaller for std::sync::Arc<T> {
    async fn call(&self, method: &str, argument: CborValue) -> Result<Payload, EnvelopeError> {
        (**self).call(method, argument).await
    }
}
