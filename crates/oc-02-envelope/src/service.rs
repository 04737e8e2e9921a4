//! # Message Client
//!
//! Application service that implements [`MethodCaller`] on top of a
//! [`RawTransport`]:
//!
//! 1. build the request payload (version, sender, method, argument, id)
//! 2. encode it on behalf of the configured signer
//! 3. send the bytes and open the reply, verifying it when configured

use crate::config::ClientConfig;
use crate::domain::envelope::{decode_envelope, decode_verified_envelope, encode_envelope_for};
use crate::domain::errors::{EnvelopeError, VerificationError};
use crate::domain::payload::{Payload, RequestBuilder};
use crate::ports::inbound::MethodCaller;
use crate::ports::outbound::RawTransport;
use async_trait::async_trait;
use oc_01_identity::{AnonymousIdentity, Signer};
use shared_types::{CborValue, Identity};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for one server.
pub struct MessageClient<T: RawTransport> {
    transport: T,
    signer: Arc<dyn Signer>,
    config: ClientConfig,
    next_id: AtomicU64,
}

impl<T: RawTransport> MessageClient<T> {
    /// Create a client sending as `signer`.
    pub fn new(transport: T, signer: Arc<dyn Signer>, config: ClientConfig) -> Self {
        Self {
            transport,
            signer,
            config,
            next_id: AtomicU64::new(0),
        }
    }

    /// Create a client sending unsigned requests.
    pub fn anonymous(transport: T) -> Self {
        Self::new(transport, Arc::new(AnonymousIdentity), ClientConfig::default())
    }

    /// Address requests are sent from.
    pub fn address(&self) -> Identity {
        self.signer.address()
    }

    /// Client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the request payload for a call.
    pub fn build_request(
        &self,
        method: &str,
        argument: CborValue,
    ) -> Result<Payload, EnvelopeError> {
        let mut builder = RequestBuilder::new(method)
            .version(self.config.protocol_version)
            .from(self.signer.address())
            .data(argument)
            .id(self.next_id.fetch_add(1, Ordering::Relaxed));
        if let Some(destination) = &self.config.destination {
            builder = builder.to(destination.clone());
        }
        if self.config.timestamp_requests {
            builder = builder.timestamp_now();
        }
        builder.build()
    }

    /// Encode, send and open one message.
    pub async fn send(&self, payload: &Payload) -> Result<Payload, EnvelopeError> {
        let request = encode_envelope_for(payload, self.signer.as_ref())?;
        debug!(
            method = payload.method().unwrap_or_default(),
            len = request.len(),
            "Sending request"
        );

        let reply = self.transport.send(request).await?;

        if self.config.verify_responses {
            let (sender, response) = decode_verified_envelope(&reply)?;
            self.check_sender(&sender)?;
            debug!(%sender, len = reply.len(), "Received verified response");
            Ok(response)
        } else {
            debug!(len = reply.len(), "Received response");
            decode_envelope(&reply)
        }
    }

    /// A verified response must come from the destination, or at least
    /// from someone holding a key.
    ///
    /// A subresource destination is answered by its parent key.
    fn check_sender(&self, sender: &Identity) -> Result<(), VerificationError> {
        if sender.is_anonymous() {
            return Err(VerificationError::UnsignedResponse);
        }
        let Some(expected) = &self.config.destination else {
            return Ok(());
        };
        let owner = match expected.subresource_id() {
            Some(id) => sender.with_subresource(id) == *expected,
            None => sender == expected,
        };
        if !owner {
            return Err(VerificationError::UnexpectedSender {
                expected: expected.clone(),
                found: sender.clone(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl<T: RawTransport> MethodCaller for MessageClient<T> {
    #[instrument(skip(self, argument))]
    async fn call(&self, method: &str, argument: CborValue) -> Result<Payload, EnvelopeError> {
        let request = self.build_request(method, argument)?;
        self.send(&request).await
    }
}
