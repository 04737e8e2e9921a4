//! # Outbound Ports
//!
//! The raw byte channel to a server. HTTP, retries and discovery live on the
//! other side of this trait.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use thiserror::Error;

/// Error from the byte channel.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The server could not be reached.
    #[error("Transport unavailable: {0}")]
    Unavailable(String),

    /// The server answered outside the message protocol (e.g. an HTTP error).
    #[error("Transport rejected request: {0}")]
    Rejected(String),
}

/// Sends one encoded envelope and returns the encoded reply.
#[async_trait]
pub trait RawTransport: Send + Sync {
    /// Round-trip a request.
    async fn send(&self, request: Vec<u8>) -> Result<Vec<u8>, TransportError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Scripted transport: replies in order and records every request.
#[derive(Debug, Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<Vec<u8>, TransportError>>>,
    requests: Mutex<Vec<Vec<u8>>>,
}

impl MockTransport {
    /// Transport with no scripted replies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub fn push_reply(&self, reply: Vec<u8>) {
        self.replies.lock().push_back(Ok(reply));
    }

    /// Queue a failure.
    pub fn push_error(&self, error: TransportError) {
        self.replies.lock().push_back(Err(error));
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<Vec<u8>> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl RawTransport for MockTransport {
    async fn send(&self, request: Vec<u8>) -> Result<Vec<u8>, TransportError> {
        self.requests.lock().push(request);
        self.replies
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Unavailable("no scripted reply".into())))
    }
}
