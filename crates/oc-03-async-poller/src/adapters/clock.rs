//! # Tokio Clock
//!
//! [`PollClock`] over `tokio::time`, so paused test runtimes and the
//! production runtime share one code path.

use crate::ports::outbound::PollClock;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Clock backed by the tokio timer.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
}

impl TokioClock {
    /// Clock with its origin at the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for TokioClock {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PollClock for TokioClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
