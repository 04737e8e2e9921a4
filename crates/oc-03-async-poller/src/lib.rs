//! # Async Poller Subsystem (OC-03)
//!
//! Some methods answer with a deferred-call token instead of a result. The
//! poller asks `async.status` for that token with exponential backoff until
//! the server reports completion or the deadline passes.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): the pure [`PollState`] machine
//! - **Ports Layer** (`ports/`): [`DeferredCallResolver`] (inbound), [`PollClock`] (outbound)
//! - **Service Layer** (`service.rs`): [`AsyncPoller`], which drives the machine
//! - **Adapters** (`adapters/`): [`TokioClock`]
//!
//! ## Timing (defaults)
//!
//! ```text
//! call ─ 1000ms ─ call ─ 1500ms ─ call ─ 2250ms ─ ... ─ call ─ (capped) ─ 60s: TimedOut
//! ```
//!
//! A timeout is not an error: the last status response comes back as
//! [`PollOutcome::TimedOut`].

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::clock::TokioClock;
pub use config::PollerConfig;
pub use domain::errors::PollError;
pub use domain::state::{status_argument, PollOutcome, PollState, STATUS_DONE};
pub use ports::inbound::DeferredCallResolver;
pub use ports::outbound::{ManualClock, PollClock, ScriptedCaller};
pub use service::AsyncPoller;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
