//! # Ports Layer
//!
//! - `inbound`: [`DeferredCallResolver`](inbound::DeferredCallResolver)
//! - `outbound`: [`PollClock`](outbound::PollClock), plus the
//!   [`MethodCaller`](oc_02_envelope::MethodCaller) status calls go through

pub mod inbound;
pub mod outbound;
