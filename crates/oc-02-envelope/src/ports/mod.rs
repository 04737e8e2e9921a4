//! # Ports Layer
//!
//! - `inbound`: what the rest of the client calls
//! - `outbound`: what this subsystem needs from the transport

pub mod inbound;
pub mod outbound;
