//! # Domain Layer
//!
//! Pure message logic: no I/O, no clocks except the optional request timestamp.

pub mod envelope;
pub mod errors;
pub mod payload;
pub mod remote_error;
