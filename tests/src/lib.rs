//! # Omni Client Test Suite
//!
//! Cross-crate flows that exercise the identity, envelope and async poller
//! crates together against an in-process server.
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! └── integration/      # Client ⇄ server message flows
//!     └── flows.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p oc-tests
//!
//! # With log output
//! OC_LOG_LEVEL=debug cargo test -p oc-tests -- --nocapture
//! ```

#![allow(unused_variables)]
#![allow(unused_imports)]
#![allow(dead_code)]

pub mod integration;
