//! Integration flows between the client crates.

pub mod flows;
