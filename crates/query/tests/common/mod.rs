//! Shared test infrastructure for the query engine.
//!
//! Each integration test binary pulls in only the helpers it needs.

#![allow(dead_code)]

pub mod assertions;
pub mod fixtures;

// Re-export commonly used items
pub use assertions::*;
pub use fixtures::*;
