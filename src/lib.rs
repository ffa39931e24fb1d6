//! Fsbench: Filesystem Tree Microbenchmark Harness
//!
//! Times filesystem tree generation and traversal against a mounted volume,
//! plus three string-concatenation strategies, and reports per-phase
//! durations.

pub mod config;
pub mod error;
pub mod harness;
pub mod logging;
pub mod strings;
pub mod tooling;
pub mod tree;
pub mod volume;
