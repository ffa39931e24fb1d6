//! Tooling & Integration Layer
//!
//! Command-line entry points for driving benchmark runs from a shell.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
