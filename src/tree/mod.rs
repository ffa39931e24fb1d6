//! Benchmark Tree Operations
//!
//! Recursive generation of the fixed-fanout directory/file tree and the
//! depth-first traversal that reads it back.

pub mod generator;
pub mod walker;

pub use generator::generate;
pub use walker::{walk, walk_root, VisitStats};
