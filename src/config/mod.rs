//! Harness Configuration
//!
//! The benchmark constants as a loadable configuration. Merge precedence:
//! defaults (lowest), then an optional TOML file, then `FSBENCH_*`
//! environment variables, then CLI flags (highest, applied by the CLI
//! layer).

pub mod loader;

pub use loader::ConfigLoader;

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};

/// Shape of the generated tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeParams {
    /// Independent top-level trees created under the root.
    #[serde(default = "default_dir_count")]
    pub dir_count: u32,

    /// Nested directory levels per tree.
    #[serde(default = "default_dir_depth")]
    pub dir_depth: u32,

    /// Files created in every directory level.
    #[serde(default = "default_files_per_dir")]
    pub files_per_dir: u32,
}

fn default_dir_count() -> u32 {
    5
}

fn default_dir_depth() -> u32 {
    5
}

fn default_files_per_dir() -> u32 {
    5
}

fn default_string_iterations() -> u64 {
    10_000
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            dir_count: default_dir_count(),
            dir_depth: default_dir_depth(),
            files_per_dir: default_files_per_dir(),
        }
    }
}

impl TreeParams {
    /// Directories a full generation pass creates.
    pub fn expected_dirs(&self) -> u64 {
        u64::from(self.dir_count) * u64::from(self.dir_depth)
    }

    /// Files a full generation pass creates.
    pub fn expected_files(&self) -> u64 {
        self.expected_dirs() * u64::from(self.files_per_dir)
    }
}

/// Full harness configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    #[serde(default)]
    pub tree: TreeParams,

    /// Iterations of each string-concatenation loop.
    #[serde(default = "default_string_iterations")]
    pub string_iterations: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            tree: TreeParams::default(),
            string_iterations: default_string_iterations(),
            logging: LoggingConfig::default(),
        }
    }
}
