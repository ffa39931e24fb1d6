//! Configuration loading: defaults, optional file, FSBENCH_* environment.

use super::HarnessConfig;
use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with merge precedence:
    /// defaults (lowest) -> file, when given -> environment (highest).
    ///
    /// Environment keys use the FSBENCH_ prefix with `__` separating
    /// nesting levels, e.g. `FSBENCH_TREE__DIR_COUNT=3`.
    pub fn load(file: Option<&Path>) -> Result<HarnessConfig, ConfigError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(
            Environment::with_prefix("FSBENCH")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        // keys no source sets fall back to the serde defaults
        config.try_deserialize()
    }
}
