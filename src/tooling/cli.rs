use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{ConfigLoader, HarnessConfig};
use crate::error::HarnessError;
use crate::harness::Harness;
use crate::logging::init_logging;
use crate::volume::{DiskVolume, MemoryVolume};

/// Fsbench CLI - filesystem tree and string-concatenation benchmarks
#[derive(Parser, Debug)]
#[command(name = "fsbench")]
#[command(version, about = "Benchmark directory-tree generation, traversal, and string concatenation")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Override the log format (text, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Override the log output (stdout, stderr, both)
    #[arg(long, global = true)]
    pub log_output: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run all benchmark phases against a volume
    Run {
        /// Host directory backing the volume
        #[arg(long, default_value = "fsbench-volume")]
        volume_root: PathBuf,

        /// Benchmark an in-memory volume instead of a disk-backed one
        #[arg(long)]
        in_memory: bool,

        /// Number of top-level directory trees
        #[arg(long)]
        dirs: Option<u32>,

        /// Nesting depth of each directory tree
        #[arg(long)]
        depth: Option<u32>,

        /// Files created in each directory
        #[arg(long)]
        files: Option<u32>,

        /// Iterations for each string-concatenation phase
        #[arg(long)]
        iterations: Option<u64>,

        /// Log every entry visited during the walk phase
        #[arg(long)]
        list_tree: bool,

        /// Output format: text or json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

/// CLI context holding the resolved configuration.
///
/// Construction loads the config file (if any), applies logging
/// overrides from global flags, and initializes the subscriber.
pub struct CliContext {
    config: HarnessConfig,
}

impl CliContext {
    pub fn new(cli: &Cli) -> Result<Self, HarnessError> {
        let mut config = ConfigLoader::load(cli.config.as_deref())?;

        if let Some(level) = &cli.log_level {
            config.logging.level = level.clone();
        }
        if let Some(format) = &cli.log_format {
            config.logging.format = format.clone();
        }
        if let Some(output) = &cli.log_output {
            config.logging.output = output.clone();
        }

        init_logging(&config.logging)?;

        Ok(Self { config })
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, HarnessError> {
        match command {
            Commands::Run {
                volume_root,
                in_memory,
                dirs,
                depth,
                files,
                iterations,
                list_tree,
                format,
            } => {
                let mut config = self.config.clone();
                if let Some(dirs) = dirs {
                    config.tree.dir_count = *dirs;
                }
                if let Some(depth) = depth {
                    config.tree.dir_depth = *depth;
                }
                if let Some(files) = files {
                    config.tree.files_per_dir = *files;
                }
                if let Some(iterations) = iterations {
                    config.string_iterations = *iterations;
                }

                let report = if *in_memory {
                    let mut volume = MemoryVolume::new();
                    Harness::new(&mut volume, "memory", config).run(*list_tree)?
                } else {
                    let label = format!("disk:{}", volume_root.display());
                    let mut volume = DiskVolume::new(volume_root.clone());
                    Harness::new(&mut volume, label, config).run(*list_tree)?
                };

                match format.as_str() {
                    "json" => Ok(report.to_json()?),
                    "text" | _ => Ok(report.to_table()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_defaults_parse() {
        let cli = Cli::try_parse_from(["fsbench", "run"]).unwrap();
        match &cli.command {
            Commands::Run {
                volume_root,
                in_memory,
                dirs,
                depth,
                files,
                iterations,
                list_tree,
                format,
            } => {
                assert_eq!(volume_root, &PathBuf::from("fsbench-volume"));
                assert!(!in_memory);
                assert!(dirs.is_none());
                assert!(depth.is_none());
                assert!(files.is_none());
                assert!(iterations.is_none());
                assert!(!list_tree);
                assert_eq!(format, "text");
            }
        }
        assert!(cli.config.is_none());
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_run_flags_parse() {
        let cli = Cli::try_parse_from([
            "fsbench",
            "run",
            "--in-memory",
            "--dirs",
            "3",
            "--depth",
            "2",
            "--files",
            "4",
            "--iterations",
            "500",
            "--list-tree",
            "--format",
            "json",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match &cli.command {
            Commands::Run {
                in_memory,
                dirs,
                depth,
                files,
                iterations,
                list_tree,
                format,
                ..
            } => {
                assert!(in_memory);
                assert_eq!(*dirs, Some(3));
                assert_eq!(*depth, Some(2));
                assert_eq!(*files, Some(4));
                assert_eq!(*iterations, Some(500));
                assert!(list_tree);
                assert_eq!(format, "json");
            }
        }
    }

    #[test]
    fn test_missing_subcommand_is_an_error() {
        assert!(Cli::try_parse_from(["fsbench"]).is_err());
    }
}
