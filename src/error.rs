//! Error types for volume operations, harness setup, and the CLI layer.

use thiserror::Error;

/// Errors raised by volume implementations.
///
/// `Mount` and `Format` are fatal when they occur during harness setup.
/// Every other variant is recoverable at the point it occurs: the caller
/// logs it with the offending path and continues with reduced scope.
#[derive(Debug, Error)]
pub enum VolumeError {
    #[error("mounting volume failed: {reason}")]
    Mount { reason: String },

    #[error("formatting volume failed: {reason}")]
    Format { reason: String },

    #[error("creating directory \"{path}\" failed: {reason}")]
    CreateDir { path: String, reason: String },

    #[error("opening \"{path}\" for writing failed: {reason}")]
    OpenFile { path: String, reason: String },

    #[error("writing \"{path}\" failed: {reason}")]
    Write { path: String, reason: String },

    #[error("reading \"{path}\" failed: {reason}")]
    Read { path: String, reason: String },

    #[error("opening directory \"{path}\" failed: {reason}")]
    ReadDir { path: String, reason: String },

    #[error("no such entry: \"{path}\"")]
    NotFound { path: String },

    #[error("not a directory: \"{path}\"")]
    NotADirectory { path: String },

    #[error("volume is not mounted")]
    NotMounted,
}

impl VolumeError {
    /// Volume path the error refers to, when the variant carries one.
    pub fn path(&self) -> Option<&str> {
        match self {
            VolumeError::CreateDir { path, .. }
            | VolumeError::OpenFile { path, .. }
            | VolumeError::Write { path, .. }
            | VolumeError::Read { path, .. }
            | VolumeError::ReadDir { path, .. }
            | VolumeError::NotFound { path }
            | VolumeError::NotADirectory { path } => Some(path),
            VolumeError::Mount { .. } | VolumeError::Format { .. } | VolumeError::NotMounted => {
                None
            }
        }
    }
}

/// Fatal setup failure. A run that cannot mount or format its volume
/// cannot proceed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("mounting filesystem failed")]
    Mount(#[source] VolumeError),

    #[error("formatting filesystem failed")]
    Format(#[source] VolumeError),
}

/// Errors surfaced by configuration loading, logging setup, and command
/// execution.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("Failed to render report: {0}")]
    Report(#[from] serde_json::Error),
}

impl From<config::ConfigError> for HarnessError {
    fn from(err: config::ConfigError) -> Self {
        HarnessError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_error_exposes_offending_path() {
        let err = VolumeError::CreateDir {
            path: "/directory_0_4".to_string(),
            reason: "injected failure".to_string(),
        };
        assert_eq!(err.path(), Some("/directory_0_4"));
        assert!(VolumeError::NotMounted.path().is_none());
    }

    #[test]
    fn setup_error_keeps_volume_error_as_source() {
        use std::error::Error as _;

        let err = SetupError::Mount(VolumeError::Mount {
            reason: "backing store unavailable".to_string(),
        });
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "mounting filesystem failed");
    }
}
