//! Error types for the `maxine` binary.

use std::io;
use std::process::ExitCode;

use maxine_editor::StartupError;
use maxine_tensor::{LoadError, TensorError};
use thiserror::Error;

/// Result type alias for CLI operations.
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// Everything that ends the process with a non-zero status.
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// `--shape` was rejected.
    #[error("invalid --shape: {0}")]
    InvalidShape(#[from] TensorError),

    /// The session could not start (bad config, arena, or dump file).
    #[error("{0}")]
    Startup(#[from] StartupError),

    /// Terminal setup or I/O failed.
    #[error("terminal I/O error: {0}")]
    Terminal(#[from] io::Error),

    /// The capability document could not be produced.
    #[error("capability export failed: {0}")]
    Capabilities(#[from] serde_json::Error),

    /// One or more `--exec` commands failed.
    #[error("{failed} of {total} commands failed")]
    BatchFailed {
        /// Commands that returned an error.
        failed: usize,
        /// Commands run.
        total: usize,
    },

    /// The tracing subscriber could not be installed.
    #[error("logging setup failed: {0}")]
    Logging(String),
}

impl CliError {
    /// Process exit code for this error.
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::InvalidShape(_) => ExitCode::from(2),
            Self::Startup(StartupError::Config(_)) => ExitCode::from(2),
            Self::Startup(StartupError::Load(LoadError::NotFound { .. })) => ExitCode::from(3),
            Self::Startup(StartupError::Load(LoadError::SizeMismatch { .. })) => ExitCode::from(4),
            Self::Startup(StartupError::Arena(_)) => ExitCode::from(5),
            Self::Startup(_) => ExitCode::from(6),
            Self::Terminal(_) => ExitCode::from(7),
            Self::Capabilities(_) | Self::BatchFailed { .. } | Self::Logging(_) => {
                ExitCode::from(1)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_mismatch_has_its_own_code() {
        let e = CliError::from(StartupError::Load(LoadError::SizeMismatch {
            path: "w.bin".into(),
            expected: 768,
            actual: 4,
        }));
        assert_eq!(e.exit_code(), ExitCode::from(4));
        assert!(e.to_string().contains("expected 768 bytes"));
    }

    #[test]
    fn batch_failure_message() {
        let e = CliError::BatchFailed {
            failed: 2,
            total: 5,
        };
        assert_eq!(e.to_string(), "2 of 5 commands failed");
        assert_eq!(e.exit_code(), ExitCode::from(1));
    }
}
