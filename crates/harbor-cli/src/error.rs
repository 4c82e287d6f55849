//! CLI-specific error types and mappings.
//!
//! This module provides error types for the CLI adapter and mappings
//! from `HarborError` to exit codes and user-facing messages.

use harbor_core::{HarborError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Clone, Error)]
pub enum CliError {
    /// Error raised by code running inside the server.
    #[error("{0}")]
    Core(String),

    /// Argument parsing error.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// A command name the registry does not know.
    #[error("unknown command: {name}\n\n{listing}")]
    UnknownCommand { name: String, listing: String },

    /// IO error (file not found, permission denied, etc.).
    #[error("IO error: {0}")]
    Io(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Process control error.
    #[error("Process error: {0}")]
    Process(String),

    /// The server's control endpoint could not be used.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

impl CliError {
    /// Map error to appropriate exit code.
    ///
    /// Exit codes follow Unix conventions:
    /// - 0: Success
    /// - 1: General error
    /// - 2: Misuse of shell command (invalid arguments)
    /// - 64-78: Reserved for specific error categories (see sysexits.h)
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Core(_) => 1,
            Self::Arguments(_) | Self::UnknownCommand { .. } => 2, // EX_USAGE
            Self::Unavailable(_) => 69,                            // EX_UNAVAILABLE
            Self::Process(_) => 71,                                // EX_OSERR
            Self::Io(_) => 74,                                     // EX_IOERR
            Self::Config(_) => 78,                                 // EX_CONFIG
        }
    }

    /// Classify any error a handler returned.
    ///
    /// Walks the error chain for a known error type; anything unrecognized
    /// is a general error.
    pub fn classify(err: &anyhow::Error) -> Self {
        for cause in err.chain() {
            if let Some(cli) = cause.downcast_ref::<Self>() {
                return cli.clone();
            }
            if let Some(harbor) = cause.downcast_ref::<HarborError>() {
                return Self::from_harbor(harbor);
            }
            if let Some(settings) = cause.downcast_ref::<SettingsError>() {
                return Self::Config(settings.to_string());
            }
            if let Some(io) = cause.downcast_ref::<std::io::Error>() {
                return Self::Io(io.to_string());
            }
        }
        Self::Core(err.to_string())
    }

    fn from_harbor(err: &HarborError) -> Self {
        let message = err.to_string();
        match err {
            HarborError::ExecutionFailure { .. } | HarborError::MigrationStepFailure { .. } => {
                Self::Core(message)
            }
            HarborError::InvalidSignal(_) => Self::Arguments(message),
            HarborError::BinaryNotFound { .. } | HarborError::Settings(_) => Self::Config(message),
            HarborError::ConfigWriteFailure { .. } | HarborError::Io(_) => Self::Io(message),
            HarborError::StartupTimeout { .. }
            | HarborError::ProcessNotRunning { .. }
            | HarborError::AlreadyRunning { .. }
            | HarborError::StartFailed(_)
            | HarborError::StopFailed(_) => Self::Process(message),
            HarborError::Transport { .. } => Self::Unavailable(message),
        }
    }
}

impl From<HarborError> for CliError {
    fn from(err: HarborError) -> Self {
        Self::from_harbor(&err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn harbor_errors_map_to_sysexits() {
        let cases = [
            (
                HarborError::ProcessNotRunning {
                    environment: "production".into(),
                },
                71,
            ),
            (HarborError::BinaryNotFound { searched: vec![] }, 78),
            (HarborError::InvalidSignal("BOGUS".into()), 2),
            (
                HarborError::ExecutionFailure {
                    detail: "boom".into(),
                },
                1,
            ),
            (HarborError::transport("connection refused"), 69),
            (
                HarborError::ConfigWriteFailure {
                    path: "server.conf".into(),
                    reason: "disk full".into(),
                },
                74,
            ),
        ];

        for (err, code) in cases {
            let shown = err.to_string();
            assert_eq!(CliError::from(err).exit_code(), code, "{shown}");
        }
    }

    #[test]
    fn execution_failure_prints_detail_only() {
        let err = CliError::from(HarborError::ExecutionFailure {
            detail: "exec:1: attempt to call a nil value".into(),
        });
        assert_eq!(err.to_string(), "exec:1: attempt to call a nil value");
    }

    #[test]
    fn classify_finds_harbor_error_behind_context() {
        let err = Err::<(), _>(HarborError::StartupTimeout {
            environment: "test".into(),
            waited_ms: 10_000,
        })
        .context("starting server")
        .unwrap_err();

        let classified = CliError::classify(&err);
        assert!(matches!(classified, CliError::Process(_)));
        assert_eq!(classified.exit_code(), 71);
    }

    #[test]
    fn classify_defaults_to_general_error() {
        let err = anyhow::anyhow!("something odd");
        assert!(matches!(CliError::classify(&err), CliError::Core(m) if m == "something odd"));
    }

    #[test]
    fn unknown_command_includes_listing() {
        let err = CliError::UnknownCommand {
            name: "deploy".into(),
            listing: "Commands:\n  server".into(),
        };
        assert!(err.to_string().starts_with("unknown command: deploy\n"));
        assert_eq!(err.exit_code(), 2);
    }
}
