//! Error types for generic config updater validators.
//!
//! This module defines the error types used throughout the gcu crates.
//! All errors implement `std::error::Error` via `thiserror`.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for gcu operations.
pub type GcuResult<T> = Result<T, GcuError>;

/// Errors that can occur while validating and applying config changes.
#[derive(Debug, Error)]
pub enum GcuError {
    /// Failed to spawn a shell command.
    #[error("Failed to execute shell command '{command}': {source}")]
    ShellExec {
        /// The command that failed to execute.
        command: String,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },

    /// A config regeneration script returned non-zero.
    #[error("Config generation failed: '{command}' (exit code {exit_code})")]
    ConfigGeneration {
        /// The generation command.
        command: String,
        /// The exit code.
        exit_code: i32,
    },

    /// A service could not be restarted.
    #[error("Service '{service}' restart failed after {attempts} attempt(s) (exit code {exit_code})")]
    ServiceRestart {
        /// The systemd unit name.
        service: String,
        /// Number of restart attempts made.
        attempts: u32,
        /// Exit code of the last attempt.
        exit_code: i32,
    },

    /// A systemd unit name contains characters that are not allowed.
    #[error("Invalid unit name '{unit}'")]
    InvalidUnitName {
        /// The rejected unit name.
        unit: String,
    },

    /// No validator is registered under the requested name.
    #[error("Unknown validator '{name}'")]
    UnknownValidator {
        /// The requested validator name.
        name: String,
    },

    /// A config snapshot could not be parsed.
    #[error("Invalid config snapshot {}: {message}", .path.display())]
    InvalidSnapshot {
        /// Source of the snapshot.
        path: PathBuf,
        /// Parser error message.
        message: String,
    },

    /// Filesystem error while loading input.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// The path being accessed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: io::Error,
    },
}

impl GcuError {
    /// Creates a config generation error.
    pub fn config_generation(command: impl Into<String>, exit_code: i32) -> Self {
        Self::ConfigGeneration {
            command: command.into(),
            exit_code,
        }
    }

    /// Creates a service restart error.
    pub fn service_restart(service: impl Into<String>, attempts: u32, exit_code: i32) -> Self {
        Self::ServiceRestart {
            service: service.into(),
            attempts,
            exit_code,
        }
    }

    /// Creates an unknown validator error.
    pub fn unknown_validator(name: impl Into<String>) -> Self {
        Self::UnknownValidator { name: name.into() }
    }

    /// Creates an invalid snapshot error.
    pub fn invalid_snapshot(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidSnapshot {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns true if this error indicates a transient condition
    /// that may succeed on a later apply step.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GcuError::ServiceRestart { .. } | GcuError::ShellExec { .. })
    }
}
