//! Error types for hyperlane-setup
//!
//! Centralized error handling using thiserror. Every failure in the
//! provisioning pipeline is fatal, so these errors travel straight up to
//! `main`, which logs them and exits with status 1.

use std::path::PathBuf;
use thiserror::Error;

/// All error types that can occur while provisioning the host
#[derive(Debug, Error)]
pub enum SetupError {
    /// Effective user is not root
    #[error("This program must be run as root (effective uid {0})")]
    NotPrivileged(u32),

    /// Log file directory is missing or read-only
    #[error("Log directory is not writable: {0}")]
    LogPathNotWritable(PathBuf),

    /// An external command ran but reported failure
    #[error("{step} failed: {detail}")]
    CommandFailed { step: String, detail: String },

    /// An external command could not be started at all
    #[error("Failed to execute {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// Installer script download failed
    #[error("Failed to download {url}: {reason}")]
    Download { url: String, reason: String },

    /// Operator ran out of attempts entering the private key
    #[error("No valid private key after {attempts} attempts")]
    InvalidPrivateKey { attempts: u32 },

    /// Operator supplied an empty replacement container name
    #[error("Container name cannot be empty")]
    EmptyContainerName,

    /// Log viewing requested but the validator container does not exist
    #[error("Container '{0}' is not started")]
    ContainerNotStarted(String),

    /// Operator input ended before a required answer was given
    #[error("Input closed while waiting for {0}")]
    InputClosed(String),

    /// Terminal control error
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SetupError {
    /// Build a `CommandFailed` for the named step
    pub fn command_failed(step: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::CommandFailed {
            step: step.into(),
            detail: detail.into(),
        }
    }
}

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, SetupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_privileged_error() {
        let err = SetupError::NotPrivileged(1000);
        assert_eq!(err.to_string(), "This program must be run as root (effective uid 1000)");
    }

    #[test]
    fn test_log_path_error() {
        let err = SetupError::LogPathNotWritable(PathBuf::from("/root"));
        assert_eq!(err.to_string(), "Log directory is not writable: /root");
    }

    #[test]
    fn test_command_failed_error() {
        let err = SetupError::command_failed("Docker installation", "exit code 100");
        assert_eq!(err.to_string(), "Docker installation failed: exit code 100");
    }

    #[test]
    fn test_container_not_started_error() {
        let err = SetupError::ContainerNotStarted("hyperlane".to_string());
        assert_eq!(err.to_string(), "Container 'hyperlane' is not started");
    }

    #[test]
    fn test_invalid_private_key_error() {
        let err = SetupError::InvalidPrivateKey { attempts: 5 };
        assert_eq!(err.to_string(), "No valid private key after 5 attempts");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SetupError = io_err.into();
        assert!(matches!(err, SetupError::Io(_)));
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid").unwrap_err();
        let err: SetupError = json_err.into();
        assert!(matches!(err, SetupError::Json(_)));
    }
}
