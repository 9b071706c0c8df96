//! Error taxonomy for the analyzer
//!
//! Every failure that aborts a run is an [`AnalyzerError`]. Per-service
//! timing skips are not errors; see [`crate::timing::TimingParseSkip`].

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while connecting to or analyzing a remote host
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Transport, handshake, host-key or authentication failure
    #[error("Connection to {host} failed: {reason}")]
    Connection { host: String, reason: String },

    #[error("Failed to read private key {}", .path.display())]
    KeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// None of the supported key parsers accepted the file
    #[error("Unsupported or invalid private key format: {} (tried {tried})", .path.display())]
    UnsupportedKeyFormat { path: PathBuf, tried: String },

    /// The end of userspace boot could not be determined
    #[error("Could not determine boot userspace time: {reason}")]
    BoundaryUnavailable { reason: String },

    /// The remote command wrote to its error stream
    #[error("Remote command failed: {stderr}")]
    RemoteCommand { command: String, stderr: String },

    #[error("Could not determine local username: {0}")]
    LocalUser(String),
}

impl AnalyzerError {
    pub(crate) fn connection(host: &str, reason: impl std::fmt::Display) -> Self {
        Self::Connection {
            host: host.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyzerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_command_message_uses_stderr() {
        let err = AnalyzerError::RemoteCommand {
            command: "systemd-analyze".to_string(),
            stderr: "Bootup is not yet finished".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Remote command failed: Bootup is not yet finished"
        );
    }

    #[test]
    fn test_unsupported_key_format_names_path() {
        let err = AnalyzerError::UnsupportedKeyFormat {
            path: PathBuf::from("/tmp/key"),
            tried: "ed25519, rsa, ecdsa".to_string(),
        };
        let message = err.to_string();
        assert!(message.starts_with("Unsupported or invalid private key format"));
        assert!(message.contains("/tmp/key"));
        assert!(message.contains("ed25519, rsa, ecdsa"));
    }

    #[test]
    fn test_connection_helper() {
        let err = AnalyzerError::connection("db01", "timed out");
        assert_eq!(err.to_string(), "Connection to db01 failed: timed out");
    }
}
