//! Connection configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AnalyzerError, Result};

pub const DEFAULT_PORT: u16 = 22;
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// How to treat a host key that is not yet in the known-hosts file
///
/// A host whose recorded key differs is rejected under either policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKeyPolicy {
    /// Accept and record unknown host keys.
    ///
    /// SECURITY TRADE-OFF: the first connection to a host cannot detect a
    /// man-in-the-middle. Use [`HostKeyPolicy::Strict`] with a pre-populated
    /// known-hosts file where that matters.
    TrustOnFirstUse,
    /// Reject hosts without a known-hosts entry
    Strict,
}

/// Everything needed to open an SSH session
#[derive(Debug, Clone)]
pub struct SshConfig {
    pub hostname: String,
    pub port: u16,
    pub username: String,
    pub key_path: PathBuf,
    /// Applies to TCP connect, handshake and authentication only
    pub connect_timeout: Duration,
    /// `None` disables persistence of accepted host keys
    pub known_hosts: Option<PathBuf>,
    pub host_key_policy: HostKeyPolicy,
}

impl SshConfig {
    /// Configuration with defaults for everything but the target and key
    pub fn new(hostname: impl Into<String>, username: impl Into<String>, key_path: PathBuf) -> Self {
        Self {
            hostname: hostname.into(),
            port: DEFAULT_PORT,
            username: username.into(),
            key_path,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            known_hosts: default_known_hosts(),
            host_key_policy: HostKeyPolicy::TrustOnFirstUse,
        }
    }

    /// Host pattern as written in known_hosts files
    pub fn known_hosts_entry(&self) -> String {
        if self.port == DEFAULT_PORT {
            self.hostname.clone()
        } else {
            format!("[{}]:{}", self.hostname, self.port)
        }
    }
}

/// `~/.ssh/known_hosts`, if a home directory exists
pub fn default_known_hosts() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".ssh").join("known_hosts"))
}

/// Name of the user running this process
pub fn local_username() -> Result<String> {
    let uid = nix::unistd::getuid();
    match nix::unistd::User::from_uid(uid) {
        Ok(Some(user)) => Ok(user.name),
        Ok(None) => Err(AnalyzerError::LocalUser(format!(
            "no passwd entry for uid {}",
            uid
        ))),
        Err(e) => Err(AnalyzerError::LocalUser(e.to_string())),
    }
}
