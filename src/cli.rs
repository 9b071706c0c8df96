//! CLI argument parsing for bootlag

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::{self, HostKeyPolicy, SshConfig};
use crate::error::Result;

/// Output format for the analysis report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON document with four-space indentation (default)
    Json,
    /// Human-readable table and summary
    Text,
}

#[derive(Parser, Debug)]
#[command(name = "bootlag")]
#[command(version)]
#[command(about = "Analyze systemd service activation timing via SSH", long_about = None)]
#[command(after_help = "Host keys: unknown hosts are trusted on first use and recorded in \
the known hosts file. This cannot detect a man-in-the-middle on the first connection; \
use --strict-host-keys with a pre-populated known hosts file to refuse unknown hosts.")]
pub struct Cli {
    /// Hostname or IP address of target system
    pub hostname: String,

    /// Path to SSH private key (ed25519, RSA or ECDSA)
    #[arg(value_name = "KEY_PATH")]
    pub key_path: PathBuf,

    /// SSH target username (defaults to current local user)
    #[arg(long)]
    pub username: Option<String>,

    /// Path to store generated report (prints to stdout if omitted)
    #[arg(long = "output-file", value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// SSH port
    #[arg(long, default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// Connection timeout in seconds (connect, handshake and authentication)
    #[arg(
        long = "connect-timeout",
        value_name = "SECONDS",
        default_value_t = config::DEFAULT_CONNECT_TIMEOUT.as_secs(),
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub connect_timeout: u64,

    /// Known hosts file (defaults to ~/.ssh/known_hosts)
    #[arg(long = "known-hosts", value_name = "PATH")]
    pub known_hosts: Option<PathBuf>,

    /// Refuse hosts that are not already in the known hosts file
    #[arg(long = "strict-host-keys")]
    pub strict_host_keys: bool,

    /// Report format
    #[arg(long = "format", value_enum, default_value = "json")]
    pub format: OutputFormat,

    /// Enable debug tracing on stderr
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Resolve the SSH username, falling back to the local user
    pub fn resolve_username(&self) -> Result<String> {
        match &self.username {
            Some(name) => Ok(name.clone()),
            None => config::local_username(),
        }
    }

    /// Lower the parsed arguments into a connection configuration
    pub fn ssh_config(&self) -> Result<SshConfig> {
        let mut ssh = SshConfig::new(
            self.hostname.clone(),
            self.resolve_username()?,
            self.key_path.clone(),
        );
        ssh.port = self.port;
        ssh.connect_timeout = Duration::from_secs(self.connect_timeout);
        if let Some(path) = &self.known_hosts {
            ssh.known_hosts = Some(path.clone());
        }
        if self.strict_host_keys {
            ssh.host_key_policy = HostKeyPolicy::Strict;
        }
        Ok(ssh)
    }
}
