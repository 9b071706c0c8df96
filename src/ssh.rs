//! SSH-backed [`RemoteExecutor`] on top of libssh2

use ssh2::{CheckResult, KnownHostFileKind, Session};
use ssh_key::PublicKey;
use std::fs::{self, OpenOptions};
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{HostKeyPolicy, SshConfig};
use crate::error::{AnalyzerError, Result};
use crate::keys::load_private_key;
use crate::remote::RemoteExecutor;

/// Pause between polls while a command has produced no new output
const IDLE_POLL: Duration = Duration::from_millis(5);

/// One authenticated SSH session; commands run one at a time
pub struct SshExecutor {
    session: Session,
    host: String,
}

impl SshExecutor {
    /// Load the key, connect, verify the host key and authenticate
    pub fn connect(config: &SshConfig) -> Result<Self> {
        let key = load_private_key(&config.key_path)?;
        let host = config.hostname.as_str();

        let tcp = connect_tcp(config)?;
        let mut session = Session::new().map_err(|e| AnalyzerError::connection(host, e))?;
        session.set_timeout(timeout_ms(config));
        session.set_tcp_stream(tcp);
        session
            .handshake()
            .map_err(|e| AnalyzerError::connection(host, format!("handshake failed: {}", e)))?;

        verify_host_key(&session, config)?;

        session
            .userauth_pubkey_file(&config.username, None, &key.path, None)
            .map_err(|e| {
                AnalyzerError::connection(
                    host,
                    format!(
                        "{} key authentication as '{}' failed: {}",
                        key.algorithm, config.username, e
                    ),
                )
            })?;
        if !session.authenticated() {
            return Err(AnalyzerError::connection(host, "authentication was not accepted"));
        }

        // The connect timeout does not apply to commands
        session.set_timeout(0);
        info!(host, port = config.port, user = %config.username, "connected");

        Ok(Self {
            session,
            host: config.hostname.clone(),
        })
    }
}

impl RemoteExecutor for SshExecutor {
    fn execute(&self, command: &str) -> Result<String> {
        debug!(command, "executing remote command");
        let host = self.host.as_str();

        let mut channel = self
            .session
            .channel_session()
            .map_err(|e| AnalyzerError::connection(host, e))?;
        channel
            .exec(command)
            .map_err(|e| AnalyzerError::connection(host, e))?;

        // Both streams share the channel window, so neither may be left unread
        let mut out_stream = channel.stream(0);
        let mut err_stream = channel.stderr();
        self.session.set_blocking(false);
        let drained = drain_together(
            &mut out_stream,
            &mut err_stream,
            || channel.eof(),
            || thread::sleep(IDLE_POLL),
        );
        self.session.set_blocking(true);
        let (stdout, stderr) = drained.map_err(|e| AnalyzerError::connection(host, e))?;

        channel
            .wait_close()
            .map_err(|e| AnalyzerError::connection(host, e))?;

        let stderr = String::from_utf8_lossy(&stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            return Err(AnalyzerError::RemoteCommand {
                command: command.to_string(),
                stderr: stderr.to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }

    fn close(self) -> Result<()> {
        self.session
            .disconnect(None, "analysis complete", None)
            .map_err(|e| AnalyzerError::connection(&self.host, e))
    }
}

/// Outcome of one read attempt on a non-blocking stream
enum Pull {
    Data,
    Pending,
    Empty,
}

fn pull<R: Read + ?Sized>(reader: &mut R, chunk: &mut [u8], into: &mut Vec<u8>) -> io::Result<Pull> {
    match reader.read(chunk) {
        Ok(0) => Ok(Pull::Empty),
        Ok(n) => {
            into.extend_from_slice(&chunk[..n]);
            Ok(Pull::Data)
        }
        Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
            Ok(Pull::Pending)
        }
        Err(e) => Err(e),
    }
}

/// Read two non-blocking streams in alternation until both are exhausted
///
/// A stream counts as exhausted once it reads empty after `at_eof` reports
/// the remote end finished; libssh2 can return an empty read earlier when
/// only the other stream had packets. `idle` runs whenever neither stream
/// had data ready.
fn drain_together<A: Read, B: Read>(
    first: &mut A,
    second: &mut B,
    at_eof: impl Fn() -> bool,
    mut idle: impl FnMut(),
) -> io::Result<(Vec<u8>, Vec<u8>)> {
    let mut chunk = [0u8; 8192];
    let mut buffers = [Vec::new(), Vec::new()];
    let mut open = [true, true];

    while open.iter().any(|o| *o) {
        let mut progressed = false;
        for (index, reader) in [&mut *first as &mut dyn Read, &mut *second as &mut dyn Read]
            .into_iter()
            .enumerate()
        {
            if !open[index] {
                continue;
            }
            match pull(reader, &mut chunk, &mut buffers[index])? {
                Pull::Data => progressed = true,
                Pull::Empty if at_eof() => open[index] = false,
                Pull::Empty | Pull::Pending => {}
            }
        }
        if !progressed && open.iter().any(|o| *o) {
            idle();
        }
    }

    let [first_buf, second_buf] = buffers;
    Ok((first_buf, second_buf))
}

fn timeout_ms(config: &SshConfig) -> u32 {
    u32::try_from(config.connect_timeout.as_millis()).unwrap_or(u32::MAX)
}

fn connect_tcp(config: &SshConfig) -> Result<TcpStream> {
    let host = config.hostname.as_str();
    let addrs = (host, config.port)
        .to_socket_addrs()
        .map_err(|e| AnalyzerError::connection(host, format!("cannot resolve: {}", e)))?;

    let mut last_error = None;
    for addr in addrs {
        debug!(%addr, "connecting");
        match TcpStream::connect_timeout(&addr, config.connect_timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_error = Some(e),
        }
    }

    Err(AnalyzerError::connection(
        host,
        match last_error {
            Some(e) => e.to_string(),
            None => "no addresses resolved".to_string(),
        },
    ))
}

/// Check the server key against known_hosts under the configured policy
fn verify_host_key(session: &Session, config: &SshConfig) -> Result<()> {
    let host = config.hostname.as_str();
    let (key, _) = session
        .host_key()
        .ok_or_else(|| AnalyzerError::connection(host, "server presented no host key"))?;

    let mut known_hosts = session
        .known_hosts()
        .map_err(|e| AnalyzerError::connection(host, e))?;
    if let Some(path) = config.known_hosts.as_deref().filter(|p| p.exists()) {
        known_hosts
            .read_file(path, KnownHostFileKind::OpenSSH)
            .map_err(|e| {
                AnalyzerError::connection(
                    host,
                    format!("cannot read known hosts {}: {}", path.display(), e),
                )
            })?;
    }

    let decision = host_key_decision(
        known_hosts.check_port(host, config.port, key),
        config.host_key_policy,
    );
    match decision {
        HostKeyDecision::Accept => {
            debug!(host, "host key matches known_hosts");
            Ok(())
        }
        HostKeyDecision::AcceptAndRecord => {
            warn!(
                host,
                "trusting unknown host key on first use; the key was not verified"
            );
            if let Some(path) = config.known_hosts.as_deref() {
                if let Err(e) = record_host_key(path, &config.known_hosts_entry(), key) {
                    warn!(path = %path.display(), error = %e, "could not record host key");
                }
            }
            Ok(())
        }
        HostKeyDecision::Reject(reason) => Err(AnalyzerError::connection(host, reason)),
    }
}

/// What to do with a server key after looking it up in known_hosts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HostKeyDecision {
    Accept,
    AcceptAndRecord,
    Reject(&'static str),
}

/// A changed key is refused under every policy
fn host_key_decision(result: CheckResult, policy: HostKeyPolicy) -> HostKeyDecision {
    match (result, policy) {
        (CheckResult::Match, _) => HostKeyDecision::Accept,
        (CheckResult::Mismatch, _) => HostKeyDecision::Reject(
            "host key does not match the known_hosts entry (possible man-in-the-middle)",
        ),
        (CheckResult::Failure, _) => HostKeyDecision::Reject("host key check failed"),
        (CheckResult::NotFound, HostKeyPolicy::Strict) => HostKeyDecision::Reject(
            "host is not in known_hosts and strict host key checking is enabled",
        ),
        (CheckResult::NotFound, HostKeyPolicy::TrustOnFirstUse) => {
            HostKeyDecision::AcceptAndRecord
        }
    }
}

/// Append one known_hosts line for an accepted key
fn record_host_key(path: &Path, entry: &str, key: &[u8]) -> io::Result<()> {
    let encoded = PublicKey::from_bytes(key)
        .and_then(|public| public.to_openssh())
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let needs_newline = fs::read(path)
        .map(|existing| !existing.is_empty() && !existing.ends_with(b"\n"))
        .unwrap_or(false);

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    if needs_newline {
        writeln!(file)?;
    }
    writeln!(file, "{} {}", entry, encoded)?;
    debug!(path = %path.display(), entry, "recorded host key");
    Ok(())
}
