//! Remote command execution seam
//!
//! The analysis only ever needs "run this command, give me its stdout".
//! Production binds [`RemoteExecutor`] to an SSH session
//! ([`crate::ssh::SshExecutor`]); tests bind it to canned output.

use crate::error::Result;

/// Runs one shell command on the remote host
pub trait RemoteExecutor {
    /// Execute `command` and return its standard output
    ///
    /// Fails with [`crate::AnalyzerError::RemoteCommand`] when the command
    /// writes to its error stream, and with
    /// [`crate::AnalyzerError::Connection`] when the session fails.
    fn execute(&self, command: &str) -> Result<String>;

    /// Release the transport once no more commands will run
    ///
    /// Borrowed and boxed executors leave the underlying session open.
    fn close(self) -> Result<()>
    where
        Self: Sized,
    {
        Ok(())
    }
}

impl<T: RemoteExecutor + ?Sized> RemoteExecutor for &T {
    fn execute(&self, command: &str) -> Result<String> {
        (**self).execute(command)
    }
}

impl<T: RemoteExecutor + ?Sized> RemoteExecutor for Box<T> {
    fn execute(&self, command: &str) -> Result<String> {
        (**self).execute(command)
    }
}

/// Quote a single argument for a POSIX shell
///
/// Plain names pass through untouched so logged commands stay readable.
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-' | '@' | ':' | '+' | '/'));
    if plain {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}
