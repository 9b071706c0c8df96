//! Service unit inventory via `systemctl list-units`

use tracing::debug;

use crate::error::Result;
use crate::remote::RemoteExecutor;

/// Every service unit in every state, without legend or decoration
pub const LIST_SERVICES_COMMAND: &str =
    "systemctl list-units --type=service --all --no-pager --no-legend --plain";

/// Lazily parsed service names, in the order the host reported them
///
/// Consumes the command output as it iterates and cannot be restarted.
#[derive(Debug)]
pub struct ServiceNames {
    output: String,
    cursor: usize,
}

impl ServiceNames {
    pub fn from_output(output: String) -> Self {
        Self { output, cursor: 0 }
    }
}

impl Iterator for ServiceNames {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        while self.cursor < self.output.len() {
            let rest = &self.output[self.cursor..];
            let (line, advance) = match rest.find('\n') {
                Some(end) => (&rest[..end], end + 1),
                None => (rest, rest.len()),
            };
            self.cursor += advance;

            if let Some(name) = line.split_whitespace().next() {
                return Some(name.to_string());
            }
        }
        None
    }
}

/// List all service units on the remote host
pub fn list_services<E: RemoteExecutor + ?Sized>(executor: &E) -> Result<ServiceNames> {
    let output = executor.execute(LIST_SERVICES_COMMAND)?;
    debug!(bytes = output.len(), "fetched service inventory");
    Ok(ServiceNames::from_output(output))
}
