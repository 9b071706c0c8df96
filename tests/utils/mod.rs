// Integration test utilities
//
// Scripted remote executor returning canned output per command

#![allow(dead_code)]

use bootlag::remote::RemoteExecutor;
use bootlag::timing::show_command;
use bootlag::{AnalyzerError, Result};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

pub const SYSTEMD_ANALYZE: &str = "systemd-analyze";
pub const LIST_UNITS: &str =
    "systemctl list-units --type=service --all --no-pager --no-legend --plain";

#[derive(Debug, Clone)]
enum Reply {
    Stdout(String),
    Stderr(String),
    Disconnect,
}

/// Executor that answers from a table and records every command it ran
#[derive(Debug, Default)]
pub struct ScriptedExecutor {
    replies: HashMap<String, Reply>,
    log: RefCell<Vec<String>>,
    closes: Rc<Cell<usize>>,
    close_fails: bool,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stdout(mut self, command: &str, output: &str) -> Self {
        self.replies
            .insert(command.to_string(), Reply::Stdout(output.to_string()));
        self
    }

    pub fn stderr(mut self, command: &str, message: &str) -> Self {
        self.replies
            .insert(command.to_string(), Reply::Stderr(message.to_string()));
        self
    }

    pub fn disconnect(mut self, command: &str) -> Self {
        self.replies.insert(command.to_string(), Reply::Disconnect);
        self
    }

    /// Boot report line with the given userspace duration
    pub fn boot_report(self, userspace: &str) -> Self {
        let output = format!(
            "Startup finished in 1.500s (kernel) + {} (userspace) = 9.999s\n\
             multi-user.target reached after 4.2s in userspace.\n",
            userspace
        );
        self.stdout(SYSTEMD_ANALYZE, &output)
    }

    /// `systemctl list-units` listing of the given units
    pub fn units(self, names: &[&str]) -> Self {
        let output: String = names
            .iter()
            .map(|name| format!("{} loaded active running {}\n", name, name))
            .collect();
        self.stdout(LIST_UNITS, &output)
    }

    /// `systemctl show` reply for one unit
    pub fn timing(self, name: &str, inactive_exit: &str, exec_start: &str) -> Self {
        let output = format!(
            "InactiveExitTimestampMonotonic={}\nExecMainStartTimestampMonotonic={}\n",
            inactive_exit, exec_start
        );
        self.stdout(&show_command(name), &output)
    }

    /// Make `close` report a transport failure
    pub fn failing_close(mut self) -> Self {
        self.close_fails = true;
        self
    }

    /// Counter of `close` calls, readable after the executor is consumed
    pub fn close_count(&self) -> Rc<Cell<usize>> {
        Rc::clone(&self.closes)
    }

    pub fn commands(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl RemoteExecutor for ScriptedExecutor {
    fn execute(&self, command: &str) -> Result<String> {
        self.log.borrow_mut().push(command.to_string());
        match self.replies.get(command) {
            Some(Reply::Stdout(output)) => Ok(output.clone()),
            Some(Reply::Stderr(message)) => Err(AnalyzerError::RemoteCommand {
                command: command.to_string(),
                stderr: message.clone(),
            }),
            Some(Reply::Disconnect) => Err(AnalyzerError::Connection {
                host: "scripted".to_string(),
                reason: "session closed".to_string(),
            }),
            // Unscripted commands behave like a unit with no properties
            None => Ok(String::new()),
        }
    }

    fn close(self) -> Result<()> {
        self.closes.set(self.closes.get() + 1);
        if self.close_fails {
            return Err(AnalyzerError::Connection {
                host: "scripted".to_string(),
                reason: "disconnect failed".to_string(),
            });
        }
        Ok(())
    }
}
