//! Per-service activation timing via `systemctl show`
//!
//! Two monotonic properties are read for each unit:
//! - `InactiveExitTimestampMonotonic`: the unit left the inactive state
//! - `ExecMainStartTimestampMonotonic`: the main process was started
//!
//! A unit that never started reports zero for both. A unit whose start
//! precedes its inactive exit is treated the same way and skipped.

use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::error::{AnalyzerError, Result};
use crate::remote::{shell_quote, RemoteExecutor};

pub const INACTIVE_EXIT_PROPERTY: &str = "InactiveExitTimestampMonotonic";
pub const EXEC_START_PROPERTY: &str = "ExecMainStartTimestampMonotonic";

const MICROS_PER_SECOND: f64 = 1_000_000.0;

/// Why a service produced no timing entry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimingParseSkip {
    #[error("{property} is not an integer: '{value}'")]
    NotAnInteger { property: &'static str, value: String },

    #[error("service never left the inactive state or never started")]
    NeverActivated,

    #[error("start {start} precedes inactive exit {exit}")]
    StartBeforeExit { exit: u64, start: u64 },
}

/// Validated timestamps of one service, before phase classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTiming {
    pub name: String,
    pub inactive_exit_us: u64,
    pub exec_start_us: u64,
}

impl ServiceTiming {
    /// Validate a pair of timestamps
    ///
    /// Both must be positive and the start must not precede the exit.
    pub fn new(
        name: impl Into<String>,
        inactive_exit_us: u64,
        exec_start_us: u64,
    ) -> std::result::Result<Self, TimingParseSkip> {
        if inactive_exit_us == 0 || exec_start_us == 0 {
            return Err(TimingParseSkip::NeverActivated);
        }
        if exec_start_us < inactive_exit_us {
            return Err(TimingParseSkip::StartBeforeExit {
                exit: inactive_exit_us,
                start: exec_start_us,
            });
        }
        Ok(Self {
            name: name.into(),
            inactive_exit_us,
            exec_start_us,
        })
    }

    pub fn latency_seconds(&self) -> f64 {
        (self.exec_start_us - self.inactive_exit_us) as f64 / MICROS_PER_SECOND
    }
}

/// Build the `systemctl show` command for one unit
pub fn show_command(service: &str) -> String {
    format!(
        "systemctl show {} -p {} -p {}",
        shell_quote(service),
        INACTIVE_EXIT_PROPERTY,
        EXEC_START_PROPERTY
    )
}

/// Parse `key=value` lines; lines without `=` are ignored
pub fn parse_properties(output: &str) -> HashMap<&str, &str> {
    output
        .lines()
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}

fn property_us(
    properties: &HashMap<&str, &str>,
    property: &'static str,
) -> std::result::Result<u64, TimingParseSkip> {
    let value = properties.get(property).copied().unwrap_or("0");
    value.parse().map_err(|_| TimingParseSkip::NotAnInteger {
        property,
        value: value.to_string(),
    })
}

/// Turn `systemctl show` output into a validated timing
pub fn timing_from_output(
    service: &str,
    output: &str,
) -> std::result::Result<ServiceTiming, TimingParseSkip> {
    let properties = parse_properties(output);
    let inactive_exit = property_us(&properties, INACTIVE_EXIT_PROPERTY)?;
    let exec_start = property_us(&properties, EXEC_START_PROPERTY)?;
    ServiceTiming::new(service, inactive_exit, exec_start)
}

/// Fetch the activation timing of one service
///
/// Returns `Ok(None)` when the service is skipped: its timestamps are
/// missing or invalid, or its `systemctl show` call failed remotely.
/// Transport failures are returned as errors.
pub fn fetch_service_timing<E: RemoteExecutor + ?Sized>(
    executor: &E,
    service: &str,
) -> Result<Option<ServiceTiming>> {
    let output = match executor.execute(&show_command(service)) {
        Ok(output) => output,
        Err(AnalyzerError::RemoteCommand { stderr, .. }) => {
            warn!(service, %stderr, "skipping service: systemctl show failed");
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    match timing_from_output(service, &output) {
        Ok(timing) => Ok(Some(timing)),
        Err(skip) => {
            debug!(service, reason = %skip, "skipping service");
            Ok(None)
        }
    }
}
