//! Boot boundary resolution from `systemd-analyze`
//!
//! `systemd-analyze` prints a line like:
//!
//! ```text
//! Startup finished in 2.011s (kernel) + 1min 4.250s (userspace) = 1min 6.261s
//! ```
//!
//! The userspace duration is taken as the boot boundary on the monotonic
//! clock. Timespans use systemd's unit suffixes and are converted to
//! microseconds with integer arithmetic.

use regex::Regex;
use std::sync::OnceLock;
use tracing::{debug, info};

use crate::error::{AnalyzerError, Result};
use crate::remote::RemoteExecutor;

pub const BOOT_REPORT_COMMAND: &str = "systemd-analyze";

const NOT_FINISHED_MARKER: &str = "not yet finished";

/// Fraction digits beyond this are below microsecond resolution for any unit
const MAX_FRACTION_DIGITS: usize = 9;

fn userspace_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| {
        Regex::new(r"\+\s+((?:[\d.]+(?:h|min|ms|us|µs|s)\s+)+)\(userspace\)")
            .expect("userspace marker regex is valid")
    })
}

/// Run `systemd-analyze` and resolve the boot boundary in microseconds
pub fn resolve_boot_boundary<E: RemoteExecutor + ?Sized>(executor: &E) -> Result<u64> {
    let output = match executor.execute(BOOT_REPORT_COMMAND) {
        Ok(output) => output,
        Err(AnalyzerError::RemoteCommand { stderr, .. })
            if stderr.contains(NOT_FINISHED_MARKER) =>
        {
            return Err(AnalyzerError::BoundaryUnavailable {
                reason: format!("boot has not finished on the remote host ({})", stderr),
            });
        }
        Err(e) => return Err(e),
    };

    let boundary = parse_userspace_boundary(&output)?;
    info!(boundary_us = boundary, "resolved boot boundary");
    Ok(boundary)
}

/// Extract the userspace duration from `systemd-analyze` output
pub fn parse_userspace_boundary(output: &str) -> Result<u64> {
    let captures = userspace_marker().captures(output).ok_or_else(|| {
        AnalyzerError::BoundaryUnavailable {
            reason: "no '(userspace)' duration in systemd-analyze output".to_string(),
        }
    })?;

    let timespan = captures[1].trim();
    debug!(timespan, "matched userspace timespan");

    parse_timespan_us(timespan).ok_or_else(|| AnalyzerError::BoundaryUnavailable {
        reason: format!("invalid userspace timespan '{}'", timespan),
    })
}

/// Parse a systemd timespan such as `1min 2.500s` or `850ms` into microseconds
pub fn parse_timespan_us(span: &str) -> Option<u64> {
    let mut total: u64 = 0;
    let mut components = 0;

    for token in span.split_whitespace() {
        let split = token
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(token.len());
        let (number, unit) = token.split_at(split);
        let value = decimal_to_us(number, unit_us(unit)?)?;
        total = total.checked_add(value)?;
        components += 1;
    }

    (components > 0).then_some(total)
}

fn unit_us(unit: &str) -> Option<u64> {
    match unit {
        "h" => Some(3_600_000_000),
        "min" => Some(60_000_000),
        "s" => Some(1_000_000),
        "ms" => Some(1_000),
        "us" | "µs" => Some(1),
        _ => None,
    }
}

/// Convert a non-negative decimal literal scaled by `unit` microseconds
fn decimal_to_us(number: &str, unit: u64) -> Option<u64> {
    let (whole, fraction) = match number.split_once('.') {
        Some((whole, fraction)) => (whole, fraction),
        None => (number, ""),
    };
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }

    let whole: u64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };
    let mut value = whole.checked_mul(unit)?;

    let fraction = &fraction[..fraction.len().min(MAX_FRACTION_DIGITS)];
    if !fraction.is_empty() {
        let digits: u64 = fraction.parse().ok()?;
        let scale = 10u64.pow(fraction.len() as u32);
        value = value.checked_add(digits.checked_mul(unit)? / scale)?;
    }

    Some(value)
}
