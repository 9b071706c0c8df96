//! Report data model
//!
//! Every value here is produced during one analysis run and discarded once
//! serialized. Nothing is persisted between runs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// When a service left its inactive state, relative to the boot boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationPhase {
    /// Left inactive state at or before userspace boot completed
    BootPhase,
    /// Left inactive state after userspace boot completed
    PostBoot,
}

impl ActivationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivationPhase::BootPhase => "boot_phase",
            ActivationPhase::PostBoot => "post_boot",
        }
    }
}

/// Activation timing of one successfully started service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceEntry {
    /// Unit name (e.g., "sshd.service")
    pub name: String,
    /// `InactiveExitTimestampMonotonic` in microseconds
    pub inactive_exit_timestamp: u64,
    /// `ExecMainStartTimestampMonotonic` in microseconds
    pub activation_start_timestamp: u64,
    /// (start - exit) / 1_000_000
    pub activation_latency_seconds: f64,
    pub activation_phase: ActivationPhase,
}

/// Latency statistics over all timed services
///
/// The three latency fields are `None` when `total` is zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SummaryStatistics {
    pub total: usize,
    pub average_latency_seconds: Option<f64>,
    pub max_latency_seconds: Option<f64>,
    pub min_latency_seconds: Option<f64>,
}

/// Phase counts plus overall latency statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Summary {
    pub total_services: usize,
    pub boot_phase_count: usize,
    pub post_boot_count: usize,
    pub overall: SummaryStatistics,
}

/// Root report structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisResult {
    pub hostname: String,
    pub username: String,
    /// UTC time the report was generated
    pub analyzed_at: DateTime<Utc>,
    /// End of userspace boot in microseconds
    pub boot_boundary_timestamp: u64,
    /// Timed services in host-reported order
    pub services: Vec<ServiceEntry>,
    pub summary: Summary,
}
