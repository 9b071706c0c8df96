//! Activation phase classification

use crate::model::{ActivationPhase, ServiceEntry};
use crate::timing::ServiceTiming;

/// Classify an inactive-exit timestamp against the boot boundary
///
/// A service that left the inactive state exactly at the boundary counts
/// as part of boot.
pub fn classify(inactive_exit_us: u64, boundary_us: u64) -> ActivationPhase {
    if inactive_exit_us <= boundary_us {
        ActivationPhase::BootPhase
    } else {
        ActivationPhase::PostBoot
    }
}

/// Attach a phase to a validated timing
pub fn classify_timing(timing: ServiceTiming, boundary_us: u64) -> ServiceEntry {
    let activation_latency_seconds = timing.latency_seconds();
    ServiceEntry {
        activation_phase: classify(timing.inactive_exit_us, boundary_us),
        name: timing.name,
        inactive_exit_timestamp: timing.inactive_exit_us,
        activation_start_timestamp: timing.exec_start_us,
        activation_latency_seconds,
    }
}
