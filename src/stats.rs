//! Latency statistics over classified services

use crate::model::{ActivationPhase, ServiceEntry, Summary, SummaryStatistics};

/// Count, mean, max and min of activation latencies
///
/// With no entries every latency statistic is `None` rather than zero,
/// so an empty report never claims a measured latency.
pub fn latency_statistics(entries: &[ServiceEntry]) -> SummaryStatistics {
    if entries.is_empty() {
        return SummaryStatistics {
            total: 0,
            average_latency_seconds: None,
            max_latency_seconds: None,
            min_latency_seconds: None,
        };
    }

    let latencies = entries.iter().map(|e| e.activation_latency_seconds);
    let sum: f64 = latencies.clone().sum();
    let max = latencies.clone().fold(f64::NEG_INFINITY, f64::max);
    let min = latencies.fold(f64::INFINITY, f64::min);

    SummaryStatistics {
        total: entries.len(),
        average_latency_seconds: Some(sum / entries.len() as f64),
        max_latency_seconds: Some(max),
        min_latency_seconds: Some(min),
    }
}

/// Phase counts plus overall statistics
pub fn summarize(entries: &[ServiceEntry]) -> Summary {
    let boot_phase_count = entries
        .iter()
        .filter(|e| e.activation_phase == ActivationPhase::BootPhase)
        .count();

    Summary {
        total_services: entries.len(),
        boot_phase_count,
        post_boot_count: entries.len() - boot_phase_count,
        overall: latency_statistics(entries),
    }
}
