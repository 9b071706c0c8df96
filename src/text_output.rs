//! Human-readable report output

use crate::model::{AnalysisResult, SummaryStatistics};

fn seconds(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.6}s", v),
        None => "n/a".to_string(),
    }
}

fn format_statistics(stats: &SummaryStatistics) -> String {
    format!(
        "  average latency: {}\n  max latency:     {}\n  min latency:     {}\n",
        seconds(stats.average_latency_seconds),
        seconds(stats.max_latency_seconds),
        seconds(stats.min_latency_seconds)
    )
}

/// Render a report as an aligned table followed by the summary
pub fn render_text(result: &AnalysisResult) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Boot activation analysis for {}@{} at {}\n",
        result.username,
        result.hostname,
        result.analyzed_at.to_rfc3339()
    ));
    output.push_str(&format!(
        "Boot boundary: {} us ({:.6}s)\n\n",
        result.boot_boundary_timestamp,
        result.boot_boundary_timestamp as f64 / 1_000_000.0
    ));

    let width = result
        .services
        .iter()
        .map(|s| s.name.len())
        .max()
        .unwrap_or(0)
        .max("SERVICE".len());

    output.push_str(&format!(
        "{:<width$}  {:>14}  {:>14}  {:>12}  PHASE\n",
        "SERVICE",
        "INACTIVE_EXIT",
        "EXEC_START",
        "LATENCY",
        width = width
    ));
    for service in &result.services {
        output.push_str(&format!(
            "{:<width$}  {:>14}  {:>14}  {:>12}  {}\n",
            service.name,
            service.inactive_exit_timestamp,
            service.activation_start_timestamp,
            format!("{:.6}s", service.activation_latency_seconds),
            service.activation_phase.as_str(),
            width = width
        ));
    }

    let summary = &result.summary;
    output.push_str("\nSummary:\n");
    output.push_str(&format!("  total services:  {}\n", summary.total_services));
    output.push_str(&format!("  boot phase:      {}\n", summary.boot_phase_count));
    output.push_str(&format!("  post boot:       {}\n", summary.post_boot_count));
    output.push_str(&format_statistics(&summary.overall));

    output
}
