//! Report assembly
//!
//! Resolves the boot boundary, walks the service inventory, times and
//! classifies each service, then aggregates. Any fatal error aborts the
//! run; no partial report is ever produced.

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::boot::resolve_boot_boundary;
use crate::classify::classify_timing;
use crate::error::Result;
use crate::inventory::list_services;
use crate::model::AnalysisResult;
use crate::remote::RemoteExecutor;
use crate::stats::summarize;
use crate::timing::fetch_service_timing;

/// Run the analysis over `executor`, then close it
///
/// The executor is closed whether or not the analysis succeeded. A failed
/// close is only logged, so a finished report is never discarded.
pub fn analyze_and_close<E: RemoteExecutor>(
    executor: E,
    hostname: &str,
    username: &str,
) -> Result<AnalysisResult> {
    let analysis = analyze_boot_activation(&executor, hostname, username);
    if let Err(e) = executor.close() {
        warn!(host = hostname, error = %e, "failed to close remote session");
    }
    analysis
}

/// Run the full activation analysis, stamped with the current time
pub fn analyze_boot_activation<E: RemoteExecutor + ?Sized>(
    executor: &E,
    hostname: &str,
    username: &str,
) -> Result<AnalysisResult> {
    analyze_boot_activation_at(executor, hostname, username, Utc::now())
}

/// Run the full activation analysis with an explicit report timestamp
pub fn analyze_boot_activation_at<E: RemoteExecutor + ?Sized>(
    executor: &E,
    hostname: &str,
    username: &str,
    analyzed_at: DateTime<Utc>,
) -> Result<AnalysisResult> {
    let boundary = resolve_boot_boundary(executor)?;

    let mut services = Vec::new();
    let mut discovered = 0usize;
    for name in list_services(executor)? {
        discovered += 1;
        if let Some(timing) = fetch_service_timing(executor, &name)? {
            services.push(classify_timing(timing, boundary));
        }
    }

    let summary = summarize(&services);
    info!(
        discovered,
        timed = summary.total_services,
        boot_phase = summary.boot_phase_count,
        post_boot = summary.post_boot_count,
        "analysis complete"
    );

    Ok(AnalysisResult {
        hostname: hostname.to_string(),
        username: username.to_string(),
        analyzed_at,
        boot_boundary_timestamp: boundary,
        services,
        summary,
    })
}
