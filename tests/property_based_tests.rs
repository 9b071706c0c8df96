//! Property-based tests for timing validation, classification and aggregation

use bootlag::boot::parse_timespan_us;
use bootlag::classify::{classify, classify_timing};
use bootlag::model::ActivationPhase;
use bootlag::stats::summarize;
use bootlag::timing::{timing_from_output, ServiceTiming};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_only_valid_timestamps_produce_entries(exit in 0u64..10_000_000, start in 0u64..10_000_000) {
        let output = format!(
            "InactiveExitTimestampMonotonic={}\nExecMainStartTimestampMonotonic={}\n",
            exit, start
        );
        let valid = exit > 0 && start > 0 && start >= exit;

        match timing_from_output("svc.service", &output) {
            Ok(timing) => {
                prop_assert!(valid);
                prop_assert!(timing.exec_start_us >= timing.inactive_exit_us);
                prop_assert!(timing.inactive_exit_us > 0);
            }
            Err(_) => prop_assert!(!valid),
        }
    }

    #[test]
    fn prop_latency_is_exact_difference(exit in 1u64..1_000_000_000_000, delta in 0u64..1_000_000_000) {
        let timing = ServiceTiming::new("svc.service", exit, exit + delta).unwrap();
        let entry = classify_timing(timing, 0);
        prop_assert_eq!(entry.activation_latency_seconds, delta as f64 / 1_000_000.0);
    }

    #[test]
    fn prop_classification_tie_break(boundary in 1u64..u64::MAX) {
        prop_assert_eq!(classify(boundary, boundary), ActivationPhase::BootPhase);
        prop_assert_eq!(classify(boundary - 1, boundary), ActivationPhase::BootPhase);
        prop_assert_eq!(classify(boundary, boundary - 1), ActivationPhase::PostBoot);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_summary_counts_and_bounds(
        pairs in prop::collection::vec((1u64..10_000_000, 0u64..5_000_000), 0..40),
        boundary in 0u64..10_000_000,
    ) {
        let entries: Vec<_> = pairs
            .iter()
            .enumerate()
            .map(|(i, (exit, delta))| {
                let timing = ServiceTiming::new(format!("s{}.service", i), *exit, exit + delta).unwrap();
                classify_timing(timing, boundary)
            })
            .collect();

        let summary = summarize(&entries);
        prop_assert_eq!(summary.boot_phase_count + summary.post_boot_count, summary.total_services);
        prop_assert_eq!(summary.total_services, entries.len());
        prop_assert_eq!(summary.overall.total, entries.len());

        if entries.is_empty() {
            prop_assert!(summary.overall.average_latency_seconds.is_none());
            prop_assert!(summary.overall.max_latency_seconds.is_none());
            prop_assert!(summary.overall.min_latency_seconds.is_none());
        } else {
            let avg = summary.overall.average_latency_seconds.unwrap();
            let max = summary.overall.max_latency_seconds.unwrap();
            let min = summary.overall.min_latency_seconds.unwrap();
            prop_assert!(min <= max);
            prop_assert!(min <= avg + 1e-9 && avg <= max + 1e-9);
        }
    }

    #[test]
    fn prop_whole_seconds_timespan(secs in 0u64..100_000, millis in 0u64..1000) {
        let span = format!("{}.{:03}s", secs, millis);
        prop_assert_eq!(parse_timespan_us(&span), Some(secs * 1_000_000 + millis * 1_000));
    }

    #[test]
    fn prop_timespan_never_panics(span in "\\PC{0,24}") {
        let _ = parse_timespan_us(&span);
    }
}
