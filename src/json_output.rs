//! JSON report output
//!
//! Reports are pretty-printed with four-space indentation.

use anyhow::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::model::AnalysisResult;

const INDENT: &[u8] = b"    ";

/// Serialize a report to pretty JSON
pub fn to_json(result: &AnalysisResult) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    result.serialize(&mut serializer)?;
    Ok(String::from_utf8(buf)?)
}

/// Parse a report previously written by [`to_json`]
pub fn from_json(json: &str) -> Result<AnalysisResult> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActivationPhase, ServiceEntry, Summary, SummaryStatistics};
    use chrono::{TimeZone, Utc};

    fn sample() -> AnalysisResult {
        AnalysisResult {
            hostname: "db01".to_string(),
            username: "ops".to_string(),
            analyzed_at: Utc.with_ymd_and_hms(2026, 10, 19, 8, 30, 0).unwrap(),
            boot_boundary_timestamp: 5_000_000,
            services: vec![ServiceEntry {
                name: "sshd.service".to_string(),
                inactive_exit_timestamp: 1_000_000,
                activation_start_timestamp: 2_000_000,
                activation_latency_seconds: 1.0,
                activation_phase: ActivationPhase::BootPhase,
            }],
            summary: Summary {
                total_services: 1,
                boot_phase_count: 1,
                post_boot_count: 0,
                overall: SummaryStatistics {
                    total: 1,
                    average_latency_seconds: Some(1.0),
                    max_latency_seconds: Some(1.0),
                    min_latency_seconds: Some(1.0),
                },
            },
        }
    }

    #[test]
    fn test_four_space_indent() {
        let json = to_json(&sample()).unwrap();
        assert!(json.starts_with("{\n    \"hostname\": \"db01\""));
        assert!(json.contains("\n        {\n            \"name\": \"sshd.service\""));
    }

    #[test]
    fn test_field_names() {
        let json = to_json(&sample()).unwrap();
        for field in [
            "\"username\"",
            "\"analyzed_at\": \"2026-10-19T08:30:00Z\"",
            "\"boot_boundary_timestamp\": 5000000",
            "\"activation_start_timestamp\": 2000000",
            "\"activation_phase\": \"boot_phase\"",
            "\"boot_phase_count\": 1",
            "\"post_boot_count\": 0",
            "\"overall\"",
        ] {
            assert!(json.contains(field), "missing {} in {}", field, json);
        }
    }

    #[test]
    fn test_round_trip() {
        let original = sample();
        let parsed = from_json(&to_json(&original).unwrap()).unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let json = to_json(&sample()).unwrap();
        let with_extra = |pointer: &str| {
            let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
            value
                .pointer_mut(pointer)
                .and_then(|v| v.as_object_mut())
                .unwrap()
                .insert("unexpected".to_string(), serde_json::Value::Bool(true));
            value.to_string()
        };

        for pointer in ["", "/services/0", "/summary", "/summary/overall"] {
            let err = from_json(&with_extra(pointer)).unwrap_err();
            assert!(
                err.to_string().contains("unknown field `unexpected`"),
                "accepted extra field at '{}': {}",
                pointer,
                err
            );
        }
    }
}
