//! End-to-end aggregation scenarios against a fixed probe.

use chrono::{TimeZone, Utc};
use health::{
    AggregatorSettings, DiskStats, FixedProbe, HealthAggregator, LoadAverage, MemoryStats,
    OverallStatus, RequestContext, UnavailablePolicy,
};

fn context() -> RequestContext {
    RequestContext::new(Utc.with_ymd_and_hms(2024, 10, 3, 14, 0, 0).unwrap())
}

fn run(probe: &FixedProbe) -> health::HealthReport {
    HealthAggregator::new(probe.clone(), AggregatorSettings::default()).run(&context())
}

fn assert_verdict_invariant(report: &health::HealthReport) {
    assert_eq!(
        report.status == OverallStatus::Degraded,
        !report.issues.is_empty()
    );
}

#[test]
fn test_healthy_host() {
    let probe = FixedProbe::new();
    probe.set_disk(Some(DiskStats {
        free_bytes: 2_000_000_000,
        total_bytes: 10_000_000_000,
    }));
    probe.set_memory(Some(MemoryStats {
        used_bytes: 10_000_000,
        peak_bytes: 10_000_000,
    }));
    probe.set_load(LoadAverage::new(0.5, 0.3, 0.1));

    let report = run(&probe);

    assert_eq!(report.status, OverallStatus::Healthy);
    assert!(report.issues.is_empty());
    assert_eq!(report.system_checks.disk_space.free_percent, Some(20.0));
    assert_verdict_invariant(&report);
}

#[test]
fn test_low_disk_space() {
    let probe = FixedProbe::new();
    probe.set_disk(Some(DiskStats {
        free_bytes: 500_000_000,
        total_bytes: 10_000_000_000,
    }));

    let report = run(&probe);

    assert_eq!(report.status, OverallStatus::Degraded);
    assert_eq!(report.issues, vec!["Low disk space"]);
    assert_eq!(report.system_checks.disk_space.status.as_str(), "low");
    assert_verdict_invariant(&report);
}

#[test]
fn test_high_memory_and_load_in_order() {
    let probe = FixedProbe::new();
    probe.set_memory(Some(MemoryStats {
        used_bytes: 150_000_000,
        peak_bytes: 160_000_000,
    }));
    probe.set_load(LoadAverage::new(3.0, 2.5, 2.0));

    let report = run(&probe);

    assert_eq!(report.status, OverallStatus::Degraded);
    assert_eq!(report.issues, vec!["High memory usage", "High system load"]);
    assert_verdict_invariant(&report);
}

#[test]
fn test_workshop_headers_echoed() {
    let aggregator = HealthAggregator::new(FixedProbe::new(), AggregatorSettings::default());
    let mut ctx = context();
    ctx.student_name = Some("Alice".to_string());
    ctx.environment = Some("staging".to_string());

    let report = aggregator.run(&ctx);

    assert_eq!(report.workshop_info.student, "Alice");
    assert_eq!(report.workshop_info.environment, "staging");
}

#[test]
fn test_everything_unavailable_still_serializes() {
    let probe = FixedProbe::unavailable();
    let report = run(&probe);

    let json: serde_json::Value =
        serde_json::from_str(&report.to_pretty_json().unwrap()).unwrap();
    assert_eq!(json["server_info"]["server"], "Unknown");
    assert_eq!(json["server_info"]["user_agent"], "Unknown");
    assert_eq!(json["application_checks"]["web_server"]["version"], "Unknown");
    assert_eq!(json["system_checks"]["load_average"]["1min"], "unknown");
    assert_eq!(json["system_checks"]["load_average"]["status"], "ok");
    assert_eq!(json["system_checks"]["disk_space"]["status"], "unknown");
    assert!(json["system_checks"]["disk_space"]["free_bytes"].is_null());
    assert_eq!(json["workshop_info"]["student"], "Not Set");

    assert_eq!(report.status, OverallStatus::Degraded);
    assert_eq!(
        report.issues,
        vec!["Disk space unavailable", "Memory usage unavailable"]
    );
    assert_verdict_invariant(&report);
}

#[test]
fn test_unavailable_treated_as_ok_when_configured() {
    let settings = AggregatorSettings {
        unavailable_policy: UnavailablePolicy::Ok,
        ..Default::default()
    };
    let report = HealthAggregator::new(FixedProbe::unavailable(), settings).run(&context());

    assert_eq!(report.status, OverallStatus::Healthy);
    assert!(report.issues.is_empty());
    assert!(report.system_checks.memory.used_bytes.is_none());
}

#[test]
fn test_readonly_log_directory_keeps_host_healthy() {
    let probe = FixedProbe::new();
    probe.set_readonly("/var/log", true);

    let report = run(&probe);

    assert_eq!(report.filesystem_checks.log_directory.status.as_str(), "readonly");
    assert!(!report.filesystem_checks.log_directory.writable);
    assert_eq!(report.status, OverallStatus::Healthy);
    assert!(report.issues.is_empty());
}

#[test]
fn test_every_contributing_failure_reported_once() {
    let probe = FixedProbe::new();
    probe.set_disk(Some(DiskStats {
        free_bytes: 1_000_000_000,
        total_bytes: 10_000_000_000,
    }));
    probe.set_memory(Some(MemoryStats {
        used_bytes: 100_000_000,
        peak_bytes: 100_000_000,
    }));
    probe.set_load(LoadAverage::new(2.0, 2.0, 2.0));
    probe.set_readonly("/var/www/html", true);
    probe.set_readonly("/var/log", true);

    let report = run(&probe);

    assert_eq!(
        report.issues,
        vec![
            "Low disk space",
            "High memory usage",
            "High system load",
            "Web root not writable",
        ]
    );
    assert_verdict_invariant(&report);
}

#[test]
fn test_document_key_order() {
    let report = run(&FixedProbe::new());
    let body = report.to_pretty_json().unwrap();

    let keys = [
        "\"status\"",
        "\"timestamp\"",
        "\"uptime\"",
        "\"server_info\"",
        "\"system_checks\"",
        "\"application_checks\"",
        "\"filesystem_checks\"",
        "\"issues\"",
        "\"workshop_info\"",
    ];
    let positions: Vec<usize> = keys.iter().map(|k| body.find(k).unwrap()).collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
    assert!(body.contains("\"path\": \"/var/www/html\""));
    assert!(!body.contains("\\/"));
}
