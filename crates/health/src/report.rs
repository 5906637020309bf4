//! The health report document and its overall verdict.

use serde::Serialize;

use crate::checks::{ApplicationChecks, FilesystemChecks, SystemChecks};
use crate::rules::{CheckRule, CheckStatus};

/// Overall verdict of a health report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Healthy,
    Degraded,
}

impl OverallStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OverallStatus::Healthy => "healthy",
            OverallStatus::Degraded => "degraded",
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, OverallStatus::Healthy)
    }
}

impl std::fmt::Display for OverallStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accumulates sub-check outcomes into the overall verdict.
///
/// The status only flips to degraded together with an issue being recorded,
/// so `Degraded` always comes with a non-empty issue list.
#[derive(Debug, Default)]
pub struct Verdict {
    issues: Vec<String>,
}

impl Verdict {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of the sub-check governed by `rule`.
    pub fn record(&mut self, rule: &CheckRule, status: CheckStatus) {
        if !rule.contributes {
            return;
        }
        match status {
            CheckStatus::Ok => {}
            CheckStatus::Degraded(_) => self.issues.push(rule.issue.to_string()),
            CheckStatus::Unknown => self.issues.push(rule.unavailable_issue.to_string()),
        }
    }

    pub fn status(&self) -> OverallStatus {
        if self.issues.is_empty() {
            OverallStatus::Healthy
        } else {
            OverallStatus::Degraded
        }
    }

    pub fn into_parts(self) -> (OverallStatus, Vec<String>) {
        (self.status(), self.issues)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Uptime {
    pub server: String,
    pub started: String,
}

/// Request and environment metadata. Missing values read `"Unknown"`.
#[derive(Debug, Clone, Serialize)]
pub struct ServerInfo {
    pub timestamp: String,
    pub server: String,
    pub runtime_version: String,
    pub server_software: String,
    pub document_root: String,
    pub request_uri: String,
    pub remote_addr: String,
    pub user_agent: String,
}

pub const WORKSHOP_NAME: &str = "IT Infrastructure Workshop";
pub const WORKSHOP_DATE: &str = "2024-10-03";
pub const NOT_SET: &str = "Not Set";

#[derive(Debug, Clone, Serialize)]
pub struct WorkshopInfo {
    pub name: &'static str,
    pub date: &'static str,
    pub student: String,
    pub environment: String,
}

impl WorkshopInfo {
    pub fn new(student: Option<&str>, environment: Option<&str>) -> Self {
        Self {
            name: WORKSHOP_NAME,
            date: WORKSHOP_DATE,
            student: student.unwrap_or(NOT_SET).to_string(),
            environment: environment.unwrap_or(NOT_SET).to_string(),
        }
    }
}

/// The full health document. Field order is the serialized key order.
#[derive(Debug, Clone, Serialize)]
pub struct HealthReport {
    pub status: OverallStatus,
    pub timestamp: String,
    pub uptime: Uptime,
    pub server_info: ServerInfo,
    pub system_checks: SystemChecks,
    pub application_checks: ApplicationChecks,
    pub filesystem_checks: FilesystemChecks,
    pub issues: Vec<String>,
    pub workshop_info: WorkshopInfo,
}

impl HealthReport {
    /// Pretty-printed JSON body.
    pub fn to_pretty_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn log_entry(&self) -> LogEntry<'_> {
        LogEntry {
            timestamp: &self.timestamp,
            status: self.status,
            server: &self.server_info.server,
            issues: &self.issues,
        }
    }
}

/// Summary written to the log after each check.
#[derive(Debug, Serialize)]
pub struct LogEntry<'a> {
    pub timestamp: &'a str,
    pub status: OverallStatus,
    pub server: &'a str,
    pub issues: &'a [String],
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules;

    #[test]
    fn verdict_starts_healthy() {
        let (status, issues) = Verdict::new().into_parts();
        assert_eq!(status, OverallStatus::Healthy);
        assert!(issues.is_empty());
    }

    #[test]
    fn verdict_collects_issues_in_order() {
        let mut verdict = Verdict::new();
        verdict.record(&rules::MEMORY, CheckStatus::Degraded("high"));
        verdict.record(&rules::LOAD_AVERAGE, CheckStatus::Degraded("high"));
        let (status, issues) = verdict.into_parts();
        assert_eq!(status, OverallStatus::Degraded);
        assert_eq!(issues, vec!["High memory usage", "High system load"]);
    }

    #[test]
    fn verdict_ignores_non_contributing_rule() {
        let mut verdict = Verdict::new();
        verdict.record(&rules::LOG_DIRECTORY, CheckStatus::Degraded("readonly"));
        assert_eq!(verdict.status(), OverallStatus::Healthy);
    }

    #[test]
    fn verdict_unknown_uses_unavailable_issue() {
        let mut verdict = Verdict::new();
        verdict.record(&rules::DISK_SPACE, CheckStatus::Unknown);
        let (_, issues) = verdict.into_parts();
        assert_eq!(issues, vec!["Disk space unavailable"]);
    }

    #[test]
    fn workshop_info_defaults() {
        let info = WorkshopInfo::new(None, Some("staging"));
        assert_eq!(info.student, "Not Set");
        assert_eq!(info.environment, "staging");
        assert_eq!(info.name, WORKSHOP_NAME);
    }

    #[test]
    fn overall_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OverallStatus::Degraded).unwrap(),
            "\"degraded\""
        );
    }
}
