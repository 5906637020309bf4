//! Threshold table for the sub-checks.
//!
//! Each rule names the check, the pass condition, the status label used when
//! the condition fails, the issue text, and whether a failure degrades the
//! overall verdict.

use serde::{Serialize, Serializer};

/// Pass condition for a measured value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    /// Passes when the value is strictly greater than the bound.
    Above(f64),
    /// Passes when the value is strictly less than the bound.
    Below(f64),
    /// Passes when the flag is set.
    Flag,
}

/// One row of the rule table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CheckRule {
    pub check: &'static str,
    pub threshold: Threshold,
    pub degraded_label: &'static str,
    pub issue: &'static str,
    /// Issue reported when the measurement itself is unavailable.
    pub unavailable_issue: &'static str,
    pub contributes: bool,
}

impl CheckRule {
    /// Evaluates a numeric measurement.
    pub fn passes(&self, value: f64) -> bool {
        match self.threshold {
            Threshold::Above(bound) => value > bound,
            Threshold::Below(bound) => value < bound,
            Threshold::Flag => value != 0.0,
        }
    }

    /// Evaluates a boolean measurement.
    pub fn passes_flag(&self, flag: bool) -> bool {
        self.passes(if flag { 1.0 } else { 0.0 })
    }

    /// Status for a measurement that was taken.
    pub fn status(&self, passed: bool) -> CheckStatus {
        if passed {
            CheckStatus::Ok
        } else {
            CheckStatus::Degraded(self.degraded_label)
        }
    }
}

pub const DISK_SPACE: CheckRule = CheckRule {
    check: "disk_space",
    threshold: Threshold::Above(1_000_000_000.0),
    degraded_label: "low",
    issue: "Low disk space",
    unavailable_issue: "Disk space unavailable",
    contributes: true,
};

pub const MEMORY: CheckRule = CheckRule {
    check: "memory",
    threshold: Threshold::Below(100_000_000.0),
    degraded_label: "high",
    issue: "High memory usage",
    unavailable_issue: "Memory usage unavailable",
    contributes: true,
};

pub const LOAD_AVERAGE: CheckRule = CheckRule {
    check: "load_average",
    threshold: Threshold::Below(2.0),
    degraded_label: "high",
    issue: "High system load",
    unavailable_issue: "System load unavailable",
    contributes: true,
};

pub const WEB_ROOT: CheckRule = CheckRule {
    check: "web_root",
    threshold: Threshold::Flag,
    degraded_label: "readonly",
    issue: "Web root not writable",
    unavailable_issue: "Web root not writable",
    contributes: true,
};

/// Reported, but does not affect the overall verdict.
pub const LOG_DIRECTORY: CheckRule = CheckRule {
    check: "log_directory",
    threshold: Threshold::Flag,
    degraded_label: "readonly",
    issue: "Log directory not writable",
    unavailable_issue: "Log directory not writable",
    contributes: false,
};

/// All rules, in the order their issues are reported.
pub const RULES: [CheckRule; 5] = [DISK_SPACE, MEMORY, LOAD_AVERAGE, WEB_ROOT, LOG_DIRECTORY];

/// Status of a single sub-check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    /// Failed its threshold; carries the rule's label (`low`, `high`, `readonly`).
    Degraded(&'static str),
    /// The measurement could not be taken.
    Unknown,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Ok => "ok",
            CheckStatus::Degraded(label) => *label,
            CheckStatus::Unknown => "unknown",
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Ok)
    }
}

impl std::fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for CheckStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
