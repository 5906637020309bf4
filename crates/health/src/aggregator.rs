//! Builds a [`HealthReport`] from a probe and a request context.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::checks::{
    ApplicationChecks, ComponentProbe, DiskCheck, FilesystemCheck, FilesystemChecks, LoadCheck,
    MemoryCheck, RuntimeCheck, SystemChecks, UNKNOWN, UnavailablePolicy, WebServerCheck,
};
use crate::probe::SystemProbe;
use crate::report::{HealthReport, ServerInfo, Uptime, Verdict, WorkshopInfo};
use crate::rules;

pub const DEFAULT_WEB_ROOT: &str = "/var/www/html";
pub const DEFAULT_LOG_DIR: &str = "/var/log";
pub const DEFAULT_DISK_PATH: &str = "/";
pub const DEFAULT_MEMORY_LIMIT: &str = "unlimited";

/// Deployment-level settings for the aggregator.
#[derive(Debug, Clone)]
pub struct AggregatorSettings {
    /// Document root of the web server, if one is configured.
    pub document_root: Option<String>,
    pub log_dir: PathBuf,
    pub disk_path: PathBuf,
    /// Reported verbatim as the memory ceiling.
    pub memory_limit: String,
    pub unavailable_policy: UnavailablePolicy,
    pub database: ComponentProbe,
}

impl Default for AggregatorSettings {
    fn default() -> Self {
        Self {
            document_root: None,
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            disk_path: PathBuf::from(DEFAULT_DISK_PATH),
            memory_limit: DEFAULT_MEMORY_LIMIT.to_string(),
            unavailable_policy: UnavailablePolicy::default(),
            database: ComponentProbe::default(),
        }
    }
}

/// Facts about the inbound request. All optional.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub received_at: DateTime<Utc>,
    pub request_uri: Option<String>,
    pub remote_addr: Option<String>,
    pub user_agent: Option<String>,
    pub student_name: Option<String>,
    pub environment: Option<String>,
}

impl RequestContext {
    /// Creates a context with only the receive time known.
    pub fn new(received_at: DateTime<Utc>) -> Self {
        Self {
            received_at,
            request_uri: None,
            remote_addr: None,
            user_agent: None,
            student_name: None,
            environment: None,
        }
    }
}

/// Runs every sub-check and reduces them to a verdict.
///
/// Probe failures never escape: each one becomes a sentinel in the affected
/// sub-check.
#[derive(Debug)]
pub struct HealthAggregator<P> {
    probe: P,
    settings: AggregatorSettings,
}

impl<P: SystemProbe> HealthAggregator<P> {
    pub fn new(probe: P, settings: AggregatorSettings) -> Self {
        Self { probe, settings }
    }

    pub fn probe(&self) -> &P {
        &self.probe
    }

    pub fn settings(&self) -> &AggregatorSettings {
        &self.settings
    }

    /// Produces the health report for one request.
    #[tracing::instrument(skip_all)]
    pub fn run(&self, ctx: &RequestContext) -> HealthReport {
        let timestamp = ctx
            .received_at
            .to_rfc3339_opts(SecondsFormat::Secs, false);
        let hostname = self.probe.hostname().unwrap_or_else(|| UNKNOWN.to_string());

        let server_info = self.server_info(ctx, &timestamp, &hostname);
        let system_checks = self.system_checks();
        let application_checks = self.application_checks();
        let filesystem_checks = self.filesystem_checks();

        let mut verdict = Verdict::new();
        verdict.record(&rules::DISK_SPACE, system_checks.disk_space.status);
        verdict.record(&rules::MEMORY, system_checks.memory.status);
        verdict.record(&rules::LOAD_AVERAGE, system_checks.load_average.status);
        verdict.record(&rules::WEB_ROOT, filesystem_checks.web_root.status);
        verdict.record(&rules::LOG_DIRECTORY, filesystem_checks.log_directory.status);
        let (status, issues) = verdict.into_parts();

        HealthReport {
            status,
            timestamp: timestamp.clone(),
            uptime: Uptime {
                server: hostname,
                started: timestamp,
            },
            server_info,
            system_checks,
            application_checks,
            filesystem_checks,
            issues,
            workshop_info: WorkshopInfo::new(
                ctx.student_name.as_deref(),
                ctx.environment.as_deref(),
            ),
        }
    }

    fn server_info(&self, ctx: &RequestContext, timestamp: &str, hostname: &str) -> ServerInfo {
        let inventory = self.probe.inventory();
        let or_unknown = |value: Option<&str>| value.unwrap_or(UNKNOWN).to_string();
        ServerInfo {
            timestamp: timestamp.to_string(),
            server: hostname.to_string(),
            runtime_version: or_unknown(inventory.runtime_version.as_deref()),
            server_software: or_unknown(inventory.server_software.as_deref()),
            document_root: or_unknown(self.settings.document_root.as_deref()),
            request_uri: or_unknown(ctx.request_uri.as_deref()),
            remote_addr: or_unknown(ctx.remote_addr.as_deref()),
            user_agent: or_unknown(ctx.user_agent.as_deref()),
        }
    }

    fn system_checks(&self) -> SystemChecks {
        let policy = self.settings.unavailable_policy;
        SystemChecks {
            disk_space: DiskCheck::from_reading(
                self.probe.disk_stats(&self.settings.disk_path),
                policy,
            ),
            memory: MemoryCheck::from_reading(
                self.probe.memory_stats(),
                &self.settings.memory_limit,
                policy,
            ),
            load_average: LoadCheck::from_reading(self.probe.load_average()),
        }
    }

    fn application_checks(&self) -> ApplicationChecks {
        let inventory = self.probe.inventory();
        ApplicationChecks {
            web_server: WebServerCheck::from_inventory(&inventory),
            runtime: RuntimeCheck::from_inventory(&inventory),
            database: self.settings.database.check(),
        }
    }

    fn filesystem_checks(&self) -> FilesystemChecks {
        let web_root = self
            .settings
            .document_root
            .clone()
            .unwrap_or_else(|| DEFAULT_WEB_ROOT.to_string());
        let web_root_writable = self.probe.is_writable(Path::new(&web_root));
        let log_dir_writable = self.probe.is_writable(&self.settings.log_dir);

        FilesystemChecks {
            web_root: FilesystemCheck::new(web_root, web_root_writable, &rules::WEB_ROOT),
            log_directory: FilesystemCheck::new(
                self.settings.log_dir.display().to_string(),
                log_dir_writable,
                &rules::LOG_DIRECTORY,
            ),
        }
    }
}

/// Writes the one-line summary for a finished check.
pub fn log_summary(report: &HealthReport) {
    match serde_json::to_string(&report.log_entry()) {
        Ok(entry) => tracing::info!(target: "health_check", "Health Check: {entry}"),
        Err(err) => tracing::warn!(error = %err, "failed to encode health check summary"),
    }
}
