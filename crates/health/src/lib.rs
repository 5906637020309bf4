//! Health aggregation for the workshop web server.
//!
//! Gathers four independent groups of facts (server identity, resource
//! checks, component checks, filesystem checks) through a [`SystemProbe`],
//! reduces them to `healthy` or `degraded`, and assembles the report served
//! by the `/health` endpoint.
//!
//! Thresholds live in [`rules`]; a sub-check whose rule does not contribute
//! (the log directory) is reported but never degrades the verdict.

pub mod aggregator;
pub mod checks;
pub mod error;
pub mod probe;
pub mod report;
pub mod rules;

pub use aggregator::{AggregatorSettings, HealthAggregator, RequestContext, log_summary};
pub use checks::{ComponentProbe, UnavailablePolicy};
pub use error::ProbeError;
pub use probe::{
    DiskStats, FixedProbe, Inventory, LoadAverage, MemoryStats, SysinfoProbe, SystemProbe,
};
pub use report::{HealthReport, OverallStatus};
pub use rules::{CheckRule, CheckStatus};
