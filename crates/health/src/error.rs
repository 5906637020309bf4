//! Probe error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors a [`SystemProbe`](crate::probe::SystemProbe) can report.
///
/// These never reach the HTTP client: the aggregator folds each one into the
/// affected sub-check as a sentinel value.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// An OS query failed.
    #[error("I/O error while probing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The filesystem reported zero total capacity.
    #[error("Filesystem at {0} reports no capacity")]
    EmptyFilesystem(PathBuf),

    /// The current process could not be found in the process table.
    #[error("Current process not found in process table")]
    ProcessNotFound,

    /// The platform does not support the requested measurement.
    #[error("Unsupported on this platform: {0}")]
    Unsupported(String),
}

/// Convenience type alias for probe results.
pub type Result<T> = std::result::Result<T, ProbeError>;
