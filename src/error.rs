use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::ConfigError;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, DiagramError>;

/// Every way a diagram run can fail. All of them abort the run.
#[derive(Debug, Error)]
pub enum DiagramError {
    /// Command-line input was incomplete.
    #[error("usage: {0}")]
    Usage(String),
    /// Config file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A window asked for a unit other than `ns` or `us`.
    #[error("unsupported unit '{0}' (expected 'ns' or 'us')")]
    UnsupportedUnit(String),
    /// The requested image format has no rendering backend.
    #[error(
        "unsupported image format '{0}' (svg; png, jpg, jpeg and bmp need the system-fonts feature)"
    )]
    UnsupportedFormat(String),
    /// The benchmark directory could not be listed.
    #[error("failed to list {path}: {source}")]
    ReadDir {
        /// Directory that was being listed.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// An estimates file was missing or unreadable.
    #[error("failed to read {path}: {source}")]
    ReadEstimates {
        /// Path of the estimates file.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// An estimates file was not valid JSON.
    #[error("failed to parse {path}: {source}")]
    ParseEstimates {
        /// Path of the estimates file.
        path: PathBuf,
        /// Underlying decode failure.
        source: serde_json::Error,
    },
    /// No subdirectory matched the naming pattern.
    #[error("no reports for benchmark '{bench}' under {path}")]
    NoReports {
        /// Benchmark name used for matching.
        bench: String,
        /// Directory that was scanned.
        path: PathBuf,
    },
    /// A run has no value for the selected estimate.
    #[error("run '{run}' has no '{estimate}' estimate")]
    MissingEstimate {
        /// Raw directory name of the run.
        run: String,
        /// Estimate kind that was requested.
        estimate: String,
    },
    /// A series has a different number of runs than the reference series.
    #[error("group '{group}' has {found} runs but the table has {expected} rows")]
    ColumnLength {
        /// Offending group.
        group: String,
        /// Row count taken from the reference group.
        expected: usize,
        /// Run count of the offending group.
        found: usize,
    },
    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateOutputDir {
        /// Directory that was being created.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },
    /// The plotting backend failed to draw or save a chart.
    #[error("failed to render {path}: {message}")]
    Render {
        /// Target image path.
        path: PathBuf,
        /// Backend error, stringified since it is generic over the backend.
        message: String,
    },
    /// The table could not be encoded as JSON.
    #[error("failed to encode table: {0}")]
    Encode(#[source] serde_json::Error),
    /// Writing to stdout failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl DiagramError {
    pub(crate) fn render(path: impl AsRef<Path>, err: impl std::fmt::Display) -> Self {
        DiagramError::Render {
            path: path.as_ref().to_path_buf(),
            message: err.to_string(),
        }
    }
}
