//! Resolved run configuration.
//!
//! Values come from three layers, highest priority first: command-line
//! flags, an optional TOML file, and the built-in defaults below.

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::cli::Args;
use crate::error::{DiagramError, Result};

/// Default location of criterion's output.
pub const DEFAULT_CRITERION_DIR: &str = "target/criterion";
/// Default destination for generated diagrams.
pub const DEFAULT_OUTDIR: &str = "target/criterion";
/// Default image format.
pub const DEFAULT_FORMAT: &str = "svg";
/// Default estimate kind read from `estimates.json`.
pub const DEFAULT_ESTIMATE: &str = "slope";

/// How the aggregated table is printed in show-only mode.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrintFormat {
    /// Aligned plain-text columns.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// Immutable configuration for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramConfig {
    /// Root directory containing criterion output.
    pub criterion_dir: PathBuf,
    /// Benchmark name; both a subdirectory and the run-name prefix.
    pub bench: String,
    /// Destination for generated diagrams.
    pub outdir: PathBuf,
    /// Image file extension.
    pub format: String,
    /// Estimate kind whose `point_estimate` is plotted.
    pub estimate: String,
    /// Print the table instead of rendering images.
    pub show_only: bool,
    /// Table encoding used by show-only mode.
    pub print_format: PrintFormat,
}

impl DiagramConfig {
    /// Builds a configuration for `bench` with every other field defaulted.
    pub fn new(bench: impl Into<String>) -> Self {
        Self {
            criterion_dir: PathBuf::from(DEFAULT_CRITERION_DIR),
            bench: bench.into(),
            outdir: PathBuf::from(DEFAULT_OUTDIR),
            format: DEFAULT_FORMAT.to_string(),
            estimate: DEFAULT_ESTIMATE.to_string(),
            show_only: false,
            print_format: PrintFormat::Text,
        }
    }

    /// Loads the config file selected by `args` and layers `args` over it.
    pub fn resolve(args: &Args) -> Result<Self> {
        let file = FileConfig::load(args.config.as_deref())?;
        Self::from_layers(args, file)
    }

    /// Layers command-line values over file values over defaults.
    pub fn from_layers(args: &Args, file: FileConfig) -> Result<Self> {
        let bench = args
            .bench
            .clone()
            .or(file.bench)
            .ok_or_else(|| DiagramError::Usage("the --bench argument is required".into()))?;
        Ok(Self {
            criterion_dir: args
                .criterion_dir
                .clone()
                .or(file.criterion_dir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CRITERION_DIR)),
            bench,
            outdir: args
                .outdir
                .clone()
                .or(file.outdir)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTDIR)),
            format: args
                .format
                .clone()
                .or(file.format)
                .unwrap_or_else(|| DEFAULT_FORMAT.to_string()),
            estimate: args
                .estimate
                .clone()
                .or(file.estimate)
                .unwrap_or_else(|| DEFAULT_ESTIMATE.to_string()),
            show_only: args.show_only,
            print_format: args.print_format.or(file.print_format).unwrap_or_default(),
        })
    }

    /// Directory whose subdirectories are the per-run reports.
    pub fn bench_dir(&self) -> PathBuf {
        self.criterion_dir.join(&self.bench)
    }
}

/// Values read from a TOML config file. Every key is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// Overrides [`DEFAULT_CRITERION_DIR`].
    pub criterion_dir: Option<PathBuf>,
    /// Benchmark name used when `--bench` is absent.
    pub bench: Option<String>,
    /// Overrides [`DEFAULT_OUTDIR`].
    pub outdir: Option<PathBuf>,
    /// Overrides [`DEFAULT_FORMAT`].
    pub format: Option<String>,
    /// Overrides [`DEFAULT_ESTIMATE`].
    pub estimate: Option<String>,
    /// Overrides the show-only print format.
    pub print_format: Option<PrintFormat>,
}

impl FileConfig {
    /// Reads `explicit` if given, else the per-user default file if it exists.
    pub fn load(explicit: Option<&Path>) -> std::result::Result<Self, ConfigError> {
        match explicit {
            Some(path) if !path.exists() => Err(ConfigError::NotFound {
                path: path.to_path_buf(),
            }),
            Some(path) => read_file(path),
            None => match default_config_path() {
                Some(path) if path.exists() => read_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }
}

/// Errors raised while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested file does not exist.
    #[error("config file {path} does not exist")]
    NotFound {
        /// Requested path.
        path: PathBuf,
    },
    /// The file exists but could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        /// File path.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },
    /// The file is not valid TOML or holds unknown keys.
    #[error("failed to parse config {path}: {source}")]
    Parse {
        /// File path.
        path: PathBuf,
        /// Decode failure.
        source: toml::de::Error,
    },
}

/// Per-user config location, e.g. `~/.config/bench-diagrams/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("bench-diagrams").join("config.toml"))
}

fn read_file(path: &Path) -> std::result::Result<FileConfig, ConfigError> {
    debug!(path = %path.display(), "loading config file");
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
