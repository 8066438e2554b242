//! Discovery of per-run criterion reports.
//!
//! A parameterised benchmark named `ipc` leaves one directory per sample
//! under `<criterion-dir>/ipc`, named `ipc_<idx>_<size><UNIT>_<group>`.
//! Each holds `new/estimates.json`, criterion's summary statistics for the
//! latest run.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{DiagramError, Result};

/// Location of the estimates document inside a run directory.
pub const ESTIMATES_PATH: &str = "new/estimates.json";

/// Confidence interval attached to an estimate.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ConfidenceInterval {
    /// Confidence level, e.g. `0.95`.
    pub confidence_level: f64,
    /// Lower bound in nanoseconds.
    pub lower_bound: f64,
    /// Upper bound in nanoseconds.
    pub upper_bound: f64,
}

/// One statistic from `estimates.json`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Estimate {
    /// Point value in nanoseconds.
    pub point_estimate: f64,
    /// Standard error, when criterion recorded one.
    #[serde(default)]
    pub standard_error: Option<f64>,
    /// Bootstrap interval, when criterion recorded one.
    #[serde(default)]
    pub confidence_interval: Option<ConfidenceInterval>,
}

/// Estimate kind to statistic. Criterion writes `null` for kinds it did not
/// compute (`slope` under flat sampling).
pub type Estimates = BTreeMap<String, Option<Estimate>>;

/// Fields decoded from a run directory name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunName {
    /// Position of the run within its group.
    pub idx: u64,
    /// Input-size label such as `16K`.
    pub size: String,
    /// Series the run belongs to.
    pub group: String,
}

/// Matcher for `<bench>_<idx>_<size><UNIT>_<group>` directory names.
#[derive(Debug, Clone)]
pub struct NamePattern {
    regex: Regex,
}

impl NamePattern {
    /// Builds the matcher for `bench`. The bench name is matched literally.
    pub fn new(bench: &str) -> Self {
        let source = format!(
            r"^{}_(?P<idx>\d+)_(?P<size>\d+[A-Z])_(?P<group>\w+)$",
            regex::escape(bench)
        );
        let regex = Regex::new(&source).expect("escaped bench name forms a valid pattern");
        Self { regex }
    }

    /// Decodes `name`, or returns `None` when it is not a run directory.
    pub fn parse(&self, name: &str) -> Option<RunName> {
        let caps = self.regex.captures(name)?;
        let idx = caps["idx"].parse().ok()?;
        Some(RunName {
            idx,
            size: caps["size"].to_string(),
            group: caps["group"].to_string(),
        })
    }
}

/// One parsed benchmark sample.
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// Raw directory name.
    pub name: String,
    /// Series name.
    pub group: String,
    /// Ordering key within the series.
    pub idx: u64,
    /// Input-size label.
    pub size: String,
    /// Statistics read from `new/estimates.json`.
    pub estimates: Estimates,
}

impl RunRecord {
    /// Parses the run stored in `dir`, whose file name is `name`.
    ///
    /// Returns `Ok(None)` when `name` does not follow the naming convention;
    /// the estimates file is only read for matching names.
    pub fn parse(name: &str, dir: &Path, pattern: &NamePattern) -> Result<Option<Self>> {
        let Some(run) = pattern.parse(name) else {
            return Ok(None);
        };
        let estimates = read_estimates(&dir.join(ESTIMATES_PATH))?;
        Ok(Some(Self {
            name: name.to_string(),
            group: run.group,
            idx: run.idx,
            size: run.size,
            estimates,
        }))
    }

    /// Point value of the `kind` estimate.
    pub fn point_estimate(&self, kind: &str) -> Result<f64> {
        self.estimates
            .get(kind)
            .and_then(Option::as_ref)
            .map(|estimate| estimate.point_estimate)
            .ok_or_else(|| DiagramError::MissingEstimate {
                run: self.name.clone(),
                estimate: kind.to_string(),
            })
    }
}

/// Reads and decodes one `estimates.json`.
pub fn read_estimates(path: &Path) -> Result<Estimates> {
    let contents = fs::read_to_string(path).map_err(|source| DiagramError::ReadEstimates {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| DiagramError::ParseEstimates {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses every run directory directly under `bench_dir`.
///
/// Entries are visited in file-name order. Entries that are not directories,
/// or whose names do not match `pattern`, are skipped. The first unreadable or
/// malformed estimates file aborts discovery.
pub fn discover_reports(bench_dir: &Path, pattern: &NamePattern) -> Result<Vec<RunRecord>> {
    let read_dir_err = |source| DiagramError::ReadDir {
        path: bench_dir.to_path_buf(),
        source,
    };
    let mut entries: Vec<(String, PathBuf)> = Vec::new();
    for entry in fs::read_dir(bench_dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => entries.push((name, path)),
            Err(raw) => debug!(name = ?raw, "skipping non UTF-8 entry"),
        }
    }
    entries.sort();

    let mut reports = Vec::new();
    for (name, path) in entries {
        match RunRecord::parse(&name, &path, pattern)? {
            Some(report) => {
                debug!(
                    name = %report.name,
                    group = %report.group,
                    idx = report.idx,
                    size = %report.size,
                    "parsed report"
                );
                reports.push(report);
            }
            None => debug!(%name, "skipping directory outside the naming convention"),
        }
    }
    info!(dir = %bench_dir.display(), count = reports.len(), "discovered reports");
    Ok(reports)
}
