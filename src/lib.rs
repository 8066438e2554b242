//! Turns criterion output for a size-parameterised benchmark into line charts.
//!
//! A run has four steps: resolve a [`DiagramConfig`], discover the per-run
//! reports under `<criterion-dir>/<bench>`, aggregate them into a [`Table`]
//! with one row per input size and one column per series, then either print
//! the table or draw it in the windows returned by [`window::windows`].

#![warn(missing_docs)]

pub mod cli;
pub mod config;
pub mod error;
pub mod render;
pub mod report;
pub mod table;
pub mod window;

use std::io::Write;
use std::path::PathBuf;

use tracing::info;

pub use crate::config::{DiagramConfig, PrintFormat};
pub use crate::error::{DiagramError, Result};
pub use crate::render::Renderer;
pub use crate::report::{discover_reports, NamePattern, RunRecord};
pub use crate::table::{Column, Table};

/// What a run produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Show-only mode: the table that was printed.
    Printed(Table),
    /// The chart files that were written, in window order.
    Rendered(Vec<PathBuf>),
}

/// Discovers and aggregates the reports selected by `config`.
pub fn load_table(config: &DiagramConfig) -> Result<Table> {
    let bench_dir = config.bench_dir();
    let pattern = NamePattern::new(&config.bench);
    let reports = discover_reports(&bench_dir, &pattern)?;
    if reports.is_empty() {
        return Err(DiagramError::NoReports {
            bench: config.bench.clone(),
            path: bench_dir,
        });
    }
    let table = Table::aggregate(reports, &config.estimate)?;
    info!(
        rows = table.row_count(),
        columns = table.columns().len(),
        estimate = %config.estimate,
        "aggregated table"
    );
    Ok(table)
}

/// Writes `table` to `out` in `format`.
pub fn write_table<W: Write>(table: &Table, format: PrintFormat, out: &mut W) -> Result<()> {
    match format {
        PrintFormat::Text => write!(out, "{table}")?,
        PrintFormat::Json => writeln!(out, "{}", table.to_json()?)?,
    }
    Ok(())
}

/// Runs the whole pipeline for `config`.
///
/// In show-only mode the table is written to `out` and nothing touches the
/// output directory. Otherwise every window is rendered and the paths are
/// returned.
pub fn run<W: Write>(config: &DiagramConfig, out: &mut W) -> Result<Outcome> {
    let table = load_table(config)?;
    if config.show_only {
        write_table(&table, config.print_format, out)?;
        return Ok(Outcome::Printed(table));
    }
    let renderer = Renderer::new(config)?;
    let paths = renderer.render_windows(&table, &window::windows(table.row_count()))?;
    Ok(Outcome::Rendered(paths))
}
