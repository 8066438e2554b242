#![forbid(unsafe_code)]

//! Command-line surface of `make-diagrams`.
//!
//! Every option except `--show-only` and `--verbose` is optional here so a
//! config file can fill it in; [`DiagramConfig::resolve`] applies defaults and
//! enforces that a benchmark name was supplied somewhere.
//!
//! [`DiagramConfig::resolve`]: crate::config::DiagramConfig::resolve

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::PrintFormat;

/// Arguments accepted by the `make-diagrams` binary.
#[derive(Parser, Debug, Clone, Default)]
#[command(
    name = "make-diagrams",
    version,
    about = "Render criterion per-size estimates as line charts"
)]
pub struct Args {
    /// Directory containing criterion's output [default: target/criterion]
    #[arg(long, value_name = "PATH")]
    pub criterion_dir: Option<PathBuf>,

    /// Name of the benchmark whose estimates are parsed
    #[arg(long, value_name = "NAME")]
    pub bench: Option<String>,

    /// Directory to write output diagrams [default: target/criterion]
    #[arg(long, value_name = "PATH")]
    pub outdir: Option<PathBuf>,

    /// Format of output diagrams: svg, png, jpg, jpeg or bmp [default: svg]
    #[arg(long, value_name = "EXT")]
    pub format: Option<String>,

    /// Estimate to plot: slope, mean, median, ... [default: slope]
    #[arg(long, value_name = "KIND")]
    pub estimate: Option<String>,

    /// Print the aggregated table instead of writing diagrams
    #[arg(long)]
    pub show_only: bool,

    /// Encoding of the table printed by --show-only [default: text]
    #[arg(long, value_enum)]
    pub print_format: Option<PrintFormat>,

    /// TOML file supplying defaults for the options above
    #[arg(long, env = "BENCH_DIAGRAMS_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Args {
    /// Log filter directive implied by `--verbose`.
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
