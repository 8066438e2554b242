//! Binary entry point: render criterion estimates for one benchmark.
#![forbid(unsafe_code)]

use std::error::Error;
use std::io::{self, Write};

use bench_diagrams::cli::Args;
use bench_diagrams::{run, DiagramConfig, Outcome};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Args::parse();
    init_tracing(args.log_level());
    if let Err(err) = try_main(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn try_main(args: &Args) -> Result<(), Box<dyn Error>> {
    let config = DiagramConfig::resolve(args)?;
    let mut out = io::stdout().lock();
    if let Outcome::Rendered(paths) = run(&config, &mut out)? {
        for path in paths {
            writeln!(out, "wrote {}", path.display())?;
        }
    }
    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}
