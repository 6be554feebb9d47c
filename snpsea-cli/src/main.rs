//! snpsea: identify cell types, tissues, and pathways affected by risk loci.
//!
//! CLI entry point. Option resolution lives in `snpsea-core`; this binary
//! sets up logging, hands the process arguments to the pipeline, and
//! turns the result into an exit status.

mod engine;

use std::io;
use std::process::ExitCode;

use snpsea_core::dispatch::{self, EXIT_FAILURE};
use snpsea_core::{pipeline, LocalFs, Schema};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // stdout is reserved for usage and version text.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    tracing::debug!("SNPsea v{}", snpsea_core::VERSION);

    let schema = Schema::snpsea();
    let resolution = pipeline::resolve(&schema, std::env::args_os().skip(1), &LocalFs);

    let engine = engine::ReportEngine;
    match dispatch::execute(
        &schema,
        resolution,
        &engine,
        &mut io::stdout(),
        &mut io::stderr(),
    ) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("ERROR: {err}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}
