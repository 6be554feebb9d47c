//! Hand-off to the analysis engine.

use std::io::{self, Write};

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Configuration;
use crate::pipeline::{Outcome, Resolution};
use crate::schema::Schema;

/// Process exit status for a completed run.
pub const EXIT_SUCCESS: u8 = 0;
/// Process exit status for help, version, and every failure.
pub const EXIT_FAILURE: u8 = 1;

/// File written into the output directory with the resolved arguments.
pub const ARGS_EXPORT: &str = "args.txt";

/// The statistical analysis, called once per run with a valid
/// configuration. It reads the inputs and writes all results itself.
pub trait AnalysisEngine {
    fn run(&self, config: &Configuration) -> Result<()>;
}

/// Write the resolved arguments next to the results so the run can be
/// repeated with `--args`.
pub fn export_args(config: &Configuration) -> io::Result<()> {
    std::fs::write(config.out().join(ARGS_EXPORT), config.to_args_file())
}

/// Call the engine exactly once.
pub fn dispatch(config: &Configuration, engine: &dyn AnalysisEngine) -> Result<()> {
    info!("Resolved configuration:\n{}", config.summary());
    if let Err(err) = export_args(config) {
        warn!(
            "Could not write {}: {err}",
            config.out().join(ARGS_EXPORT).display()
        );
    }
    engine.run(config)
}

/// Print what a resolution calls for and return the exit status:
/// usage and version on `stdout`, every diagnostic on `stderr`, and the
/// engine invoked only for a fully valid configuration.
pub fn execute(
    schema: &Schema,
    resolution: Resolution,
    engine: &dyn AnalysisEngine,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> io::Result<u8> {
    for err in &resolution.import_errors {
        writeln!(stderr, "ERROR: {err}")?;
    }

    match resolution.outcome {
        Ok(Outcome::Help) => {
            write!(stdout, "{}", schema.usage())?;
            Ok(EXIT_FAILURE)
        }
        Ok(Outcome::Version) => {
            writeln!(stdout, "{}", crate::VERSION)?;
            Ok(EXIT_FAILURE)
        }
        Ok(Outcome::Run(config)) => match dispatch(&config, engine) {
            Ok(()) => Ok(EXIT_SUCCESS),
            Err(err) => {
                writeln!(stderr, "ERROR: {err:#}")?;
                Ok(EXIT_FAILURE)
            }
        },
        Err(err) => {
            if err.shows_usage() {
                write!(stdout, "{}", schema.usage())?;
            }
            for message in err.messages() {
                writeln!(stderr, "ERROR: {message}")?;
            }
            Ok(EXIT_FAILURE)
        }
    }
}
