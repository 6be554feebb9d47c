//! Engine linked into the binary.
//!
//! The statistical analysis is a separate component; this stand-in
//! reports the configuration it was handed so a resolved run can be
//! inspected end to end.

use anyhow::Result;
use tracing::info;

use snpsea_core::{AnalysisEngine, Configuration};

pub struct ReportEngine;

impl AnalysisEngine for ReportEngine {
    fn run(&self, config: &Configuration) -> Result<()> {
        info!("Dispatching to analysis engine with {} thread(s)", config.threads());
        println!("{}", config.summary());
        Ok(())
    }
}
