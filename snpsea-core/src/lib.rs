//! snpsea-core: option resolution for SNPsea
//!
//! Turns command-line tokens and `--args` files into a validated
//! [`Configuration`] for the analysis engine: option schema, source
//! merging, per-field validation, cross-field checks, normalization,
//! and dispatch.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fs;
pub mod import;
pub mod invariants;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod table;
pub mod validate;

pub use config::{Configuration, ScoreMethod, SnpSource};
pub use dispatch::AnalysisEngine;
pub use error::{ImportError, InvalidOption, ResolveError, UsagePass};
pub use fs::{FileSystem, LocalFs};
pub use pipeline::{resolve, Outcome, Resolution};
pub use schema::Schema;

/// SNPsea version string, shared by `--version` and the usage footer.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
