//! Stage ordering for option resolution.
//!
//! ```text
//! tokens -> parse -> help/version? -> import --args files
//!        -> required -> arity -> field validators -> cross-field checks
//!        -> Configuration
//! ```
//! [`resolve`] never exits the process and performs no I/O beyond the
//! [`FileSystem`] calls and reading argument files.

use std::ffi::OsString;
use std::path::Path;

use tracing::debug;

use crate::config::Configuration;
use crate::error::{ImportError, ResolveError};
use crate::fs::FileSystem;
use crate::invariants;
use crate::schema::{Schema, ARGS, ARGS_COMMENT, HELP, VERSION};
use crate::table::OptionTable;
use crate::validate;

/// What the command line asked for.
#[derive(Debug)]
pub enum Outcome {
    /// `-h/--help` was given.
    Help,
    /// `-v/--version` was given.
    Version,
    /// Everything validated; run the engine with this.
    Run(Configuration),
}

/// Result of resolving a command line. Argument-file problems are kept
/// apart from the outcome because they never stop a run on their own.
#[derive(Debug)]
pub struct Resolution {
    pub import_errors: Vec<ImportError>,
    pub outcome: Result<Outcome, ResolveError>,
}

/// Resolve command-line tokens (without the program name) against `schema`.
pub fn resolve<I, T>(schema: &Schema, tokens: I, fs: &dyn FileSystem) -> Resolution
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut import_errors = Vec::new();
    let outcome = run_stages(schema, tokens, fs, &mut import_errors);
    Resolution {
        import_errors,
        outcome,
    }
}

fn run_stages<I, T>(
    schema: &Schema,
    tokens: I,
    fs: &dyn FileSystem,
    import_errors: &mut Vec<ImportError>,
) -> Result<Outcome, ResolveError>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let mut table = OptionTable::parse(schema, tokens)?;

    if table.is_set(HELP) {
        return Ok(Outcome::Help);
    }
    if table.is_set(VERSION) {
        return Ok(Outcome::Version);
    }

    // Only files named on the command line are read; an --args line
    // inside an argument file is not followed.
    let files: Vec<String> = table.all(ARGS).into_iter().map(str::to_string).collect();
    for file in &files {
        if let Err(err) = table.import(Path::new(file), ARGS_COMMENT) {
            debug!("Skipping argument file: {err}");
            import_errors.push(err);
        }
    }

    validate::required(&table)?;
    validate::arity(&table)?;
    let options = validate::fields(&table)?;
    debug!("All fields valid; running cross-field checks");

    let config = invariants::check(&options, fs)?;
    Ok(Outcome::Run(config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::UsagePass;
    use crate::fs::LocalFs;

    #[test]
    fn test_help_short_circuits_validation() {
        let schema = Schema::snpsea();
        let resolution = resolve(&schema, ["-h", "--threads", "0"], &LocalFs);
        assert!(matches!(resolution.outcome, Ok(Outcome::Help)));
    }

    #[test]
    fn test_version_short_circuits_imports() {
        let schema = Schema::snpsea();
        let resolution = resolve(&schema, ["--version", "--args", "/no/such/file"], &LocalFs);
        assert!(matches!(resolution.outcome, Ok(Outcome::Version)));
        assert!(resolution.import_errors.is_empty());
    }

    #[test]
    fn test_unreadable_args_file_is_not_fatal_by_itself() {
        let schema = Schema::snpsea();
        let resolution = resolve(
            &schema,
            ["--args", "/no/such/a.txt", "--args", "/no/such/b.txt"],
            &LocalFs,
        );
        assert_eq!(resolution.import_errors.len(), 2);
        // The run still stops, but on the missing required options.
        match resolution.outcome {
            Err(ResolveError::Usage { pass, problems }) => {
                assert_eq!(pass, UsagePass::MissingRequired);
                assert_eq!(problems.len(), 6);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_missing_required_stops_before_arity() {
        let schema = Schema::snpsea();
        let resolution = resolve(&schema, ["--threads", "1", "2"], &LocalFs);
        assert!(matches!(
            resolution.outcome,
            Err(ResolveError::Usage {
                pass: UsagePass::MissingRequired,
                ..
            })
        ));
    }
}
