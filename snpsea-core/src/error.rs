//! Diagnostics produced while resolving options.

use std::path::PathBuf;

use thiserror::Error;

/// The batch pass that rejected the command line. Each pass reports
/// every problem of its kind together with the usage text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UsagePass {
    Unrecognized,
    MissingRequired,
    ArgumentCount,
    InvalidValue,
}

/// Fatal semantic errors from the cross-field checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidOption {
    #[error("--snps {value}\nMust be like: random20")]
    RandomSnpSet { value: String },

    #[error("{}", missing_files(.0))]
    MissingFiles(Vec<(&'static str, PathBuf)>),

    #[error("--score {value}\nMust be one of: single total")]
    ScoreMethod { value: String },

    #[error("Invalid option: {option} {value}\nThis option must fit in a 64-bit unsigned integer.")]
    OutOfRange { option: &'static str, value: String },

    #[error("Invalid option: --max-iterations {value}\nThis option must be between 1 and 1e18.")]
    MaxIterations { value: String },

    #[error(
        "Invalid option: --min-observations {min}\n\
         This option must be at least 1 and less than --max-iterations ({max})."
    )]
    MinObservations { min: u64, max: u64 },
}

fn missing_file(option: &str, path: &std::path::Path) -> String {
    format!("File not found for {option}: {}", path.display())
}

fn missing_files(files: &[(&'static str, PathBuf)]) -> String {
    files
        .iter()
        .map(|(option, path)| missing_file(option, path))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Why a run cannot go ahead. Nothing here is retried; the engine is
/// never called once one of these is returned.
#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("{}", .problems.join("\n"))]
    Usage {
        pass: UsagePass,
        problems: Vec<String>,
    },

    #[error(transparent)]
    Invalid(#[from] InvalidOption),

    #[error("Failed to create output directory {}: {source}", .path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ResolveError {
    pub fn usage(pass: UsagePass, problems: Vec<String>) -> Self {
        ResolveError::Usage { pass, problems }
    }

    /// Usage errors are printed with the usage text; the rest are not.
    pub fn shows_usage(&self) -> bool {
        matches!(self, ResolveError::Usage { .. })
    }

    /// One line per diagnostic, without the `ERROR: ` prefix.
    pub fn messages(&self) -> Vec<String> {
        match self {
            ResolveError::Usage { problems, .. } => problems.clone(),
            ResolveError::Invalid(InvalidOption::MissingFiles(files)) => files
                .iter()
                .map(|(option, path)| missing_file(option, path))
                .collect(),
            other => vec![other.to_string()],
        }
    }
}

/// A problem with one `--args` file. Never fatal: the file is skipped
/// and the remaining files are still read.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Failed to open file {}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_files_one_message_each() {
        let err = ResolveError::from(InvalidOption::MissingFiles(vec![
            ("--gene-matrix", PathBuf::from("a.gct")),
            ("--null-snps", PathBuf::from("b.txt")),
        ]));
        assert_eq!(
            err.messages(),
            vec![
                "File not found for --gene-matrix: a.gct",
                "File not found for --null-snps: b.txt"
            ]
        );
        assert!(!err.shows_usage());
    }

    #[test]
    fn test_usage_error_keeps_every_problem() {
        let err = ResolveError::usage(
            UsagePass::MissingRequired,
            vec!["Missing required option --snps.".into(), "Missing required option --out.".into()],
        );
        assert!(err.shows_usage());
        assert_eq!(err.messages().len(), 2);
        assert!(err.to_string().contains("--out"));
    }

    #[test]
    fn test_invalid_option_names_option_and_value() {
        let err = InvalidOption::MinObservations { min: 1000, max: 25 };
        let text = err.to_string();
        assert!(text.contains("--min-observations 1000"));
        assert!(text.contains("25"));
    }
}
