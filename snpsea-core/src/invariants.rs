//! Cross-field checks.
//!
//! These run once every field passed its own validator. They stop at
//! the first failing check because later checks rely on the values the
//! earlier ones produce.

use std::path::PathBuf;

use tracing::debug;

use crate::config::{Configuration, SnpSource};
use crate::error::{InvalidOption, ResolveError};
use crate::fs::FileSystem;
use crate::normalize::{self, Checked};
use crate::schema::{
    CONDITION, GENE_INTERVALS, GENE_MATRIX, MAX_ITERATIONS, MIN_OBSERVATIONS, NULL_SNPS,
    NULL_SNPSETS, OUT, SCORE, SLOP, SNPS, SNP_INTERVALS, THREADS,
};
use crate::validate::ValidatedOptions;

/// Largest accepted `--max-iterations`.
pub const MAX_ITERATIONS_CEILING: u64 = 1_000_000_000_000_000_000;

const RANDOM_PREFIX: &str = "random";

/// Run the cross-field checks in order and build the configuration.
pub fn check(
    options: &ValidatedOptions,
    fs: &dyn FileSystem,
) -> Result<Configuration, ResolveError> {
    // A missing --snps file is reported together with the other
    // missing inputs; a malformed random<N> stops here.
    let mut missing = Vec::new();
    let snps = match snp_source(text(options, SNPS), fs) {
        Ok(snps) => Some(snps),
        Err(InvalidOption::MissingFiles(files)) => {
            missing.extend(files);
            None
        }
        Err(err) => return Err(err.into()),
    };

    let mut existing = |option: &'static str| {
        let path = PathBuf::from(text(options, option));
        if !fs.is_file(&path) {
            missing.push((option, path.clone()));
        }
        path
    };
    let gene_matrix = existing(GENE_MATRIX);
    let gene_intervals = existing(GENE_INTERVALS);
    let snp_intervals = existing(SNP_INTERVALS);
    let null_snps = existing(NULL_SNPS);
    let condition = match options.text(CONDITION) {
        Some(path) if !path.is_empty() => Some(existing(CONDITION)),
        _ => None,
    };
    let snps = match snps {
        Some(snps) if missing.is_empty() => snps,
        _ => return Err(InvalidOption::MissingFiles(missing).into()),
    };

    let out = PathBuf::from(text(options, OUT));
    fs.create_dir_all(&out)
        .map_err(|source| ResolveError::OutputDirectory {
            path: out.clone(),
            source,
        })?;
    debug!("Output directory ready: {}", out.display());

    let score_raw = text(options, SCORE);
    let score = normalize::score_method(score_raw).ok_or_else(|| InvalidOption::ScoreMethod {
        value: score_raw.to_string(),
    })?;

    let slop = normalize::truncate_count(options.real(SLOP).unwrap_or_default()).ok_or_else(
        || InvalidOption::OutOfRange {
            option: SLOP,
            value: raw(options, SLOP),
        },
    )?;
    let max_iterations = match normalize::truncate_count(
        options.real(MAX_ITERATIONS).unwrap_or_default(),
    ) {
        Some(n) if (1..=MAX_ITERATIONS_CEILING).contains(&n) => n,
        _ => {
            return Err(InvalidOption::MaxIterations {
                value: raw(options, MAX_ITERATIONS),
            }
            .into())
        }
    };

    let min_observations = options.count(MIN_OBSERVATIONS).unwrap_or_default();
    if min_observations == 0 || min_observations >= max_iterations {
        return Err(InvalidOption::MinObservations {
            min: min_observations,
            max: max_iterations,
        }
        .into());
    }

    let threads = options.count(THREADS).unwrap_or(1);
    let threads = usize::try_from(threads).map_err(|_| InvalidOption::OutOfRange {
        option: THREADS,
        value: raw(options, THREADS),
    })?;

    Ok(normalize::normalize(Checked {
        snps,
        gene_matrix,
        gene_intervals,
        snp_intervals,
        null_snps,
        condition,
        out,
        score,
        slop,
        threads,
        null_snpsets: options.count(NULL_SNPSETS).unwrap_or_default(),
        min_observations,
        max_iterations,
    }))
}

/// `--snps` is either `random<N>` with `N > 0`, or an existing file.
/// A well-formed `random<N>` is accepted without touching the filesystem.
pub fn snp_source(value: &str, fs: &dyn FileSystem) -> Result<SnpSource, InvalidOption> {
    let invalid = || InvalidOption::RandomSnpSet {
        value: value.to_string(),
    };

    if let Some(count) = value.strip_prefix(RANDOM_PREFIX) {
        if let Ok(n) = count.parse::<i64>() {
            return if n > 0 {
                Ok(SnpSource::Random(n as u64))
            } else {
                Err(invalid())
            };
        }
        // Something like "random_snps.txt" may still be a real file.
        let path = PathBuf::from(value);
        return if fs.is_file(&path) {
            Ok(SnpSource::File(path))
        } else {
            Err(invalid())
        };
    }

    let path = PathBuf::from(value);
    if fs.is_file(&path) {
        Ok(SnpSource::File(path))
    } else {
        Err(InvalidOption::MissingFiles(vec![(SNPS, path)]))
    }
}

// Required options and defaulted options always reach this stage with
// a value; an empty string stands in if that ever stops being true.
fn text<'a>(options: &'a ValidatedOptions, name: &str) -> &'a str {
    options.text(name).unwrap_or_default()
}

fn raw(options: &ValidatedOptions, name: &str) -> String {
    options.raw(name).unwrap_or_default().to_string()
}
