//! Canonical forms for free-text options.
//!
//! Everything here is total: it runs on values that already passed
//! their field validators and performs no I/O.

use std::path::PathBuf;

use crate::config::{Configuration, ScoreMethod, SnpSource};

/// Expand a score method abbreviation by its first character:
/// `s...` is single, `t...` is total. Case-sensitive.
pub fn score_method(raw: &str) -> Option<ScoreMethod> {
    match raw.chars().next()? {
        's' => Some(ScoreMethod::Single),
        't' => Some(ScoreMethod::Total),
        _ => None,
    }
}

/// Truncate a float-formatted count toward zero. `None` when the result
/// is negative or does not fit in a `u64`.
pub fn truncate_count(value: f64) -> Option<u64> {
    let whole = value.trunc();
    // 2^64 is exactly representable; anything at or above it overflows.
    if !whole.is_finite() || whole < 0.0 || whole >= 18_446_744_073_709_551_616.0 {
        return None;
    }
    Some(whole as u64)
}

/// Values that passed every cross-field check, ready to be frozen.
#[derive(Debug, Clone)]
pub(crate) struct Checked {
    pub snps: SnpSource,
    pub gene_matrix: PathBuf,
    pub gene_intervals: PathBuf,
    pub snp_intervals: PathBuf,
    pub null_snps: PathBuf,
    pub condition: Option<PathBuf>,
    pub out: PathBuf,
    pub score: ScoreMethod,
    pub slop: u64,
    pub threads: usize,
    pub null_snpsets: u64,
    pub min_observations: u64,
    pub max_iterations: u64,
}

/// Freeze checked values into the engine's configuration.
pub(crate) fn normalize(checked: Checked) -> Configuration {
    Configuration {
        snps: checked.snps,
        gene_matrix: checked.gene_matrix,
        gene_intervals: checked.gene_intervals,
        snp_intervals: checked.snp_intervals,
        null_snps: checked.null_snps,
        condition: checked.condition,
        out: checked.out,
        score: checked.score,
        slop: checked.slop,
        threads: checked.threads,
        null_snpsets: checked.null_snpsets,
        min_observations: checked.min_observations,
        max_iterations: checked.max_iterations,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_method_by_first_letter() {
        for raw in ["s", "single", "sINGLE", "sum"] {
            assert_eq!(score_method(raw), Some(ScoreMethod::Single), "{raw}");
        }
        for raw in ["t", "total", "tOTAL"] {
            assert_eq!(score_method(raw), Some(ScoreMethod::Total), "{raw}");
        }
        for raw in ["SINGLE", "Single", "Total", "TOTAL", " single", "xyz", ""] {
            assert_eq!(score_method(raw), None, "{raw}");
        }
    }

    #[test]
    fn test_truncate_count() {
        assert_eq!(truncate_count(1e6), Some(1_000_000));
        assert_eq!(truncate_count(250e3), Some(250_000));
        assert_eq!(truncate_count(2.9), Some(2));
        assert_eq!(truncate_count(0.5), Some(0));
        assert_eq!(truncate_count(-0.5), Some(0));
        assert_eq!(truncate_count(-1.0), None);
        assert_eq!(truncate_count(1e20), None);
        assert_eq!(truncate_count(f64::NAN), None);
    }
}
