//! Property-based tests using proptest.
//!
//! Invariants that must hold for every input, not only the handful of
//! values in the unit tests:
//!   - min observations >= max iterations never validates
//!   - float-formatted counts truncate the same way as plain integers
//!   - `random<N>` is accepted exactly when N > 0
//!   - score methods resolve by their lowercase first letter alone

use std::io;
use std::path::Path;

use proptest::prelude::*;

use snpsea_core::invariants::snp_source;
use snpsea_core::normalize::{score_method, truncate_count};
use snpsea_core::{
    resolve, FileSystem, InvalidOption, Outcome, ResolveError, Schema, ScoreMethod, SnpSource,
};

/// Every path is a file and every directory can be created.
struct PermissiveFs;

impl FileSystem for PermissiveFs {
    fn is_file(&self, _path: &Path) -> bool {
        true
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

/// Nothing exists.
struct EmptyFs;

impl FileSystem for EmptyFs {
    fn is_file(&self, _path: &Path) -> bool {
        false
    }

    fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
        Ok(())
    }
}

fn required_args() -> Vec<String> {
    [
        "--snps",
        "random10",
        "--gene-matrix",
        "m.gct",
        "--gene-intervals",
        "g.bed",
        "--snp-intervals",
        "s.bed",
        "--null-snps",
        "n.txt",
        "--out",
        "out",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn resolve_with(extra: &[String]) -> Result<Outcome, ResolveError> {
    let schema = Schema::snpsea();
    let mut args = required_args();
    args.extend_from_slice(extra);
    resolve(&schema, args, &PermissiveFs).outcome
}

// ---------------------------------------------------------------------------
// 1. min observations must stay below max iterations
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_inverted_bounds_always_fail(
        max in 1u64..100_000,
        extra in 0u64..100_000,
        threads in 1u64..64,
        slop in 0u64..1_000_000,
    ) {
        let min = max + extra;
        let outcome = resolve_with(&[
            "--min-observations".to_string(), min.to_string(),
            "--max-iterations".to_string(), max.to_string(),
            "--threads".to_string(), threads.to_string(),
            "--slop".to_string(), slop.to_string(),
        ]);
        let is_min_observations_error = matches!(
            outcome,
            Err(ResolveError::Invalid(InvalidOption::MinObservations { .. }))
        );
        prop_assert!(is_min_observations_error);
    }

    #[test]
    fn prop_ordered_bounds_resolve(min in 1u64..10_000, gap in 1u64..10_000) {
        let max = min + gap;
        let outcome = resolve_with(&[
            "--min-observations".to_string(), min.to_string(),
            "--max-iterations".to_string(), max.to_string(),
        ]);
        match outcome {
            Ok(Outcome::Run(config)) => {
                prop_assert_eq!(config.min_observations(), min);
                prop_assert_eq!(config.max_iterations(), max);
            }
            other => prop_assert!(false, "unexpected outcome: {:?}", other),
        }
    }
}

// ---------------------------------------------------------------------------
// 2. Scientific notation truncates like the integer it spells
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_scientific_notation_matches_integer(mantissa in 1u64..1000, exponent in 0i32..12) {
        let value = mantissa * 10u64.pow(exponent as u32);
        let sci: f64 = format!("{mantissa}e{exponent}").parse().unwrap();
        prop_assert_eq!(truncate_count(sci), Some(value));
    }

    #[test]
    fn prop_truncation_never_rounds_up(x in 0.0f64..1e15) {
        let n = truncate_count(x).unwrap();
        prop_assert!(n as f64 <= x);
        prop_assert!(x - (n as f64) < 1.0);
    }
}

// ---------------------------------------------------------------------------
// 3. random<N> snp sets
// ---------------------------------------------------------------------------
proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_random_snp_sets(n in -1000i64..1000) {
        let value = format!("random{n}");
        let result = snp_source(&value, &EmptyFs);
        if n > 0 {
            prop_assert_eq!(result, Ok(SnpSource::Random(n as u64)));
        } else {
            prop_assert_eq!(result, Err(InvalidOption::RandomSnpSet { value }));
        }
    }

    #[test]
    fn prop_score_method_by_first_letter(rest in "[a-zA-Z]{0,8}") {
        prop_assert_eq!(score_method(&format!("s{rest}")), Some(ScoreMethod::Single));
        prop_assert_eq!(score_method(&format!("t{rest}")), Some(ScoreMethod::Total));
        prop_assert_eq!(score_method(&format!("x{rest}")), None);
        prop_assert_eq!(score_method(&format!("S{rest}")), None);
        prop_assert_eq!(score_method(&format!("T{rest}")), None);
    }
}
