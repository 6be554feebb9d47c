//! The validated configuration handed to the analysis engine.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::import::quote;
use crate::schema;

/// Where the user SNP set comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnpSource {
    /// Text file with SNP identifiers in the first column.
    File(PathBuf),
    /// A random SNP set of this many SNPs, drawn from the null pool.
    Random(u64),
}

impl fmt::Display for SnpSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnpSource::File(path) => write!(f, "{}", path.display()),
            SnpSource::Random(n) => write!(f, "random{n}"),
        }
    }
}

/// How each SNP locus is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreMethod {
    /// The single most specific gene in the locus.
    #[default]
    Single,
    /// The total over all genes in the locus.
    Total,
}

impl ScoreMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreMethod::Single => "single",
            ScoreMethod::Total => "total",
        }
    }
}

impl fmt::Display for ScoreMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved run settings. Only the normalizer builds one, after
/// every check passed, so `min_observations < max_iterations` and the
/// numeric lower bounds always hold.
#[derive(Debug, Clone, PartialEq)]
pub struct Configuration {
    pub(crate) snps: SnpSource,
    pub(crate) gene_matrix: PathBuf,
    pub(crate) gene_intervals: PathBuf,
    pub(crate) snp_intervals: PathBuf,
    pub(crate) null_snps: PathBuf,
    pub(crate) condition: Option<PathBuf>,
    pub(crate) out: PathBuf,
    pub(crate) score: ScoreMethod,
    pub(crate) slop: u64,
    pub(crate) threads: usize,
    pub(crate) null_snpsets: u64,
    pub(crate) min_observations: u64,
    pub(crate) max_iterations: u64,
}

impl Configuration {
    pub fn snps(&self) -> &SnpSource {
        &self.snps
    }

    pub fn gene_matrix(&self) -> &Path {
        &self.gene_matrix
    }

    pub fn gene_intervals(&self) -> &Path {
        &self.gene_intervals
    }

    pub fn snp_intervals(&self) -> &Path {
        &self.snp_intervals
    }

    pub fn null_snps(&self) -> &Path {
        &self.null_snps
    }

    /// Columns of the gene matrix to condition on, if any.
    pub fn condition(&self) -> Option<&Path> {
        self.condition.as_deref()
    }

    pub fn out(&self) -> &Path {
        &self.out
    }

    pub fn score(&self) -> ScoreMethod {
        self.score
    }

    /// Extension in nucleotides for SNPs that overlap no gene.
    pub fn slop(&self) -> u64 {
        self.slop
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    /// Number of null SNP sets scored to evaluate type 1 error.
    pub fn null_snpsets(&self) -> u64 {
        self.null_snpsets
    }

    pub fn min_observations(&self) -> u64 {
        self.min_observations
    }

    pub fn max_iterations(&self) -> u64 {
        self.max_iterations
    }

    /// Human-readable description for logs.
    pub fn summary(&self) -> String {
        format!(
            "SNPsea v{}\n\
             SNPs: {}\n\
             Gene matrix: {}\n\
             Gene intervals: {}\n\
             SNP intervals: {}\n\
             Null SNPs: {}\n\
             Condition: {}\n\
             Output: {}\n\
             Score: {}\n\
             Slop: {}\n\
             Threads: {}\n\
             Null SNP sets: {}\n\
             Min observations: {}\n\
             Max iterations: {}",
            crate::VERSION,
            self.snps,
            self.gene_matrix.display(),
            self.gene_intervals.display(),
            self.snp_intervals.display(),
            self.null_snps.display(),
            self.condition
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "none".to_string()),
            self.out.display(),
            self.score,
            self.slop,
            self.threads,
            self.null_snpsets,
            self.min_observations,
            self.max_iterations,
        )
    }

    /// Render the configuration as an argument file that `--args`
    /// reads back to the same configuration. Values holding whitespace
    /// are quoted.
    pub fn to_args_file(&self) -> String {
        let mut lines = vec![format!("# SNPsea v{} resolved arguments", crate::VERSION)];
        let mut push =
            |flag: &str, value: String| lines.push(format!("{flag} {}", quote(&value)));

        push(schema::SNPS, self.snps.to_string());
        push(schema::GENE_MATRIX, self.gene_matrix.display().to_string());
        push(schema::GENE_INTERVALS, self.gene_intervals.display().to_string());
        push(schema::SNP_INTERVALS, self.snp_intervals.display().to_string());
        push(schema::NULL_SNPS, self.null_snps.display().to_string());
        if let Some(condition) = &self.condition {
            push(schema::CONDITION, condition.display().to_string());
        }
        push(schema::OUT, self.out.display().to_string());
        push(schema::SCORE, self.score.to_string());
        push(schema::SLOP, self.slop.to_string());
        push(schema::THREADS, self.threads.to_string());
        push(schema::NULL_SNPSETS, self.null_snpsets.to_string());
        push(schema::MIN_OBSERVATIONS, self.min_observations.to_string());
        push(schema::MAX_ITERATIONS, self.max_iterations.to_string());

        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Configuration {
        Configuration {
            snps: SnpSource::Random(20),
            gene_matrix: PathBuf::from("matrix.gct.gz"),
            gene_intervals: PathBuf::from("genes.bed.gz"),
            snp_intervals: PathBuf::from("snps.bed.gz"),
            null_snps: PathBuf::from("null.txt"),
            condition: None,
            out: PathBuf::from("out"),
            score: ScoreMethod::Total,
            slop: 100_000,
            threads: 2,
            null_snpsets: 0,
            min_observations: 25,
            max_iterations: 1_000_000,
        }
    }

    #[test]
    fn test_score_method_strings() {
        assert_eq!(ScoreMethod::Single.as_str(), "single");
        assert_eq!(ScoreMethod::Total.to_string(), "total");
        assert_eq!(ScoreMethod::default(), ScoreMethod::Single);
    }

    #[test]
    fn test_snp_source_display() {
        assert_eq!(SnpSource::Random(20).to_string(), "random20");
        assert_eq!(
            SnpSource::File(PathBuf::from("snps.txt")).to_string(),
            "snps.txt"
        );
    }

    #[test]
    fn test_args_file_lists_every_value() {
        let text = sample().to_args_file();
        assert!(text.starts_with("# SNPsea"));
        assert!(text.contains("--snps random20\n"));
        assert!(text.contains("--score total\n"));
        assert!(text.contains("--max-iterations 1000000\n"));
        assert!(!text.contains("--condition"));
    }

    #[test]
    fn test_args_file_quotes_paths_with_spaces() {
        let mut config = sample();
        config.out = PathBuf::from("my results/run 1");
        let text = config.to_args_file();
        assert!(text.contains("--out \"my results/run 1\"\n"), "{text}");
        assert!(text.contains("--snps random20\n"));
    }

    #[test]
    fn test_summary_mentions_condition() {
        let mut config = sample();
        assert!(config.summary().contains("Condition: none"));
        config.condition = Some(PathBuf::from("cond.txt"));
        assert!(config.summary().contains("Condition: cond.txt"));
    }
}
