//! Option declarations.
//!
//! The schema is the single source of truth for every flag SNPsea
//! accepts: aliases, arity, default, required status, help text, and
//! the validator applied after merging. It is lowered into a
//! [`clap::Command`] for tokenizing and for rendering usage text.

use clap::{Arg, ArgAction, Command};

pub const HELP: &str = "--help";
pub const VERSION: &str = "--version";
pub const ARGS: &str = "--args";
pub const SNPS: &str = "--snps";
pub const GENE_MATRIX: &str = "--gene-matrix";
pub const GENE_INTERVALS: &str = "--gene-intervals";
pub const SNP_INTERVALS: &str = "--snp-intervals";
pub const NULL_SNPS: &str = "--null-snps";
pub const OUT: &str = "--out";
pub const CONDITION: &str = "--condition";
pub const SLOP: &str = "--slop";
pub const SCORE: &str = "--score";
pub const THREADS: &str = "--threads";
pub const NULL_SNPSETS: &str = "--null-snpsets";
pub const MIN_OBSERVATIONS: &str = "--min-observations";
pub const MAX_ITERATIONS: &str = "--max-iterations";

/// Comment character for `--args` files.
pub const ARGS_COMMENT: char = '#';

/// Number of values an option expects per occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// A switch; takes no value.
    Flag,
    /// Exactly one value.
    One,
    /// `count` values packed into tokens separated by `delimiter`
    /// (e.g. `--window 1,2,3`).
    Delimited { count: usize, delimiter: char },
}

impl Arity {
    /// Number of values expected per occurrence.
    pub fn expected(&self) -> usize {
        match self {
            Arity::Flag => 0,
            Arity::One => 1,
            Arity::Delimited { count, .. } => *count,
        }
    }

    /// Count the values supplied in one occurrence.
    pub fn supplied(&self, tokens: &[String]) -> usize {
        match self {
            Arity::Delimited { delimiter, .. } => tokens
                .iter()
                .map(|t| t.split(*delimiter).filter(|p| !p.is_empty()).count())
                .sum(),
            _ => tokens.len(),
        }
    }

    pub fn takes_value(&self) -> bool {
        !matches!(self, Arity::Flag)
    }
}

/// Per-field constraint checked independently of every other field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Integer >= 0.
    NonNegativeInteger,
    /// Integer >= 1.
    PositiveInteger,
    /// Finite number >= 0; scientific notation allowed.
    NonNegativeNumber,
    /// Any finite number; scientific notation allowed.
    FiniteNumber,
}

impl Validator {
    pub fn describe(&self) -> &'static str {
        match self {
            Validator::NonNegativeInteger => "an integer >= 0",
            Validator::PositiveInteger => "an integer >= 1",
            Validator::NonNegativeNumber => "a number >= 0",
            Validator::FiniteNumber => "a finite number",
        }
    }
}

/// Declaration of one logical option.
#[derive(Debug, Clone)]
pub struct OptionSpec {
    /// Canonical flag, used as the key everywhere else (e.g. `--snps`).
    pub name: &'static str,
    /// Every flag token that refers to this option, `name` included.
    pub flags: Vec<&'static str>,
    pub default: Option<&'static str>,
    pub required: bool,
    pub arity: Arity,
    pub help: &'static str,
    pub value_name: Option<&'static str>,
    pub validator: Option<Validator>,
}

impl OptionSpec {
    /// Declare an option from its flag tokens. The last long flag
    /// becomes the canonical name. Defaults to one value, optional,
    /// no default, no validator.
    pub fn new(flags: &[&'static str], help: &'static str) -> Self {
        assert!(!flags.is_empty(), "an option needs at least one flag token");
        let name = flags
            .iter()
            .rev()
            .find(|f| f.starts_with("--"))
            .copied()
            .unwrap_or(flags[0]);
        Self {
            name,
            flags: flags.to_vec(),
            default: None,
            required: false,
            arity: Arity::One,
            help,
            value_name: None,
            validator: None,
        }
    }

    pub fn flag(mut self) -> Self {
        self.arity = Arity::Flag;
        self
    }

    pub fn arity(mut self, arity: Arity) -> Self {
        self.arity = arity;
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn value_name(mut self, name: &'static str) -> Self {
        self.value_name = Some(name);
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// clap argument id: the canonical name without leading dashes.
    pub fn id(&self) -> &'static str {
        self.name.trim_start_matches('-')
    }

    fn to_arg(&self) -> Arg {
        let mut help = self.help.to_string();
        if let Some(default) = self.default {
            help.push_str(&format!(" [default: {default}]"));
        }
        if self.required {
            help.push_str(" [required]");
        }

        let mut arg = Arg::new(self.id()).help(help);
        let mut has_long = false;
        let mut has_short = false;
        for flag in &self.flags {
            if let Some(long) = flag.strip_prefix("--") {
                arg = if has_long {
                    arg.visible_alias(long)
                } else {
                    arg.long(long)
                };
                has_long = true;
            } else if let Some(c) = single_short(flag) {
                arg = if has_short {
                    arg.visible_short_alias(c)
                } else {
                    arg.short(c)
                };
                has_short = true;
            }
        }

        match self.arity {
            Arity::Flag => arg.action(ArgAction::Count),
            // Arity is checked after merging so that every problem of
            // that kind is reported in one batch; clap keeps whatever
            // follows the flag. A following token that starts with '-'
            // and is not a number is a flag; `--out=-dir` passes such a
            // value attached.
            _ => {
                let arg = arg
                    .num_args(0..)
                    .action(ArgAction::Append)
                    .allow_negative_numbers(true);
                match self.value_name {
                    Some(name) => arg.value_name(name),
                    None => arg,
                }
            }
        }
    }
}

fn single_short(flag: &str) -> Option<char> {
    let rest = flag.strip_prefix('-')?;
    let mut chars = rest.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// All declared options plus the prose around the usage text.
#[derive(Debug, Clone)]
pub struct Schema {
    program: &'static str,
    overview: String,
    syntax: String,
    example: String,
    footer: String,
    options: Vec<OptionSpec>,
}

impl Schema {
    pub fn new(program: &'static str) -> Self {
        Self {
            program,
            overview: String::new(),
            syntax: format!("{program} [OPTIONS]"),
            example: String::new(),
            footer: String::new(),
            options: Vec::new(),
        }
    }

    /// Register an option.
    ///
    /// # Panics
    /// If any of its flag tokens is already declared.
    pub fn declare(&mut self, spec: OptionSpec) -> &mut Self {
        for flag in &spec.flags {
            assert!(
                self.lookup(flag).is_none(),
                "flag {flag} is declared more than once"
            );
        }
        self.options.push(spec);
        self
    }

    /// The SNPsea command line.
    pub fn snpsea() -> Self {
        let mut schema = Schema::new("snpsea");
        schema.overview = "SNPsea: an algorithm to identify cell types, tissues, and pathways\n\
                           affected by risk loci"
            .to_string();
        schema.example = "Example:\n    \
            snpsea --snps file.txt               \\ # or  --snps random20\n           \
            --gene-matrix file.gct.gz     \\\n           \
            --null-snps file.txt          \\\n           \
            --snp-intervals file.bed.gz   \\\n           \
            --gene-intervals file.bed.gz  \\\n           \
            --condition file.txt          \\\n           \
            --out folder                  \\\n           \
            --score single                \\\n           \
            --slop 10e3                   \\\n           \
            --threads 2                   \\\n           \
            --null-snpsets 100            \\\n           \
            --min-observations 25         \\\n           \
            --max-iterations 1e6"
            .to_string();
        schema.footer = format!(
            "SNPsea {}\nThis program is free and without warranty under the GPLv3 license.",
            crate::VERSION
        );

        schema
            .declare(OptionSpec::new(&["-h", HELP], "Display usage instructions.").flag())
            .declare(OptionSpec::new(&["-v", VERSION], "Display version and exit.").flag())
            .declare(
                OptionSpec::new(&[ARGS], "Text file with SNPsea arguments. May be repeated.")
                    .value_name("FILE"),
            )
            .declare(
                OptionSpec::new(
                    &[SNPS],
                    "Text file with SNP identifiers in the first column. Instead of a \
                     file name, you may use 'randomN' with an integer N for a random SNP \
                     list of length N.",
                )
                .value_name("FILE")
                .required(),
            )
            .declare(
                OptionSpec::new(
                    &[GENE_MATRIX],
                    "Gene matrix file in GCT format. The Name column must contain the \
                     same gene identifiers as in --gene-intervals.",
                )
                .value_name("FILE")
                .required(),
            )
            .declare(
                OptionSpec::new(
                    &[GENE_INTERVALS],
                    "BED file with gene intervals. The fourth column must contain the \
                     same gene identifiers as in --gene-matrix.",
                )
                .value_name("FILE")
                .required(),
            )
            .declare(
                OptionSpec::new(
                    &[SNP_INTERVALS],
                    "BED file with all known SNP intervals. The fourth column must \
                     contain the same SNP identifiers as in --snps and --null-snps.",
                )
                .value_name("FILE")
                .required(),
            )
            .declare(
                OptionSpec::new(
                    &[NULL_SNPS],
                    "Text file with SNP identifiers to sample when generating null \
                     matched or random SNP sets. These SNPs must be a subset of \
                     --snp-intervals.",
                )
                .value_name("FILE")
                .required(),
            )
            .declare(
                OptionSpec::new(&[OUT], "Create output files in this directory.")
                    .value_name("DIR")
                    .required(),
            )
            .declare(
                OptionSpec::new(
                    &[CONDITION],
                    "Text file with a list of columns in --gene-matrix to condition on \
                     before calculating p-values.",
                )
                .value_name("FILE"),
            )
            .declare(
                OptionSpec::new(
                    &[SLOP],
                    "If a SNP overlaps no gene intervals, extend the SNP interval this \
                     many nucleotides further and try again.",
                )
                .value_name("N")
                .default_value("10000")
                .validator(Validator::NonNegativeNumber),
            )
            .declare(
                OptionSpec::new(
                    &[SCORE],
                    "Score each SNP locus with its 'single' most specific gene or the \
                     'total' of all genes in the locus.",
                )
                .value_name("METHOD")
                .default_value("single"),
            )
            .declare(
                OptionSpec::new(&[THREADS], "Number of threads to use.")
                    .value_name("N")
                    .default_value("1")
                    .validator(Validator::PositiveInteger),
            )
            .declare(
                OptionSpec::new(
                    &[NULL_SNPSETS],
                    "Generate a distribution of scores with N null matched SNP sets to \
                     evaluate type 1 error.",
                )
                .value_name("N")
                .default_value("10")
                .validator(Validator::NonNegativeInteger),
            )
            .declare(
                OptionSpec::new(
                    &[MIN_OBSERVATIONS],
                    "Stop testing a column in --gene-matrix after observing this many \
                     null SNP sets with specificity scores greater or equal to those \
                     obtained with the SNPs in --snps.",
                )
                .value_name("N")
                .default_value("25")
                .validator(Validator::PositiveInteger),
            )
            .declare(
                OptionSpec::new(
                    &[MAX_ITERATIONS],
                    "Maximum number of null SNP sets tested against each column in \
                     --gene-matrix. Increase this value to resolve small p-values.",
                )
                .value_name("N")
                .default_value("1000")
                .validator(Validator::FiniteNumber),
            );

        schema
    }

    pub fn options(&self) -> &[OptionSpec] {
        &self.options
    }

    /// Index of the option that owns `flag` (any alias).
    pub fn lookup(&self, flag: &str) -> Option<usize> {
        self.options
            .iter()
            .position(|o| o.flags.iter().any(|f| *f == flag))
    }

    pub fn get(&self, flag: &str) -> Option<&OptionSpec> {
        self.lookup(flag).map(|i| &self.options[i])
    }

    /// Lower the schema into a clap command that parses tokens without
    /// a leading binary name. Help and version are ordinary options here.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(self.program)
            .no_binary_name(true)
            .disable_help_flag(true)
            .disable_version_flag(true)
            .override_usage(self.syntax.clone())
            .about(self.overview.clone())
            .after_help(format!("{}\n\n{}", self.example, self.footer));
        for spec in &self.options {
            cmd = cmd.arg(spec.to_arg());
        }
        cmd
    }

    /// Usage text listing every declared flag.
    pub fn usage(&self) -> String {
        self.command().render_help().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_lists_every_flag() {
        let schema = Schema::snpsea();
        let usage = schema.usage();
        assert!(!usage.is_empty());
        for spec in schema.options() {
            for flag in &spec.flags {
                assert!(usage.contains(flag), "usage is missing {flag}");
            }
        }
        assert!(usage.contains("random20"));
    }

    #[test]
    fn test_lookup_by_alias() {
        let schema = Schema::snpsea();
        assert_eq!(schema.lookup("-h"), schema.lookup(HELP));
        assert_eq!(schema.get("-v").map(|s| s.name), Some(VERSION));
        assert!(schema.lookup("--nope").is_none());
    }

    #[test]
    fn test_required_options() {
        let schema = Schema::snpsea();
        let required: Vec<&str> = schema
            .options()
            .iter()
            .filter(|o| o.required)
            .map(|o| o.name)
            .collect();
        assert_eq!(
            required,
            vec![SNPS, GENE_MATRIX, GENE_INTERVALS, SNP_INTERVALS, NULL_SNPS, OUT]
        );
    }

    #[test]
    #[should_panic(expected = "declared more than once")]
    fn test_duplicate_flag_panics() {
        let mut schema = Schema::new("demo");
        schema.declare(OptionSpec::new(&["-o", "--out"], "output"));
        schema.declare(OptionSpec::new(&["--out"], "again"));
    }

    #[test]
    fn test_delimited_arity_counts_pieces() {
        let arity = Arity::Delimited {
            count: 3,
            delimiter: ',',
        };
        assert_eq!(arity.supplied(&["1,2,3".to_string()]), 3);
        assert_eq!(arity.supplied(&["1,2".to_string()]), 2);
        assert_eq!(Arity::One.supplied(&[]), 0);
        assert_eq!(Arity::Flag.expected(), 0);
    }
}
