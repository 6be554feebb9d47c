//! Resolved option values.
//!
//! An [`OptionTable`] holds, for every declared option, the raw tokens
//! supplied for each occurrence and where they came from. It is filled
//! by [`OptionTable::parse`] and [`OptionTable::import`], then only read.

use std::ffi::OsString;
use std::path::PathBuf;

use clap::error::{ContextKind, ContextValue, ErrorKind};
use clap::parser::ValueSource;
use clap::ArgMatches;
use tracing::debug;

use crate::error::{ResolveError, UsagePass};
use crate::schema::{Arity, OptionSpec, Schema};

/// Where an option's values were taken from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    CommandLine,
    ArgsFile(PathBuf),
}

/// Values of one option.
#[derive(Debug, Clone, Default)]
pub struct ResolvedValue {
    occurrences: Vec<Vec<String>>,
    source: Option<Source>,
}

impl ResolvedValue {
    /// Whether the user supplied this option (as opposed to its default).
    pub fn is_set(&self) -> bool {
        self.source.is_some()
    }

    /// Raw tokens, one list per occurrence of the flag.
    pub fn occurrences(&self) -> &[Vec<String>] {
        &self.occurrences
    }

    pub fn source(&self) -> Option<&Source> {
        self.source.as_ref()
    }

    /// First value of the first occurrence.
    pub fn first(&self) -> Option<&str> {
        self.occurrences
            .iter()
            .flat_map(|o| o.iter())
            .next()
            .map(String::as_str)
    }
}

/// Every declared option paired with its resolved value.
#[derive(Debug, Clone)]
pub struct OptionTable<'s> {
    schema: &'s Schema,
    values: Vec<ResolvedValue>,
}

impl<'s> OptionTable<'s> {
    /// A table where nothing has been set.
    pub fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            values: vec![ResolvedValue::default(); schema.options().len()],
        }
    }

    /// Parse command-line tokens (without the program name).
    pub fn parse<I, T>(schema: &'s Schema, tokens: I) -> Result<Self, ResolveError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let matches = match_tokens(schema, tokens)
            .map_err(|message| ResolveError::usage(UsagePass::Unrecognized, vec![message]))?;
        let mut table = Self::new(schema);
        let adopted = table.merge(&matches, Source::CommandLine);
        debug!("Command line set {} option(s)", adopted.len());
        Ok(table)
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    pub fn get(&self, flag: &str) -> Option<&ResolvedValue> {
        self.schema.lookup(flag).map(|i| &self.values[i])
    }

    pub fn is_set(&self, flag: &str) -> bool {
        self.get(flag).is_some_and(ResolvedValue::is_set)
    }

    /// Iterate declarations alongside their values, in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'s OptionSpec, &ResolvedValue)> + '_ {
        self.schema.options().iter().zip(self.values.iter())
    }

    /// The value the pipeline should use: the first supplied value,
    /// else the declared default.
    pub fn raw(&self, flag: &str) -> Option<&str> {
        let index = self.schema.lookup(flag)?;
        let value = &self.values[index];
        if value.is_set() {
            value.first()
        } else {
            self.schema.options()[index].default
        }
    }

    /// Every value supplied for `flag`, across all occurrences.
    pub fn all(&self, flag: &str) -> Vec<&str> {
        self.get(flag)
            .map(|v| {
                v.occurrences
                    .iter()
                    .flat_map(|o| o.iter().map(String::as_str))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Adopt the options in `matches` that are not set yet. Returns the
    /// canonical names that were adopted.
    pub(crate) fn merge(&mut self, matches: &ArgMatches, source: Source) -> Vec<&'static str> {
        let mut adopted = Vec::new();
        for (spec, value) in self.schema.options().iter().zip(self.values.iter_mut()) {
            if value.is_set() {
                continue;
            }
            let occurrences = occurrences(matches, spec);
            if occurrences.is_empty() {
                continue;
            }
            value.occurrences = occurrences;
            value.source = Some(source.clone());
            adopted.push(spec.name);
        }
        adopted
    }
}

/// Run tokens through the clap command lowered from `schema`. The error
/// is a single readable line.
pub(crate) fn match_tokens<I, T>(schema: &Schema, tokens: I) -> Result<ArgMatches, String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    schema
        .command()
        .try_get_matches_from(tokens)
        .map_err(|err| describe_clap_error(&err))
}

fn describe_clap_error(err: &clap::Error) -> String {
    let invalid = match err.get(ContextKind::InvalidArg) {
        Some(ContextValue::String(arg)) => Some(arg.clone()),
        _ => None,
    };
    match (err.kind(), invalid) {
        (ErrorKind::UnknownArgument, Some(arg)) => format!("Unrecognized option {arg}."),
        (_, Some(arg)) => format!("Invalid use of {arg}."),
        _ => err
            .to_string()
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_string(),
    }
}

fn occurrences(matches: &ArgMatches, spec: &OptionSpec) -> Vec<Vec<String>> {
    let id = spec.id();
    if spec.arity == Arity::Flag {
        return vec![Vec::new(); usize::from(matches.get_count(id))];
    }

    let mut found: Vec<Vec<String>> = matches
        .get_occurrences::<String>(id)
        .map(|occ| occ.map(|values| values.cloned().collect::<Vec<_>>()).collect())
        .unwrap_or_default();
    // A flag given with no value at all still counts as an occurrence.
    if found.is_empty() && matches.value_source(id) == Some(ValueSource::CommandLine) {
        found.push(Vec::new());
    }
    found
}
