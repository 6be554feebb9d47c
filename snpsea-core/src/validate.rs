//! Per-field validation.
//!
//! Three passes run after merging, each reporting all of its problems
//! at once: required options, argument counts, then the validator
//! attached to each field. The output is a map of tagged values so
//! later stages never reparse text.

use std::collections::HashMap;

use tracing::debug;

use crate::error::{ResolveError, UsagePass};
use crate::schema::{OptionSpec, Validator};
use crate::table::OptionTable;

/// An option value after its field validator ran.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// No validator attached; kept as written.
    Text(String),
    /// Whole number from an integer validator.
    Count(u64),
    /// Finite number from a number validator, not yet truncated.
    Real(f64),
}

/// Values of every option that has one (supplied or defaulted).
#[derive(Debug, Clone, Default)]
pub struct ValidatedOptions {
    values: HashMap<&'static str, (Value, String)>,
}

impl ValidatedOptions {
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).map(|(value, _)| value)
    }

    /// The text the value was validated from.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(|(_, raw)| raw.as_str())
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(Value::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn count(&self, name: &str) -> Option<u64> {
        match self.get(name) {
            Some(Value::Count(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn real(&self, name: &str) -> Option<f64> {
        match self.get(name) {
            Some(Value::Real(x)) => Some(*x),
            _ => None,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Check `raw` against `validator`.
pub fn check(validator: Validator, raw: &str) -> Result<Value, String> {
    let text = raw.trim();
    match validator {
        Validator::NonNegativeInteger | Validator::PositiveInteger => {
            let n: i64 = text.parse().map_err(|_| validator.describe().to_string())?;
            let min = if validator == Validator::PositiveInteger { 1 } else { 0 };
            if n < min {
                return Err(validator.describe().to_string());
            }
            Ok(Value::Count(n as u64))
        }
        Validator::NonNegativeNumber | Validator::FiniteNumber => {
            let x: f64 = text.parse().map_err(|_| validator.describe().to_string())?;
            if !x.is_finite() || (validator == Validator::NonNegativeNumber && x < 0.0) {
                return Err(validator.describe().to_string());
            }
            Ok(Value::Real(x))
        }
    }
}

/// Every required option must be set, by the command line or a file.
pub fn required(table: &OptionTable<'_>) -> Result<(), ResolveError> {
    let problems: Vec<String> = table
        .iter()
        .filter(|(spec, value)| spec.required && !value.is_set())
        .map(|(spec, _)| format!("Missing required option {}.", spec.name))
        .collect();
    finish_pass(UsagePass::MissingRequired, problems)
}

/// Every occurrence of a set option must carry its declared number of values.
pub fn arity(table: &OptionTable<'_>) -> Result<(), ResolveError> {
    let problems: Vec<String> = table
        .iter()
        .filter(|(spec, value)| {
            value
                .occurrences()
                .iter()
                .any(|tokens| spec.arity.supplied(tokens) != spec.arity.expected())
        })
        .map(|(spec, _)| format!("Got unexpected number of arguments for {}.", spec.name))
        .collect();
    finish_pass(UsagePass::ArgumentCount, problems)
}

/// Run each field's validator and collect the tagged values. Every
/// supplied value is checked, even ones a repeated flag leaves unused.
pub fn fields(table: &OptionTable<'_>) -> Result<ValidatedOptions, ResolveError> {
    let mut validated = ValidatedOptions::default();
    let mut problems = Vec::new();

    for (spec, resolved) in table.iter() {
        if !spec.arity.takes_value() {
            continue;
        }
        let supplied = table.all(spec.name);
        let candidates = if resolved.is_set() {
            supplied
        } else {
            spec.default.into_iter().collect()
        };
        for (i, raw) in candidates.into_iter().enumerate() {
            match validate_field(spec, raw) {
                Ok(value) if i == 0 => {
                    validated.values.insert(spec.name, (value, raw.to_string()));
                }
                Ok(_) => {}
                Err(problem) => problems.push(problem),
            }
        }
    }

    finish_pass(UsagePass::InvalidValue, problems)?;
    debug!("Validated {} option value(s)", validated.len());
    Ok(validated)
}

fn validate_field(spec: &OptionSpec, raw: &str) -> Result<Value, String> {
    match spec.validator {
        Some(validator) => check(validator, raw)
            .map_err(|expected| format!("Invalid value for {}: '{raw}' (must be {expected}).", spec.name)),
        None => Ok(Value::Text(raw.to_string())),
    }
}

fn finish_pass(pass: UsagePass, problems: Vec<String>) -> Result<(), ResolveError> {
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ResolveError::usage(pass, problems))
    }
}
