//! `--args` files.
//!
//! An argument file holds command-line tokens spread over lines:
//! ```text
//! # shared inputs for every run
//! --gene-matrix data/GeneAtlas2004.gct.gz
//! --gene-intervals data/NCBIgenes2013.bed.gz
//! --slop 100e3
//! ```
//! Lines whose first non-blank character is the comment character are
//! skipped; the rest are split on whitespace and parsed like the
//! command line. A value holding whitespace is written in double quotes
//! (`--out "my results/run1"`); inside quotes `\"` and `\\` escape a
//! quote and a backslash. Values already in the table are never replaced.

use std::path::Path;

use tracing::debug;

use crate::error::ImportError;
use crate::table::{match_tokens, OptionTable, Source};

/// Split argument-file contents into tokens.
pub fn tokenize(contents: &str, comment: char) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with(comment))
        .flat_map(split_line)
        .collect()
}

/// Split one line on whitespace, keeping double-quoted runs together.
/// An unterminated quote runs to the end of the line.
fn split_line(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quoted = false;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            '\\' if quoted => match chars.next() {
                Some(next @ ('"' | '\\')) => current.push(next),
                Some(next) => {
                    current.push(c);
                    current.push(next);
                }
                None => current.push(c),
            },
            c if c.is_whitespace() && !quoted => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        tokens.push(current);
    }
    tokens
}

/// Quote a value for an argument file when splitting would break it up.
pub fn quote(value: &str) -> String {
    let plain = !value.is_empty() && !value.contains(|c: char| c.is_whitespace() || c == '"');
    if plain {
        return value.to_string();
    }
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Read an argument file into tokens.
pub fn read_tokens(path: &Path, comment: char) -> Result<Vec<String>, ImportError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ImportError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(tokenize(&contents, comment))
}

impl OptionTable<'_> {
    /// Merge the options in an argument file into the table, leaving
    /// anything already set untouched. Returns the canonical names of
    /// the options this file supplied.
    pub fn import(&mut self, path: &Path, comment: char) -> Result<Vec<&'static str>, ImportError> {
        let tokens = read_tokens(path, comment)?;
        let matches = match_tokens(self.schema(), tokens).map_err(|message| ImportError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        let adopted = self.merge(&matches, Source::ArgsFile(path.to_path_buf()));
        debug!(
            "Imported {} option(s) from {}: {:?}",
            adopted.len(),
            path.display(),
            adopted
        );
        Ok(adopted)
    }
}
