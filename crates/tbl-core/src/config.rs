//! Run configuration shared by every tool

use crate::error::{Error, Result};
use serde::Serialize;

/// Field separator used when neither a flag nor the environment sets one
pub const DEFAULT_SEPARATOR: u8 = b'\t';

/// Environment variable overriding the default separator
pub const SEPARATOR_ENV: &str = "TBLSEP";

/// How recoverable conditions are treated during a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Policy {
    /// Abort the run on the first duplicate key, missing key column or conflict
    #[default]
    Strict,
    /// Log those conditions as warnings and keep processing
    KeepGoing,
}

impl Policy {
    pub fn keep_going(self) -> bool {
        matches!(self, Policy::KeepGoing)
    }
}

/// Options for a merge run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeOptions {
    pub separator: u8,
    pub policy: Policy,
}

impl Default for MergeOptions {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR,
            policy: Policy::Strict,
        }
    }
}

impl MergeOptions {
    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_separator(mut self, separator: u8) -> Self {
        self.separator = separator;
        self
    }
}

/// Pick the field separator: an explicit value wins, then a non-empty
/// environment value, then tab.
pub fn resolve_separator(explicit: Option<&str>, env: Option<&str>) -> Result<u8> {
    match explicit {
        Some(value) => parse_separator(value),
        None => match env {
            Some(value) if !value.is_empty() => parse_separator(value),
            _ => Ok(DEFAULT_SEPARATOR),
        },
    }
}

/// Resolve the separator against the process environment
pub fn separator_from_env(explicit: Option<&str>) -> Result<u8> {
    let env = std::env::var(SEPARATOR_ENV).ok();
    resolve_separator(explicit, env.as_deref())
}

fn parse_separator(value: &str) -> Result<u8> {
    match value.as_bytes() {
        [b] if *b != b'\n' && *b != b'\r' && *b != 0 => Ok(*b),
        b"\\t" => Ok(b'\t'),
        _ => Err(Error::InvalidSeparator(value.to_string())),
    }
}
