//! Warnings collected while merging under the keep-going policy

use crate::config::Policy;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::warn;

/// A non-fatal condition raised during a merge
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    MissingFinalNewline {
        path: PathBuf,
    },
    MissingKeyColumn {
        path: PathBuf,
        column: String,
    },
    DuplicateKey {
        path: PathBuf,
        line: usize,
        key: String,
    },
    Conflict {
        path: PathBuf,
        column: String,
        key: String,
        existing: String,
        incoming: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingFinalNewline { path } => {
                write!(f, "{}: missing final newline", path.display())
            }
            Warning::MissingKeyColumn { path, column } => {
                write!(f, "{}: cannot find key column \"{}\"", path.display(), column)
            }
            Warning::DuplicateKey { path, line, key } => {
                write!(f, "{}:{}: duplicated key \"{}\"", path.display(), line, key)
            }
            Warning::Conflict {
                path,
                column,
                key,
                existing,
                incoming,
            } => write!(
                f,
                "{}: conflicting contents for column \"{}\", key \"{}\" (kept \"{}\", dropped \"{}\")",
                path.display(),
                column,
                key,
                existing,
                incoming
            ),
        }
    }
}

/// Summary of a merge run
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    pub policy: Policy,
    /// Files folded in, in merge order
    pub files: Vec<PathBuf>,
    /// Width of the merged table
    pub columns: usize,
    /// Data rows of the merged table
    pub rows: usize,
    pub warnings: Vec<Warning>,
}

impl MergeReport {
    /// Log a warning and keep it
    pub fn warn(&mut self, warning: Warning) {
        warn!("{}", warning);
        self.record(warning);
    }

    /// Keep a warning that was already logged where it was detected
    pub fn record(&mut self, warning: Warning) {
        self.warnings.push(warning);
    }

    pub fn conflicts(&self) -> impl Iterator<Item = &Warning> {
        self.warnings
            .iter()
            .filter(|w| matches!(w, Warning::Conflict { .. }))
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
