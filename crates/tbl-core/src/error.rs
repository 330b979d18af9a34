//! Error types for tbl-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in tbl-core
#[derive(Debug, Error)]
pub enum Error {
    /// Failed to open a source file
    #[error("{}: cannot open file: {source}", path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to memory-map a source file
    #[error("{}: cannot map file: {source}", path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A row does not have the column count established by the header
    #[error("{}:{line}: variable number of columns (expected {expected}, found {found})", path.display())]
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A field contains a NUL byte, which is reserved for composite keys
    #[error("{}:{line}: field contains a NUL byte", path.display())]
    NulByte { path: PathBuf, line: usize },

    /// The file has no header or no data rows
    #[error("{}: file is empty", path.display())]
    EmptyFile { path: PathBuf },

    /// Two header cells share the same name
    #[error("{}: duplicated column \"{name}\"", path.display())]
    DuplicateColumn { path: PathBuf, name: String },

    /// A requested column does not exist
    #[error("{}: unknown column \"{name}\"", path.display())]
    UnknownColumn { path: PathBuf, name: String },

    /// A key column named in the key specification does not exist
    #[error("{}: cannot find key column \"{name}\"", path.display())]
    MissingKeyColumn { path: PathBuf, name: String },

    /// The same composite key appears twice in one file
    #[error("{}:{line}: duplicated key \"{key}\"", path.display())]
    DuplicateKey {
        path: PathBuf,
        line: usize,
        key: String,
    },

    /// Two files disagree on the value of one cell
    #[error(
        "{}: conflicting contents for column \"{column}\", key \"{key}\" (\"{existing}\" vs \"{incoming}\")",
        path.display()
    )]
    Conflict {
        path: PathBuf,
        column: String,
        key: String,
        existing: String,
        incoming: String,
    },

    /// A merge was finished without any source file
    #[error("not enough files loaded")]
    NoInput,

    /// The configured field separator is not a single byte
    #[error("invalid separator \"{0}\": expected a single byte")]
    InvalidSeparator(String),

    /// A key specification or column list is unusable
    #[error("invalid column list \"{0}\"")]
    InvalidKeySpec(String),

    /// The log filter could not be parsed
    #[error("invalid log filter: {0}")]
    Logging(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
