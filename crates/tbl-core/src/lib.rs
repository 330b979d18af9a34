//! tbl-core: Core library for loading, merging and reshaping delimited tables
//!
//! This library provides functionality to:
//! - Map delimited text files into memory and parse them into zero-copy tables
//! - Index columns by name and build composite row keys
//! - Full-outer-join any number of tables on a shared key, detecting conflicts
//! - Cut columns out of a table, or transpose it
//! - Write tables back to delimited text

pub mod columns;
pub mod config;
pub mod cut;
pub mod error;
pub mod keys;
pub mod merger;
pub mod parser;
pub mod report;
pub mod store;
pub mod table;
pub mod transpose;
pub mod writer;

pub use columns::ColumnIndex;
pub use config::{resolve_separator, separator_from_env, MergeOptions, Policy};
pub use cut::{cut, parse_fields};
pub use error::{Error, Result};
pub use keys::{escape, unescape, KeyBuilder, KeySpec};
pub use merger::{merge_files, Merge, MergedTable};
pub use parser::{parse_bytes, parse_file};
pub use report::{MergeReport, Warning};
pub use store::{BackingStore, StoreId, StoreRegistry};
pub use table::{Cell, Row, Span, Table};
pub use transpose::transpose;
pub use writer::write_table;
