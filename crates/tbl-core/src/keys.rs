//! Key specifications and composite row keys
//!
//! A key specification is typed as a comma-separated list of column names,
//! with `\,` standing for a literal comma inside a name. Internally the list
//! is joined with NUL, the same byte that joins the values of a composite
//! key. NUL can never appear in a parsed field, so composite keys of equal
//! arity collide only when every component is equal.

use crate::columns::ColumnIndex;
use crate::config::Policy;
use crate::error::{Error, Result};
use crate::store::StoreRegistry;
use crate::table::{Row, Table};
use std::collections::HashSet;
use std::path::Path;

/// Separator between the components of a composite key
pub const KEY_SEPARATOR: u8 = 0;

/// Turn a typed column list into its NUL-joined form
pub fn unescape(list: &str) -> Vec<u8> {
    let bytes = list.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if bytes.get(i + 1) == Some(&b',') => {
                out.push(b',');
                i += 2;
                continue;
            }
            b',' => out.push(KEY_SEPARATOR),
            b => out.push(b),
        }
        i += 1;
    }
    out
}

/// Render a NUL-joined key or column list the way a user would type it
pub fn escape(key: &[u8]) -> String {
    let mut out = Vec::with_capacity(key.len());
    for &b in key {
        match b {
            b',' => out.extend_from_slice(b"\\,"),
            KEY_SEPARATOR => out.push(b','),
            b => out.push(b),
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Split a typed column list into names
///
/// With `coalesce`, empty entries (`a,,b`) are dropped.
pub fn split_names(list: &str, coalesce: bool) -> Vec<String> {
    unescape(list)
        .split(|&b| b == KEY_SEPARATOR)
        .filter(|name| !coalesce || !name.is_empty())
        .map(|name| String::from_utf8_lossy(name).into_owned())
        .collect()
}

/// Ordered list of key column names shared by every file of a merge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySpec {
    names: Vec<String>,
}

impl KeySpec {
    /// Parse a typed key specification such as `id` or `chr,pos`
    pub fn parse(spec: &str) -> Result<Self> {
        if spec.is_empty() {
            return Err(Error::InvalidKeySpec(spec.to_string()));
        }
        Ok(Self {
            names: split_names(spec, false),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl std::fmt::Display for KeySpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let joined = self.names.join("\0");
        write!(f, "{}", escape(joined.as_bytes()))
    }
}

/// A key specification resolved against one table
#[derive(Debug, Clone)]
pub struct KeyBuilder {
    columns: Vec<Option<usize>>,
    missing: Vec<String>,
}

impl KeyBuilder {
    /// Resolve every key name to a local column position
    ///
    /// Under [`Policy::KeepGoing`] a missing column is remembered and later
    /// contributes an empty component, keeping the key arity unchanged.
    pub fn resolve(spec: &KeySpec, index: &ColumnIndex, path: &Path, policy: Policy) -> Result<Self> {
        let mut columns = Vec::with_capacity(spec.len());
        let mut missing = Vec::new();
        for name in spec.names() {
            match index.get(name.as_bytes()) {
                Some(pos) => columns.push(Some(pos)),
                None if policy.keep_going() => {
                    columns.push(None);
                    missing.push(name.clone());
                }
                None => {
                    return Err(Error::MissingKeyColumn {
                        path: path.to_path_buf(),
                        name: name.clone(),
                    })
                }
            }
        }
        Ok(Self { columns, missing })
    }

    /// Key names that could not be found in this table
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Composite key of one row
    pub fn key(&self, registry: &StoreRegistry, row: &Row) -> Vec<u8> {
        let mut key = Vec::new();
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                key.push(KEY_SEPARATOR);
            }
            if let Some(pos) = column {
                key.extend_from_slice(row[*pos].bytes_or_empty(registry));
            }
        }
        key
    }

    /// Compute the key of every data row and check they are unique
    ///
    /// A repeated key fails under [`Policy::Strict`]; otherwise it is listed
    /// in [`RowKeys::duplicates`] and only its first occurrence counts.
    pub fn index_rows(&self, registry: &StoreRegistry, table: &Table, policy: Policy) -> Result<RowKeys> {
        let keys: Vec<Vec<u8>> = table.rows.iter().map(|row| self.key(registry, row)).collect();

        let mut duplicates = Vec::new();
        let mut seen: HashSet<&[u8]> = HashSet::with_capacity(keys.len());
        for (row, key) in keys.iter().enumerate() {
            if !seen.insert(key.as_slice()) {
                let line = Table::line_of(row);
                if !policy.keep_going() {
                    return Err(Error::DuplicateKey {
                        path: table.source.clone(),
                        line,
                        key: escape(key),
                    });
                }
                duplicates.push(DuplicateKey {
                    row,
                    line,
                    key: escape(key),
                });
            }
        }

        Ok(RowKeys { keys, duplicates })
    }
}

/// A repeated key found while indexing one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey {
    /// Index of the repeated data row
    pub row: usize,
    pub line: usize,
    pub key: String,
}

/// Composite keys of a table's data rows, in row order
#[derive(Debug, Clone)]
pub struct RowKeys {
    pub keys: Vec<Vec<u8>>,
    pub duplicates: Vec<DuplicateKey>,
}

impl RowKeys {
    /// Keys paired with whether their row repeats an earlier key
    pub fn into_flagged(self) -> impl Iterator<Item = (Vec<u8>, bool)> {
        let mut repeated = vec![false; self.keys.len()];
        for duplicate in &self.duplicates {
            repeated[duplicate.row] = true;
        }
        self.keys.into_iter().zip(repeated)
    }
}
