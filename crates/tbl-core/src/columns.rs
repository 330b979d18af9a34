//! Column name to position mapping

use crate::error::{Error, Result};
use crate::store::StoreRegistry;
use crate::table::Table;
use std::collections::HashMap;
use std::path::Path;

/// Name→position index over a table header
///
/// Duplicate names fail when the index is built; unknown names fail only
/// when they are looked up.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndex {
    positions: HashMap<Vec<u8>, usize>,
}

impl ColumnIndex {
    /// Build the index from a table's header row
    pub fn build(registry: &StoreRegistry, table: &Table) -> Result<Self> {
        let mut index = Self::default();
        for (i, cell) in table.header.iter().enumerate() {
            let name = cell.bytes_or_empty(registry);
            if !index.push(name, i) {
                return Err(Error::DuplicateColumn {
                    path: table.source.clone(),
                    name: String::from_utf8_lossy(name).into_owned(),
                });
            }
        }
        Ok(index)
    }

    /// Record `name` at `position`; false if the name is already taken
    pub fn push(&mut self, name: &[u8], position: usize) -> bool {
        if self.positions.contains_key(name) {
            return false;
        }
        self.positions.insert(name.to_vec(), position);
        true
    }

    pub fn get(&self, name: &[u8]) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Look up a column, failing with `UnknownColumn`
    pub fn require(&self, name: &str, path: &Path) -> Result<usize> {
        self.get(name.as_bytes()).ok_or_else(|| Error::UnknownColumn {
            path: path.to_path_buf(),
            name: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_bytes;

    fn index_of(content: &str) -> Result<ColumnIndex> {
        let mut registry = StoreRegistry::new();
        let table = parse_bytes(&mut registry, "cols.tsv", content, b'\t')?;
        ColumnIndex::build(&registry, &table)
    }

    #[test]
    fn test_positions() {
        let index = index_of("id\tname\tvalue\n").unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(b"id"), Some(0));
        assert_eq!(index.get(b"value"), Some(2));
        assert_eq!(index.get(b"missing"), None);
    }

    #[test]
    fn test_duplicate_column_fails_at_build() {
        let err = index_of("id\tname\tid\n1\t2\t3\n").unwrap_err();
        match err {
            Error::DuplicateColumn { name, .. } => assert_eq!(name, "id"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_column_fails_at_lookup() {
        let index = index_of("id\tname\n").unwrap();
        assert_eq!(index.require("name", Path::new("cols.tsv")).unwrap(), 1);
        assert!(matches!(
            index.require("nope", Path::new("cols.tsv")),
            Err(Error::UnknownColumn { .. })
        ));
    }

    #[test]
    fn test_push_rejects_taken_name() {
        let mut index = ColumnIndex::default();
        assert!(index.push(b"a", 0));
        assert!(!index.push(b"a", 1));
        assert_eq!(index.get(b"a"), Some(0));
    }
}
