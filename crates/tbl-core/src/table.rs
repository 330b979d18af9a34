//! Core table types: zero-copy cells over registered backing stores

use crate::store::{StoreId, StoreRegistry};
use std::borrow::Cow;
use std::path::PathBuf;

/// A byte range inside one backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub store: StoreId,
    pub start: usize,
    pub len: usize,
}

/// A single field value
///
/// `Absent` marks a cell that was never written (a column or row introduced
/// by a merge); a present-but-empty field is a `View` of length zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Absent,
    View(Span),
}

impl Cell {
    pub fn view(store: StoreId, start: usize, len: usize) -> Self {
        Cell::View(Span { store, start, len })
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Cell::Absent)
    }

    /// Absent, or present with no bytes
    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Absent => true,
            Cell::View(span) => span.len == 0,
        }
    }

    /// Resolve the cell against the registry that owns its store
    pub fn bytes<'r>(&self, registry: &'r StoreRegistry) -> Option<&'r [u8]> {
        match self {
            Cell::Absent => None,
            Cell::View(span) => Some(registry.slice(span.store, span.start, span.len)),
        }
    }

    /// Bytes of the cell, absent rendering as empty
    pub fn bytes_or_empty<'r>(&self, registry: &'r StoreRegistry) -> &'r [u8] {
        self.bytes(registry).unwrap_or_default()
    }

    /// Lossy text of the cell for diagnostics
    pub fn text<'r>(&self, registry: &'r StoreRegistry) -> Cow<'r, str> {
        String::from_utf8_lossy(self.bytes_or_empty(registry))
    }
}

/// A row of cells, one per column
pub type Row = Vec<Cell>;

/// A parsed table: header row plus data rows
#[derive(Debug, Clone)]
pub struct Table {
    /// Column names
    pub header: Row,
    /// Row data, every row as wide as the header
    pub rows: Vec<Row>,
    /// Source file path
    pub source: PathBuf,
    /// The last line of the source had no terminating newline
    pub missing_final_newline: bool,
}

impl Table {
    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Get the number of data rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// 1-based line of a data row in its source file
    pub fn line_of(row: usize) -> usize {
        row + 2
    }

    /// Header name of column `col`, lossy for diagnostics
    pub fn column_name<'r>(&self, registry: &'r StoreRegistry, col: usize) -> Cow<'r, str> {
        self.header
            .get(col)
            .map(|c| c.text(registry))
            .unwrap_or(Cow::Borrowed(""))
    }

    /// Append an empty column named by `name` to the header and every row
    pub fn push_column(&mut self, name: Cell) {
        self.header.push(name);
        for row in &mut self.rows {
            row.push(Cell::Absent);
        }
    }

    /// Append a row of absent cells and return its index
    pub fn push_blank_row(&mut self) -> usize {
        self.rows.push(vec![Cell::Absent; self.header.len()]);
        self.rows.len() - 1
    }

    /// Header and data rows as text, for assertions and debugging
    pub fn to_strings(&self, registry: &StoreRegistry) -> Vec<Vec<String>> {
        std::iter::once(&self.header)
            .chain(self.rows.iter())
            .map(|row| row.iter().map(|c| c.text(registry).into_owned()).collect())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::BackingStore;

    fn registry() -> (StoreRegistry, StoreId) {
        let mut registry = StoreRegistry::new();
        let id = registry.insert(BackingStore::from_bytes("t", b"id\tname".to_vec()));
        (registry, id)
    }

    #[test]
    fn test_absent_is_not_empty_view() {
        let (registry, id) = registry();
        let empty = Cell::view(id, 2, 0);

        assert!(Cell::Absent.is_absent());
        assert!(!empty.is_absent());
        assert!(empty.is_blank());
        assert!(Cell::Absent.is_blank());
        assert_eq!(Cell::Absent.bytes(&registry), None);
        assert_eq!(empty.bytes(&registry), Some(&b""[..]));
    }

    #[test]
    fn test_cell_text() {
        let (registry, id) = registry();
        assert_eq!(Cell::view(id, 3, 4).text(&registry), "name");
        assert_eq!(Cell::Absent.text(&registry), "");
    }

    #[test]
    fn test_push_column_extends_rows() {
        let (registry, id) = registry();
        let mut table = Table {
            header: vec![Cell::view(id, 0, 2)],
            rows: vec![vec![Cell::view(id, 3, 4)]],
            source: PathBuf::from("t"),
            missing_final_newline: false,
        };

        table.push_column(Cell::view(id, 3, 4));
        let blank = table.push_blank_row();

        assert_eq!(table.column_count(), 2);
        assert_eq!(blank, 1);
        assert!(table.rows.iter().all(|r| r.len() == 2));
        assert_eq!(
            table.to_strings(&registry),
            vec![
                vec!["id".to_string(), "name".to_string()],
                vec!["name".to_string(), String::new()],
                vec![String::new(), String::new()],
            ]
        );
    }
}
