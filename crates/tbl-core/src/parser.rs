//! Delimited-text parser producing zero-copy tables

use crate::error::{Error, Result};
use crate::store::{BackingStore, StoreId, StoreRegistry};
use crate::table::{Cell, Row, Table};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Map a file and parse it into a Table
pub fn parse_file<P: AsRef<Path>>(
    registry: &mut StoreRegistry,
    path: P,
    separator: u8,
) -> Result<Table> {
    let id = registry.map_file(path)?;
    parse_store(registry, id, separator)
}

/// Parse an in-memory buffer (useful for testing)
pub fn parse_bytes<P: Into<PathBuf>>(
    registry: &mut StoreRegistry,
    source_name: P,
    content: impl Into<Vec<u8>>,
    separator: u8,
) -> Result<Table> {
    let id = registry.insert(BackingStore::from_bytes(source_name, content.into()));
    parse_store(registry, id, separator)
}

/// Scan a registered store once and split it into rows and cells
///
/// `\n` ends a row and a preceding `\r` is dropped. Every row must be as wide
/// as the first one; a ragged row fails the whole load.
pub fn parse_store(registry: &StoreRegistry, id: StoreId, separator: u8) -> Result<Table> {
    let store = registry.get(id);
    let path = store.path();
    let bytes: &[u8] = store;

    let mut rows: Vec<Row> = Vec::new();
    let mut missing_final_newline = false;
    let mut start = 0;
    let mut line = 0;

    while start < bytes.len() {
        line += 1;
        let (end, next) = match bytes[start..].iter().position(|&b| b == b'\n') {
            Some(pos) => (start + pos, start + pos + 1),
            None => {
                missing_final_newline = true;
                (bytes.len(), bytes.len())
            }
        };

        let mut content_end = end;
        if content_end > start && bytes[content_end - 1] == b'\r' {
            content_end -= 1;
        }

        if bytes[start..content_end].contains(&0) {
            return Err(Error::NulByte {
                path: path.to_path_buf(),
                line,
            });
        }

        let row = split_line(id, bytes, start, content_end, separator);
        if let Some(first) = rows.first() {
            if row.len() != first.len() {
                return Err(Error::RaggedRow {
                    path: path.to_path_buf(),
                    line,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }
        rows.push(row);
        start = next;
    }

    let mut rows = rows.into_iter();
    let header = rows.next().ok_or_else(|| Error::EmptyFile {
        path: path.to_path_buf(),
    })?;

    if missing_final_newline {
        warn!(path = %path.display(), "missing final newline");
    }

    let table = Table {
        header,
        rows: rows.collect(),
        source: path.to_path_buf(),
        missing_final_newline,
    };
    debug!(
        path = %path.display(),
        columns = table.column_count(),
        rows = table.row_count(),
        "loaded table"
    );

    Ok(table)
}

fn split_line(id: StoreId, bytes: &[u8], start: usize, end: usize, separator: u8) -> Row {
    let mut row = Vec::new();
    let mut field = start;
    for (i, &b) in bytes[start..end].iter().enumerate() {
        if b == separator {
            let pos = start + i;
            row.push(Cell::view(id, field, pos - field));
            field = pos + 1;
        }
    }
    row.push(Cell::view(id, field, end - field));
    row
}
