//! Table transposition

use crate::table::{Row, Table};

/// Swap rows and columns; column x of the input, header cell first,
/// becomes row x of the output.
pub fn transpose(table: &Table) -> Table {
    let height = table.row_count() + 1;
    let mut columns: Vec<Row> = (0..table.column_count())
        .map(|_| Vec::with_capacity(height))
        .collect();

    for row in std::iter::once(&table.header).chain(&table.rows) {
        for (x, cell) in row.iter().enumerate() {
            columns[x].push(*cell);
        }
    }

    let mut rows = columns.into_iter();
    let header = rows.next().unwrap_or_default();
    Table {
        header,
        rows: rows.collect(),
        source: table.source.clone(),
        missing_final_newline: false,
    }
}
