//! Serializer writing tables back to delimited text

use crate::error::Result;
use crate::store::StoreRegistry;
use crate::table::{Cell, Table};
use std::io::{BufWriter, Write};

/// Write the header and every row, fields joined by `separator`
///
/// Absent cells are written as empty fields. Nothing is quoted.
pub fn write_table<W: Write>(
    registry: &StoreRegistry,
    table: &Table,
    separator: u8,
    writer: W,
) -> Result<()> {
    let mut writer = BufWriter::new(writer);
    write_row(registry, &table.header, separator, &mut writer)?;
    for row in &table.rows {
        write_row(registry, row, separator, &mut writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_row<W: Write>(
    registry: &StoreRegistry,
    row: &[Cell],
    separator: u8,
    writer: &mut W,
) -> std::io::Result<()> {
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            writer.write_all(&[separator])?;
        }
        writer.write_all(cell.bytes_or_empty(registry))?;
    }
    writer.write_all(b"\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_bytes;

    #[test]
    fn test_round_trips_parsed_table() {
        let mut registry = StoreRegistry::new();
        let content = "a\tb\tc\n1\t\t3\n4\t5\t6\n";
        let table = parse_bytes(&mut registry, "w.tsv", content, b'\t').unwrap();

        let mut out = Vec::new();
        write_table(&registry, &table, b'\t', &mut out).unwrap();
        assert_eq!(out, content.as_bytes());
    }

    #[test]
    fn test_absent_cells_and_crlf_input() {
        let mut registry = StoreRegistry::new();
        let mut table = parse_bytes(&mut registry, "w.csv", "a,b\r\n1,2", b',').unwrap();
        table.push_blank_row();

        let mut out = Vec::new();
        write_table(&registry, &table, b';', &mut out).unwrap();
        assert_eq!(out, b"a;b\n1;2\n;\n");
    }
}
