//! Column extraction by name

use crate::columns::ColumnIndex;
use crate::error::{Error, Result};
use crate::keys::split_names;
use crate::store::StoreRegistry;
use crate::table::{Row, Table};

/// Parse a `-f col,col,...` list; empty entries are skipped
pub fn parse_fields(list: &str) -> Result<Vec<String>> {
    let fields = split_names(list, true);
    if fields.is_empty() {
        return Err(Error::InvalidKeySpec(list.to_string()));
    }
    Ok(fields)
}

/// Keep only `fields`, in the order given, header included
///
/// A field may be requested more than once.
pub fn cut(registry: &StoreRegistry, table: &Table, fields: &[String]) -> Result<Table> {
    if fields.is_empty() {
        return Err(Error::InvalidKeySpec(String::new()));
    }

    let index = ColumnIndex::build(registry, table)?;
    let positions = fields
        .iter()
        .map(|name| index.require(name, &table.source))
        .collect::<Result<Vec<_>>>()?;

    let project = |row: &Row| -> Row { positions.iter().map(|&p| row[p]).collect() };

    Ok(Table {
        header: project(&table.header),
        rows: table.rows.iter().map(project).collect(),
        source: table.source.clone(),
        missing_final_newline: table.missing_final_newline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_bytes;

    fn load(content: &str) -> (StoreRegistry, Table) {
        let mut registry = StoreRegistry::new();
        let table = parse_bytes(&mut registry, "cut.tsv", content, b'\t').unwrap();
        (registry, table)
    }

    #[test]
    fn test_cut_reorders() {
        let (registry, table) = load("a\tb\tc\n1\t2\t3\n4\t5\t6\n");
        let result = cut(&registry, &table, &parse_fields("c,a").unwrap()).unwrap();

        assert_eq!(
            result.to_strings(&registry),
            vec![vec!["c", "a"], vec!["3", "1"], vec!["6", "4"]]
        );
    }

    #[test]
    fn test_cut_unknown_column() {
        let (registry, table) = load("a\tb\n1\t2\n");
        let err = cut(&registry, &table, &["z".to_string()]).unwrap_err();
        assert!(matches!(err, Error::UnknownColumn { ref name, .. } if name == "z"));
    }

    #[test]
    fn test_cut_duplicate_header() {
        let (registry, table) = load("a\ta\n1\t2\n");
        let err = cut(&registry, &table, &["a".to_string()]).unwrap_err();
        assert!(matches!(err, Error::DuplicateColumn { .. }));
    }

    #[test]
    fn test_parse_fields() {
        assert_eq!(parse_fields("a,,b").unwrap(), vec!["a", "b"]);
        assert_eq!(parse_fields("x\\,y").unwrap(), vec!["x,y"]);
        assert!(parse_fields(",,").is_err());
    }
}
