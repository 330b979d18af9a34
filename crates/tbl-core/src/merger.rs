//! Merge engine: full outer join of N tables on a shared key
//!
//! The first table seeds the destination as-is. Every later table is folded
//! in: unknown columns are appended, unknown keys become new rows, and each
//! non-empty addend cell either fills an empty destination cell or must equal
//! the value already there. The first value written for a cell always wins,
//! so both the result and the conflicts reported depend on file order.

use crate::columns::ColumnIndex;
use crate::config::{MergeOptions, Policy};
use crate::error::{Error, Result};
use crate::keys::{escape, KeyBuilder, KeySpec, RowKeys};
use crate::parser::{parse_bytes, parse_file};
use crate::report::{MergeReport, Warning};
use crate::store::StoreRegistry;
use crate::table::Table;
use crate::writer::write_table;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// The accumulating result of a merge
#[derive(Debug)]
pub struct Destination {
    table: Table,
    columns: ColumnIndex,
    keys: HashMap<Vec<u8>, usize>,
}

/// What one fold added to the destination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FoldStats {
    pub new_columns: usize,
    pub new_rows: usize,
    pub conflicts: usize,
}

impl Destination {
    /// Take the first table of a run as the destination
    ///
    /// Rows repeating an earlier key are dropped; the first occurrence wins.
    pub fn seed(mut table: Table, columns: ColumnIndex, row_keys: RowKeys) -> Self {
        let source_rows = std::mem::take(&mut table.rows);
        let mut keys = HashMap::with_capacity(source_rows.len());
        for (row, (key, repeated)) in source_rows.into_iter().zip(row_keys.into_flagged()) {
            if repeated {
                continue;
            }
            keys.insert(key, table.rows.len());
            table.rows.push(row);
        }
        Self {
            table,
            columns,
            keys,
        }
    }

    pub fn into_table(self) -> Table {
        self.table
    }

    /// Fold one addend table into the destination
    ///
    /// On error the destination is left partially updated and must be
    /// discarded.
    pub fn fold(
        &mut self,
        registry: &StoreRegistry,
        addend: &Table,
        row_keys: RowKeys,
        policy: Policy,
        report: &mut MergeReport,
    ) -> Result<FoldStats> {
        let mut stats = FoldStats::default();

        // Column union, append-only.
        let mut translate = Vec::with_capacity(addend.column_count());
        for name_cell in &addend.header {
            let name = name_cell.bytes_or_empty(registry);
            let position = match self.columns.get(name) {
                Some(position) => position,
                None => {
                    let position = self.table.column_count();
                    self.columns.push(name, position);
                    self.table.push_column(*name_cell);
                    stats.new_columns += 1;
                    position
                }
            };
            translate.push(position);
        }

        for (row, (key, repeated)) in addend.rows.iter().zip(row_keys.into_flagged()) {
            if repeated {
                continue;
            }
            let dst_row = match self.keys.get(key.as_slice()) {
                Some(&dst_row) => dst_row,
                None => {
                    let dst_row = self.table.push_blank_row();
                    self.keys.insert(key.clone(), dst_row);
                    stats.new_rows += 1;
                    dst_row
                }
            };

            for (col, cell) in row.iter().enumerate() {
                if cell.is_blank() {
                    continue;
                }

                let dst_col = translate[col];
                let existing = self.table.rows[dst_row][dst_col];
                if existing.is_blank() {
                    self.table.rows[dst_row][dst_col] = *cell;
                    continue;
                }

                let old = existing.bytes_or_empty(registry);
                let new = cell.bytes_or_empty(registry);
                if old == new {
                    continue;
                }

                let column = addend.column_name(registry, col).into_owned();
                let key = escape(&key);
                let existing = String::from_utf8_lossy(old).into_owned();
                let incoming = String::from_utf8_lossy(new).into_owned();
                if !policy.keep_going() {
                    return Err(Error::Conflict {
                        path: addend.source.clone(),
                        column,
                        key,
                        existing,
                        incoming,
                    });
                }
                stats.conflicts += 1;
                report.warn(Warning::Conflict {
                    path: addend.source.clone(),
                    column,
                    key,
                    existing,
                    incoming,
                });
            }
        }

        Ok(stats)
    }
}

/// Drives a merge run: loads each source in order and folds it in
#[derive(Debug)]
pub struct Merge {
    registry: StoreRegistry,
    spec: KeySpec,
    options: MergeOptions,
    destination: Option<Destination>,
    report: MergeReport,
}

impl Merge {
    pub fn new(spec: KeySpec, options: MergeOptions) -> Self {
        Self {
            registry: StoreRegistry::new(),
            spec,
            options,
            destination: None,
            report: MergeReport {
                policy: options.policy,
                ..MergeReport::default()
            },
        }
    }

    /// Map, parse and fold one file
    pub fn add_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let table = parse_file(&mut self.registry, path, self.options.separator)?;
        self.add_table(table)
    }

    /// Parse and fold an in-memory source
    pub fn add_bytes<P: Into<PathBuf>>(
        &mut self,
        source_name: P,
        content: impl Into<Vec<u8>>,
    ) -> Result<()> {
        let table = parse_bytes(&mut self.registry, source_name, content, self.options.separator)?;
        self.add_table(table)
    }

    fn add_table(&mut self, table: Table) -> Result<()> {
        let policy = self.options.policy;
        if table.row_count() == 0 || table.column_count() == 0 {
            return Err(Error::EmptyFile {
                path: table.source.clone(),
            });
        }
        if table.missing_final_newline {
            self.report.record(Warning::MissingFinalNewline {
                path: table.source.clone(),
            });
        }

        let columns = ColumnIndex::build(&self.registry, &table)?;
        let builder = KeyBuilder::resolve(&self.spec, &columns, &table.source, policy)?;
        for name in builder.missing() {
            self.report.warn(Warning::MissingKeyColumn {
                path: table.source.clone(),
                column: name.clone(),
            });
        }

        let row_keys = builder.index_rows(&self.registry, &table, policy)?;
        for duplicate in &row_keys.duplicates {
            self.report.warn(Warning::DuplicateKey {
                path: table.source.clone(),
                line: duplicate.line,
                key: duplicate.key.clone(),
            });
        }

        self.report.files.push(table.source.clone());
        match &mut self.destination {
            Some(destination) => {
                let stats = destination.fold(&self.registry, &table, row_keys, policy, &mut self.report)?;
                debug!(
                    path = %table.source.display(),
                    new_columns = stats.new_columns,
                    new_rows = stats.new_rows,
                    conflicts = stats.conflicts,
                    "merged table"
                );
            }
            None => {
                debug!(path = %table.source.display(), "seeded destination");
                self.destination = Some(Destination::seed(table, columns, row_keys));
            }
        }

        Ok(())
    }

    pub fn report(&self) -> &MergeReport {
        &self.report
    }

    /// Finish the run; fails if nothing was added
    pub fn finish(self) -> Result<MergedTable> {
        let table = self.destination.ok_or(Error::NoInput)?.into_table();
        let mut report = self.report;
        report.columns = table.column_count();
        report.rows = table.row_count();

        Ok(MergedTable {
            registry: self.registry,
            table,
            report,
        })
    }
}

/// The final merged table together with the stores it points into
#[derive(Debug)]
pub struct MergedTable {
    registry: StoreRegistry,
    table: Table,
    report: MergeReport,
}

impl MergedTable {
    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn registry(&self) -> &StoreRegistry {
        &self.registry
    }

    pub fn report(&self) -> &MergeReport {
        &self.report
    }

    /// Bytes of a data cell; `None` when absent or out of range
    pub fn value(&self, row: usize, col: usize) -> Option<&[u8]> {
        self.table
            .rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|c| c.bytes(&self.registry))
    }

    /// Header and rows as text
    pub fn to_strings(&self) -> Vec<Vec<String>> {
        self.table.to_strings(&self.registry)
    }

    /// Serialize the merged table
    pub fn write_to<W: Write>(&self, writer: W, separator: u8) -> Result<()> {
        write_table(&self.registry, &self.table, separator, writer)
    }
}

/// Merge files in the given order on `spec`
pub fn merge_files<P: AsRef<Path>>(
    paths: &[P],
    spec: &KeySpec,
    options: MergeOptions,
) -> Result<MergedTable> {
    let mut merge = Merge::new(spec.clone(), options);
    for path in paths {
        merge.add_file(path)?;
    }
    merge.finish()
}
