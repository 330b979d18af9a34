//! tblutils CLI
//!
//! Command-line tool for merging, cutting and transposing delimited tables.
//! Tables are TAB separated by default; set TBLSEP or pass --sep to change it.

mod logging;

use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tbl_core::{
    cut, merge_files, parse_fields, parse_file, separator_from_env, transpose, write_table,
    KeySpec, MergeOptions, Policy, StoreRegistry,
};
use tracing::info;

use crate::logging::init_logging;

#[derive(Parser)]
#[command(name = "tbl")]
#[command(about = "Fast tools for delimited tables", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Field separator (a single byte, `\t` for tab) [env: TBLSEP] [default: tab]
    #[arg(short, long, global = true)]
    sep: Option<String>,

    /// Log filter, for example `warn` or `tbl_core=debug`
    #[arg(long, env = "TBL_LOG", default_value = "warn", global = true)]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,

    /// Disable ANSI colour codes in the logs
    #[arg(long, global = true)]
    log_no_ansi: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Full join of two or more tables on a key, comparing common columns
    Merge {
        /// Downgrade duplicate keys, missing key columns and conflicts to warnings
        #[arg(short, long)]
        keep_going: bool,

        /// Write a JSON summary of the merge to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Key column, or comma-separated key columns (`\,` for a literal comma)
        key: String,

        /// Tables to merge, in order
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Extract columns by name
    Cut {
        /// Columns to extract (comma-separated)
        #[arg(short, long)]
        fields: String,

        /// Table to read
        file: PathBuf,
    },

    /// Transpose a table
    Transpose {
        /// Table to read
        file: PathBuf,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> tbl_core::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let separator = separator_from_env(cli.sep.as_deref())?;

    match cli.command {
        Commands::Merge {
            keep_going,
            report,
            key,
            files,
        } => cmd_merge(separator, keep_going, report, &key, &files),
        Commands::Cut { fields, file } => cmd_cut(separator, &fields, &file),
        Commands::Transpose { file } => cmd_transpose(separator, &file),
    }
}

fn cmd_merge(
    separator: u8,
    keep_going: bool,
    report_path: Option<PathBuf>,
    key: &str,
    files: &[PathBuf],
) -> tbl_core::Result<()> {
    let spec = KeySpec::parse(key)?;
    let policy = if keep_going {
        Policy::KeepGoing
    } else {
        Policy::Strict
    };
    let options = MergeOptions::default()
        .with_separator(separator)
        .with_policy(policy);

    merge_to(io::stdout().lock(), files, &spec, options, report_path.as_deref())
}

/// Merge `files` into `out`, optionally writing the JSON report
///
/// Nothing reaches `out` unless every file merged and the report file could
/// be created.
fn merge_to<W: Write>(
    out: W,
    files: &[PathBuf],
    spec: &KeySpec,
    options: MergeOptions,
    report_path: Option<&Path>,
) -> tbl_core::Result<()> {
    let merged = merge_files(files, spec, options)?;
    let report_writer = report_path
        .map(File::create)
        .transpose()?
        .map(BufWriter::new);

    merged.write_to(out, options.separator)?;

    let report = merged.report();
    info!(
        files = report.files.len(),
        columns = report.columns,
        rows = report.rows,
        warnings = report.warnings.len(),
        "merge complete"
    );

    if let Some(mut writer) = report_writer {
        serde_json::to_writer_pretty(&mut writer, report)?;
        writeln!(writer)?;
        writer.flush()?;
    }

    Ok(())
}

fn cmd_cut(separator: u8, fields: &str, file: &PathBuf) -> tbl_core::Result<()> {
    let fields = parse_fields(fields)?;
    let mut registry = StoreRegistry::new();
    let table = parse_file(&mut registry, file, separator)?;

    let result = cut(&registry, &table, &fields)?;
    write_table(&registry, &result, separator, io::stdout().lock())
}

fn cmd_transpose(separator: u8, file: &PathBuf) -> tbl_core::Result<()> {
    let mut registry = StoreRegistry::new();
    let table = parse_file(&mut registry, file, separator)?;

    write_table(&registry, &transpose(&table), separator, io::stdout().lock())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_inputs(dir: &Path) -> Vec<PathBuf> {
        let a = dir.join("a.tsv");
        let b = dir.join("b.tsv");
        std::fs::write(&a, "id\tx\n1\tA\n").unwrap();
        std::fs::write(&b, "id\ty\n1\tB\n2\tC\n").unwrap();
        vec![a, b]
    }

    #[test]
    fn test_unwritable_report_leaves_output_empty() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_inputs(dir.path());
        let spec = KeySpec::parse("id").unwrap();
        let report = dir.path().join("missing").join("report.json");

        let mut out = Vec::new();
        let err = merge_to(&mut out, &files, &spec, MergeOptions::default(), Some(&report)).unwrap_err();

        assert!(matches!(err, tbl_core::Error::Io(_)));
        assert!(out.is_empty());
    }

    #[test]
    fn test_merge_writes_output_and_report() {
        let dir = tempfile::tempdir().unwrap();
        let files = write_inputs(dir.path());
        let spec = KeySpec::parse("id").unwrap();
        let report = dir.path().join("report.json");

        let mut out = Vec::new();
        merge_to(&mut out, &files, &spec, MergeOptions::default(), Some(&report)).unwrap();

        assert_eq!(out, b"id\tx\ty\n1\tA\tB\n2\t\tC\n");
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&report).unwrap()).unwrap();
        assert_eq!(json["rows"], 2);
        assert_eq!(json["columns"], 3);
    }
}
