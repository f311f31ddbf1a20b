//! CLI implementation for the `drill extract` subcommand.
//!
//! Decodes one table, or every table in the schema with `--all`, and writes
//! the rows as an aligned text grid, CSV, or JSON. With `--all` a progress
//! bar is drawn on stderr while tables are extracted.

use std::io::Write;
use std::path::PathBuf;

use colored::Colorize;
use serde_json::{json, Value};

use crate::cli::app::ExtractFormat;
use crate::cli::{create_progress_bar, find_table, load_database, resolve_data_dir, wprintln};
use crate::table::column::CellValue;
use crate::table::extract::Extractor;
use crate::table::region::LoadStrategy;
use crate::table::result::ResultSet;
use crate::table::schema::Table;
use crate::util::csv;
use crate::DrillError;

/// Options for the `drill extract` subcommand.
pub struct ExtractOptions {
    /// Path to the JSON schema document.
    pub schema: String,
    /// Table to extract (required unless `all` is set).
    pub table: Option<String>,
    /// Extract every table in the schema.
    pub all: bool,
    /// Maximum rows per table; 0 for no limit.
    pub limit: usize,
    /// Output format.
    pub format: ExtractFormat,
    /// Explicit data directory (flag or environment).
    pub data_dir: Option<String>,
    /// How data files are loaded.
    pub load: LoadStrategy,
}

pub fn execute(opts: &ExtractOptions, writer: &mut dyn Write) -> Result<(), DrillError> {
    let db = load_database(&opts.schema)?;
    let data_dir: PathBuf = resolve_data_dir(opts.data_dir.as_deref(), &db);
    let extractor = Extractor::new(data_dir).with_strategy(opts.load);

    let tables: Vec<&Table> = if opts.all {
        db.tables().iter().collect()
    } else {
        match opts.table.as_deref() {
            Some(name) => vec![find_table(&db, name)?],
            None => {
                return Err(DrillError::Argument(
                    "Specify a table with --table or use --all".to_string(),
                ))
            }
        }
    };

    let results = if opts.all {
        let pb = create_progress_bar(tables.len() as u64, "tables");
        let mut results = Vec::with_capacity(tables.len());
        for table in &tables {
            pb.set_message(table.name().to_string());
            results.push(extractor.extract(table, opts.limit)?);
            pb.inc(1);
        }
        pb.finish_and_clear();
        results
    } else {
        let mut results = Vec::with_capacity(tables.len());
        for table in &tables {
            results.push(extractor.extract(table, opts.limit)?);
        }
        results
    };

    match opts.format {
        ExtractFormat::Json => output_json(writer, &tables, &results, opts.all),
        ExtractFormat::Csv => output_csv(writer, &results, opts.all),
        ExtractFormat::Text => output_text(writer, &tables, &results),
    }
}

fn table_json(table: &Table, result: &ResultSet) -> Value {
    json!({
        "table": table.name(),
        "file": table.file_name(),
        "row_count": result.row_count(),
        "columns": result.column_names(),
        "rows": result.to_json_rows(),
    })
}

fn output_json(
    writer: &mut dyn Write,
    tables: &[&Table],
    results: &[ResultSet],
    all: bool,
) -> Result<(), DrillError> {
    let mut docs: Vec<Value> = tables
        .iter()
        .zip(results)
        .map(|(t, r)| table_json(t, r))
        .collect();

    let value = if all || docs.len() != 1 {
        Value::Array(docs)
    } else {
        docs.remove(0)
    };

    let json = serde_json::to_string_pretty(&value)
        .map_err(|e| DrillError::Parse(format!("JSON serialization error: {}", e)))?;
    wprintln!(writer, "{}", json)?;
    Ok(())
}

fn cell_text(cell: &Option<CellValue>) -> String {
    cell.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

fn output_csv(writer: &mut dyn Write, results: &[ResultSet], all: bool) -> Result<(), DrillError> {
    for (i, result) in results.iter().enumerate() {
        if all {
            if i > 0 {
                wprintln!(writer)?;
            }
            wprintln!(writer, "# {}", result.table_name())?;
        }
        wprintln!(writer, "{}", csv::join(result.column_names()))?;
        for row in result.rows() {
            wprintln!(writer, "{}", csv::join(row.iter().map(cell_text)))?;
        }
    }
    Ok(())
}

fn output_text(writer: &mut dyn Write, tables: &[&Table], results: &[ResultSet]) -> Result<(), DrillError> {
    for (i, (table, result)) in tables.iter().zip(results).enumerate() {
        if i > 0 {
            wprintln!(writer)?;
        }
        wprintln!(
            writer,
            "{} ({}): {} rows",
            table.name().bold(),
            table.file_name(),
            result.row_count()
        )?;

        if result.column_count() == 0 {
            continue;
        }

        let rendered: Vec<Vec<String>> = result
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        let mut widths: Vec<usize> = result
            .column_names()
            .iter()
            .map(|n| n.chars().count())
            .collect();
        for row in &rendered {
            for (w, cell) in widths.iter_mut().zip(row) {
                *w = (*w).max(cell.chars().count());
            }
        }

        let header: Vec<String> = result
            .column_names()
            .iter()
            .zip(&widths)
            .map(|(name, w)| format!("{:<w$}", name, w = *w))
            .collect();
        wprintln!(writer, "{}", header.join("  ").trim_end().bold())?;

        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        wprintln!(writer, "{}", rule.join("  "))?;

        for row in &rendered {
            let line: Vec<String> = row
                .iter()
                .zip(&widths)
                .map(|(cell, w)| format!("{:<w$}", cell, w = *w))
                .collect();
            wprintln!(writer, "{}", line.join("  ").trim_end())?;
        }
    }
    Ok(())
}
