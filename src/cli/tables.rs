use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::cli::{describe_row_length, load_database, wprintln};
use crate::DrillError;

/// Options for the `drill tables` subcommand.
pub struct TablesOptions {
    /// Path to the JSON schema document.
    pub schema: String,
    /// Emit JSON instead of text.
    pub json: bool,
}

#[derive(Serialize)]
struct TableSummaryJson {
    name: String,
    file: String,
    data_offset: u32,
    row_length: u32,
    variable_width: bool,
    columns: usize,
}

pub fn execute(opts: &TablesOptions, writer: &mut dyn Write) -> Result<(), DrillError> {
    let db = load_database(&opts.schema)?;

    if opts.json {
        let tables: Vec<TableSummaryJson> = db
            .tables()
            .iter()
            .map(|t| TableSummaryJson {
                name: t.name().to_string(),
                file: t.file_name().to_string(),
                data_offset: t.data_offset(),
                row_length: t.row_length(),
                variable_width: t.is_variable_width(),
                columns: t.column_count(),
            })
            .collect();
        let json = serde_json::to_string_pretty(&tables)
            .map_err(|e| DrillError::Parse(format!("JSON serialization error: {}", e)))?;
        wprintln!(writer, "{}", json)?;
        return Ok(());
    }

    if db.tables().is_empty() {
        wprintln!(writer, "No tables declared in {}", opts.schema)?;
        return Ok(());
    }

    let name_width = db
        .tables()
        .iter()
        .map(|t| t.name().chars().count())
        .max()
        .unwrap_or(0)
        .max(5);

    wprintln!(
        writer,
        "{}",
        format!(
            "{:<name_width$}  {:<14}  {:>8}  {:>10}  {:>7}",
            "TABLE", "FILE", "OFFSET", "ROW LEN", "COLUMNS"
        )
        .bold()
    )?;
    for t in db.tables() {
        wprintln!(
            writer,
            "{:<name_width$}  {:<14}  {:>8}  {:>10}  {:>7}",
            t.name(),
            t.file_name(),
            t.data_offset(),
            describe_row_length(t),
            t.column_count()
        )?;
    }

    Ok(())
}
