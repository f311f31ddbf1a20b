use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::cli::{describe_row_length, find_table, load_database, resolve_data_dir, wprintln};
use crate::table::extract::Extractor;
use crate::table::locate::RowSpan;
use crate::table::region::LoadStrategy;
use crate::util::hex::{format_bytes, format_offset, hex_dump};
use crate::DrillError;

/// Options for the `drill rows` subcommand.
pub struct RowsOptions {
    /// Path to the JSON schema document.
    pub schema: String,
    /// Table whose rows are located.
    pub table: String,
    /// Maximum number of rows; 0 for no limit.
    pub limit: usize,
    /// Hex dump each row.
    pub dump: bool,
    /// Emit JSON instead of text.
    pub json: bool,
    /// Explicit data directory (flag or environment).
    pub data_dir: Option<String>,
    /// How data files are loaded.
    pub load: LoadStrategy,
}

#[derive(Serialize)]
struct RowsJson {
    table: String,
    file: String,
    file_size: usize,
    data_offset: u32,
    variable_width: bool,
    rows: Vec<RowJson>,
}

#[derive(Serialize)]
struct RowJson {
    index: usize,
    #[serde(flatten)]
    span: RowSpan,
    #[serde(skip_serializing_if = "Option::is_none")]
    bytes: Option<String>,
}

pub fn execute(opts: &RowsOptions, writer: &mut dyn Write) -> Result<(), DrillError> {
    let db = load_database(&opts.schema)?;
    let table = find_table(&db, &opts.table)?;
    let extractor =
        Extractor::new(resolve_data_dir(opts.data_dir.as_deref(), &db)).with_strategy(opts.load);

    let (region, rows) = extractor.locate(table, opts.limit)?;
    let data = region.as_bytes();

    if opts.json {
        let result = RowsJson {
            table: table.name().to_string(),
            file: region.path().display().to_string(),
            file_size: region.len(),
            data_offset: table.data_offset(),
            variable_width: table.is_variable_width(),
            rows: rows
                .iter()
                .enumerate()
                .map(|(index, span)| RowJson {
                    index,
                    span: *span,
                    bytes: if opts.dump {
                        span.slice(data).map(format_bytes)
                    } else {
                        None
                    },
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| DrillError::Parse(format!("JSON serialization error: {}", e)))?;
        wprintln!(writer, "{}", json)?;
        return Ok(());
    }

    wprintln!(
        writer,
        "{} ({}, {} bytes, data offset {}, row length {})",
        table.name().bold(),
        region.path().display(),
        region.len(),
        table.data_offset(),
        describe_row_length(table)
    )?;
    wprintln!(writer, "{} rows located", rows.len())?;

    for (index, span) in rows.iter().enumerate() {
        if opts.dump {
            wprintln!(writer)?;
        }
        wprintln!(
            writer,
            "Row {}: offset {}, length {}",
            index,
            format_offset(span.offset),
            span.len
        )?;
        if opts.dump {
            if let Some(bytes) = span.slice(data) {
                wprintln!(writer, "{}", hex_dump(bytes, span.offset))?;
            }
        }
    }

    Ok(())
}
