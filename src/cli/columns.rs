use std::io::Write;

use colored::Colorize;
use serde::Serialize;

use crate::cli::{describe_row_length, find_table, load_database, wprintln};
use crate::table::column::ColumnKind;
use crate::DrillError;

/// Options for the `drill columns` subcommand.
pub struct ColumnsOptions {
    /// Path to the JSON schema document.
    pub schema: String,
    /// Table to describe.
    pub table: String,
    /// Emit JSON instead of text.
    pub json: bool,
}

#[derive(Serialize)]
struct ColumnJson {
    index: usize,
    name: String,
    #[serde(rename = "type")]
    type_name: &'static str,
    offset: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    length: Option<usize>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    values: Vec<EnumValueJson>,
}

#[derive(Serialize)]
struct EnumValueJson {
    id: u64,
    label: String,
}

pub fn execute(opts: &ColumnsOptions, writer: &mut dyn Write) -> Result<(), DrillError> {
    let db = load_database(&opts.schema)?;
    let table = find_table(&db, &opts.table)?;

    let columns: Vec<ColumnJson> = table
        .columns()
        .iter()
        .enumerate()
        .map(|(index, col)| ColumnJson {
            index,
            name: col.name().to_string(),
            type_name: col.kind().type_name(),
            offset: col.offset(),
            length: col.kind().fixed_len(),
            values: match col.kind() {
                ColumnKind::Enum { values, .. } => values
                    .iter()
                    .map(|v| EnumValueJson {
                        id: v.id,
                        label: v.label.clone(),
                    })
                    .collect(),
                _ => Vec::new(),
            },
        })
        .collect();

    if opts.json {
        let json = serde_json::to_string_pretty(&columns)
            .map_err(|e| DrillError::Parse(format!("JSON serialization error: {}", e)))?;
        wprintln!(writer, "{}", json)?;
        return Ok(());
    }

    wprintln!(
        writer,
        "{} ({}, data offset {}, row length {})",
        table.name().bold(),
        table.file_name(),
        table.data_offset(),
        describe_row_length(table)
    )?;
    wprintln!(writer)?;
    wprintln!(
        writer,
        "{}",
        format!("{:>3}  {:<24}  {:<10}  {:>6}  {:>6}", "#", "NAME", "TYPE", "OFFSET", "LENGTH").bold()
    )?;
    for col in &columns {
        let length = match col.length {
            Some(len) => len.to_string(),
            None => "-".to_string(),
        };
        wprintln!(
            writer,
            "{:>3}  {:<24}  {:<10}  {:>6}  {:>6}",
            col.index,
            col.name,
            col.type_name,
            col.offset,
            length
        )?;
        for v in &col.values {
            wprintln!(writer, "{:>3}  {:<24}    {} = {}", "", "", v.id, v.label)?;
        }
    }

    Ok(())
}
