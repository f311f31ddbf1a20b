#![cfg(feature = "cli")]
//! Integration tests for the `drill` subcommands.

use byteorder::{ByteOrder, LittleEndian};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

use driller::cli::app::ExtractFormat;
use driller::cli::columns::{self, ColumnsOptions};
use driller::cli::extract::{self, ExtractOptions};
use driller::cli::rows::{self, RowsOptions};
use driller::cli::tables::{self, TablesOptions};
use driller::table::region::LoadStrategy;
use driller::DrillError;

/// A data directory holding a small fixed-width provider table and a
/// variable-width memo table, plus a schema document describing both.
struct Fixture {
    dir: TempDir,
    schema: String,
}

fn schema_doc(data_path: Option<&str>) -> Value {
    let mut doc = json!({
        "tables": [
            {
                "name": "Providers", "file": "PROV.DAT",
                "data_offset": 4, "row_length": 12,
                "columns": [
                    { "name": "id", "type": "uint16", "offset": 0 },
                    { "name": "code", "type": "string", "offset": 2, "length": 6 },
                    { "name": "fee", "type": "decimal", "offset": 8 }
                ]
            },
            {
                "name": "Memos", "file": "MEMO.DAT",
                "data_offset": 0, "row_length": 0,
                "columns": [
                    { "name": "provider", "type": "uint16", "offset": 0 },
                    { "name": "memo", "type": "varstring", "offset": 4 }
                ]
            }
        ]
    });
    if let Some(path) = data_path {
        doc["data_path"] = json!(path);
    }
    doc
}

fn provider_row(id: u16, code: &[u8], fee_cents: i32) -> [u8; 12] {
    let mut row = [0u8; 12];
    LittleEndian::write_u16(&mut row[0..], id);
    row[2..2 + code.len()].copy_from_slice(code);
    LittleEndian::write_i32(&mut row[8..], fee_cents);
    row
}

fn memo_record(provider: u16, text: &[u8]) -> Vec<u8> {
    let mut rec = vec![0u8; 4];
    LittleEndian::write_u16(&mut rec[0..], provider);
    LittleEndian::write_u16(&mut rec[2..], (4 + text.len()) as u16);
    rec.extend_from_slice(text);
    rec
}

fn setup(with_data_path: bool) -> Fixture {
    colored::control::set_override(false);

    let dir = TempDir::new().unwrap();

    let mut prov = vec![0xAAu8; 4];
    prov.extend_from_slice(&provider_row(1, b"DDS1", 12500));
    prov.extend_from_slice(&provider_row(2, b"HYG,2", -350));
    fs::write(dir.path().join("PROV.DAT"), prov).unwrap();

    let mut memo = memo_record(1, b"Prefers mornings");
    memo.extend(memo_record(2, b"Part time"));
    fs::write(dir.path().join("MEMO.DAT"), memo).unwrap();

    let data_path = dir.path().to_string_lossy().to_string();
    let doc = schema_doc(with_data_path.then_some(data_path.as_str()));
    let schema_path = dir.path().join("schema.json");
    fs::write(&schema_path, serde_json::to_string_pretty(&doc).unwrap()).unwrap();

    Fixture {
        schema: schema_path.to_string_lossy().to_string(),
        dir,
    }
}

impl Fixture {
    fn data_dir(&self) -> Option<String> {
        Some(self.dir.path().to_string_lossy().to_string())
    }

    fn extract_opts(&self, table: Option<&str>, all: bool, format: ExtractFormat) -> ExtractOptions {
        ExtractOptions {
            schema: self.schema.clone(),
            table: table.map(str::to_string),
            all,
            limit: 0,
            format,
            data_dir: self.data_dir(),
            load: LoadStrategy::Auto,
        }
    }
}

fn run<F>(f: F) -> String
where
    F: FnOnce(&mut Vec<u8>) -> Result<(), DrillError>,
{
    let mut out = Vec::new();
    f(&mut out).unwrap();
    String::from_utf8(out).unwrap()
}

#[test]
fn test_tables_text() {
    let fx = setup(false);
    let out = run(|w| {
        tables::execute(
            &TablesOptions {
                schema: fx.schema.clone(),
                json: false,
            },
            w,
        )
    });
    assert!(out.contains("Providers"));
    assert!(out.contains("PROV.DAT"));
    assert!(out.contains("Memos"));
    assert!(out.contains("variable"));
}

#[test]
fn test_tables_json() {
    let fx = setup(false);
    let out = run(|w| {
        tables::execute(
            &TablesOptions {
                schema: fx.schema.clone(),
                json: true,
            },
            w,
        )
    });
    let v: Value = serde_json::from_str(&out).unwrap();
    let tables = v.as_array().unwrap();
    assert_eq!(tables.len(), 2);
    assert_eq!(tables[0]["name"], "Providers");
    assert_eq!(tables[0]["row_length"], 12);
    assert_eq!(tables[1]["variable_width"], true);
}

#[test]
fn test_columns_json() {
    let fx = setup(false);
    let out = run(|w| {
        columns::execute(
            &ColumnsOptions {
                schema: fx.schema.clone(),
                table: "Providers".to_string(),
                json: true,
            },
            w,
        )
    });
    let v: Value = serde_json::from_str(&out).unwrap();
    let cols = v.as_array().unwrap();
    assert_eq!(cols.len(), 3);
    assert_eq!(cols[1]["name"], "code");
    assert_eq!(cols[1]["type"], "string");
    assert_eq!(cols[1]["length"], 6);
    assert_eq!(cols[2]["offset"], 8);
}

#[test]
fn test_columns_unknown_table() {
    let fx = setup(false);
    let mut out = Vec::new();
    let err = columns::execute(
        &ColumnsOptions {
            schema: fx.schema.clone(),
            table: "Nope".to_string(),
            json: false,
        },
        &mut out,
    )
    .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Nope"));
    assert!(msg.contains("Providers, Memos"));
}

#[test]
fn test_extract_json_single_table() {
    let fx = setup(false);
    let out = run(|w| extract::execute(&fx.extract_opts(Some("Providers"), false, ExtractFormat::Json), w));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["table"], "Providers");
    assert_eq!(v["row_count"], 2);
    assert_eq!(v["rows"][0]["code"], "DDS1");
    assert_eq!(v["rows"][0]["fee"], "125.00");
    assert_eq!(v["rows"][1]["fee"], "-3.50");
}

#[test]
fn test_extract_csv_quotes_fields() {
    let fx = setup(false);
    let out = run(|w| extract::execute(&fx.extract_opts(Some("Providers"), false, ExtractFormat::Csv), w));
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "id,code,fee");
    assert_eq!(lines[1], "1,DDS1,125.00");
    assert_eq!(lines[2], "2,\"HYG,2\",-3.50");
}

#[test]
fn test_extract_text_grid() {
    let fx = setup(false);
    let out = run(|w| extract::execute(&fx.extract_opts(Some("Memos"), false, ExtractFormat::Text), w));
    assert!(out.starts_with("Memos (MEMO.DAT): 2 rows"));
    assert!(out.contains("Prefers mornings"));
    assert!(out.contains("Part time"));
}

#[test]
fn test_extract_all_json_is_array() {
    let fx = setup(false);
    let out = run(|w| extract::execute(&fx.extract_opts(None, true, ExtractFormat::Json), w));
    let v: Value = serde_json::from_str(&out).unwrap();
    let docs = v.as_array().unwrap();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1]["table"], "Memos");
    assert_eq!(docs[1]["rows"][0]["memo"], "Prefers mornings");
}

#[test]
fn test_extract_all_csv_sections() {
    let fx = setup(false);
    let out = run(|w| extract::execute(&fx.extract_opts(None, true, ExtractFormat::Csv), w));
    assert!(out.contains("# Providers\n"));
    assert!(out.contains("# Memos\n"));
}

#[test]
fn test_extract_uses_schema_data_path() {
    let fx = setup(true);
    let mut opts = fx.extract_opts(Some("Providers"), false, ExtractFormat::Json);
    opts.data_dir = None;
    let out = run(|w| extract::execute(&opts, w));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["row_count"], 2);
}

#[test]
fn test_extract_limit() {
    let fx = setup(false);
    let mut opts = fx.extract_opts(Some("Memos"), false, ExtractFormat::Json);
    opts.limit = 1;
    let out = run(|w| extract::execute(&opts, w));
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["row_count"], 1);
    assert_eq!(v["rows"].as_array().unwrap().len(), 1);
}

#[test]
fn test_extract_missing_data_file() {
    let fx = setup(false);
    fs::remove_file(fx.dir.path().join("PROV.DAT")).unwrap();
    let mut out = Vec::new();
    let err = extract::execute(&fx.extract_opts(Some("Providers"), false, ExtractFormat::Text), &mut out)
        .unwrap_err();
    assert!(matches!(err, DrillError::FileRead { .. }));
}

#[test]
fn test_rows_json_with_bytes() {
    let fx = setup(false);
    let out = run(|w| {
        rows::execute(
            &RowsOptions {
                schema: fx.schema.clone(),
                table: "Memos".to_string(),
                limit: 0,
                dump: true,
                json: true,
                data_dir: fx.data_dir(),
                load: LoadStrategy::Buffered,
            },
            w,
        )
    });
    let v: Value = serde_json::from_str(&out).unwrap();
    assert_eq!(v["variable_width"], true);
    let rows = v["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["offset"], 0);
    assert_eq!(rows[0]["len"], 20);
    assert_eq!(rows[1]["offset"], 20);
    assert_eq!(rows[1]["len"], 13);
    assert!(rows[0]["bytes"].as_str().unwrap().starts_with("01001400"));
}

#[test]
fn test_rows_text_dump() {
    let fx = setup(false);
    let out = run(|w| {
        rows::execute(
            &RowsOptions {
                schema: fx.schema.clone(),
                table: "Providers".to_string(),
                limit: 1,
                dump: true,
                json: false,
                data_dir: fx.data_dir(),
                load: LoadStrategy::Auto,
            },
            w,
        )
    });
    assert!(out.contains("1 rows located"));
    assert!(out.contains("Row 0: offset"));
    assert!(!out.contains("Row 1:"));
    assert!(out.contains("DDS1"));
}
