//! CLI subcommand implementations for the `drill` binary.
//!
//! Argument parsing uses clap derive macros; the top-level [`app::Cli`]
//! struct and [`app::Commands`] enum live in [`app`] and are shared between
//! `main.rs` and `build.rs` (for man pages and completions) via `include!()`.
//!
//! Each subcommand module has an `Options` struct holding the parsed
//! arguments and a `pub fn execute(opts, writer) -> Result<(), DrillError>`
//! entry point. Output goes to a `&mut dyn Write` so tests can capture it
//! and the global `--output` flag can redirect it to a file.
//!
//! # Subcommands
//!
//! | Command | Module | Purpose |
//! |---------|--------|---------|
//! | `drill tables` | [`tables`] | List the tables in a schema document |
//! | `drill columns` | [`columns`] | List one table's columns and their layout |
//! | `drill extract` | [`extract`] | Decode one or all tables as text, CSV, or JSON |
//! | `drill rows` | [`rows`] | Show row offsets and lengths, with an optional hex dump |
//!
//! # Data directory
//!
//! Data file names in a schema are relative. They are resolved against, in
//! order: `--data-dir`, the `DRILLER_DATA_DIR` environment variable, the
//! schema document's `data_path`, and finally the current directory.

pub mod app;
pub mod columns;
pub mod extract;
pub mod rows;
pub mod tables;

/// Write a line to the given writer, converting io::Error to DrillError.
macro_rules! wprintln {
    ($w:expr) => {
        writeln!($w).map_err(|e| $crate::DrillError::Io(e.to_string()))
    };
    ($w:expr, $($arg:tt)*) => {
        writeln!($w, $($arg)*).map_err(|e| $crate::DrillError::Io(e.to_string()))
    };
}

pub(crate) use wprintln;

use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};

use crate::cli::app::LoadMode;
use crate::table::document::Database;
use crate::table::region::LoadStrategy;
use crate::table::schema::Table;
use crate::DrillError;

impl From<LoadMode> for LoadStrategy {
    fn from(mode: LoadMode) -> Self {
        match mode {
            LoadMode::Auto => LoadStrategy::Auto,
            LoadMode::Mmap => LoadStrategy::Mmap,
            LoadMode::Buffered => LoadStrategy::Buffered,
        }
    }
}

/// Read a schema document.
pub(crate) fn load_database(path: &str) -> Result<Database, DrillError> {
    Database::load(path)
}

/// Look up a table by name, listing the known tables on failure.
pub(crate) fn find_table<'a>(db: &'a Database, name: &str) -> Result<&'a Table, DrillError> {
    db.table(name).ok_or_else(|| {
        let known: Vec<&str> = db.tables().iter().map(|t| t.name()).collect();
        DrillError::Argument(format!(
            "No table named '{}' (known tables: {})",
            name,
            if known.is_empty() {
                "none".to_string()
            } else {
                known.join(", ")
            }
        ))
    })
}

/// Pick the data directory: explicit flag/env value, then the document's
/// `data_path`, then the current directory.
pub(crate) fn resolve_data_dir(explicit: Option<&str>, db: &Database) -> PathBuf {
    match explicit {
        Some(dir) => PathBuf::from(dir),
        None => db
            .data_path()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from(".")),
    }
}

/// Human-readable row length ("64" or "variable").
pub(crate) fn describe_row_length(table: &Table) -> String {
    if table.is_variable_width() {
        "variable".to_string()
    } else {
        table.row_length().to_string()
    }
}

/// Create a styled progress bar for iterating over tables.
pub(crate) fn create_progress_bar(count: u64, unit: &str) -> ProgressBar {
    let pb = ProgressBar::new(count);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "{{spinner:.green}} [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} {{msg}}",
            unit
        ))
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb
}
