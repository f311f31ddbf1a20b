//! Schema-driven table extraction from legacy binary database files.
//!
//! The `driller` crate reads row/column data out of undocumented binary
//! database files by applying an externally supplied schema. A schema names
//! the file that holds a table's rows, the byte offset where row data starts,
//! the row width (fixed, or variable with a per-row length header), and the
//! byte layout of every column inside a row.
//!
//! # CLI Reference
//!
//! The `drill` binary wraps the library:
//!
//! | Command | Purpose |
//! |---------|---------|
//! | [`drill tables`](cli::app::Commands::Tables) | List the tables declared in a schema document |
//! | [`drill columns`](cli::app::Commands::Columns) | List the columns of one table |
//! | [`drill extract`](cli::app::Commands::Extract) | Extract one or all tables as text, CSV, or JSON |
//! | [`drill rows`](cli::app::Commands::Rows) | Show located row spans, optionally with a hex dump |
//! | [`drill completions`](cli::app::Commands::Completions) | Generate shell completions |
//!
//! # Library API
//!
//! ```no_run
//! use driller::table::document::Database;
//! use driller::table::extract::Extractor;
//!
//! let db = Database::load("schema.json").unwrap();
//! let table = db.table("Patients").unwrap();
//!
//! let extractor = Extractor::new("/srv/legacy");
//! let result = extractor.extract(table, 100).unwrap();
//! for row in result.rows() {
//!     println!("{:?}", row);
//! }
//! ```
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`table::region`] | Whole-file byte regions (memory-mapped or buffered) |
//! | [`table::column`] | Column descriptors, kinds, and the built-in decoders |
//! | [`table::schema`] | The [`Table`](table::schema::Table) schema type |
//! | [`table::document`] | JSON schema documents and the [`SchemaNode`](table::document::SchemaNode) seam |
//! | [`table::locate`] | Fixed- and variable-width row location |
//! | [`table::extract`] | The column-major extraction loop |
//! | [`table::result`] | The [`ResultSet`](table::result::ResultSet) grid |
//!
//! ## Feature flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | on | Builds the `drill` binary and its dependencies. Implies `mmap`. |
//! | `mmap` | on (via `cli`) | Memory-maps data files through `memmap2` instead of reading them into a buffer. |

#[cfg(feature = "cli")]
pub mod cli;
pub mod table;
pub mod util;

use thiserror::Error;

/// Errors returned by `driller` operations.
#[derive(Error, Debug)]
pub enum DrillError {
    /// A data file could not be opened or read.
    #[error("Cannot read {path}: {message}")]
    FileRead {
        /// Full path that was opened.
        path: String,
        /// Raw OS error code, when the platform reported one.
        code: Option<i32>,
        /// Human-readable description of the failure.
        message: String,
    },

    /// A schema element lacks a required attribute.
    #[error("Missing attribute '{attribute}' on {element}")]
    MissingAttribute { element: String, attribute: String },

    /// A schema attribute is present but could not be interpreted.
    #[error("Invalid value '{value}' for attribute '{attribute}' on {element}")]
    InvalidAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    /// A column or cell index is outside the current bounds.
    #[error("Index {index} out of range (count {count})")]
    IndexOutOfRange { index: usize, count: usize },

    /// Two enum values in one column share an id.
    #[error("Duplicate enum id {id} in column '{column}'")]
    DuplicateEnumId { column: String, id: u64 },

    /// A variable-width record header or body runs past the end of the file.
    #[error("Truncated row at offset {offset}: needs {needed} bytes, {available} available")]
    TruncatedRow {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A variable-width record declares a length too short to hold its own header.
    #[error("Corrupt row at offset {offset}: declared length {length}")]
    CorruptRow { offset: usize, length: usize },

    /// A column's bytes fall outside the row they are decoded from.
    #[error(
        "Column '{column}' in row {row} needs bytes {offset}..{end} but the row is {available} bytes"
    )]
    ColumnOutOfBounds {
        column: String,
        row: usize,
        offset: usize,
        end: usize,
        available: usize,
    },

    /// A result cell was written twice.
    #[error("Cell ({row}, {column}) already set")]
    CellAlreadySet { row: usize, column: usize },

    /// An I/O error occurred while writing output.
    #[error("I/O error: {0}")]
    Io(String),

    /// A schema document could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),

    /// An invalid argument was supplied.
    #[error("Invalid argument: {0}")]
    Argument(String),
}

impl DrillError {
    /// Build a [`DrillError::FileRead`] from an I/O error on `path`.
    pub(crate) fn file_read(path: &std::path::Path, err: &std::io::Error) -> Self {
        DrillError::FileRead {
            path: path.display().to_string(),
            code: err.raw_os_error(),
            message: err.to_string(),
        }
    }
}
