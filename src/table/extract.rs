//! Table extraction.
//!
//! [`Extractor`] ties the engine together: it resolves a table's data file
//! against the configured data directory, loads it as a [`FileRegion`],
//! locates the rows, and decodes every cell into a [`ResultSet`].
//!
//! Decoding runs column-major (each column over all rows, then the next
//! column) with one scratch buffer reused for every cell. The region is owned
//! by the extraction call and released when it returns, whether it succeeds
//! or fails.

use std::path::{Path, PathBuf};

use log::{debug, trace};

use crate::table::constants::FORMAT_BUFFER_SIZE;
use crate::table::locate::{locate_rows, RowSpan};
use crate::table::region::{FileRegion, LoadStrategy};
use crate::table::result::ResultSet;
use crate::table::schema::Table;
use crate::DrillError;

/// Extracts tables from files under one data directory.
#[derive(Debug, Clone)]
pub struct Extractor {
    data_dir: PathBuf,
    strategy: LoadStrategy,
}

impl Extractor {
    /// Create an extractor reading data files from `data_dir`.
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Self {
        Extractor {
            data_dir: data_dir.into(),
            strategy: LoadStrategy::default(),
        }
    }

    /// Use `strategy` to load data files.
    pub fn with_strategy(mut self, strategy: LoadStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn strategy(&self) -> LoadStrategy {
        self.strategy
    }

    /// Full path of `table`'s data file. No existence check is made.
    pub fn resolve(&self, table: &Table) -> PathBuf {
        self.data_dir.join(table.file_name())
    }

    /// Load `table`'s data file.
    pub fn load(&self, table: &Table) -> Result<FileRegion, DrillError> {
        FileRegion::load(self.resolve(table), self.strategy)
    }

    /// Locate the rows of `table` without decoding them.
    ///
    /// The spans are returned together with the region they index into.
    pub fn locate(&self, table: &Table, row_limit: usize) -> Result<(FileRegion, Vec<RowSpan>), DrillError> {
        let region = self.load(table)?;
        let rows = locate_rows(region.as_bytes(), table, row_limit)?;
        Ok((region, rows))
    }

    /// Extract up to `row_limit` rows of `table` (`0` for all rows).
    ///
    /// Fails with [`DrillError::FileRead`] if the data file cannot be loaded,
    /// in which case nothing is allocated. Corrupt variable-width records and
    /// columns that do not fit their row are reported as errors.
    pub fn extract(&self, table: &Table, row_limit: usize) -> Result<ResultSet, DrillError> {
        let region = self.load(table)?;
        extract_from(region.as_bytes(), table, row_limit)
    }
}

/// Extract `table` from an already loaded byte region.
pub fn extract_from(data: &[u8], table: &Table, row_limit: usize) -> Result<ResultSet, DrillError> {
    let rows = locate_rows(data, table, row_limit)?;
    let columns = table.columns();
    let mut result = ResultSet::new(table, rows.len(), columns.len());
    let mut scratch = String::with_capacity(FORMAT_BUFFER_SIZE);

    for (col_idx, column) in columns.iter().enumerate() {
        trace!("Decoding column '{}' over {} rows", column.name(), rows.len());
        for (row_idx, span) in rows.iter().enumerate() {
            let row = span.slice(data).ok_or(DrillError::TruncatedRow {
                offset: span.offset,
                needed: span.len,
                available: data.len().saturating_sub(span.offset),
            })?;
            let value = column.decode(row, row_idx, &mut scratch)?;
            result.set_cell(row_idx, col_idx, value)?;
        }
    }

    debug!(
        "Extracted {} rows x {} columns from '{}'",
        result.row_count(),
        result.column_count(),
        table.name()
    );
    Ok(result)
}
