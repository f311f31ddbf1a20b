//! Row location.
//!
//! Computes where every row of a table starts inside a loaded file.
//!
//! Fixed-width tables are a simple stride from `data_offset`; a trailing
//! partial row is ignored. Variable-width tables are a chain of records, each
//! starting with a 4-byte header whose bytes 2..4 hold the record's total
//! length as a little-endian u16:
//!
//! ```text
//! data_offset
//! |
//! v
//! +------+--------+------ ... --+------+--------+---- ...
//! | kind | length | body        | kind | length | body
//! +------+--------+------ ... --+------+--------+---- ...
//!  0..2   2..4                   next record at offset + length
//! ```
//!
//! The chain is walked twice: once to count the records, once to record
//! their spans after the count has been clamped to the row limit. Every
//! header and record body is checked against the end of the file, so a
//! corrupted length field produces an error instead of an out-of-bounds read.

use byteorder::{ByteOrder, LittleEndian};
use log::debug;
use serde::Serialize;

use crate::table::constants::{VAR_ROW_HEADER_SIZE, VAR_ROW_LENGTH_OFFSET};
use crate::table::schema::Table;
use crate::DrillError;

/// Position and extent of one row inside a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowSpan {
    /// Byte offset of the row start.
    pub offset: usize,
    /// Row length in bytes.
    pub len: usize,
}

impl RowSpan {
    /// Offset one past the last byte of the row.
    pub fn end(&self) -> usize {
        self.offset + self.len
    }

    /// The row's bytes within `data`, or `None` if the span does not fit.
    pub fn slice<'a>(&self, data: &'a [u8]) -> Option<&'a [u8]> {
        data.get(self.offset..self.end())
    }
}

/// Locate the rows of `table` inside `data`.
///
/// `row_limit` caps the number of rows returned; `0` means no limit. A file
/// shorter than the table's `data_offset` has no rows.
///
/// # Examples
///
/// ```
/// use driller::table::locate::locate_rows;
/// use driller::table::schema::Table;
///
/// let table = Table::new("T", "T.DAT", 0, 10);
/// let rows = locate_rows(&[0u8; 35], &table, 0).unwrap();
/// assert_eq!(rows.len(), 3);
/// assert_eq!(rows[2].offset, 20);
/// ```
pub fn locate_rows(data: &[u8], table: &Table, row_limit: usize) -> Result<Vec<RowSpan>, DrillError> {
    let data_offset = table.data_offset() as usize;

    let rows = if table.is_variable_width() {
        locate_variable(data, data_offset, row_limit)?
    } else {
        locate_fixed(data, data_offset, table.row_length() as usize, row_limit)
    };

    debug!(
        "Located {} rows in '{}' ({} layout, limit {})",
        rows.len(),
        table.name(),
        if table.is_variable_width() { "variable" } else { "fixed" },
        row_limit
    );
    Ok(rows)
}

/// Number of whole fixed-width rows after `data_offset`.
///
/// # Examples
///
/// ```
/// use driller::table::locate::fixed_row_count;
///
/// assert_eq!(fixed_row_count(35, 0, 10), 3);
/// assert_eq!(fixed_row_count(8, 16, 4), 0);
/// ```
pub fn fixed_row_count(data_len: usize, data_offset: usize, row_length: usize) -> usize {
    if row_length == 0 {
        return 0;
    }
    data_len.saturating_sub(data_offset) / row_length
}

fn clamp_to_limit(count: usize, row_limit: usize) -> usize {
    if row_limit != 0 && count > row_limit {
        row_limit
    } else {
        count
    }
}

fn locate_fixed(data: &[u8], data_offset: usize, row_length: usize, row_limit: usize) -> Vec<RowSpan> {
    let count = clamp_to_limit(fixed_row_count(data.len(), data_offset, row_length), row_limit);
    (0..count)
        .map(|row| RowSpan {
            offset: data_offset + row * row_length,
            len: row_length,
        })
        .collect()
}

/// Read and validate the length of the variable record starting at `offset`.
fn record_length(data: &[u8], offset: usize) -> Result<usize, DrillError> {
    let available = data.len().saturating_sub(offset);
    let header = data
        .get(offset..offset + VAR_ROW_HEADER_SIZE)
        .ok_or(DrillError::TruncatedRow {
            offset,
            needed: VAR_ROW_HEADER_SIZE,
            available,
        })?;

    let length = LittleEndian::read_u16(&header[VAR_ROW_LENGTH_OFFSET..]) as usize;
    if length < VAR_ROW_HEADER_SIZE {
        return Err(DrillError::CorruptRow { offset, length });
    }
    if length > available {
        return Err(DrillError::TruncatedRow {
            offset,
            needed: length,
            available,
        });
    }
    Ok(length)
}

fn locate_variable(data: &[u8], data_offset: usize, row_limit: usize) -> Result<Vec<RowSpan>, DrillError> {
    // First pass: count records
    let mut count = 0;
    let mut cursor = data_offset;
    while cursor < data.len() {
        cursor += record_length(data, cursor)?;
        count += 1;
    }

    let count = clamp_to_limit(count, row_limit);

    // Second pass: record spans up to the clamped count
    let mut rows = Vec::with_capacity(count);
    let mut cursor = data_offset;
    while rows.len() < count && cursor < data.len() {
        let len = record_length(data, cursor)?;
        rows.push(RowSpan { offset: cursor, len });
        cursor += len;
    }
    Ok(rows)
}
