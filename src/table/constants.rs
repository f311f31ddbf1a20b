//! Layout constants for the supported legacy file family.

/// Offset of the little-endian u16 record length inside a variable-width row.
pub const VAR_ROW_LENGTH_OFFSET: usize = 2;

/// Size of the variable-width record header (2 bytes of record kind + 2 bytes of length).
pub const VAR_ROW_HEADER_SIZE: usize = 4;

/// Capacity of the scratch buffer handed to column decoders.
///
/// Large enough for every numeric and date text form the decoders produce.
pub const FORMAT_BUFFER_SIZE: usize = 30;

/// `row_length` value marking a variable-width table.
pub const ROW_LENGTH_VARIABLE: u32 = 0;

/// `row_length` of a cleared table.
pub const ROW_LENGTH_CLEARED: u32 = 1;

/// Default number of fractional digits for `decimal` columns.
pub const DECIMAL_SCALE_DEFAULT: u32 = 2;
