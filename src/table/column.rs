//! Column descriptors and cell decoding.
//!
//! Every column has a name, a byte offset inside its row, and a
//! [`ColumnKind`] that fixes how many bytes it occupies and how they are
//! turned into a [`CellValue`]. All multi-byte integers are little-endian.
//!
//! # Supported kinds
//!
//! | `type` | Bytes | Decoded as |
//! |--------|-------|------------|
//! | `uint8` / `uint16` / `uint32` | 1 / 2 / 4 | [`CellValue::Uint`] |
//! | `int8` / `int16` / `int32` | 1 / 2 / 4 | [`CellValue::Int`] |
//! | `bool` | 1 | [`CellValue::Bool`], any non-zero byte is true |
//! | `string` | `length` | [`CellValue::Str`], cut at the first NUL, trailing spaces trimmed |
//! | `varstring` | rest of the row record | [`CellValue::Str`]; makes the table variable-width |
//! | `date` | 4 (u16 year, u8 month, u8 day) | `YYYY-MM-DD`; all zero is [`CellValue::Null`] |
//! | `decimal` | 4 (i32, `scale` digits) | fixed-point text |
//! | `enum` | `width` (1 or 2) | label of the matching value, or the raw id |
//! | `hex` | `length` | [`CellValue::Hex`] |

use std::collections::HashSet;
use std::fmt::{self, Write as _};

use byteorder::{ByteOrder, LittleEndian};
use chrono::NaiveDate;
use serde::Serialize;

use crate::table::constants::DECIMAL_SCALE_DEFAULT;
use crate::table::document::{parse_unsigned, required_attribute, SchemaNode};
use crate::util::hex::format_bytes;
use crate::DrillError;

/// Largest supported `decimal` scale (an i32 has at most 10 digits).
const DECIMAL_SCALE_MAX: u32 = 9;

/// Decoded value of one cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No value (e.g. an all-zero date).
    Null,
    /// Signed integer.
    Int(i64),
    /// Unsigned integer.
    Uint(u64),
    /// Boolean flag.
    Bool(bool),
    /// Text (strings, dates, fixed-point numbers, enum labels).
    Str(String),
    /// Hex-encoded raw bytes.
    Hex(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => Ok(()),
            CellValue::Int(n) => write!(f, "{}", n),
            CellValue::Uint(n) => write!(f, "{}", n),
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::Str(s) => write!(f, "{}", s),
            CellValue::Hex(h) => write!(f, "{}", h),
        }
    }
}

/// One labelled value of an `enum` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumValue {
    pub id: u64,
    pub label: String,
}

/// The fixed set of column kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnKind {
    UInt8,
    UInt16,
    UInt32,
    Int8,
    Int16,
    Int32,
    Bool,
    /// Fixed-width text field.
    String { length: usize },
    /// Text running from the column offset to the end of the row record.
    VarString,
    /// Packed calendar date.
    Date,
    /// Scaled 32-bit integer.
    Decimal { scale: u32 },
    /// Integer id mapped to a label.
    Enum { width: usize, values: Vec<EnumValue> },
    /// Opaque bytes shown as hex.
    Hex { length: usize },
}

impl ColumnKind {
    /// The `type` attribute value naming this kind.
    pub fn type_name(&self) -> &'static str {
        match self {
            ColumnKind::UInt8 => "uint8",
            ColumnKind::UInt16 => "uint16",
            ColumnKind::UInt32 => "uint32",
            ColumnKind::Int8 => "int8",
            ColumnKind::Int16 => "int16",
            ColumnKind::Int32 => "int32",
            ColumnKind::Bool => "bool",
            ColumnKind::String { .. } => "string",
            ColumnKind::VarString => "varstring",
            ColumnKind::Date => "date",
            ColumnKind::Decimal { .. } => "decimal",
            ColumnKind::Enum { .. } => "enum",
            ColumnKind::Hex { .. } => "hex",
        }
    }

    /// Number of bytes the kind occupies, or `None` for [`ColumnKind::VarString`].
    pub fn fixed_len(&self) -> Option<usize> {
        match self {
            ColumnKind::UInt8 | ColumnKind::Int8 | ColumnKind::Bool => Some(1),
            ColumnKind::UInt16 | ColumnKind::Int16 => Some(2),
            ColumnKind::UInt32 | ColumnKind::Int32 => Some(4),
            ColumnKind::Date | ColumnKind::Decimal { .. } => Some(4),
            ColumnKind::String { length } | ColumnKind::Hex { length } => Some(*length),
            ColumnKind::Enum { width, .. } => Some(*width),
            ColumnKind::VarString => None,
        }
    }

    /// Returns true for the variable-length string kind.
    pub fn is_variable(&self) -> bool {
        matches!(self, ColumnKind::VarString)
    }
}

/// Layout and decoder of one column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDescriptor {
    name: String,
    offset: usize,
    kind: ColumnKind,
}

impl ColumnDescriptor {
    /// Create a descriptor for a column starting `offset` bytes into each row.
    pub fn new(name: impl Into<String>, offset: usize, kind: ColumnKind) -> Self {
        ColumnDescriptor {
            name: name.into(),
            offset,
            kind,
        }
    }

    /// Build a descriptor from a schema document node.
    ///
    /// Requires `name`, `type`, and `offset`; `string` and `hex` columns also
    /// require `length`. `decimal` accepts an optional `scale`, `enum` an
    /// optional `width` (1 or 2) and child value nodes with `id` and `label`.
    pub fn from_node<N: SchemaNode>(node: &N) -> Result<Self, DrillError> {
        let name = required_attribute(node, "column", "name")?;
        let element = format!("column '{}'", name);
        let type_name = required_attribute(node, &element, "type")?;
        let raw_offset = required_attribute(node, &element, "offset")?;
        let offset: usize = parse_unsigned(&element, "offset", &raw_offset)?;

        let kind = match type_name.trim().to_lowercase().as_str() {
            "uint8" => ColumnKind::UInt8,
            "uint16" => ColumnKind::UInt16,
            "uint32" => ColumnKind::UInt32,
            "int8" => ColumnKind::Int8,
            "int16" => ColumnKind::Int16,
            "int32" => ColumnKind::Int32,
            "bool" => ColumnKind::Bool,
            "string" => ColumnKind::String {
                length: required_length(node, &element)?,
            },
            "varstring" => ColumnKind::VarString,
            "date" => ColumnKind::Date,
            "decimal" => {
                let scale = match node.attribute("scale") {
                    Some(raw) => parse_unsigned(&element, "scale", &raw)?,
                    None => DECIMAL_SCALE_DEFAULT,
                };
                if scale > DECIMAL_SCALE_MAX {
                    return Err(invalid(&element, "scale", &scale.to_string()));
                }
                ColumnKind::Decimal { scale }
            }
            "enum" => {
                let width = match node.attribute("width") {
                    Some(raw) => parse_unsigned(&element, "width", &raw)?,
                    None => 1,
                };
                if width != 1 && width != 2 {
                    return Err(invalid(&element, "width", &width.to_string()));
                }
                ColumnKind::Enum {
                    width,
                    values: parse_enum_values(node, &name)?,
                }
            }
            "hex" => ColumnKind::Hex {
                length: required_length(node, &element)?,
            },
            _ => return Err(invalid(&element, "type", &type_name)),
        };

        Ok(ColumnDescriptor { name, offset, kind })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Byte offset of the column inside its row.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn kind(&self) -> &ColumnKind {
        &self.kind
    }

    /// Returns true if this column makes its table variable-width.
    pub fn is_variable(&self) -> bool {
        self.kind.is_variable()
    }

    /// Decode this column from the bytes of one row.
    ///
    /// `row` must cover exactly the row's extent; `row_index` is only used
    /// for error reporting. `scratch` is reused across calls for the text
    /// forms of numbers and dates. Fails with
    /// [`DrillError::ColumnOutOfBounds`] if the column does not fit in the row.
    pub fn decode(
        &self,
        row: &[u8],
        row_index: usize,
        scratch: &mut String,
    ) -> Result<CellValue, DrillError> {
        let end = match self.kind.fixed_len() {
            Some(len) => self.offset.saturating_add(len),
            None => row.len().max(self.offset),
        };
        let data = row
            .get(self.offset..end)
            .ok_or_else(|| DrillError::ColumnOutOfBounds {
                column: self.name.clone(),
                row: row_index,
                offset: self.offset,
                end,
                available: row.len(),
            })?;

        let value = match &self.kind {
            ColumnKind::UInt8 => CellValue::Uint(data[0] as u64),
            ColumnKind::UInt16 => CellValue::Uint(LittleEndian::read_u16(data) as u64),
            ColumnKind::UInt32 => CellValue::Uint(LittleEndian::read_u32(data) as u64),
            ColumnKind::Int8 => CellValue::Int(data[0] as i8 as i64),
            ColumnKind::Int16 => CellValue::Int(LittleEndian::read_i16(data) as i64),
            ColumnKind::Int32 => CellValue::Int(LittleEndian::read_i32(data) as i64),
            ColumnKind::Bool => CellValue::Bool(data[0] != 0),
            ColumnKind::String { .. } | ColumnKind::VarString => decode_text(data),
            ColumnKind::Date => decode_date(data, scratch),
            ColumnKind::Decimal { scale } => {
                decode_decimal(LittleEndian::read_i32(data), *scale, scratch)
            }
            ColumnKind::Enum { width, values } => {
                let id = if *width == 1 {
                    data[0] as u64
                } else {
                    LittleEndian::read_u16(data) as u64
                };
                match values.iter().find(|v| v.id == id) {
                    Some(v) => CellValue::Str(v.label.clone()),
                    None => CellValue::Uint(id),
                }
            }
            ColumnKind::Hex { .. } => CellValue::Hex(format_bytes(data)),
        };
        Ok(value)
    }
}

fn invalid(element: &str, attribute: &str, value: &str) -> DrillError {
    DrillError::InvalidAttribute {
        element: element.to_string(),
        attribute: attribute.to_string(),
        value: value.to_string(),
    }
}

fn required_length<N: SchemaNode>(node: &N, element: &str) -> Result<usize, DrillError> {
    let raw = required_attribute(node, element, "length")?;
    parse_unsigned(element, "length", &raw)
}

fn parse_enum_values<N: SchemaNode>(node: &N, column: &str) -> Result<Vec<EnumValue>, DrillError> {
    let element = format!("enum value in column '{}'", column);
    let mut seen = HashSet::new();
    let mut values = Vec::new();

    for child in node.children() {
        let raw_id = required_attribute(&child, &element, "id")?;
        let id: u64 = parse_unsigned(&element, "id", &raw_id)?;
        let label = required_attribute(&child, &element, "label")?;
        if !seen.insert(id) {
            return Err(DrillError::DuplicateEnumId {
                column: column.to_string(),
                id,
            });
        }
        values.push(EnumValue { id, label });
    }

    Ok(values)
}

/// Text up to the first NUL, trailing spaces trimmed, lossy UTF-8.
fn decode_text(data: &[u8]) -> CellValue {
    let end = data.iter().position(|&b| b == 0).unwrap_or(data.len());
    let text = String::from_utf8_lossy(&data[..end]);
    CellValue::Str(text.trim_end_matches(' ').to_string())
}

fn decode_date(data: &[u8], scratch: &mut String) -> CellValue {
    let year = LittleEndian::read_u16(&data[0..2]);
    let month = data[2];
    let day = data[3];

    if year == 0 && month == 0 && day == 0 {
        return CellValue::Null;
    }

    match NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32) {
        Some(date) => {
            scratch.clear();
            let _ = write!(scratch, "{}", date.format("%Y-%m-%d"));
            CellValue::Str(scratch.clone())
        }
        None => CellValue::Hex(format_bytes(&data[..4])),
    }
}

fn decode_decimal(raw: i32, scale: u32, scratch: &mut String) -> CellValue {
    scratch.clear();
    let sign = if raw < 0 { "-" } else { "" };
    let magnitude = (raw as i64).unsigned_abs();

    if scale == 0 {
        let _ = write!(scratch, "{}{}", sign, magnitude);
    } else {
        let divisor = 10u64.pow(scale);
        let _ = write!(
            scratch,
            "{}{}.{:0width$}",
            sign,
            magnitude / divisor,
            magnitude % divisor,
            width = scale as usize
        );
    }
    CellValue::Str(scratch.clone())
}
