//! Table schemas.
//!
//! A [`Table`] maps a logical record type onto a physical data file: the file
//! name (relative to the data directory), the byte offset of the first row,
//! the row length, and the ordered column descriptors. A row length of `0`
//! marks a variable-width table whose rows each carry their own length; a
//! table holding a `varstring` column is always variable-width.

use crate::table::column::ColumnDescriptor;
use crate::table::constants::{ROW_LENGTH_CLEARED, ROW_LENGTH_VARIABLE};
use crate::table::document::{parse_unsigned, required_attribute, SchemaNode};
use crate::DrillError;

/// Layout description of one table.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    file_name: String,
    data_offset: u32,
    row_length: u32,
    columns: Vec<ColumnDescriptor>,
}

impl Table {
    /// Create a table with no columns.
    ///
    /// # Examples
    ///
    /// ```
    /// use driller::table::column::{ColumnDescriptor, ColumnKind};
    /// use driller::table::schema::Table;
    ///
    /// let mut table = Table::new("Codes", "CODES.DAT", 16, 8);
    /// table.add_column(ColumnDescriptor::new("code", 0, ColumnKind::UInt16));
    /// assert_eq!(table.row_length(), 8);
    ///
    /// table.add_column(ColumnDescriptor::new("text", 4, ColumnKind::VarString));
    /// assert_eq!(table.row_length(), 0);
    /// ```
    pub fn new(
        name: impl Into<String>,
        file_name: impl Into<String>,
        data_offset: u32,
        row_length: u32,
    ) -> Self {
        Table {
            name: name.into(),
            file_name: file_name.into(),
            data_offset,
            row_length,
            columns: Vec::new(),
        }
    }

    /// Build a table from a schema document node.
    ///
    /// Reads the `name`, `file`, `data_offset` and `row_length` attributes
    /// before looking at any column, then parses the child nodes as columns in
    /// document order.
    pub fn from_node<N: SchemaNode>(node: &N) -> Result<Self, DrillError> {
        let name = required_attribute(node, "table", "name")?;
        let element = format!("table '{}'", name);
        let file_name = required_attribute(node, &element, "file")?;
        let raw_data_offset = required_attribute(node, &element, "data_offset")?;
        let raw_row_length = required_attribute(node, &element, "row_length")?;

        let data_offset: u32 = parse_unsigned(&element, "data_offset", &raw_data_offset)?;
        let row_length: u32 = parse_unsigned(&element, "row_length", &raw_row_length)?;

        let mut table = Table::new(name, file_name, data_offset, row_length);
        for child in node.children() {
            table.add_column(ColumnDescriptor::from_node(&child)?);
        }
        Ok(table)
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Reset to the empty table: no name, no file, offset 0, row length 1,
    /// no columns.
    pub fn clear(&mut self) {
        self.columns.clear();
        self.name.clear();
        self.file_name.clear();
        self.data_offset = 0;
        self.row_length = ROW_LENGTH_CLEARED;
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Data file name, relative to the data directory.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    /// Byte offset of the first row in the data file.
    pub fn data_offset(&self) -> u32 {
        self.data_offset
    }

    pub fn set_data_offset(&mut self, data_offset: u32) {
        self.data_offset = data_offset;
    }

    /// Bytes per row, or `0` for a variable-width table.
    pub fn row_length(&self) -> u32 {
        self.row_length
    }

    /// Set the row length. Ignored while the table holds a `varstring`
    /// column, which pins the row length to `0`.
    pub fn set_row_length(&mut self, row_length: u32) {
        if self.has_variable_column() {
            self.row_length = ROW_LENGTH_VARIABLE;
        } else {
            self.row_length = row_length;
        }
    }

    /// Returns true if rows carry their own length.
    pub fn is_variable_width(&self) -> bool {
        self.row_length == ROW_LENGTH_VARIABLE
    }

    fn has_variable_column(&self) -> bool {
        self.columns.iter().any(ColumnDescriptor::is_variable)
    }

    /// Column at `index`.
    pub fn column_at(&self, index: usize) -> Result<&ColumnDescriptor, DrillError> {
        self.columns.get(index).ok_or(DrillError::IndexOutOfRange {
            index,
            count: self.columns.len(),
        })
    }

    /// Append a column. A `varstring` column makes the table variable-width.
    pub fn add_column(&mut self, column: ColumnDescriptor) {
        if column.is_variable() {
            self.row_length = ROW_LENGTH_VARIABLE;
        }
        self.columns.push(column);
    }

    /// Remove and return the column at `index`, keeping the order of the rest.
    pub fn remove_column(&mut self, index: usize) -> Result<ColumnDescriptor, DrillError> {
        if index >= self.columns.len() {
            return Err(DrillError::IndexOutOfRange {
                index,
                count: self.columns.len(),
            });
        }
        Ok(self.columns.remove(index))
    }

    /// Borrowed view of the columns in order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        &self.columns
    }

    /// Owned copy of the column list.
    pub fn get_columns(&self) -> Vec<ColumnDescriptor> {
        self.columns.clone()
    }
}
