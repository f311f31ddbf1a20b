//! Extraction results.
//!
//! [`ResultSet`] is a row-major grid of [`CellValue`]s sized at construction.
//! Each cell starts empty and may be written exactly once.

use serde_json::{Map, Value};

use crate::table::column::CellValue;
use crate::table::schema::Table;
use crate::DrillError;

/// Decoded contents of one table.
#[derive(Debug, Clone)]
pub struct ResultSet {
    table_name: String,
    column_names: Vec<String>,
    row_count: usize,
    column_count: usize,
    cells: Vec<Option<CellValue>>,
}

impl ResultSet {
    /// Allocate an empty `row_count × column_count` grid for `table`.
    ///
    /// Column names are taken from the table; if `column_count` exceeds the
    /// table's columns the extra columns are named by index.
    pub fn new(table: &Table, row_count: usize, column_count: usize) -> Self {
        let column_names = (0..column_count)
            .map(|i| match table.columns().get(i) {
                Some(col) => col.name().to_string(),
                None => format!("column_{}", i),
            })
            .collect();

        ResultSet {
            table_name: table.name().to_string(),
            column_names,
            row_count,
            column_count,
            cells: vec![None; row_count * column_count],
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    fn index(&self, row: usize, column: usize) -> Result<usize, DrillError> {
        if row >= self.row_count {
            return Err(DrillError::IndexOutOfRange {
                index: row,
                count: self.row_count,
            });
        }
        if column >= self.column_count {
            return Err(DrillError::IndexOutOfRange {
                index: column,
                count: self.column_count,
            });
        }
        Ok(row * self.column_count + column)
    }

    /// Write a cell. Fails if the position is out of range or already written.
    pub fn set_cell(&mut self, row: usize, column: usize, value: CellValue) -> Result<(), DrillError> {
        let idx = self.index(row, column)?;
        let cell = &mut self.cells[idx];
        if cell.is_some() {
            return Err(DrillError::CellAlreadySet { row, column });
        }
        *cell = Some(value);
        Ok(())
    }

    /// Value at `(row, column)`, or `None` if out of range or not yet written.
    pub fn cell(&self, row: usize, column: usize) -> Option<&CellValue> {
        let idx = self.index(row, column).ok()?;
        self.cells[idx].as_ref()
    }

    /// Number of cells written so far.
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Returns true once every cell has been written.
    pub fn is_complete(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Iterate rows as slices of cells in column order.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<CellValue>]> {
        // chunks() rejects a zero size; an empty grid has no rows to yield
        let width = self.column_count.max(1);
        let rows = if self.column_count == 0 { 0 } else { self.row_count };
        self.cells.chunks(width).take(rows)
    }

    /// Rows as JSON objects keyed by column name. Unwritten cells are `null`.
    pub fn to_json_rows(&self) -> Vec<Value> {
        self.rows()
            .map(|row| {
                let mut obj = Map::new();
                for (name, cell) in self.column_names.iter().zip(row) {
                    let value = match cell {
                        Some(v) => serde_json::to_value(v).unwrap_or(Value::Null),
                        None => Value::Null,
                    };
                    obj.insert(name.clone(), value);
                }
                Value::Object(obj)
            })
            .collect()
    }
}
