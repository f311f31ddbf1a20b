//! Schema documents.
//!
//! Tables are built from a tree of attribute-carrying nodes through the
//! [`SchemaNode`] trait, so the same construction code works for any document
//! format that can expose named string attributes and ordered children.
//! [`JsonNode`] implements it over `serde_json` values and [`Database`] reads
//! a whole JSON schema document:
//!
//! ```json
//! {
//!   "data_path": "/srv/legacy",
//!   "tables": [
//!     {
//!       "name": "Patients", "file": "PATIENT.DAT",
//!       "data_offset": "128", "row_length": "64",
//!       "columns": [
//!         { "name": "id", "type": "uint32", "offset": "0" },
//!         { "name": "status", "type": "enum", "offset": "4",
//!           "values": [ { "id": "1", "label": "Active" } ] }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Attribute values may be JSON strings or numbers. Children are taken from
//! the `columns` array of a table and the `values` array of an enum column;
//! non-object entries in those arrays are skipped.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::table::schema::Table;
use crate::DrillError;

/// Keys whose array values are treated as child nodes.
const CHILD_KEYS: [&str; 2] = ["columns", "values"];

/// A node of a schema document.
pub trait SchemaNode: Sized {
    /// Text of the attribute called `name`, if present.
    fn attribute(&self, name: &str) -> Option<String>;

    /// Child nodes in document order.
    fn children(&self) -> Vec<Self>;
}

/// Fetch a required attribute or fail with [`DrillError::MissingAttribute`].
pub(crate) fn required_attribute<N: SchemaNode>(
    node: &N,
    element: &str,
    attribute: &str,
) -> Result<String, DrillError> {
    node.attribute(attribute)
        .ok_or_else(|| DrillError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        })
}

/// Parse a non-negative integer attribute or fail with
/// [`DrillError::InvalidAttribute`] carrying the raw text.
pub(crate) fn parse_unsigned<T: FromStr>(
    element: &str,
    attribute: &str,
    raw: &str,
) -> Result<T, DrillError> {
    raw.trim()
        .parse::<T>()
        .map_err(|_| DrillError::InvalidAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
            value: raw.to_string(),
        })
}

/// A JSON object viewed as a [`SchemaNode`].
#[derive(Debug, Clone, Copy)]
pub struct JsonNode<'a> {
    object: &'a Map<String, Value>,
}

impl<'a> JsonNode<'a> {
    /// Wrap a JSON value, which must be an object.
    pub fn new(value: &'a Value) -> Result<Self, DrillError> {
        value
            .as_object()
            .map(|object| JsonNode { object })
            .ok_or_else(|| DrillError::Parse(format!("Expected a JSON object, found {}", value)))
    }
}

impl SchemaNode for JsonNode<'_> {
    fn attribute(&self, name: &str) -> Option<String> {
        match self.object.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    fn children(&self) -> Vec<Self> {
        CHILD_KEYS
            .iter()
            .filter_map(|key| self.object.get(*key))
            .filter_map(Value::as_array)
            .flat_map(|items| items.iter().filter_map(Value::as_object))
            .map(|object| JsonNode { object })
            .collect()
    }
}

/// All tables declared by one schema document.
#[derive(Debug, Clone, Default)]
pub struct Database {
    data_path: Option<PathBuf>,
    tables: Vec<Table>,
}

impl Database {
    /// Create an empty database description.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse a JSON schema document from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DrillError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| DrillError::file_read(path, &e))?;
        Self::from_json(&text)
    }

    /// Parse a JSON schema document.
    ///
    /// # Examples
    ///
    /// ```
    /// use driller::table::document::Database;
    ///
    /// let db = Database::from_json(r#"{
    ///     "tables": [
    ///         { "name": "Codes", "file": "CODES.DAT", "data_offset": "0", "row_length": "8",
    ///           "columns": [ { "name": "code", "type": "uint16", "offset": "0" } ] }
    ///     ]
    /// }"#).unwrap();
    ///
    /// let codes = db.table("Codes").unwrap();
    /// assert_eq!(codes.row_length(), 8);
    /// assert_eq!(codes.column_count(), 1);
    /// ```
    pub fn from_json(text: &str) -> Result<Self, DrillError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| DrillError::Parse(format!("Invalid schema document: {}", e)))?;
        Self::from_value(&value)
    }

    /// Build from an already parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Self, DrillError> {
        let root = value
            .as_object()
            .ok_or_else(|| DrillError::Parse("Schema document must be a JSON object".to_string()))?;

        let data_path = match root.get("data_path") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(PathBuf::from(s)),
            Some(other) => {
                return Err(DrillError::InvalidAttribute {
                    element: "database".to_string(),
                    attribute: "data_path".to_string(),
                    value: other.to_string(),
                })
            }
        };

        let table_values = root
            .get("tables")
            .and_then(Value::as_array)
            .ok_or_else(|| DrillError::MissingAttribute {
                element: "database".to_string(),
                attribute: "tables".to_string(),
            })?;

        let mut tables = Vec::with_capacity(table_values.len());
        for value in table_values {
            let node = JsonNode::new(value)?;
            tables.push(Table::from_node(&node)?);
        }

        Ok(Database { data_path, tables })
    }

    /// Data directory declared by the document, if any.
    pub fn data_path(&self) -> Option<&Path> {
        self.data_path.as_deref()
    }

    pub fn set_data_path(&mut self, path: Option<PathBuf>) {
        self.data_path = path;
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// First table with the given friendly name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name() == name)
    }

    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }
}
