//! Cell tag, `Value` and `Row` definitions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{QueryError, Result};

/// Per-cell tag naming which typed buffer holds the cell's value.
///
/// Discriminants match the field identifiers of the query response wire
/// message and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CellType {
    /// Malformed cell; never valid in a well-formed result.
    Invalid = 0,
    /// SQL NULL. Carries no payload.
    Null = 1,
    /// Signed integer, stored in the varint buffer.
    Varint = 2,
    /// 64-bit float.
    Float64 = 3,
    /// UTF-8 string, stored null-terminated in the string blob.
    String = 4,
    /// Opaque bytes.
    Blob = 5,
}

impl CellType {
    /// Number of cell kinds.
    pub const COUNT: usize = 6;

    /// All cell kinds in wire order.
    pub const ALL: [CellType; Self::COUNT] = [
        CellType::Invalid,
        CellType::Null,
        CellType::Varint,
        CellType::Float64,
        CellType::String,
        CellType::Blob,
    ];

    /// Returns the display name of the cell kind.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            CellType::Invalid => "INVALID",
            CellType::Null => "NULL",
            CellType::Varint => "VARINT",
            CellType::Float64 => "FLOAT64",
            CellType::String => "STRING",
            CellType::Blob => "BLOB",
        }
    }

    /// Returns the wire identifier, also usable as a table index.
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns whether cells of this kind pull a value from a typed buffer.
    #[must_use]
    pub fn has_payload(&self) -> bool {
        matches!(
            self,
            CellType::Varint | CellType::Float64 | CellType::String | CellType::Blob
        )
    }

    /// Converts a raw wire identifier.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownCellType`] for identifiers above 5.
    pub fn from_wire(id: u32) -> Result<Self> {
        Self::ALL
            .get(id as usize)
            .copied()
            .ok_or(QueryError::UnknownCellType(id))
    }
}

impl TryFrom<u32> for CellType {
    type Error = QueryError;

    fn try_from(id: u32) -> Result<Self> {
        CellType::from_wire(id)
    }
}

impl From<CellType> for u32 {
    fn from(cell_type: CellType) -> u32 {
        u32::from(cell_type as u8)
    }
}

impl fmt::Display for CellType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single decoded cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null value.
    Null,
    /// 64-bit signed integer value.
    Int64(i64),
    /// 64-bit floating point value.
    Float64(f64),
    /// String value.
    String(String),
    /// Binary value.
    Blob(Vec<u8>),
}

// Manual Hash implementation because f64 doesn't implement Hash
impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Int64(v) => v.hash(state),
            Value::Float64(v) => v.to_bits().hash(state),
            Value::String(v) => v.hash(state),
            Value::Blob(v) => v.hash(state),
            Value::Null => {}
        }
    }
}

// Manual Eq implementation because f64 doesn't implement Eq
impl Eq for Value {}

impl Value {
    /// Returns true if this value is null.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the cell tag this value would be encoded with.
    #[must_use]
    pub fn cell_type(&self) -> CellType {
        match self {
            Value::Null => CellType::Null,
            Value::Int64(_) => CellType::Varint,
            Value::Float64(_) => CellType::Float64,
            Value::String(_) => CellType::String,
            Value::Blob(_) => CellType::Blob,
        }
    }

    /// Attempts to extract an i64 value.
    #[must_use]
    pub fn as_int64(&self) -> Option<i64> {
        match self {
            Value::Int64(i) => Some(*i),
            _ => None,
        }
    }

    /// Attempts to extract an f64 value.
    #[must_use]
    pub fn as_float64(&self) -> Option<f64> {
        match self {
            Value::Float64(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Attempts to extract a byte slice.
    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        match self {
            Value::Blob(b) => Some(b.as_slice()),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str("NULL"),
            Value::Int64(v) => write!(f, "{v}"),
            Value::Float64(v) => write!(f, "{v}"),
            Value::String(s) => f.write_str(s),
            Value::Blob(bytes) => {
                f.write_str("x'")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                f.write_str("'")
            }
        }
    }
}

/// One decoded row, keyed by column name in result column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    columns: Arc<[String]>,
    values: Vec<Value>,
}

impl Row {
    pub(crate) fn new(columns: Arc<[String]>, values: Vec<Value>) -> Self {
        debug_assert_eq!(columns.len(), values.len());
        Row { columns, values }
    }

    /// Gets a value by column name.
    ///
    /// With duplicate column names the first match wins.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| &self.values[i])
    }

    /// Gets a value by column position.
    #[must_use]
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    /// Returns the column names of this row.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Returns the values of this row in column order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Consumes the row, returning its values in column order.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    /// Returns the number of columns in the row.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns true if the row contains the given column.
    #[must_use]
    pub fn contains_key(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Returns an iterator over the columns and values.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (column, value)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{column}: {value}")?;
        }
        f.write_str("}")
    }
}
