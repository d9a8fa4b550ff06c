//! Arrow `RecordBatch` export.

use std::sync::Arc;

use arrow::array::{
    Array, ArrayRef, BinaryArray, Float64Array, Int64Array, NullArray, StringArray, UnionArray,
};
use arrow::datatypes::{Field, Schema, UnionFields};
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};

use crate::error::Result;
use crate::types::{CellType, Value};

use super::TableSink;

/// Builds a [`RecordBatch`] from exported rows.
///
/// Column types follow the non-null cells of each column:
/// - one cell kind maps to `Int64`, `Float64`, `Utf8` or `Binary`
/// - only nulls (or no rows) map to `Null`
/// - several kinds map to a dense `Union` whose type ids are the cell tags
#[derive(Debug, Default)]
pub struct ArrowTableSink {
    names: Vec<String>,
    columns: Vec<Vec<Value>>,
    row_count: usize,
}

impl ArrowTableSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableSink for ArrowTableSink {
    type Output = RecordBatch;

    fn begin(&mut self, columns: &[String], row_count: usize) -> Result<()> {
        self.names = columns.to_vec();
        self.columns = columns
            .iter()
            .map(|_| Vec::with_capacity(row_count))
            .collect();
        Ok(())
    }

    fn push_row(&mut self, values: Vec<Value>) -> Result<()> {
        for (column, value) in self.columns.iter_mut().zip(values) {
            column.push(value);
        }
        self.row_count += 1;
        Ok(())
    }

    fn finish(self) -> Result<RecordBatch> {
        let arrays = self
            .columns
            .iter()
            .map(|c| build_array(c))
            .collect::<Result<Vec<_>>>()?;
        let fields: Vec<Field> = self
            .names
            .iter()
            .zip(&arrays)
            .map(|(name, array)| Field::new(name, array.data_type().clone(), true))
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(self.row_count));
        let batch = RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)?;
        Ok(batch)
    }
}

/// Builds the array for one column.
///
/// The narrow native type is used when at most one payload kind occurs;
/// otherwise every cell keeps its own type inside a dense union.
fn build_array(values: &[Value]) -> Result<ArrayRef> {
    let mut present = [false; CellType::COUNT];
    for value in values {
        present[value.cell_type().index()] = true;
    }
    let payload: Vec<CellType> = CellType::ALL
        .into_iter()
        .filter(|t| t.has_payload() && present[t.index()])
        .collect();

    let array: ArrayRef = match payload.as_slice() {
        [] => Arc::new(NullArray::new(values.len())),
        [CellType::Varint] => Arc::new(Int64Array::from(
            values.iter().map(Value::as_int64).collect::<Vec<_>>(),
        )),
        [CellType::Float64] => Arc::new(Float64Array::from(
            values.iter().map(Value::as_float64).collect::<Vec<_>>(),
        )),
        [CellType::String] => Arc::new(StringArray::from(
            values.iter().map(Value::as_string).collect::<Vec<_>>(),
        )),
        [CellType::Blob] => Arc::new(BinaryArray::from(
            values.iter().map(Value::as_blob).collect::<Vec<_>>(),
        )),
        _ => build_union(values)?,
    };
    Ok(array)
}

/// Builds a dense union with one child per cell kind present.
///
/// Union type ids are the wire identifiers of the cell kinds. Nulls live in
/// a `Null` child since union arrays carry no validity buffer.
fn build_union(values: &[Value]) -> Result<ArrayRef> {
    let mut type_ids: Vec<i8> = Vec::with_capacity(values.len());
    let mut offsets: Vec<i32> = Vec::with_capacity(values.len());
    let mut nulls = 0usize;
    let mut varints = Vec::new();
    let mut float64s = Vec::new();
    let mut strings = Vec::new();
    let mut blobs = Vec::new();

    for value in values {
        let offset = match value {
            Value::Null => {
                nulls += 1;
                nulls - 1
            }
            Value::Int64(v) => {
                varints.push(*v);
                varints.len() - 1
            }
            Value::Float64(v) => {
                float64s.push(*v);
                float64s.len() - 1
            }
            Value::String(v) => {
                strings.push(v.as_str());
                strings.len() - 1
            }
            Value::Blob(v) => {
                blobs.push(v.as_slice());
                blobs.len() - 1
            }
        };
        let offset = i32::try_from(offset).map_err(|_| {
            ArrowError::InvalidArgumentError(format!("union offset {offset} exceeds i32"))
        })?;
        type_ids.push(value.cell_type() as i8);
        offsets.push(offset);
    }

    let mut ids = Vec::new();
    let mut fields = Vec::new();
    let mut children: Vec<ArrayRef> = Vec::new();
    for cell_type in CellType::ALL {
        let child: ArrayRef = match cell_type {
            CellType::Null if nulls > 0 => Arc::new(NullArray::new(nulls)),
            CellType::Varint if !varints.is_empty() => {
                Arc::new(Int64Array::from(std::mem::take(&mut varints)))
            }
            CellType::Float64 if !float64s.is_empty() => {
                Arc::new(Float64Array::from(std::mem::take(&mut float64s)))
            }
            CellType::String if !strings.is_empty() => {
                Arc::new(StringArray::from(std::mem::take(&mut strings)))
            }
            CellType::Blob if !blobs.is_empty() => {
                Arc::new(BinaryArray::from(std::mem::take(&mut blobs)))
            }
            _ => continue,
        };
        ids.push(cell_type as i8);
        fields.push(Field::new(cell_type.name(), child.data_type().clone(), true));
        children.push(child);
    }

    let union = UnionArray::try_new(
        UnionFields::new(ids, fields),
        type_ids.into(),
        Some(offsets.into()),
        children,
    )?;
    Ok(Arc::new(union))
}
