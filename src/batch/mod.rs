//! Wire-level query response types.
//!
//! A query response carries its cells as a sequence of [`QueryBatch`]es.
//! Each batch stores values in per-type arrays and records, for every cell,
//! which array holds it. Batches are cut at row boundaries and the final
//! batch sets `is_last_batch`.

mod strings;

use serde::{Deserialize, Serialize};

use crate::decoder::{DecoderConfig, QueryResult};
use crate::error::{QueryError, Result};
use crate::types::CellType;

pub use strings::StringCells;

/// One batch of a query response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryBatch {
    /// Tag per cell, in row-major order.
    pub cells: Vec<CellType>,
    /// Values of `Varint` cells.
    pub varint_cells: Vec<i64>,
    /// Values of `Float64` cells.
    pub float64_cells: Vec<f64>,
    /// Null-terminated values of `String` cells.
    pub string_cells: StringCells,
    /// Values of `Blob` cells.
    pub blob_cells: Vec<Vec<u8>>,
    /// Set on the final batch of a response.
    pub is_last_batch: bool,
}

impl QueryBatch {
    /// Creates an empty, non-final batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks this batch as the final one.
    #[must_use]
    pub fn last(mut self) -> Self {
        self.is_last_batch = true;
        self
    }

    /// Returns the number of cells contributed by this batch.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Builds the tag array from raw wire identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::UnknownCellType`] on the first identifier above 5.
    pub fn tags_from_wire(ids: &[u32]) -> Result<Vec<CellType>> {
        ids.iter().map(|&id| CellType::from_wire(id)).collect()
    }
}

/// A complete query response as handed over by the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    /// Ordered result column names.
    pub column_names: Vec<String>,
    /// Result batches, the last one flagged.
    pub batches: Vec<QueryBatch>,
    /// Error reported by the engine, if the query failed.
    pub error: Option<String>,
}

impl QueryResponse {
    /// Creates a successful response.
    #[must_use]
    pub fn new(column_names: Vec<String>, batches: Vec<QueryBatch>) -> Self {
        QueryResponse {
            column_names,
            batches,
            error: None,
        }
    }

    /// Creates a failed response.
    #[must_use]
    pub fn failed(error: impl Into<String>) -> Self {
        QueryResponse {
            error: Some(error.into()),
            ..Self::default()
        }
    }

    /// Decodes the response with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::QueryFailed`] when the engine reported an error,
    /// or any integrity error raised while decoding.
    pub fn into_result(self) -> Result<QueryResult> {
        self.into_result_with_config(DecoderConfig::default())
    }

    /// Decodes the response with an explicit configuration.
    ///
    /// # Errors
    ///
    /// See [`QueryResponse::into_result`].
    pub fn into_result_with_config(self, config: DecoderConfig) -> Result<QueryResult> {
        if let Some(error) = self.error {
            return Err(QueryError::QueryFailed(error));
        }
        QueryResult::from_batches_with_config(self.column_names, self.batches, config)
    }

    /// Serializes the response to bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn serialize(&self) -> Result<Vec<u8>> {
        bincode::serialize(self).map_err(|e| {
            QueryError::Serialization(format!("Failed to serialize query response: {e}"))
        })
    }

    /// Deserializes a response from bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn deserialize(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data).map_err(|e| {
            QueryError::Serialization(format!("Failed to deserialize query response: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_from_wire() {
        let tags = QueryBatch::tags_from_wire(&[2, 4, 1, 2]).unwrap();
        assert_eq!(
            tags,
            vec![CellType::Varint, CellType::String, CellType::Null, CellType::Varint]
        );
        assert!(matches!(
            QueryBatch::tags_from_wire(&[1, 9]),
            Err(QueryError::UnknownCellType(9))
        ));
    }

    #[test]
    fn test_failed_response() {
        let err = QueryResponse::failed("no such table: foo")
            .into_result()
            .unwrap_err();
        assert!(matches!(err, QueryError::QueryFailed(ref m) if m == "no such table: foo"));
    }

    #[test]
    fn test_response_snapshot_roundtrip() {
        let response = QueryResponse::new(
            vec!["name".into(), "dur".into()],
            vec![QueryBatch {
                cells: vec![CellType::String, CellType::Float64],
                float64_cells: vec![2.5],
                string_cells: StringCells::from(vec![b'a', 0xff, 0]),
                ..QueryBatch::new()
            }
            .last()],
        );

        let bytes = response.serialize().unwrap();
        let restored = QueryResponse::deserialize(&bytes).unwrap();
        assert_eq!(restored, response);
    }

    #[test]
    fn test_deserialize_garbage() {
        let err = QueryResponse::deserialize(&[0xff; 3]).unwrap_err();
        assert!(err.to_string().contains("Serialization error"));
    }
}
