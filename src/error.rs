//! Error types for query result decoding.

use thiserror::Error;

use crate::types::CellType;

/// Result type alias using [`QueryError`].
pub type Result<T> = std::result::Result<T, QueryError>;

/// Error types for query result decoding.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The engine reported a failure instead of a result.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    // ==================== Integrity Errors ====================
    /// Total cell count is not a multiple of the column count.
    #[error("Integrity error: cell count {cells} is not a multiple of column count {columns}")]
    CellCountMismatch { cells: usize, columns: usize },

    /// Cells were received but no column names were supplied.
    #[error("Integrity error: {cells} cells received without any column names")]
    MissingColumns { cells: usize },

    /// A tag asked for a value its typed buffer does not hold.
    #[error("Integrity error: no {cell_type} value at index {index}")]
    MissingCellValue { cell_type: CellType, index: usize },

    /// The batch sequence ended before a batch flagged as last.
    #[error("Integrity error: batch stream ended after {batches} batches without a last-batch marker")]
    TruncatedResult { batches: usize },

    // ==================== Tag Errors ====================
    /// A cell carried the Invalid tag.
    #[error("Invalid cell type at row {row}, column {column}")]
    InvalidCell { row: usize, column: usize },

    /// A wire tag value outside the known range.
    #[error("Unknown cell type identifier {0}")]
    UnknownCellType(u32),

    // ==================== Export Errors ====================
    /// Tabular export requested without the capability compiled in.
    #[error("Missing dependency: tabular export needs the `{feature}` feature ({crates})")]
    MissingDependency {
        feature: &'static str,
        crates: &'static str,
    },

    /// Arrow rejected the assembled table.
    #[cfg(feature = "arrow")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Response snapshot could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QueryError {
    /// Error for a tabular export in a build without a table library.
    #[must_use]
    pub fn table_library_missing() -> Self {
        QueryError::MissingDependency {
            feature: "arrow",
            crates: "arrow-array, arrow-schema",
        }
    }
}
