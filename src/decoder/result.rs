//! Decoded query result.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::batch::QueryBatch;
use crate::error::{QueryError, Result};

use super::concat::concat_batches;
use super::{ColumnBuffers, DecoderConfig, RowIter};

/// A fully received query result.
///
/// Read-only once constructed. Rows are produced on demand by [`RowIter`];
/// every call to [`QueryResult::rows`] starts an independent pass.
#[derive(Debug, Clone)]
pub struct QueryResult {
    columns: Arc<[String]>,
    buffers: ColumnBuffers,
    row_count: usize,
}

impl QueryResult {
    /// Validates concatenated buffers against the column names.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::MissingColumns`] if cells exist but no column
    /// names were given, and [`QueryError::CellCountMismatch`] if the cell
    /// count is not a multiple of the column count.
    pub fn new(column_names: Vec<String>, buffers: ColumnBuffers) -> Result<Self> {
        let columns: Arc<[String]> = column_names.into();
        let cells = buffers.cell_count();

        // An empty result is valid whatever the columns are
        if cells == 0 {
            debug!(columns = columns.len(), "empty query result");
            return Ok(QueryResult {
                columns,
                buffers,
                row_count: 0,
            });
        }

        if columns.is_empty() {
            warn!(cells, "cells received without column names");
            return Err(QueryError::MissingColumns { cells });
        }

        if cells % columns.len() != 0 {
            warn!(cells, columns = columns.len(), "cell count mismatch");
            return Err(QueryError::CellCountMismatch {
                cells,
                columns: columns.len(),
            });
        }

        let row_count = cells / columns.len();
        debug!(rows = row_count, columns = columns.len(), cells, "query result decoded");
        Ok(QueryResult {
            columns,
            buffers,
            row_count,
        })
    }

    /// Concatenates `batches` and validates the result, using defaults.
    ///
    /// # Errors
    ///
    /// See [`QueryResult::new`].
    pub fn from_batches<I>(column_names: Vec<String>, batches: I) -> Result<Self>
    where
        I: IntoIterator<Item = QueryBatch>,
    {
        Self::from_batches_with_config(column_names, batches, DecoderConfig::default())
    }

    /// Concatenates `batches` and validates the result.
    ///
    /// # Errors
    ///
    /// See [`QueryResult::new`]; also [`QueryError::TruncatedResult`] when
    /// the configuration requires a last-batch marker.
    pub fn from_batches_with_config<I>(
        column_names: Vec<String>,
        batches: I,
        config: DecoderConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = QueryBatch>,
    {
        let buffers = concat_batches(batches, config)?;
        Self::new(column_names, buffers)
    }

    /// Returns a fresh single-pass iterator over the rows.
    #[must_use]
    pub fn rows(&self) -> RowIter<'_> {
        RowIter::new(self)
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Returns the ordered column names.
    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    /// Returns the total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.buffers.cell_count()
    }

    /// Returns true if the result has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    /// Returns the concatenated buffers.
    #[must_use]
    pub fn buffers(&self) -> &ColumnBuffers {
        &self.buffers
    }

    pub(crate) fn shared_columns(&self) -> &Arc<[String]> {
        &self.columns
    }
}

impl<'a> IntoIterator for &'a QueryResult {
    type Item = Result<crate::types::Row>;
    type IntoIter = RowIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows()
    }
}
