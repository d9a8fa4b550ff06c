//! Tabular export of decoded results.
//!
//! Export runs its own full pass over a [`QueryResult`] and feeds every row
//! into a [`TableSink`]. The crate ships an Arrow sink behind the `arrow`
//! feature; row iteration never needs it.

#[cfg(feature = "arrow")]
mod arrow_sink;

use tracing::debug;

use crate::decoder::{CellCursors, QueryResult};
use crate::error::Result;
use crate::types::Value;

#[cfg(feature = "arrow")]
pub use arrow_sink::ArrowTableSink;

/// Table produced by [`QueryResult::to_table`].
#[cfg(feature = "arrow")]
pub type Table = arrow::record_batch::RecordBatch;

/// Table produced by [`QueryResult::to_table`].
///
/// Uninhabited: without the `arrow` feature no table can be built.
#[cfg(not(feature = "arrow"))]
#[derive(Debug)]
pub enum Table {}

/// Destination of a tabular export.
pub trait TableSink {
    /// The finished table.
    type Output;

    /// Called once before any row, with the result's shape.
    ///
    /// # Errors
    ///
    /// Implementations may reject the shape.
    fn begin(&mut self, columns: &[String], row_count: usize) -> Result<()>;

    /// Called once per row with values in column order. Nulls arrive as
    /// [`Value::Null`].
    ///
    /// # Errors
    ///
    /// Implementations may reject a row.
    fn push_row(&mut self, values: Vec<Value>) -> Result<()>;

    /// Builds the table after the last row.
    ///
    /// # Errors
    ///
    /// Implementations may fail to assemble the table.
    fn finish(self) -> Result<Self::Output>;
}

impl QueryResult {
    /// Exports every row into `sink`, using fresh cursors.
    ///
    /// # Errors
    ///
    /// Returns the first decoding error, or any error raised by the sink.
    pub fn export_with<S: TableSink>(&self, mut sink: S) -> Result<S::Output> {
        let columns = self.column_names();
        sink.begin(columns, self.row_count())?;

        let mut cursors = CellCursors::new();
        for row in 0..self.row_count() {
            let values = cursors.decode_row(self.buffers(), row, columns.len())?;
            sink.push_row(values)?;
        }

        debug!(
            rows = self.row_count(),
            columns = columns.len(),
            "query result exported"
        );
        sink.finish()
    }

    /// Materializes the result as an Arrow record batch.
    ///
    /// # Errors
    ///
    /// Returns a decoding error, or an Arrow error if the batch cannot be
    /// assembled.
    #[cfg(feature = "arrow")]
    pub fn to_table(&self) -> Result<Table> {
        self.export_with(ArrowTableSink::new())
    }

    /// Materializes the result as a table.
    ///
    /// # Errors
    ///
    /// Always returns [`QueryError::MissingDependency`](crate::QueryError::MissingDependency):
    /// this build has no table library.
    #[cfg(not(feature = "arrow"))]
    pub fn to_table(&self) -> Result<Table> {
        Err(crate::error::QueryError::table_library_missing())
    }
}
