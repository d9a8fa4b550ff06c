//! Folding of a batch sequence into per-type buffers.

use tracing::{trace, warn};

use crate::batch::QueryBatch;
use crate::error::{QueryError, Result};
use crate::types::{CellType, Value};

use super::{DecoderConfig, Utf8Policy};

/// Typed value buffers and the flat tag sequence of a whole response.
///
/// Within each buffer, values keep their order across batch boundaries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnBuffers {
    cells: Vec<CellType>,
    varints: Vec<i64>,
    float64s: Vec<f64>,
    strings: Vec<String>,
    blobs: Vec<Vec<u8>>,
}

impl ColumnBuffers {
    /// Creates empty buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one batch, consuming its arrays.
    pub fn append(&mut self, batch: QueryBatch, policy: Utf8Policy) {
        let QueryBatch {
            mut cells,
            mut varint_cells,
            mut float64_cells,
            string_cells,
            mut blob_cells,
            ..
        } = batch;

        self.strings.extend(string_cells.split(policy));
        self.varints.append(&mut varint_cells);
        self.float64s.append(&mut float64_cells);
        self.blobs.append(&mut blob_cells);
        self.cells.append(&mut cells);
    }

    /// Returns the tag of every cell in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[CellType] {
        &self.cells
    }

    /// Returns the total number of cells.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns the varint buffer.
    #[must_use]
    pub fn varints(&self) -> &[i64] {
        &self.varints
    }

    /// Returns the float buffer.
    #[must_use]
    pub fn float64s(&self) -> &[f64] {
        &self.float64s
    }

    /// Returns the string buffer.
    #[must_use]
    pub fn strings(&self) -> &[String] {
        &self.strings
    }

    /// Returns the blob buffer.
    #[must_use]
    pub fn blobs(&self) -> &[Vec<u8>] {
        &self.blobs
    }

    /// Returns the number of values stored for `cell_type`.
    #[must_use]
    pub fn len_of(&self, cell_type: CellType) -> usize {
        match cell_type {
            CellType::Varint => self.varints.len(),
            CellType::Float64 => self.float64s.len(),
            CellType::String => self.strings.len(),
            CellType::Blob => self.blobs.len(),
            CellType::Invalid | CellType::Null => 0,
        }
    }

    /// Reads the `index`-th value of the buffer named by `cell_type`.
    ///
    /// Returns None for payload-free tags and out-of-range indices.
    #[must_use]
    pub fn value(&self, cell_type: CellType, index: usize) -> Option<Value> {
        match cell_type {
            CellType::Varint => self.varints.get(index).map(|v| Value::Int64(*v)),
            CellType::Float64 => self.float64s.get(index).map(|v| Value::Float64(*v)),
            CellType::String => self.strings.get(index).map(|v| Value::String(v.clone())),
            CellType::Blob => self.blobs.get(index).map(|v| Value::Blob(v.clone())),
            CellType::Invalid | CellType::Null => None,
        }
    }
}

/// Incrementally concatenates the batches of one response.
#[derive(Debug, Default)]
pub struct BatchConcatenator {
    config: DecoderConfig,
    buffers: ColumnBuffers,
    batches_seen: usize,
    finished: bool,
}

impl BatchConcatenator {
    /// Creates a concatenator with the given configuration.
    #[must_use]
    pub fn new(config: DecoderConfig) -> Self {
        BatchConcatenator {
            config,
            ..Self::default()
        }
    }

    /// Appends a batch. Returns true once the last batch has been appended.
    ///
    /// Batches pushed after the last one are dropped.
    pub fn push(&mut self, batch: QueryBatch) -> bool {
        if self.finished {
            warn!(
                batches_seen = self.batches_seen,
                "batch received after the last batch, ignoring"
            );
            return true;
        }

        let is_last = batch.is_last_batch;
        trace!(
            batch = self.batches_seen,
            cells = batch.cells.len(),
            is_last,
            "appending batch"
        );
        self.buffers.append(batch, self.config.utf8_policy);
        self.batches_seen += 1;
        self.finished = is_last;
        is_last
    }

    /// Returns the number of batches appended so far.
    #[must_use]
    pub fn batches_seen(&self) -> usize {
        self.batches_seen
    }

    /// Returns true once the last batch has been appended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Consumes the concatenator and returns the buffers.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::TruncatedResult`] when `require_last_batch` is set
    /// and batches were received without the last-batch marker.
    pub fn finish(self) -> Result<ColumnBuffers> {
        if !self.finished && self.batches_seen > 0 {
            if self.config.require_last_batch {
                return Err(QueryError::TruncatedResult {
                    batches: self.batches_seen,
                });
            }
            warn!(
                batches = self.batches_seen,
                "batch stream ended without a last-batch marker"
            );
        }
        Ok(self.buffers)
    }
}

/// Concatenates batches until the one flagged as last.
///
/// The iterator is not advanced past the last batch.
///
/// # Errors
///
/// See [`BatchConcatenator::finish`].
pub fn concat_batches<I>(batches: I, config: DecoderConfig) -> Result<ColumnBuffers>
where
    I: IntoIterator<Item = QueryBatch>,
{
    let mut concat = BatchConcatenator::new(config);
    for batch in batches {
        if concat.push(batch) {
            break;
        }
    }
    concat.finish()
}
