//! Per-type read cursors.

use crate::error::{QueryError, Result};
use crate::types::{CellType, Value};

use super::ColumnBuffers;

/// Read positions into each typed buffer for a single decoding pass.
///
/// Cursors only move forward. Every pass over a result owns a fresh set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct CellCursors {
    positions: [usize; CellType::COUNT],
}

impl CellCursors {
    /// Creates cursors positioned at the start of every buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of values already consumed for `cell_type`.
    #[cfg(test)]
    #[must_use]
    pub fn position(&self, cell_type: CellType) -> usize {
        self.positions[cell_type.index()]
    }

    /// Decodes one row of `column_count` cells starting at row `row`.
    ///
    /// Each payload-carrying cell advances exactly its own cursor; null cells
    /// advance none.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidCell`] for an Invalid tag and
    /// [`QueryError::MissingCellValue`] when a buffer runs dry.
    pub fn decode_row(
        &mut self,
        buffers: &ColumnBuffers,
        row: usize,
        column_count: usize,
    ) -> Result<Vec<Value>> {
        let base = row * column_count;
        let tags = &buffers.cells()[base..base + column_count];

        tags.iter()
            .enumerate()
            .map(|(column, &cell_type)| match cell_type {
                CellType::Invalid => Err(QueryError::InvalidCell { row, column }),
                CellType::Null => Ok(Value::Null),
                _ => self.take(buffers, cell_type),
            })
            .collect()
    }

    fn take(&mut self, buffers: &ColumnBuffers, cell_type: CellType) -> Result<Value> {
        let index = self.positions[cell_type.index()];
        let value = buffers
            .value(cell_type, index)
            .ok_or(QueryError::MissingCellValue { cell_type, index })?;
        self.positions[cell_type.index()] += 1;
        Ok(value)
    }
}
