//! Lazy row iteration over a decoded result.

use std::iter::FusedIterator;

use tracing::warn;

use crate::error::Result;
use crate::types::Row;

use super::{CellCursors, QueryResult};

/// Forward-only iterator over the rows of a [`QueryResult`].
///
/// Each step decodes one row in O(columns). The iterator cannot be rewound;
/// call [`QueryResult::rows`] again for a new pass. After yielding an error
/// it yields nothing further.
#[derive(Debug)]
pub struct RowIter<'a> {
    result: &'a QueryResult,
    cursors: CellCursors,
    next_row: usize,
    failed: bool,
}

impl<'a> RowIter<'a> {
    pub(crate) fn new(result: &'a QueryResult) -> Self {
        RowIter {
            result,
            cursors: CellCursors::new(),
            next_row: 0,
            failed: false,
        }
    }

    /// Returns the number of rows not yet pulled.
    #[must_use]
    pub fn remaining(&self) -> usize {
        if self.failed {
            0
        } else {
            self.result.row_count() - self.next_row
        }
    }
}

impl Iterator for RowIter<'_> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining() == 0 {
            return None;
        }

        let row = self.next_row;
        match self
            .cursors
            .decode_row(self.result.buffers(), row, self.result.column_count())
        {
            Ok(values) => {
                self.next_row += 1;
                Some(Ok(Row::new(self.result.shared_columns().clone(), values)))
            }
            Err(e) => {
                warn!(row, error = %e, "row materialization failed");
                self.failed = true;
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}

impl FusedIterator for RowIter<'_> {}
