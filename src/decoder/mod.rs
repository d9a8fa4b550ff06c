//! Decoding of batched query responses.
//!
//! Decoding happens in two steps:
//! - [`concat`] folds the batch sequence into one set of typed buffers
//!   and a flat tag sequence.
//! - [`rows`] walks the tag sequence, pulling each cell's value from the
//!   buffer its tag names with a per-type cursor.
//!
//! The tag stream is the only link between a value and its column; buffers
//! carry no positional information of their own.

pub mod concat;
mod cursor;
mod result;
pub mod rows;

pub use concat::{BatchConcatenator, ColumnBuffers};
pub(crate) use cursor::CellCursors;
pub use result::QueryResult;
pub use rows::RowIter;

/// How invalid UTF-8 in a string payload is decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Utf8Policy {
    /// Substitute U+FFFD for each invalid sequence.
    #[default]
    Replace,
    /// Drop invalid sequences.
    Ignore,
}

/// Configuration for the decoder.
#[derive(Debug, Clone, Default)]
pub struct DecoderConfig {
    /// Lossy decoding policy for string payloads.
    pub utf8_policy: Utf8Policy,
    /// Fail when the batch sequence ends without a last-batch marker.
    pub require_last_batch: bool,
}

impl DecoderConfig {
    /// Creates a new decoder configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lossy decoding policy.
    #[must_use]
    pub fn with_utf8_policy(mut self, utf8_policy: Utf8Policy) -> Self {
        self.utf8_policy = utf8_policy;
        self
    }

    /// Sets whether a missing last-batch marker is an error.
    #[must_use]
    pub fn with_require_last_batch(mut self, require_last_batch: bool) -> Self {
        self.require_last_batch = require_last_batch;
        self
    }
}
