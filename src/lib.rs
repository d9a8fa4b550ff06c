//! query-cells - decoder for batched, tag-multiplexed query results.
//!
//! An analytical engine answers a query with a sequence of batches. Each
//! batch holds one array per value type plus a tag per cell naming the array
//! that holds the cell's value. This crate folds those batches into one set
//! of buffers, then rebuilds rows on demand or exports the whole result as a
//! table.
//!
//! ```
//! use query_cells::{CellType, QueryBatch, QueryResult, StringCells, Value};
//!
//! let batch = QueryBatch {
//!     cells: vec![CellType::Varint, CellType::String, CellType::Null, CellType::Varint],
//!     varint_cells: vec![10, 99],
//!     string_cells: StringCells::from(b"hello\0".as_slice()),
//!     ..QueryBatch::new()
//! }
//! .last();
//!
//! let result = QueryResult::from_batches(vec!["a".into(), "b".into()], [batch])?;
//! let rows = result.rows().collect::<query_cells::Result<Vec<_>>>()?;
//!
//! assert_eq!(rows[0].get("b"), Some(&Value::String("hello".into())));
//! assert_eq!(rows[1].get("a"), Some(&Value::Null));
//! # Ok::<(), query_cells::QueryError>(())
//! ```

pub mod batch;
pub mod decoder;
pub mod error;
pub mod export;
pub mod types;

pub use batch::{QueryBatch, QueryResponse, StringCells};
pub use decoder::{DecoderConfig, QueryResult, RowIter, Utf8Policy};
pub use error::{QueryError, Result};
pub use export::{Table, TableSink};
pub use types::{CellType, Row, Value};

#[cfg(feature = "arrow")]
pub use export::ArrowTableSink;
