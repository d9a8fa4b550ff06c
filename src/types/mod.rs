//! Type definitions for decoded query results.

mod value;

pub use value::{CellType, Row, Value};
