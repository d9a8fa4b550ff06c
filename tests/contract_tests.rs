//! Contract tests for the wire identifiers, error messages and public API.

use query_cells::{CellType, QueryBatch, QueryError, QueryResult, Value};

// =============================================================================
// Wire Format Contracts
// =============================================================================

mod wire_contracts {
    use super::*;

    #[test]
    fn test_cell_type_identifiers() {
        assert_eq!(CellType::Invalid as u8, 0);
        assert_eq!(CellType::Null as u8, 1);
        assert_eq!(CellType::Varint as u8, 2);
        assert_eq!(CellType::Float64 as u8, 3);
        assert_eq!(CellType::String as u8, 4);
        assert_eq!(CellType::Blob as u8, 5);
    }

    #[test]
    fn test_cell_type_wire_roundtrip() {
        for id in 0u32..6 {
            let cell_type = CellType::try_from(id).unwrap();
            assert_eq!(u32::from(cell_type), id);
        }
    }

    #[test]
    fn test_unknown_identifiers_rejected() {
        for id in [6u32, 7, 255, u32::MAX] {
            assert!(matches!(
                CellType::from_wire(id),
                Err(QueryError::UnknownCellType(got)) if got == id
            ));
        }
    }

    #[test]
    fn test_value_cell_types() {
        assert_eq!(Value::Null.cell_type(), CellType::Null);
        assert_eq!(Value::Int64(0).cell_type(), CellType::Varint);
        assert_eq!(Value::Float64(0.0).cell_type(), CellType::Float64);
        assert_eq!(Value::String(String::new()).cell_type(), CellType::String);
        assert_eq!(Value::Blob(Vec::new()).cell_type(), CellType::Blob);
    }
}

// =============================================================================
// Error Contracts
// =============================================================================

mod error_contracts {
    use super::*;

    #[test]
    fn test_cell_count_mismatch_display() {
        let err = QueryError::CellCountMismatch {
            cells: 7,
            columns: 3,
        };
        assert_eq!(
            err.to_string(),
            "Integrity error: cell count 7 is not a multiple of column count 3"
        );
    }

    #[test]
    fn test_invalid_cell_display() {
        let err = QueryError::InvalidCell { row: 4, column: 2 };
        assert!(err.to_string().contains("Invalid cell type"));
        assert!(err.to_string().contains("row 4"));
        assert!(err.to_string().contains("column 2"));
    }

    #[test]
    fn test_missing_cell_value_display() {
        let err = QueryError::MissingCellValue {
            cell_type: CellType::Blob,
            index: 3,
        };
        assert!(err.to_string().contains("BLOB"));
        assert!(err.to_string().contains("index 3"));
    }

    #[test]
    fn test_missing_dependency_display() {
        let err = QueryError::table_library_missing();
        assert!(err.to_string().contains("Missing dependency"));
        assert!(err.to_string().contains("`arrow`"));
        assert!(err.to_string().contains("arrow-array, arrow-schema"));
    }

    #[test]
    fn test_query_failed_display() {
        let err = QueryError::QueryFailed("no such table: slice".into());
        assert_eq!(err.to_string(), "Query failed: no such table: slice");
    }
}

// =============================================================================
// API Contracts
// =============================================================================

mod api_contracts {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_result_is_send_sync() {
        assert_send_sync::<QueryResult>();
        assert_send_sync::<QueryBatch>();
    }

    #[test]
    fn test_independent_passes() {
        let batch = QueryBatch {
            cells: vec![CellType::Varint; 4],
            varint_cells: vec![1, 2, 3, 4],
            ..QueryBatch::new()
        }
        .last();
        let result = QueryResult::from_batches(vec!["n".into()], [batch]).unwrap();

        let mut first = result.rows();
        let mut second = result.rows();
        first.next();
        first.next();

        let value = second.next().unwrap().unwrap();
        assert_eq!(value.get("n"), Some(&Value::Int64(1)));
        assert_eq!(first.remaining(), 2);
        assert_eq!(second.remaining(), 3);
    }

    // run with `cargo test-no-arrow`
    #[cfg(not(feature = "arrow"))]
    #[test]
    fn test_to_table_requires_feature() {
        let result = QueryResult::from_batches(vec!["n".into()], Vec::new()).unwrap();
        assert!(matches!(
            result.to_table(),
            Err(QueryError::MissingDependency { feature: "arrow", .. })
        ));
    }
}
