//! Property-based tests for batch decoding invariants.

use proptest::prelude::*;
use query_cells::{CellType, QueryBatch, QueryResult, StringCells, Value};

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<i64>().prop_map(Value::Int64),
        (-1.0e12f64..1.0e12).prop_map(Value::Float64),
        "[a-z0-9 ]{0,12}".prop_map(Value::String),
        proptest::collection::vec(any::<u8>(), 0..8).prop_map(Value::Blob),
    ]
}

/// Rows of a fixed width, plus row indices at which to cut batches.
fn table_strategy() -> impl Strategy<Value = (usize, Vec<Vec<Value>>, Vec<usize>)> {
    (1usize..5).prop_flat_map(|width| {
        let rows = proptest::collection::vec(
            proptest::collection::vec(value_strategy(), width),
            0..20,
        );
        (Just(width), rows, proptest::collection::vec(0usize..20, 0..4))
    })
}

/// Encodes rows into one batch.
fn encode(rows: &[Vec<Value>]) -> QueryBatch {
    let mut batch = QueryBatch::new();
    let mut strings = Vec::new();
    for value in rows.iter().flatten() {
        batch.cells.push(value.cell_type());
        match value {
            Value::Null => {}
            Value::Int64(v) => batch.varint_cells.push(*v),
            Value::Float64(v) => batch.float64_cells.push(*v),
            Value::String(s) => {
                strings.extend_from_slice(s.as_bytes());
                strings.push(0);
            }
            Value::Blob(b) => batch.blob_cells.push(b.clone()),
        }
    }
    batch.string_cells = StringCells::from(strings);
    batch
}

/// Encodes rows into several batches cut at the given row indices.
fn encode_split(rows: &[Vec<Value>], cuts: &[usize]) -> Vec<QueryBatch> {
    let mut cuts: Vec<usize> = cuts.iter().map(|c| (*c).min(rows.len())).collect();
    cuts.sort_unstable();
    cuts.dedup();

    let mut batches = Vec::new();
    let mut start = 0;
    for cut in cuts.into_iter().chain(std::iter::once(rows.len())) {
        if cut < start {
            continue;
        }
        batches.push(encode(&rows[start..cut]));
        start = cut;
    }
    if let Some(last) = batches.last_mut() {
        last.is_last_batch = true;
    }
    batches
}

fn column_names(width: usize) -> Vec<String> {
    (0..width).map(|i| format!("c{i}")).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_rows_roundtrip((width, rows, cuts) in table_strategy()) {
        let batches = encode_split(&rows, &cuts);
        let result = QueryResult::from_batches(column_names(width), batches).unwrap();

        prop_assert_eq!(result.row_count() * result.column_count(), result.cell_count());
        prop_assert_eq!(result.row_count(), rows.len());

        let decoded: Vec<Vec<Value>> = result
            .rows()
            .map(|row| row.map(query_cells::Row::into_values))
            .collect::<query_cells::Result<_>>()
            .unwrap();
        prop_assert_eq!(decoded, rows);
    }

    #[test]
    fn prop_value_kind_matches_tag((width, rows, cuts) in table_strategy()) {
        let result = QueryResult::from_batches(column_names(width), encode_split(&rows, &cuts)).unwrap();
        let tags = result.buffers().cells().to_vec();

        for (i, row) in result.rows().enumerate() {
            let row = row.unwrap();
            for (c, value) in row.values().iter().enumerate() {
                prop_assert_eq!(value.cell_type(), tags[i * width + c]);
            }
        }
    }

    #[test]
    fn prop_split_equals_merged((width, rows, cuts) in table_strategy()) {
        let split = QueryResult::from_batches(column_names(width), encode_split(&rows, &cuts)).unwrap();
        let merged = QueryResult::from_batches(column_names(width), [encode(&rows).last()]).unwrap();
        prop_assert_eq!(split.buffers(), merged.buffers());
    }

    #[test]
    fn prop_nulls_consume_nothing(width in 1usize..5, rows in 0usize..10) {
        let batch = QueryBatch {
            cells: vec![CellType::Null; width * rows],
            ..QueryBatch::new()
        }
        .last();
        let result = QueryResult::from_batches(column_names(width), [batch]).unwrap();
        for row in result.rows() {
            prop_assert!(row.unwrap().values().iter().all(Value::is_null));
        }
    }

    #[test]
    fn prop_uneven_cells_rejected(width in 2usize..6, cells in 1usize..40) {
        prop_assume!(cells % width != 0);
        let batch = QueryBatch {
            cells: vec![CellType::Null; cells],
            ..QueryBatch::new()
        }
        .last();
        let is_mismatch = matches!(
            QueryResult::from_batches(column_names(width), [batch]),
            Err(query_cells::QueryError::CellCountMismatch { .. })
        );
        prop_assert!(is_mismatch);
    }
}
