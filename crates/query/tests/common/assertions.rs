//! Assertion helpers for engine results.

use serde_json::Value;

use bazaar_query::{ArgumentError, QueryError};

/// Returns the string at `key` for each record.
pub fn field_values<'a>(records: impl IntoIterator<Item = &'a Value>, key: &str) -> Vec<String> {
    records
        .into_iter()
        .map(|record| record[key].as_str().unwrap_or_default().to_string())
        .collect()
}

/// Asserts the `name` fields of `records`, in order.
pub fn assert_names<'a>(records: impl IntoIterator<Item = &'a Value>, expected: &[&str]) {
    let names = field_values(records, "name");
    assert_eq!(names, expected, "Name order mismatch");
}

/// Asserts that `result` failed with an argument error and returns it.
pub fn expect_argument_error<T: std::fmt::Debug>(result: Result<T, QueryError>) -> ArgumentError {
    match result {
        Err(QueryError::Argument(err)) => err,
        other => panic!("Expected an argument error, got {:?}", other),
    }
}
