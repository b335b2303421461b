//! Multi-key record sorting.

use std::borrow::Borrow;
use std::cmp::Ordering;

use serde_json::Value;

use crate::error::ArgumentError;
use crate::types::{SortDescriptor, SortDirection};

use super::coercion::compare_values;

/// Sorts records in place by the descriptor's keys.
///
/// Every key must resolve on every record once there are at least two records
/// to order; otherwise [`ArgumentError::SortKeyNotFound`] is returned and the
/// records are left untouched. Records equal on all keys end up in an
/// unspecified relative order.
pub fn sort_records<R: Borrow<Value>>(
    records: &mut [R],
    sort: &SortDescriptor,
) -> Result<(), ArgumentError> {
    if sort.is_empty() || records.len() < 2 {
        return Ok(());
    }

    for key in sort.keys() {
        if records
            .iter()
            .any(|record| key.path.get(record.borrow()).is_none())
        {
            return Err(ArgumentError::SortKeyNotFound {
                key: key.path.to_string(),
            });
        }
    }

    records.sort_unstable_by(|a, b| compare_records(a.borrow(), b.borrow(), sort));
    Ok(())
}

/// Compares two records by the descriptor's keys. Missing keys compare equal.
pub fn compare_records(a: &Value, b: &Value, sort: &SortDescriptor) -> Ordering {
    for key in sort.keys() {
        let (Some(left), Some(right)) = (key.path.get(a), key.path.get(b)) else {
            continue;
        };
        let ordering = match key.direction {
            SortDirection::Asc => compare_values(left, right),
            SortDirection::Desc => compare_values(right, left),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sort(value: Value) -> SortDescriptor {
        SortDescriptor::try_from(value).unwrap()
    }

    #[test]
    fn test_primary_and_tiebreak_keys() {
        let mut records = vec![
            json!({"age": 2, "name": "z"}),
            json!({"age": 1, "name": "a"}),
            json!({"age": 1, "name": "b"}),
        ];
        sort_records(&mut records, &sort(json!({"age": "asc", "name": "desc"}))).unwrap();
        assert_eq!(
            records,
            vec![
                json!({"age": 1, "name": "b"}),
                json!({"age": 1, "name": "a"}),
                json!({"age": 2, "name": "z"}),
            ]
        );
    }

    #[test]
    fn test_sorts_borrowed_records() {
        let a = json!({"n": 3});
        let b = json!({"n": 1});
        let mut records = vec![&a, &b];
        sort_records(&mut records, &sort(json!({"n": "asc"}))).unwrap();
        assert_eq!(records, vec![&b, &a]);
    }

    #[test]
    fn test_nested_key() {
        let mut records = vec![json!({"m": {"p": "b"}}), json!({"m": {"p": "a"}})];
        sort_records(&mut records, &sort(json!({"m.p": "asc"}))).unwrap();
        assert_eq!(records[0], json!({"m": {"p": "a"}}));
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let mut records = vec![json!({"age": 1}), json!({"name": "x"})];
        let err = sort_records(&mut records, &sort(json!({"age": "asc"}))).unwrap_err();
        assert_eq!(
            err,
            ArgumentError::SortKeyNotFound {
                key: "age".to_string()
            }
        );
        assert_eq!(err.to_string(), "key age not found in the data");
    }

    #[test]
    fn test_single_record_is_never_compared() {
        let mut records = vec![json!({"name": "x"})];
        assert!(sort_records(&mut records, &sort(json!({"age": "asc"}))).is_ok());
    }

    #[test]
    fn test_empty_descriptor_keeps_order() {
        let mut records = vec![json!({"a": 2}), json!({"a": 1})];
        sort_records(&mut records, &SortDescriptor::new()).unwrap();
        assert_eq!(records, vec![json!({"a": 2}), json!({"a": 1})]);
    }
}
