//! Filter-tree evaluation against a single record.

use serde_json::Value;

use crate::types::{
    ArrayTest, Condition, DateTest, FieldType, FilterNode, NumberTest, StringTest, ValueTest,
};

use super::coercion::{json_eq, to_epoch_millis, to_number, to_text};

impl FilterNode {
    /// Returns `true` if `record` passes this filter.
    ///
    /// ```
    /// use bazaar_query::types::FilterNode;
    /// use serde_json::json;
    ///
    /// let filter = FilterNode::try_from(json!({
    ///     "field": "age", "type": "number", "operator": "between", "value": [18, 30]
    /// }))
    /// .unwrap();
    /// assert!(filter.matches(&json!({"age": 18})));
    /// assert!(!filter.matches(&json!({"age": 31})));
    /// ```
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            FilterNode::And(children) => children.iter().all(|child| child.matches(record)),
            FilterNode::Or(children) => children.iter().any(|child| child.matches(record)),
            FilterNode::Condition(condition) => condition.matches(record),
        }
    }
}

impl Condition {
    /// Returns `true` if `record` passes this condition.
    ///
    /// An absent field passes only an `equals` condition with no value, and
    /// fails every other test except `notIn`.
    pub fn matches(&self, record: &Value) -> bool {
        let Some(value) = self.field().get(record) else {
            return matches!(
                self.test(),
                ValueTest::Undefined
                    | ValueTest::String(StringTest::NotIn(_))
                    | ValueTest::Number(NumberTest::NotIn(_))
                    | ValueTest::Date(DateTest::NotIn(_))
            );
        };

        match self.test() {
            ValueTest::Undefined => match self.field_type() {
                FieldType::Number => to_number(value).is_none(),
                FieldType::Date => to_epoch_millis(value).is_none(),
                FieldType::String | FieldType::Array => false,
            },
            ValueTest::String(test) => string_matches(test, value),
            ValueTest::Number(test) => number_matches(test, value),
            ValueTest::Date(test) => date_matches(test, value),
            ValueTest::Array(test) => array_matches(test, value),
        }
    }
}

/// Membership over a field that may itself be a sequence: `in` passes when any
/// element is listed, `notIn` when none is.
fn membership<T: PartialEq>(
    value: &Value,
    list: &[T],
    negate: bool,
    coerce: impl Fn(&Value) -> Option<T>,
) -> bool {
    let listed = |v: &Value| coerce(v).is_some_and(|item| list.contains(&item));
    let found = match value {
        Value::Array(items) => items.iter().any(listed),
        other => listed(other),
    };
    found != negate
}

fn string_matches(test: &StringTest, value: &Value) -> bool {
    match test {
        StringTest::In(list) => membership(value, list, false, to_text),
        StringTest::NotIn(list) => membership(value, list, true, to_text),
        StringTest::Equals(expected) => to_text(value).is_some_and(|text| &text == expected),
        StringTest::Contains(needle) => {
            to_text(value).is_some_and(|text| text.to_lowercase().contains(needle.as_str()))
        }
    }
}

fn number_matches(test: &NumberTest, value: &Value) -> bool {
    match test {
        NumberTest::In(list) => return membership(value, list, false, to_number),
        NumberTest::NotIn(list) => return membership(value, list, true, to_number),
        _ => {}
    }

    let Some(n) = to_number(value) else {
        return false;
    };
    match test {
        NumberTest::Equals(expected) => n == *expected,
        NumberTest::Greater(bound) => n > *bound,
        NumberTest::Less(bound) => n < *bound,
        NumberTest::Between(min, max) => n >= *min && n <= *max,
        NumberTest::In(_) | NumberTest::NotIn(_) => false,
    }
}

fn date_matches(test: &DateTest, value: &Value) -> bool {
    match test {
        DateTest::In(list) => return membership(value, list, false, to_epoch_millis),
        DateTest::NotIn(list) => return membership(value, list, true, to_epoch_millis),
        _ => {}
    }

    let Some(millis) = to_epoch_millis(value) else {
        return false;
    };
    match test {
        DateTest::Equals(expected) => millis == *expected,
        DateTest::After(bound) => millis > *bound,
        DateTest::Before(bound) => millis < *bound,
        DateTest::Between(start, end) => millis >= *start && millis <= *end,
        DateTest::In(_) | DateTest::NotIn(_) => false,
    }
}

fn array_matches(test: &ArrayTest, value: &Value) -> bool {
    let length = match value {
        Value::Array(items) => items.len(),
        Value::String(s) => s.chars().count(),
        _ => return false,
    };
    let length = length as f64;

    match test {
        ArrayTest::SizeEquals(size) => length == *size,
        ArrayTest::SizeGreaterThan(size) => length > *size,
        ArrayTest::SizeLessThan(size) => length < *size,
        ArrayTest::Contains(element) => match (value, element) {
            (Value::Array(items), _) => items.iter().any(|item| json_eq(item, element)),
            (Value::String(s), Value::String(needle)) => s.contains(needle.as_str()),
            _ => false,
        },
    }
}
