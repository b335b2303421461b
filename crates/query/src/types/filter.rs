//! Filter trees.
//!
//! A [`FilterNode`] is either a compound (`$and` / `$or`) or a leaf
//! [`Condition`]. Conditions are validated when they are built: the operator
//! must be legal for the condition's [`FieldType`] and the value must have the
//! shape the operator needs. Evaluation never fails.
//!
//! # JSON form
//!
//! ```json
//! {"$and": [
//!     {"field": "age", "type": "number", "operator": "between", "value": [18, 30]},
//!     {"$or": [
//!         {"field": "status", "type": "string", "operator": "equals", "value": "active"},
//!         {"field": "tags", "type": "array", "operator": "contains", "value": "vip"}
//!     ]}
//! ]}
//! ```
//!
//! An object with none of the recognized keys is shorthand for an AND over its
//! keys, each key naming the field of a nested condition:
//!
//! ```json
//! {"age": {"type": "number", "operator": "greater", "value": 21}}
//! ```

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::ArgumentError;
use crate::path::FieldPath;
use crate::search::coercion::{to_epoch_millis, to_number, to_text};

/// The value type a condition coerces its field to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// Compared by string form.
    String,
    /// Compared numerically.
    Number,
    /// Compared as epoch milliseconds.
    Date,
    /// Compared by length or element membership.
    Array,
}

impl FieldType {
    /// Operators legal for this type.
    pub fn operators(&self) -> &'static [Operator] {
        use Operator::*;
        match self {
            FieldType::String => &[Equals, Contains, In, NotIn],
            FieldType::Number => &[Equals, Greater, Less, Between, In, NotIn],
            FieldType::Date => &[Equals, After, Before, Between, In, NotIn],
            FieldType::Array => &[SizeEquals, SizeGreaterThan, SizeLessThan, Contains],
        }
    }

    /// Returns `true` if `operator` is legal for this type.
    pub fn supports(&self, operator: Operator) -> bool {
        self.operators().contains(&operator)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::String => write!(f, "string"),
            FieldType::Number => write!(f, "number"),
            FieldType::Date => write!(f, "date"),
            FieldType::Array => write!(f, "array"),
        }
    }
}

impl FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" => Ok(FieldType::String),
            "number" => Ok(FieldType::Number),
            "date" => Ok(FieldType::Date),
            "array" => Ok(FieldType::Array),
            _ => Err(format!("unknown filter type: {}", s)),
        }
    }
}

/// A condition operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Equality.
    Equals,
    /// Substring (strings) or element membership (arrays).
    Contains,
    /// Strictly greater.
    Greater,
    /// Strictly less.
    Less,
    /// Inclusive range.
    Between,
    /// Strictly later.
    After,
    /// Strictly earlier.
    Before,
    /// Length equality.
    SizeEquals,
    /// Length strictly greater.
    SizeGreaterThan,
    /// Length strictly less.
    SizeLessThan,
    /// Member of a list.
    In,
    /// Not a member of a list.
    NotIn,
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operator::Equals => "equals",
            Operator::Contains => "contains",
            Operator::Greater => "greater",
            Operator::Less => "less",
            Operator::Between => "between",
            Operator::After => "after",
            Operator::Before => "before",
            Operator::SizeEquals => "sizeEquals",
            Operator::SizeGreaterThan => "sizeGreaterThan",
            Operator::SizeLessThan => "sizeLessThan",
            Operator::In => "in",
            Operator::NotIn => "notIn",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equals" => Ok(Operator::Equals),
            "contains" => Ok(Operator::Contains),
            "greater" => Ok(Operator::Greater),
            "less" => Ok(Operator::Less),
            "between" => Ok(Operator::Between),
            "after" => Ok(Operator::After),
            "before" => Ok(Operator::Before),
            "sizeEquals" => Ok(Operator::SizeEquals),
            "sizeGreaterThan" => Ok(Operator::SizeGreaterThan),
            "sizeLessThan" => Ok(Operator::SizeLessThan),
            "in" => Ok(Operator::In),
            "notIn" => Ok(Operator::NotIn),
            _ => Err(format!("unknown operator: {}", s)),
        }
    }
}

/// A validated operand, already coerced to the condition's type.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueTest {
    /// `equals` with no value. Passes when the field is absent or has no
    /// numeric/date form.
    Undefined,
    /// String-typed tests.
    String(StringTest),
    /// Number-typed tests.
    Number(NumberTest),
    /// Date-typed tests, in epoch milliseconds.
    Date(DateTest),
    /// Array-typed tests.
    Array(ArrayTest),
}

/// String-typed tests.
#[derive(Debug, Clone, PartialEq)]
pub enum StringTest {
    /// Exact equality of string forms.
    Equals(String),
    /// Case-insensitive substring. Stored lowercase.
    Contains(String),
    /// Membership.
    In(Vec<String>),
    /// Non-membership.
    NotIn(Vec<String>),
}

/// Number-typed tests.
#[derive(Debug, Clone, PartialEq)]
pub enum NumberTest {
    /// Numeric equality.
    Equals(f64),
    /// Strictly greater.
    Greater(f64),
    /// Strictly less.
    Less(f64),
    /// Inclusive range.
    Between(f64, f64),
    /// Membership.
    In(Vec<f64>),
    /// Non-membership.
    NotIn(Vec<f64>),
}

/// Date-typed tests, in epoch milliseconds.
#[derive(Debug, Clone, PartialEq)]
pub enum DateTest {
    /// Same instant.
    Equals(i64),
    /// Strictly later.
    After(i64),
    /// Strictly earlier.
    Before(i64),
    /// Inclusive range.
    Between(i64, i64),
    /// Membership.
    In(Vec<i64>),
    /// Non-membership.
    NotIn(Vec<i64>),
}

/// Array-typed tests.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayTest {
    /// Length equality.
    SizeEquals(f64),
    /// Length strictly greater.
    SizeGreaterThan(f64),
    /// Length strictly less.
    SizeLessThan(f64),
    /// Element membership.
    Contains(Value),
}

/// A leaf filter condition.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    field: FieldPath,
    field_type: FieldType,
    operator: Operator,
    test: ValueTest,
}

impl Condition {
    /// Builds a condition, validating the operator and value against the type.
    ///
    /// `value` may be `None` only for [`Operator::Equals`]; such a condition
    /// matches records where the field is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use bazaar_query::types::{Condition, FieldType, Operator};
    /// use serde_json::json;
    ///
    /// let adult = Condition::new(
    ///     "age".parse().unwrap(),
    ///     FieldType::Number,
    ///     Operator::Greater,
    ///     Some(json!(17)),
    /// )
    /// .unwrap();
    /// assert!(adult.matches(&json!({"age": 18})));
    ///
    /// let err = Condition::new(
    ///     "age".parse().unwrap(),
    ///     FieldType::Number,
    ///     Operator::Contains,
    ///     Some(json!(1)),
    /// );
    /// assert!(err.is_err());
    /// ```
    pub fn new(
        field: FieldPath,
        field_type: FieldType,
        operator: Operator,
        value: Option<Value>,
    ) -> Result<Self, ArgumentError> {
        if !field_type.supports(operator) {
            return Err(ArgumentError::UnsupportedOperator {
                filter_type: field_type.to_string(),
                operator: operator.to_string(),
            });
        }

        let test = match value {
            None if operator == Operator::Equals => ValueTest::Undefined,
            None => {
                return Err(invalid_value(
                    operator,
                    &Value::Null,
                    "a value is required",
                ));
            }
            Some(value) => build_test(field_type, operator, value)?,
        };

        Ok(Self {
            field,
            field_type,
            operator,
            test,
        })
    }

    /// The field path the condition reads.
    pub fn field(&self) -> &FieldPath {
        &self.field
    }

    /// The condition's type.
    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// The condition's operator.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The validated operand.
    pub fn test(&self) -> &ValueTest {
        &self.test
    }
}

fn build_test(
    field_type: FieldType,
    operator: Operator,
    value: Value,
) -> Result<ValueTest, ArgumentError> {
    let test = match field_type {
        FieldType::String => ValueTest::String(match operator {
            Operator::Equals => StringTest::Equals(scalar_text(operator, &value)?),
            Operator::Contains => {
                StringTest::Contains(scalar_text(operator, &value)?.to_lowercase())
            }
            Operator::In => StringTest::In(list(operator, &value, scalar_text)?),
            _ => StringTest::NotIn(list(operator, &value, scalar_text)?),
        }),
        FieldType::Number => ValueTest::Number(match operator {
            Operator::Equals => NumberTest::Equals(number(operator, &value)?),
            Operator::Greater => NumberTest::Greater(number(operator, &value)?),
            Operator::Less => NumberTest::Less(number(operator, &value)?),
            Operator::Between => {
                let (min, max) = pair(operator, &value, number)?;
                NumberTest::Between(min, max)
            }
            Operator::In => NumberTest::In(list(operator, &value, number)?),
            _ => NumberTest::NotIn(list(operator, &value, number)?),
        }),
        FieldType::Date => ValueTest::Date(match operator {
            Operator::Equals => DateTest::Equals(date(operator, &value)?),
            Operator::After => DateTest::After(date(operator, &value)?),
            Operator::Before => DateTest::Before(date(operator, &value)?),
            Operator::Between => {
                let (start, end) = pair(operator, &value, date)?;
                DateTest::Between(start, end)
            }
            Operator::In => DateTest::In(list(operator, &value, date)?),
            _ => DateTest::NotIn(list(operator, &value, date)?),
        }),
        FieldType::Array => ValueTest::Array(match operator {
            Operator::SizeEquals => ArrayTest::SizeEquals(size(operator, &value)?),
            Operator::SizeGreaterThan => ArrayTest::SizeGreaterThan(size(operator, &value)?),
            Operator::SizeLessThan => ArrayTest::SizeLessThan(size(operator, &value)?),
            _ => ArrayTest::Contains(value),
        }),
    };
    Ok(test)
}

fn invalid_value(operator: Operator, value: &Value, message: &str) -> ArgumentError {
    ArgumentError::InvalidFilterValue {
        operator: operator.to_string(),
        value: value.to_string(),
        message: message.to_string(),
    }
}

fn scalar_text(operator: Operator, value: &Value) -> Result<String, ArgumentError> {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => to_text(value)
            .ok_or_else(|| invalid_value(operator, value, "expected a string")),
        _ => Err(invalid_value(operator, value, "expected a string")),
    }
}

fn number(operator: Operator, value: &Value) -> Result<f64, ArgumentError> {
    to_number(value).ok_or_else(|| invalid_value(operator, value, "expected a number"))
}

fn date(operator: Operator, value: &Value) -> Result<i64, ArgumentError> {
    to_epoch_millis(value).ok_or_else(|| invalid_value(operator, value, "expected a date"))
}

fn size(operator: Operator, value: &Value) -> Result<f64, ArgumentError> {
    value
        .as_f64()
        .ok_or_else(|| invalid_value(operator, value, "expected a length"))
}

fn pair<T>(
    operator: Operator,
    value: &Value,
    item: fn(Operator, &Value) -> Result<T, ArgumentError>,
) -> Result<(T, T), ArgumentError> {
    match value.as_array().map(Vec::as_slice) {
        Some([low, high]) => Ok((item(operator, low)?, item(operator, high)?)),
        _ => Err(invalid_value(operator, value, "expected a two-element array")),
    }
}

fn list<T>(
    operator: Operator,
    value: &Value,
    item: fn(Operator, &Value) -> Result<T, ArgumentError>,
) -> Result<Vec<T>, ArgumentError> {
    value
        .as_array()
        .ok_or_else(|| invalid_value(operator, value, "expected an array"))?
        .iter()
        .map(|element| item(operator, element))
        .collect()
}

/// A node of a filter tree.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum FilterNode {
    /// Passes when every child passes. An empty `And` passes everything.
    And(Vec<FilterNode>),
    /// Passes when any child passes. An empty `Or` passes nothing.
    Or(Vec<FilterNode>),
    /// A leaf condition.
    Condition(Condition),
}

impl FilterNode {
    /// A filter that passes every record.
    pub fn pass_all() -> Self {
        FilterNode::And(Vec::new())
    }

    /// Returns `true` for a filter that trivially passes every record.
    pub fn is_pass_all(&self) -> bool {
        matches!(self, FilterNode::And(children) if children.is_empty())
    }
}

impl Default for FilterNode {
    fn default() -> Self {
        Self::pass_all()
    }
}

impl From<Condition> for FilterNode {
    fn from(condition: Condition) -> Self {
        FilterNode::Condition(condition)
    }
}

impl TryFrom<&Value> for FilterNode {
    type Error = ArgumentError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Some(schema) = value.as_object() else {
            return Err(ArgumentError::InvalidFilter {
                message: format!("expected an object, got {}", value),
            });
        };

        if let Some(children) = schema.get("$or") {
            return Ok(FilterNode::Or(children_of("$or", children)?));
        }
        if let Some(children) = schema.get("$and") {
            return Ok(FilterNode::And(children_of("$and", children)?));
        }
        if is_leaf(schema) {
            return leaf(schema).map(FilterNode::Condition);
        }

        // Shorthand: every key names the field of a nested node.
        let mut children = Vec::with_capacity(schema.len());
        for (key, nested) in schema {
            let Some(nested) = nested.as_object() else {
                return Err(ArgumentError::InvalidFilter {
                    message: format!("condition for field {} must be an object", key),
                });
            };
            let mut condition = Map::with_capacity(nested.len() + 1);
            condition.insert("field".to_string(), Value::String(key.clone()));
            for (k, v) in nested {
                condition.insert(k.clone(), v.clone());
            }
            children.push(FilterNode::try_from(&Value::Object(condition))?);
        }
        Ok(FilterNode::And(children))
    }
}

impl TryFrom<Value> for FilterNode {
    type Error = ArgumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        FilterNode::try_from(&value)
    }
}

fn children_of(combinator: &str, children: &Value) -> Result<Vec<FilterNode>, ArgumentError> {
    children
        .as_array()
        .ok_or_else(|| ArgumentError::InvalidFilter {
            message: format!("{} must be an array", combinator),
        })?
        .iter()
        .map(FilterNode::try_from)
        .collect()
}

fn is_leaf(schema: &Map<String, Value>) -> bool {
    schema.contains_key("type")
        && schema.contains_key("operator")
        && (schema.contains_key("value")
            || schema.get("operator").and_then(Value::as_str) == Some("equals"))
}

fn leaf(schema: &Map<String, Value>) -> Result<Condition, ArgumentError> {
    let field = match schema.get("field") {
        Some(Value::String(field)) => FieldPath::parse(field)?,
        Some(other) => {
            return Err(ArgumentError::InvalidFilter {
                message: format!("field must be a string, got {}", other),
            });
        }
        None => {
            return Err(ArgumentError::InvalidFilter {
                message: "field property is missing".to_string(),
            });
        }
    };

    let type_value = &schema["type"];
    let field_type = type_value
        .as_str()
        .and_then(|name| name.parse::<FieldType>().ok())
        .ok_or_else(|| ArgumentError::InvalidFilterType {
            value: type_value.to_string(),
        })?;

    let operator_value = &schema["operator"];
    let operator = operator_value
        .as_str()
        .and_then(|name| name.parse::<Operator>().ok())
        .ok_or_else(|| ArgumentError::UnsupportedOperator {
            filter_type: field_type.to_string(),
            operator: operator_value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| operator_value.to_string()),
        })?;

    Condition::new(field, field_type, operator, schema.get("value").cloned())
}
