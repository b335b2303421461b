//! Filter-preset compilation.
//!
//! Stored presets only know three operators. They compile onto evaluator
//! conditions as follows:
//!
//! | preset                         | condition                                  |
//! |--------------------------------|--------------------------------------------|
//! | `equals` a number              | `number` `equals`                          |
//! | `equals` a string or boolean   | `string` `equals`                          |
//! | `equals` with no value / null  | `equals` undefined (field must be absent)  |
//! | `in` / `notIn` a list          | `number` `in`/`notIn` if every item is a number, else `string` |
//!
//! Groups become `And`/`Or` nodes over their compiled children.

use std::borrow::Borrow;

use serde_json::Value;
use tracing::debug;

use crate::error::{PresetError, QueryResult};
use crate::path::FieldPath;
use crate::types::{
    Combinator, Condition, FieldType, FilterNode, FilterPreset, Operator, PresetOperator,
};

/// Compiles a preset into a filter tree.
///
/// # Errors
///
/// - [`PresetError::InvalidStructure`] if an `equals` value is a sequence or
///   mapping, or an `in`/`notIn` value is not a sequence
/// - [`ArgumentError`](crate::ArgumentError) if a field path is malformed or a
///   list item has no string form
///
/// # Examples
///
/// ```
/// use bazaar_query::preset::compile;
/// use bazaar_query::types::FilterPreset;
/// use serde_json::json;
///
/// let preset = FilterPreset::try_from(json!({
///     "type": "AND",
///     "filters": [
///         {"field": "status", "operator": "equals", "value": "active"},
///         {"field": "age", "operator": "in", "value": [18, 19, 20]}
///     ]
/// }))
/// .unwrap();
///
/// let filter = compile(&preset).unwrap();
/// assert!(filter.matches(&json!({"status": "active", "age": 19})));
/// assert!(!filter.matches(&json!({"status": "inactive", "age": 19})));
/// ```
pub fn compile(preset: &FilterPreset) -> QueryResult<FilterNode> {
    match preset {
        FilterPreset::Rule {
            field,
            operator,
            value,
        } => compile_rule(field, *operator, value.as_ref()).map(FilterNode::Condition),
        FilterPreset::Group {
            combinator,
            filters,
        } => {
            if filters.is_empty() {
                return Err(PresetError::InvalidStructure {
                    message: "a group needs at least one filter".to_string(),
                }
                .into());
            }
            let children = filters.iter().map(compile).collect::<QueryResult<Vec<_>>>()?;
            Ok(match combinator {
                Combinator::And => FilterNode::And(children),
                Combinator::Or => FilterNode::Or(children),
            })
        }
    }
}

/// Parses and compiles a preset stored as JSON.
pub fn compile_value(value: &Value) -> QueryResult<FilterNode> {
    compile(&FilterPreset::try_from(value)?)
}

/// Returns `true` if `record` passes `preset`.
pub fn matches_preset(record: &Value, preset: &FilterPreset) -> QueryResult<bool> {
    Ok(compile(preset)?.matches(record))
}

/// Keeps the records passing `preset`, in input order. The preset is compiled
/// once.
pub fn filter_by_preset<'a, R: Borrow<Value>>(
    records: &'a [R],
    preset: &FilterPreset,
) -> QueryResult<Vec<&'a Value>> {
    let filter = compile(preset)?;
    let kept: Vec<&Value> = records
        .iter()
        .map(<R as Borrow<Value>>::borrow)
        .filter(|record| filter.matches(record))
        .collect();
    debug!(total = records.len(), kept = kept.len(), "Applied filter preset");
    Ok(kept)
}

fn compile_rule(
    field: &str,
    operator: PresetOperator,
    value: Option<&Value>,
) -> QueryResult<Condition> {
    let path = FieldPath::parse(field)?;

    let (field_type, operator) = match operator {
        PresetOperator::Equals => {
            let field_type = match value {
                None | Some(Value::Null) => {
                    return Ok(Condition::new(path, FieldType::String, Operator::Equals, None)?);
                }
                Some(Value::Number(_)) => FieldType::Number,
                Some(Value::String(_) | Value::Bool(_)) => FieldType::String,
                Some(other) => {
                    return Err(PresetError::InvalidStructure {
                        message: format!("equals on {} needs a scalar value, got {}", field, other),
                    }
                    .into());
                }
            };
            (field_type, Operator::Equals)
        }
        PresetOperator::In | PresetOperator::NotIn => {
            let Some(items) = value.and_then(Value::as_array) else {
                return Err(PresetError::InvalidStructure {
                    message: format!("{} on {} needs a list value", operator, field),
                }
                .into());
            };
            let field_type = if !items.is_empty() && items.iter().all(Value::is_number) {
                FieldType::Number
            } else {
                FieldType::String
            };
            let operator = if operator == PresetOperator::In {
                Operator::In
            } else {
                Operator::NotIn
            };
            (field_type, operator)
        }
    };

    Ok(Condition::new(path, field_type, operator, value.cloned())?)
}
