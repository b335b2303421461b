//! Stored filter presets.
//!
//! Presets are the persisted, storage-facing form of a filter. Two shapes are
//! stored and both are accepted:
//!
//! ```json
//! {"type": "AND", "filters": [{"field": "status", "operator": "equals", "value": "active"}]}
//! {"combinator": "and", "rules": [{"field": "status", "operator": "equals", "value": "active"}]}
//! ```
//!
//! A preset is compiled into a [`FilterNode`](super::FilterNode) with
//! [`compile`](crate::preset::compile) before it is evaluated.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::PresetError;

/// Operators a preset rule may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetOperator {
    /// Field equals the value.
    Equals,
    /// Field is one of the listed values.
    In,
    /// Field is none of the listed values.
    NotIn,
}

impl fmt::Display for PresetOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetOperator::Equals => write!(f, "equals"),
            PresetOperator::In => write!(f, "in"),
            PresetOperator::NotIn => write!(f, "notIn"),
        }
    }
}

impl FromStr for PresetOperator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "equals" => Ok(PresetOperator::Equals),
            "in" => Ok(PresetOperator::In),
            "notIn" => Ok(PresetOperator::NotIn),
            _ => Err(format!("unknown preset operator: {}", s)),
        }
    }
}

/// How a preset group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Combinator {
    /// Every child must match.
    And,
    /// At least one child must match.
    Or,
}

impl fmt::Display for Combinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Combinator::And => write!(f, "AND"),
            Combinator::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for Combinator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "and" => Ok(Combinator::And),
            "or" => Ok(Combinator::Or),
            _ => Err(format!("unknown combinator: {}", s)),
        }
    }
}

/// A stored filter preset.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum FilterPreset {
    /// A single field test.
    Rule {
        /// Path of the tested field.
        field: String,
        /// The test.
        operator: PresetOperator,
        /// The operand. `None` when the stored value is absent or `null`.
        value: Option<Value>,
    },
    /// A non-empty combination of presets.
    Group {
        /// How children combine.
        combinator: Combinator,
        /// The children.
        filters: Vec<FilterPreset>,
    },
}

impl FilterPreset {
    /// Creates a rule.
    pub fn rule(field: impl Into<String>, operator: PresetOperator, value: Value) -> Self {
        FilterPreset::Rule {
            field: field.into(),
            operator,
            value: (!value.is_null()).then_some(value),
        }
    }

    /// Creates an AND group.
    pub fn all(filters: Vec<FilterPreset>) -> Self {
        FilterPreset::Group {
            combinator: Combinator::And,
            filters,
        }
    }

    /// Creates an OR group.
    pub fn any(filters: Vec<FilterPreset>) -> Self {
        FilterPreset::Group {
            combinator: Combinator::Or,
            filters,
        }
    }
}

impl TryFrom<&Value> for FilterPreset {
    type Error = PresetError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Some(node) = value.as_object() else {
            return Err(structure(format!("expected an object, got {}", value)));
        };

        if let Some(field) = node.get("field").and_then(Value::as_str).filter(|f| !f.is_empty()) {
            let operator = match node.get("operator") {
                Some(Value::String(name)) => name.parse::<PresetOperator>().map_err(|_| {
                    PresetError::UnsupportedOperator {
                        operator: name.clone(),
                    }
                })?,
                Some(other) => {
                    return Err(PresetError::UnsupportedOperator {
                        operator: other.to_string(),
                    });
                }
                None => {
                    return Err(PresetError::UnsupportedOperator {
                        operator: "undefined".to_string(),
                    });
                }
            };
            return Ok(FilterPreset::Rule {
                field: field.to_string(),
                operator,
                value: node.get("value").filter(|v| !v.is_null()).cloned(),
            });
        }

        if let Some((combinator, filters)) = group(node, "type", "filters")
            .or_else(|| group(node, "combinator", "rules"))
        {
            let combinator = combinator
                .parse::<Combinator>()
                .map_err(|_| structure(format!("unknown combinator {}", combinator)))?;
            let filters = filters
                .iter()
                .map(FilterPreset::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(FilterPreset::Group {
                combinator,
                filters,
            });
        }

        Err(structure(format!(
            "expected a rule with a field or a non-empty group, got {}",
            value
        )))
    }
}

impl TryFrom<Value> for FilterPreset {
    type Error = PresetError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        FilterPreset::try_from(&value)
    }
}

/// Returns the combinator name and children when `node` is a non-empty group
/// under the given keys.
fn group<'a>(
    node: &'a Map<String, Value>,
    combinator_key: &str,
    children_key: &str,
) -> Option<(&'a str, &'a Vec<Value>)> {
    let combinator = node.get(combinator_key)?.as_str()?;
    let children = node.get(children_key)?.as_array()?;
    (!children.is_empty()).then_some((combinator, children))
}

fn structure(message: String) -> PresetError {
    PresetError::InvalidStructure { message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_type_filters_shape() {
        let preset = FilterPreset::try_from(json!({
            "type": "AND",
            "filters": [
                {"field": "status", "operator": "equals", "value": "active"},
                {"field": "age", "operator": "in", "value": [18, 19, 20]}
            ]
        }))
        .unwrap();
        assert_eq!(
            preset,
            FilterPreset::all(vec![
                FilterPreset::rule("status", PresetOperator::Equals, json!("active")),
                FilterPreset::rule("age", PresetOperator::In, json!([18, 19, 20])),
            ])
        );
    }

    #[test]
    fn test_parse_stored_rules_shape() {
        let preset = FilterPreset::try_from(json!({
            "combinator": "or",
            "rules": [
                {"field": "role", "operator": "notIn", "value": ["admin"]},
                {"combinator": "and", "rules": [{"field": "x", "operator": "equals", "value": 1}]}
            ]
        }))
        .unwrap();
        let FilterPreset::Group {
            combinator,
            filters,
        } = preset
        else {
            panic!("expected a group");
        };
        assert_eq!(combinator, Combinator::Or);
        assert_eq!(filters.len(), 2);
    }

    #[test]
    fn test_null_value_is_absent() {
        let preset =
            FilterPreset::try_from(json!({"field": "a", "operator": "equals", "value": null})).unwrap();
        assert_eq!(
            preset,
            FilterPreset::Rule {
                field: "a".to_string(),
                operator: PresetOperator::Equals,
                value: None,
            }
        );
    }

    #[test]
    fn test_unsupported_operator() {
        let err = FilterPreset::try_from(json!({"field": "a", "operator": "like", "value": "x"}))
            .unwrap_err();
        assert_eq!(
            err,
            PresetError::UnsupportedOperator {
                operator: "like".to_string()
            }
        );
    }

    #[test]
    fn test_invalid_structures() {
        for value in [
            json!({"type": "AND", "filters": []}),
            json!({"filters": [{"field": "a", "operator": "equals", "value": 1}]}),
            json!({"type": "XOR", "filters": [{"field": "a", "operator": "equals", "value": 1}]}),
            json!({"field": "", "operator": "equals"}),
            json!([]),
        ] {
            assert!(
                matches!(
                    FilterPreset::try_from(value.clone()),
                    Err(PresetError::InvalidStructure { .. })
                ),
                "{} should be rejected",
                value
            );
        }
    }

    #[test]
    fn test_combinator_is_case_insensitive() {
        assert_eq!("AND".parse::<Combinator>(), Ok(Combinator::And));
        assert_eq!("Or".parse::<Combinator>(), Ok(Combinator::Or));
    }
}
