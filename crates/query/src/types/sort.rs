//! Multi-key sort descriptors.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ArgumentError;
use crate::path::FieldPath;

/// Sort direction for one key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    /// Ascending order.
    #[default]
    Asc,
    /// Descending order.
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Asc => write!(f, "asc"),
            SortDirection::Desc => write!(f, "desc"),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortDirection::Asc),
            "desc" => Ok(SortDirection::Desc),
            _ => Err(format!("unknown sort direction: {}", s)),
        }
    }
}

/// One key of a [`SortDescriptor`].
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    /// The path compared.
    pub path: FieldPath,
    /// The direction for this key.
    pub direction: SortDirection,
}

/// An ordered list of sort keys. Later keys break ties left by earlier ones.
///
/// Built from a JSON object whose keys are paths and whose values are `"asc"`
/// or `"desc"`; key order is declaration order.
///
/// ```
/// use bazaar_query::types::{SortDescriptor, SortDirection};
/// use serde_json::json;
///
/// let sort = SortDescriptor::try_from(json!({"age": "asc", "name": "desc"})).unwrap();
/// assert_eq!(sort.keys()[1].path.as_str(), "name");
/// assert_eq!(sort.keys()[1].direction, SortDirection::Desc);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(try_from = "Value")]
pub struct SortDescriptor {
    keys: Vec<SortKey>,
}

impl SortDescriptor {
    /// Creates an empty descriptor, which leaves order unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a key.
    pub fn with_key(mut self, path: FieldPath, direction: SortDirection) -> Self {
        self.keys.push(SortKey { path, direction });
        self
    }

    /// The keys in priority order.
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Returns `true` if there are no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl TryFrom<&Value> for SortDescriptor {
    type Error = ArgumentError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let schema = value.as_object().ok_or_else(|| ArgumentError::NotAnObject {
            what: "sort schema".to_string(),
        })?;

        let mut descriptor = SortDescriptor::new();
        for (key, direction) in schema {
            let parsed = direction
                .as_str()
                .and_then(|d| d.parse::<SortDirection>().ok())
                .ok_or_else(|| ArgumentError::InvalidSortDirection {
                    key: key.clone(),
                    direction: direction
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| direction.to_string()),
                })?;
            descriptor = descriptor.with_key(FieldPath::parse(key)?, parsed);
        }
        Ok(descriptor)
    }
}

impl TryFrom<Value> for SortDescriptor {
    type Error = ArgumentError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        SortDescriptor::try_from(&value)
    }
}
