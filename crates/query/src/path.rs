//! Dotted, bracket-indexable paths into JSON records.
//!
//! A [`FieldPath`] is parsed once from strings such as `name`, `address.city`
//! or `inbounds[0].date` and then reused for every record it is applied to.
//! Each dot-separated segment names a key, optionally followed by a bracketed
//! non-negative index (`field[index]`) meaning "descend into the sequence at
//! `field`, then take element `index`".
//!
//! Lookups fail open: any missing intermediate node yields `None` ("undefined")
//! rather than an error. A plain numeric segment applied to a sequence selects
//! the element at that index, so `emails.0` and `emails[0]` resolve the same.
//!
//! # Examples
//!
//! ```
//! use bazaar_query::path::FieldPath;
//! use serde_json::json;
//!
//! let path: FieldPath = "owner.emails[1]".parse().unwrap();
//! let mut record = json!({"owner": {"emails": ["a@x.io", "b@x.io"]}});
//!
//! assert_eq!(path.get(&record), Some(&json!("b@x.io")));
//!
//! path.set(&mut record, json!("c@x.io")).unwrap();
//! assert_eq!(record["owner"]["emails"][1], "c@x.io");
//!
//! path.delete(&mut record);
//! assert_eq!(record["owner"]["emails"][1], serde_json::Value::Null);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::ArgumentError;

/// Highest sequence index [`FieldPath::set`] will pad a sequence out to.
pub const MAX_WRITE_INDEX: usize = 65_535;

/// One dot-separated step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathSegment {
    /// The key looked up in a mapping.
    pub key: String,
    /// Index into the sequence found at `key`, if the segment is `key[index]`.
    pub index: Option<usize>,
}

impl PathSegment {
    /// Creates a plain key segment.
    pub fn key(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            index: None,
        }
    }

    /// Creates a `key[index]` segment.
    pub fn indexed(key: impl Into<String>, index: usize) -> Self {
        Self {
            key: key.into(),
            index: Some(index),
        }
    }

    fn parse(raw: &str, path: &str) -> Result<Self, ArgumentError> {
        let invalid = |message: &str| ArgumentError::InvalidPath {
            path: path.to_string(),
            message: message.to_string(),
        };

        if raw.is_empty() {
            return Err(invalid("empty segment"));
        }

        let Some(open) = raw.find('[') else {
            if raw.contains(']') {
                return Err(invalid("unmatched ']'"));
            }
            return Ok(Self::key(raw));
        };

        let key = &raw[..open];
        let rest = &raw[open + 1..];
        let close = rest.find(']').ok_or_else(|| invalid("unterminated '['"))?;
        if close + 1 != rest.len() {
            return Err(invalid("unexpected characters after ']'"));
        }

        let index = rest[..close]
            .parse::<usize>()
            .map_err(|_| invalid("index must be a non-negative integer"))?;

        Ok(Self::indexed(key, index))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.index {
            Some(index) => write!(f, "{}[{}]", self.key, index),
            None => write!(f, "{}", self.key),
        }
    }
}

/// A parsed path into a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath {
    raw: String,
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// Parses a path string.
    pub fn parse(path: &str) -> Result<Self, ArgumentError> {
        if path.is_empty() {
            return Err(ArgumentError::InvalidPath {
                path: String::new(),
                message: "path is empty".to_string(),
            });
        }

        let segments = path
            .split('.')
            .map(|raw| PathSegment::parse(raw, path))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            raw: path.to_string(),
            segments,
        })
    }

    /// Returns the path as originally written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Returns the parsed segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Resolves the path against a record.
    ///
    /// Returns `None` when the record is not a container or any step is missing.
    pub fn get<'a>(&self, record: &'a Value) -> Option<&'a Value> {
        if !is_container(record) {
            return None;
        }

        let mut current = record;
        for segment in &self.segments {
            let child = child(current, &segment.key)?;
            current = match segment.index {
                Some(index) => child.as_array()?.get(index)?,
                None => child,
            };
        }
        Some(current)
    }

    /// Writes `value` at the path, creating intermediate mappings or sequences.
    ///
    /// A segment with a bracket index creates a sequence, any other segment a
    /// mapping. Existing non-container nodes along the way are replaced.
    /// Writing past the end of a sequence pads it with `null`.
    ///
    /// # Errors
    ///
    /// [`ArgumentError::InvalidPath`] if a sequence would have to grow past
    /// [`MAX_WRITE_INDEX`]. Intermediate nodes created before the failing
    /// segment are kept.
    pub fn set(&self, record: &mut Value, value: Value) -> Result<(), ArgumentError> {
        let Some((last, parents)) = self.segments.split_last() else {
            return Ok(());
        };

        let mut current = record;
        for segment in parents {
            let node = self.slot(current, &segment.key)?;
            current = match segment.index {
                Some(index) => {
                    let items = ensure_array(node);
                    self.pad(items, index)?;
                    &mut items[index]
                }
                None => node,
            };
            if !is_container(current) {
                *current = Value::Object(Map::new());
            }
        }

        let node = self.slot(current, &last.key)?;
        match last.index {
            Some(index) => {
                let items = ensure_array(node);
                self.pad(items, index)?;
                items[index] = value;
            }
            None => *node = value,
        }
        Ok(())
    }

    /// Returns the child slot for `key`, creating it (as `null`) when missing.
    fn slot<'a>(&self, node: &'a mut Value, key: &str) -> Result<&'a mut Value, ArgumentError> {
        let array_index = match node {
            Value::Array(_) => key.parse::<usize>().ok(),
            _ => None,
        };
        if array_index.is_none() && !node.is_object() {
            *node = Value::Object(Map::new());
        }

        match (node, array_index) {
            (Value::Array(items), Some(index)) => {
                self.pad(items, index)?;
                Ok(&mut items[index])
            }
            (Value::Object(map), _) => Ok(map.entry(key.to_string()).or_insert(Value::Null)),
            // normalized to an object above
            (node, _) => Ok(node),
        }
    }

    /// Grows `items` with `null` until `index` is in bounds.
    fn pad(&self, items: &mut Vec<Value>, index: usize) -> Result<(), ArgumentError> {
        if index < items.len() {
            return Ok(());
        }
        if index > MAX_WRITE_INDEX {
            return Err(ArgumentError::InvalidPath {
                path: self.raw.clone(),
                message: format!("index {} exceeds the writable limit of {}", index, MAX_WRITE_INDEX),
            });
        }
        items.resize(index + 1, Value::Null);
        Ok(())
    }

    /// Removes the value at the path.
    ///
    /// No-op when any intermediate node is absent. Removing an indexed element
    /// leaves `null` in its slot so later indices keep their positions.
    pub fn delete(&self, record: &mut Value) {
        let Some((last, parents)) = self.segments.split_last() else {
            return;
        };

        let mut current = record;
        for segment in parents {
            let Some(next) = child_mut(current, &segment.key) else {
                return;
            };
            current = match segment.index {
                Some(index) => match next.as_array_mut().and_then(|items| items.get_mut(index)) {
                    Some(element) => element,
                    None => return,
                },
                None => next,
            };
        }

        match last.index {
            Some(index) => {
                if let Some(element) = child_mut(current, &last.key)
                    .and_then(Value::as_array_mut)
                    .and_then(|items| items.get_mut(index))
                {
                    *element = Value::Null;
                }
            }
            None => match current {
                Value::Object(map) => {
                    map.shift_remove(&last.key);
                }
                Value::Array(items) => {
                    if let Ok(index) = last.key.parse::<usize>() {
                        if let Some(element) = items.get_mut(index) {
                            *element = Value::Null;
                        }
                    }
                }
                _ => {}
            },
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for FieldPath {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for FieldPath {
    type Error = ArgumentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl TryFrom<String> for FieldPath {
    type Error = ArgumentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl Serialize for FieldPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for FieldPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Parses a list of path strings, failing on the first invalid one.
pub fn parse_paths<I, S>(paths: I) -> Result<Vec<FieldPath>, ArgumentError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    paths
        .into_iter()
        .map(|path| FieldPath::parse(path.as_ref()))
        .collect()
}

fn is_container(value: &Value) -> bool {
    matches!(value, Value::Object(_) | Value::Array(_))
}

fn child<'a>(node: &'a Value, key: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
        _ => None,
    }
}

fn child_mut<'a>(node: &'a mut Value, key: &str) -> Option<&'a mut Value> {
    match node {
        Value::Object(map) => map.get_mut(key),
        Value::Array(items) => match key.parse::<usize>() {
            Ok(index) => items.get_mut(index),
            Err(_) => None,
        },
        _ => None,
    }
}

fn ensure_array(node: &mut Value) -> &mut Vec<Value> {
    if !node.is_array() {
        *node = Value::Array(Vec::new());
    }
    match node {
        Value::Array(items) => items,
        _ => unreachable!("node was just replaced with an array"),
    }
}
