//! Field projection of result records.

use serde_json::{Map, Value};
use tracing::warn;

use crate::path::FieldPath;
use crate::types::Projection;

impl Projection {
    /// Applies the projection to an owned record.
    ///
    /// `Include` builds a fresh object holding only the listed paths that
    /// resolve; `Exclude` deletes the listed paths; `All` returns the record
    /// unchanged.
    pub fn apply(&self, record: Value) -> Value {
        match self {
            Projection::All => record,
            Projection::Include(paths) => include(&record, paths),
            Projection::Exclude(paths) => {
                let mut record = record;
                for path in paths {
                    path.delete(&mut record);
                }
                record
            }
        }
    }
}

/// Builds a new object containing only `paths` that resolve in `source`.
///
/// A path indexing past [`MAX_WRITE_INDEX`](crate::path::MAX_WRITE_INDEX)
/// is left out of the projection.
pub fn include(source: &Value, paths: &[FieldPath]) -> Value {
    let mut projected = Value::Object(Map::new());
    for path in paths {
        let Some(value) = path.get(source) else {
            continue;
        };
        if let Err(err) = path.set(&mut projected, value.clone()) {
            warn!(path = %path, error = %err, "Skipping path in projection");
        }
    }
    projected
}
