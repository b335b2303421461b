//! Subcommand implementations.
//!
//! Each `run_*` function takes already-parsed JSON documents and returns the
//! JSON to print; [`run`] reads the documents named on the command line.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use bazaar_query::EngineConfig;
use bazaar_query::preset::filter_by_preset;
use bazaar_query::search::{filter_and_sort, records_from_value, search, search_filter_and_sort};
use bazaar_query::types::{FilterNode, FilterPreset, SearchQuery, SortDescriptor};
use serde_json::Value;
use tracing::debug;

use crate::config::Command;

/// Reads and parses a JSON file.
pub fn read_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn read_optional(path: Option<&Path>) -> Result<Option<Value>> {
    path.map(read_json).transpose()
}

/// Runs a subcommand against the engine configuration.
pub fn run(command: &Command, engine: &EngineConfig) -> Result<Value> {
    match command {
        Command::Search {
            records,
            query,
            entity,
            filtered,
        } => run_search(
            engine,
            read_json(records)?,
            read_json(query)?,
            entity.as_deref(),
            *filtered,
        ),
        Command::Filter {
            records,
            filter,
            sort,
        } => run_filter(
            read_json(records)?,
            read_optional(filter.as_deref())?,
            read_optional(sort.as_deref())?,
        ),
        Command::Preset { preset, records } => run_preset(read_json(preset)?, read_json(records)?),
        Command::Sanitize {
            record,
            entity,
            roles,
        } => run_sanitize(engine, read_json(record)?, entity, roles.clone()),
    }
}

/// Ranks and paginates records. With `entity`, an empty `searchPaths` is
/// filled from the entity's declared search paths.
pub fn run_search(
    engine: &EngineConfig,
    records: Value,
    query: Value,
    entity: Option<&str>,
    filtered: bool,
) -> Result<Value> {
    let records = records_from_value(records)?;
    let mut query = SearchQuery::try_from(query)?;

    if let Some(entity) = entity
        && query.search_paths.is_empty()
    {
        let paths = engine
            .search_paths
            .paths_for(entity)
            .with_context(|| format!("No search paths declared for entity {}", entity))?;
        debug!(entity, paths = paths.len(), "Using declared search paths");
        query.search_paths = paths.to_vec();
    }

    let page = if filtered {
        search_filter_and_sort(&records, &query)?
    } else {
        search(&records, &query)?
    };
    Ok(serde_json::to_value(page)?)
}

/// Filters and sorts records.
pub fn run_filter(records: Value, filter: Option<Value>, sort: Option<Value>) -> Result<Value> {
    let records = records_from_value(records)?;
    let filter = filter
        .map(FilterNode::try_from)
        .transpose()?
        .unwrap_or_default();
    let sort = sort
        .map(SortDescriptor::try_from)
        .transpose()?
        .unwrap_or_default();

    let kept = filter_and_sort(&records, &filter, &sort)?;
    Ok(Value::Array(kept.into_iter().cloned().collect()))
}

/// Keeps the records matching a filter preset.
pub fn run_preset(preset: Value, records: Value) -> Result<Value> {
    let records = records_from_value(records)?;
    let preset = FilterPreset::try_from(preset)?;
    let kept = filter_by_preset(&records, &preset)?;
    Ok(Value::Array(kept.into_iter().cloned().collect()))
}

/// Sanitizes one record, or each record of an array.
pub fn run_sanitize(
    engine: &EngineConfig,
    record: Value,
    entity: &str,
    roles: Vec<String>,
) -> Result<Value> {
    match record {
        Value::Array(records) => Ok(Value::Array(
            engine.sanitizer.sanitize_all(&records, entity, roles)?,
        )),
        record => Ok(engine.sanitizer.sanitize(&record, entity, roles)?),
    }
}
