//! Bazaar Query Engine
//!
//! In-memory search, filtering and response sanitization for the Bazaar
//! marketplace. The persistence layer fetches candidate records; this crate
//! ranks, filters, sorts, paginates and redacts them. Nothing here performs
//! I/O apart from loading a configuration file.
//!
//! # Features
//!
//! - **Keyword Search**: relevance ranking across declared search paths, with
//!   pagination and field projection
//! - **Filter Trees**: typed `$and` / `$or` / leaf conditions over nested paths
//! - **Multi-key Sort**: ordered `asc` / `desc` keys with tie-breaking
//! - **Filter Presets**: stored presets compiled onto filter trees
//! - **Sanitization**: role-scoped blacklists and whitelists that fail closed
//!
//! # Architecture
//!
//! - [`path`] - parsed, bracket-indexable paths into records
//! - [`types`] - typed queries, filters, sorts, presets and pages
//! - [`search`] - relevance scoring, ranking, filter evaluation and sorting
//! - [`preset`] - filter-preset compilation
//! - [`access`] - role-scoped sanitization
//! - [`config`] - static engine configuration
//! - [`error`] - error types for all operations
//!
//! # Quick Start
//!
//! ```
//! use bazaar_query::search::search_filter_and_sort;
//! use bazaar_query::types::SearchQuery;
//! use bazaar_query::EngineConfig;
//! use serde_json::json;
//!
//! let config = EngineConfig::default();
//! let users = vec![
//!     json!({"name": "Ada Lovelace", "age": 36, "password": "x"}),
//!     json!({"name": "Adam Smith", "age": 67, "password": "y"}),
//!     json!({"name": "Grace Hopper", "age": 85, "password": "z"}),
//! ];
//!
//! let query = SearchQuery::try_from(json!({
//!     "keyword": "ada",
//!     "filter": {"field": "age", "type": "number", "operator": "less", "value": 80},
//!     "sort": {"age": "desc"}
//! }))
//! .unwrap()
//! .with_search_paths(config.search_paths.paths_for("user").unwrap().to_vec());
//!
//! let page = search_filter_and_sort(&users, &query).unwrap();
//! let names: Vec<_> = page.results.iter().map(|u| u["name"].as_str().unwrap()).collect();
//! assert_eq!(names, vec!["Adam Smith", "Ada Lovelace"]);
//!
//! let safe = config.sanitizer.sanitize(&page.results[0], "User", "guest").unwrap();
//! assert!(safe.get("password").is_none());
//! ```
//!
//! # Errors
//!
//! Every operation returns [`QueryResult`]. [`ArgumentError`] and
//! [`PresetError`] are caused by the request; [`ConfigError`] means the
//! deployment is misconfigured. Missing fields are not errors when reading,
//! except for sort keys.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod access;
pub mod config;
pub mod error;
pub mod path;
pub mod preset;
pub mod search;
pub mod types;

// Re-export commonly used types at crate root
pub use access::{RoleSet, SanitizerPolicy};
pub use config::{EngineConfig, SearchPathRegistry};
pub use error::{ArgumentError, ConfigError, PresetError, QueryError, QueryResult};
pub use path::FieldPath;
