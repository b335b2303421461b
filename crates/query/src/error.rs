//! Error types for the query engine.
//!
//! Errors are grouped the way callers are expected to handle them:
//!
//! - [`ArgumentError`] - malformed caller input (keywords, paths, filters, sorts).
//!   Map these to a client error.
//! - [`PresetError`] - a stored filter preset with an unrecognized shape or operator.
//! - [`ConfigError`] - a deployment misconfiguration, such as an entity kind with no
//!   sanitizer policy for the requesting roles. These are never per-request conditions.
//!
//! Nothing in this crate retries. Every operation is a deterministic function of
//! its inputs, so re-invoking after an error without changing the input fails the
//! same way.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all engine operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Malformed caller input.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// Malformed stored filter preset.
    #[error(transparent)]
    Preset(#[from] PresetError),

    /// Deployment misconfiguration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl QueryError {
    /// Returns `true` if the error was caused by the caller's input rather than
    /// by configuration.
    pub fn is_client_error(&self) -> bool {
        matches!(self, QueryError::Argument(_) | QueryError::Preset(_))
    }
}

/// Errors caused by malformed caller input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ArgumentError {
    /// The search keyword was present but not a string.
    #[error("invalid keyword: expected a string, got {value}")]
    InvalidKeyword { value: String },

    /// The search keyword is shorter than the minimum length.
    #[error("keyword should be at least {min} characters, got '{keyword}'")]
    KeywordTooShort { keyword: String, min: usize },

    /// An input that must be a sequence was something else.
    #[error("invalid {what}: expected an array")]
    NotASequence { what: String },

    /// An input that must be an object was something else.
    #[error("invalid {what}: expected an object")]
    NotAnObject { what: String },

    /// Page numbers start at 1.
    #[error("invalid page number {page_number}: must be at least 1")]
    InvalidPageNumber { page_number: u64 },

    /// Page sizes start at 1.
    #[error("invalid page size {page_size}: must be at least 1")]
    InvalidPageSize { page_size: u64 },

    /// A path string could not be parsed.
    #[error("invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// The search descriptor could not be read.
    #[error("invalid search query: {message}")]
    InvalidQuery { message: String },

    /// A filter node had an unusable shape.
    #[error("invalid filter: {message}")]
    InvalidFilter { message: String },

    /// A filter condition named a type outside the supported set.
    #[error("invalid filter type {value}: must be one of string, number, date, array")]
    InvalidFilterType { value: String },

    /// The operator is not defined for the condition's type.
    #[error("unsupported operator {operator} for filter type {filter_type}")]
    UnsupportedOperator {
        filter_type: String,
        operator: String,
    },

    /// The condition value does not have the shape the operator requires.
    #[error("invalid value {value} for operator {operator}: {message}")]
    InvalidFilterValue {
        operator: String,
        value: String,
        message: String,
    },

    /// A sort direction other than `asc` or `desc`.
    #[error("invalid sort direction for {key}: it must be 'asc' or 'desc', got {direction}")]
    InvalidSortDirection { key: String, direction: String },

    /// A sort key did not resolve on a compared record.
    #[error("key {key} not found in the data")]
    SortKeyNotFound { key: String },
}

/// Errors caused by a stored filter preset.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PresetError {
    /// The preset leaf used an operator the compiler does not know.
    #[error("unsupported preset operator: {operator}")]
    UnsupportedOperator { operator: String },

    /// The preset matched neither the rule nor the group shape.
    #[error("invalid filter preset structure: {message}")]
    InvalidStructure { message: String },
}

/// Errors caused by engine configuration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No sanitizer rule matched any of the roles, and there is no `All` fallback.
    #[error("no sanitizer configuration found for entity {entity_kind} and roles [{roles}]")]
    MissingPolicy { entity_kind: String, roles: String },

    /// The entity kind has no sanitizer section at all.
    #[error("no sanitizer configuration found for entity {entity_kind}")]
    UnknownEntity { entity_kind: String },

    /// A configuration file could not be read or parsed.
    #[error("failed to load configuration from '{path}': {message}")]
    LoadFailed { path: String, message: String },

    /// The configuration document had an invalid shape.
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

/// Result type for engine operations.
pub type QueryResult<T> = Result<T, QueryError>;
