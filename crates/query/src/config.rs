//! Engine configuration.
//!
//! [`EngineConfig`] is built once at startup and passed by reference to the
//! operations that need it. It carries the sanitizer policy and the declared
//! search paths of each entity kind.
//!
//! # JSON form
//!
//! ```json
//! {
//!     "sanitizer": {
//!         "User": {"All": {"mode": "blacklist", "paths": ["password"]}}
//!     },
//!     "searchPaths": {
//!         "user": ["name", "email"]
//!     }
//! }
//! ```
//!
//! A section missing from the document keeps its built-in default.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::access::{FALLBACK_ROLE, SanitizerPolicy, SanitizerRule};
use crate::error::ConfigError;
use crate::path::{FieldPath, parse_paths};

/// Fields never returned for a user record unless a role rule says otherwise.
pub const USER_PRIVATE_FIELDS: &[&str] = &[
    "password",
    "resetPasswordKey",
    "resetPasswordKeyExpiry",
    "loginAttempts",
    "lockUntil",
    "__v",
];

/// Declared search paths by entity kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SearchPathRegistry {
    entities: BTreeMap<String, Vec<FieldPath>>,
}

impl SearchPathRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares the search paths of an entity kind, replacing earlier ones.
    pub fn with_paths(mut self, entity_kind: impl Into<String>, paths: Vec<FieldPath>) -> Self {
        self.entities.insert(entity_kind.into(), paths);
        self
    }

    /// Returns the search paths of an entity kind.
    ///
    /// Matches the kind exactly first, then ignoring ASCII case, so `User`
    /// finds paths declared under `user`.
    pub fn paths_for(&self, entity_kind: &str) -> Option<&[FieldPath]> {
        self.entities
            .get(entity_kind)
            .or_else(|| {
                self.entities
                    .iter()
                    .find(|(kind, _)| kind.eq_ignore_ascii_case(entity_kind))
                    .map(|(_, paths)| paths)
            })
            .map(Vec::as_slice)
    }

    /// Entity kinds with declared search paths.
    pub fn entity_kinds(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }
}

/// Static configuration for the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Sanitizer rules by entity kind and role.
    pub sanitizer: SanitizerPolicy,

    /// Declared search paths by entity kind.
    pub search_paths: SearchPathRegistry,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sanitizer: default_sanitizer(),
            search_paths: default_search_paths(),
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with the built-in defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the sanitizer policy.
    pub fn with_sanitizer(mut self, sanitizer: SanitizerPolicy) -> Self {
        self.sanitizer = sanitizer;
        self
    }

    /// Replaces the search-path registry.
    pub fn with_search_paths(mut self, search_paths: SearchPathRegistry) -> Self {
        self.search_paths = search_paths;
        self
    }

    /// Reads a configuration document.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Invalid`] if the document does not have the expected
    /// shape, including malformed paths and unknown policy modes.
    pub fn from_json(value: &Value) -> Result<Self, ConfigError> {
        if !value.is_object() {
            return Err(ConfigError::Invalid {
                message: format!("expected an object, got {}", value),
            });
        }
        let config: EngineConfig =
            serde_json::from_value(value.clone()).map_err(|e| ConfigError::Invalid {
                message: e.to_string(),
            })?;
        config.check();
        Ok(config)
    }

    /// Loads a configuration file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::LoadFailed`] naming the path if the file cannot be read
    /// or is not a valid configuration document.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let load_failed = |message: String| ConfigError::LoadFailed {
            path: path.display().to_string(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| load_failed(e.to_string()))?;
        let json: Value = serde_json::from_str(&content)
            .map_err(|e| load_failed(format!("Invalid JSON: {}", e)))?;
        let config = Self::from_json(&json).map_err(|e| load_failed(e.to_string()))?;

        debug!(
            path = %path.display(),
            sanitized_entities = config.sanitizer.entity_kinds().count(),
            searchable_entities = config.search_paths.entity_kinds().count(),
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// Logs configuration that is valid but likely unintended.
    fn check(&self) {
        for entity_kind in self.sanitizer.entity_kinds() {
            let Some(rules) = self.sanitizer.rules(entity_kind) else {
                continue;
            };
            if !rules.contains_key(FALLBACK_ROLE) {
                warn!(
                    entity_kind,
                    "Sanitizer has no All rule; requests from unlisted roles will fail"
                );
            }
        }
        for entity_kind in self.search_paths.entity_kinds() {
            if self
                .search_paths
                .paths_for(entity_kind)
                .is_some_and(<[FieldPath]>::is_empty)
            {
                warn!(entity_kind, "Entity declares no search paths");
            }
        }
    }
}

fn default_sanitizer() -> SanitizerPolicy {
    SanitizerPolicy::new().with_rule(
        "User",
        FALLBACK_ROLE,
        SanitizerRule::blacklist(builtin_paths(USER_PRIVATE_FIELDS)),
    )
}

fn default_search_paths() -> SearchPathRegistry {
    SearchPathRegistry::new()
        .with_paths("user", builtin_paths(&["name", "email", "phone", "role"]))
        .with_paths(
            "club",
            builtin_paths(&["firstName", "lastName", "phoneNumbers", "emails", "address"]),
        )
        .with_paths("order", builtin_paths(&["description"]))
}

fn builtin_paths(paths: &[&str]) -> Vec<FieldPath> {
    // Built-in paths are plain keys, which always parse.
    parse_paths(paths).unwrap_or_default()
}
