//! Sanitizer policies: which fields each role may see.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::path::FieldPath;

use super::roles::{FALLBACK_ROLE, RoleSet};

/// How a rule's paths are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyMode {
    /// Return everything except the listed paths.
    Blacklist,
    /// Return only the listed paths.
    Whitelist,
}

impl fmt::Display for PolicyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyMode::Blacklist => write!(f, "blacklist"),
            PolicyMode::Whitelist => write!(f, "whitelist"),
        }
    }
}

/// The fields one role may see for one entity kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanitizerRule {
    /// Whether `paths` are removed or kept.
    pub mode: PolicyMode,
    /// The paths removed or kept.
    pub paths: Vec<FieldPath>,
}

impl SanitizerRule {
    /// A rule removing `paths`.
    pub fn blacklist(paths: Vec<FieldPath>) -> Self {
        Self {
            mode: PolicyMode::Blacklist,
            paths,
        }
    }

    /// A rule keeping only `paths`.
    pub fn whitelist(paths: Vec<FieldPath>) -> Self {
        Self {
            mode: PolicyMode::Whitelist,
            paths,
        }
    }
}

/// Sanitizer rules by entity kind, then by role.
///
/// Serialized as `{"<EntityKind>": {"<role>": {"mode": ..., "paths": [...]}}}`.
/// Role `All` is the fallback for roles with no rule of their own.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SanitizerPolicy {
    entities: BTreeMap<String, BTreeMap<String, SanitizerRule>>,
}

impl SanitizerPolicy {
    /// Creates an empty policy. An empty policy rejects every entity kind.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces the rule for `role` on `entity_kind`.
    pub fn with_rule(
        mut self,
        entity_kind: impl Into<String>,
        role: impl Into<String>,
        rule: SanitizerRule,
    ) -> Self {
        self.entities
            .entry(entity_kind.into())
            .or_default()
            .insert(role.into(), rule);
        self
    }

    /// Entity kinds that have at least one rule.
    pub fn entity_kinds(&self) -> impl Iterator<Item = &str> {
        self.entities.keys().map(String::as_str)
    }

    /// The rules for one entity kind, by role.
    pub fn rules(&self, entity_kind: &str) -> Option<&BTreeMap<String, SanitizerRule>> {
        self.entities.get(entity_kind)
    }

    /// Selects the rule for a requester.
    ///
    /// The first role in `roles` with a rule wins; failing that, the `All`
    /// rule applies. Returns the role whose rule was chosen.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::UnknownEntity`] if `entity_kind` has no rules
    /// - [`ConfigError::MissingPolicy`] if no role matches and there is no
    ///   `All` rule
    pub fn resolve<'a>(
        &'a self,
        entity_kind: &str,
        roles: &'a RoleSet,
    ) -> Result<(&'a str, &'a SanitizerRule), ConfigError> {
        let rules = self
            .entities
            .get(entity_kind)
            .ok_or_else(|| ConfigError::UnknownEntity {
                entity_kind: entity_kind.to_string(),
            })?;

        if let Some((role, rule)) = roles
            .iter()
            .find_map(|role| rules.get(role).map(|rule| (role, rule)))
        {
            debug!(entity_kind, role, mode = %rule.mode, "Selected sanitizer rule");
            return Ok((role, rule));
        }

        match rules.get(FALLBACK_ROLE) {
            Some(rule) => {
                debug!(
                    entity_kind,
                    roles = %roles,
                    mode = %rule.mode,
                    "No role-specific sanitizer rule, using fallback"
                );
                Ok((FALLBACK_ROLE, rule))
            }
            None => Err(ConfigError::MissingPolicy {
                entity_kind: entity_kind.to_string(),
                roles: roles.to_string(),
            }),
        }
    }
}
