//! Outbound record sanitization.

use std::borrow::Borrow;

use serde_json::Value;

use crate::error::QueryResult;
use crate::search::include;

use super::policy::{PolicyMode, SanitizerPolicy, SanitizerRule};
use super::roles::RoleSet;

impl SanitizerRule {
    /// Applies the rule to a record, returning a new record.
    pub fn apply(&self, record: &Value) -> Value {
        match self.mode {
            PolicyMode::Blacklist => {
                let mut sanitized = record.clone();
                for path in &self.paths {
                    path.delete(&mut sanitized);
                }
                sanitized
            }
            PolicyMode::Whitelist => include(record, &self.paths),
        }
    }
}

impl SanitizerPolicy {
    /// Sanitizes a record of `entity_kind` for a requester with `roles`.
    ///
    /// The input is never modified. Fails closed: when no rule applies the
    /// record is not returned at all.
    ///
    /// # Errors
    ///
    /// [`ConfigError`](crate::ConfigError) when the entity kind has no rules,
    /// or none matches the roles and there is no `All` rule.
    ///
    /// # Examples
    ///
    /// ```
    /// use bazaar_query::access::{SanitizerPolicy, SanitizerRule};
    /// use bazaar_query::path::parse_paths;
    /// use serde_json::json;
    ///
    /// let policy = SanitizerPolicy::new().with_rule(
    ///     "User",
    ///     "All",
    ///     SanitizerRule::blacklist(parse_paths(["password"]).unwrap()),
    /// );
    ///
    /// let user = json!({"name": "Ada", "password": "hash"});
    /// let safe = policy.sanitize(&user, "User", "member").unwrap();
    /// assert_eq!(safe, json!({"name": "Ada"}));
    /// assert_eq!(user["password"], "hash");
    /// ```
    pub fn sanitize(
        &self,
        record: &Value,
        entity_kind: &str,
        roles: impl Into<RoleSet>,
    ) -> QueryResult<Value> {
        let roles = roles.into();
        let (_, rule) = self.resolve(entity_kind, &roles)?;
        Ok(rule.apply(record))
    }

    /// Sanitizes every record with the same rule. The rule is resolved once.
    pub fn sanitize_all<R: Borrow<Value>>(
        &self,
        records: &[R],
        entity_kind: &str,
        roles: impl Into<RoleSet>,
    ) -> QueryResult<Vec<Value>> {
        let roles = roles.into();
        let (_, rule) = self.resolve(entity_kind, &roles)?;
        Ok(records
            .iter()
            .map(|record| rule.apply(record.borrow()))
            .collect())
    }
}

/// Sanitizes `record` with `policy`. See [`SanitizerPolicy::sanitize`].
pub fn sanitize(
    policy: &SanitizerPolicy,
    record: &Value,
    entity_kind: &str,
    roles: impl Into<RoleSet>,
) -> QueryResult<Value> {
    policy.sanitize(record, entity_kind, roles)
}
