//! Requester role sets.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The role key every entity may define as a catch-all.
pub const FALLBACK_ROLE: &str = "All";

/// The roles of a requester, in priority order.
///
/// A sanitizer tries each role in turn and uses the first one with a rule. A
/// single role converts into a one-element set.
///
/// # Examples
///
/// ```
/// use bazaar_query::access::RoleSet;
///
/// let single = RoleSet::from("admin");
/// let many = RoleSet::from(vec!["owner", "member"]);
///
/// assert_eq!(single.len(), 1);
/// assert_eq!(many.to_string(), "owner, member");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleSet(Vec<String>);

impl RoleSet {
    /// Creates a role set from roles in priority order.
    pub fn new(roles: Vec<String>) -> Self {
        Self(roles)
    }

    /// Returns the roles in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// Returns the number of roles.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no roles.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the set contains `role`.
    pub fn contains(&self, role: &str) -> bool {
        self.0.iter().any(|r| r == role)
    }
}

impl fmt::Display for RoleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}

impl From<&str> for RoleSet {
    fn from(role: &str) -> Self {
        Self(vec![role.to_string()])
    }
}

impl From<String> for RoleSet {
    fn from(role: String) -> Self {
        Self(vec![role])
    }
}

impl From<Vec<String>> for RoleSet {
    fn from(roles: Vec<String>) -> Self {
        Self(roles)
    }
}

impl From<Vec<&str>> for RoleSet {
    fn from(roles: Vec<&str>) -> Self {
        roles.into_iter().collect()
    }
}

impl From<&[&str]> for RoleSet {
    fn from(roles: &[&str]) -> Self {
        roles.iter().copied().collect()
    }
}

impl<S: Into<String>> FromIterator<S> for RoleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}
