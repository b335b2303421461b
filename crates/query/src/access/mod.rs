//! Role-scoped access to outbound records.
//!
//! Every record leaving the service passes through a sanitizer that strips
//! or projects fields according to the requester's roles:
//!
//! - [`RoleSet`] - the requester's roles, in priority order
//! - [`SanitizerRule`] - a blacklist or whitelist of paths
//! - [`SanitizerPolicy`] - rules by entity kind and role, with an `All` fallback
//!
//! # Failing Closed
//!
//! Sanitization protects fields such as password hashes and reset tokens. If
//! no rule applies to an entity kind and role set, and there is no `All`
//! rule, sanitization returns a [`ConfigError`](crate::ConfigError) instead
//! of the unredacted record. A missing rule is a deployment error, never a
//! per-request condition.
//!
//! # Examples
//!
//! ```
//! use bazaar_query::access::{SanitizerPolicy, SanitizerRule};
//! use bazaar_query::path::parse_paths;
//! use serde_json::json;
//!
//! let policy = SanitizerPolicy::new()
//!     .with_rule("Club", "All", SanitizerRule::whitelist(parse_paths(["name"]).unwrap()))
//!     .with_rule("Club", "owner", SanitizerRule::blacklist(parse_paths(["apiKey"]).unwrap()));
//!
//! let club = json!({"name": "Chess", "apiKey": "k", "members": 12});
//!
//! let for_owner = policy.sanitize(&club, "Club", vec!["member", "owner"]).unwrap();
//! assert_eq!(for_owner, json!({"name": "Chess", "members": 12}));
//!
//! let for_guest = policy.sanitize(&club, "Club", "guest").unwrap();
//! assert_eq!(for_guest, json!({"name": "Chess"}));
//!
//! assert!(policy.sanitize(&club, "Order", "owner").is_err());
//! ```

mod policy;
mod roles;
mod sanitizer;

pub use policy::{PolicyMode, SanitizerPolicy, SanitizerRule};
pub use roles::{FALLBACK_ROLE, RoleSet};
pub use sanitizer::sanitize;
