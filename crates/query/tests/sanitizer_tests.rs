//! Role-scoped sanitization integration tests.

mod common;

use serde_json::json;

use bazaar_query::access::{PolicyMode, RoleSet, SanitizerPolicy, SanitizerRule, sanitize};
use bazaar_query::path::parse_paths;
use bazaar_query::{ConfigError, EngineConfig, QueryError};

use common::*;

fn club_policy() -> SanitizerPolicy {
    SanitizerPolicy::new()
        .with_rule(
            "Club",
            "owner",
            SanitizerRule::blacklist(parse_paths(["billing"]).unwrap()),
        )
        .with_rule(
            "Club",
            "member",
            SanitizerRule::blacklist(parse_paths(["billing", "emails[1]"]).unwrap()),
        )
        .with_rule(
            "Club",
            "All",
            SanitizerRule::whitelist(parse_paths(["firstName", "lastName", "address.city"]).unwrap()),
        )
}

fn club() -> serde_json::Value {
    let mut club = clubs().remove(0);
    club["billing"] = json!({"iban": "NO93 8601 1117 947"});
    club
}

// ============================================================================
// Default Policy Tests
// ============================================================================

#[test]
fn test_default_user_policy_strips_private_fields() {
    let config = EngineConfig::default();
    let user = UserFixture::new("Ada Lovelace").with_age(36).build();

    let sanitized = config.sanitizer.sanitize(&user, "User", "admin").unwrap();
    assert_eq!(
        sanitized,
        json!({
            "name": "Ada Lovelace",
            "email": "ada.lovelace@bazaar.test",
            "role": "member",
            "clubs": [],
            "age": 36
        })
    );
}

#[test]
fn test_default_policy_has_no_club_rules() {
    let config = EngineConfig::default();
    let err = config.sanitizer.sanitize(&club(), "Club", "owner").unwrap_err();
    assert!(matches!(
        err,
        QueryError::Config(ConfigError::UnknownEntity { .. })
    ));
}

// ============================================================================
// Role Resolution Tests
// ============================================================================

#[test]
fn test_first_matching_role_wins() {
    let policy = club_policy();
    let sanitized = policy
        .sanitize(&club(), "Club", vec!["visitor", "member", "owner"])
        .unwrap();
    assert!(sanitized.get("billing").is_none());
    assert_eq!(sanitized["emails"], json!(["chess@bazaar.test", null]));
}

#[test]
fn test_unlisted_role_uses_all_rule() {
    let sanitized = sanitize(&club_policy(), &club(), "Club", "visitor").unwrap();
    assert_eq!(
        sanitized,
        json!({"firstName": "Chess", "lastName": "Club", "address": {"city": "Oslo"}})
    );
}

#[test]
fn test_empty_role_set_uses_all_rule() {
    let sanitized = club_policy()
        .sanitize(&club(), "Club", RoleSet::default())
        .unwrap();
    assert!(sanitized.get("members").is_none());
}

#[test]
fn test_fails_closed_without_all_rule() {
    let policy = SanitizerPolicy::new().with_rule(
        "Order",
        "admin",
        SanitizerRule::blacklist(parse_paths(["internalNotes"]).unwrap()),
    );
    let order = json!({"total": 99, "internalNotes": "vip"});

    let err = policy.sanitize(&order, "Order", "buyer").unwrap_err();
    assert_eq!(
        err,
        QueryError::Config(ConfigError::MissingPolicy {
            entity_kind: "Order".to_string(),
            roles: "buyer".to_string(),
        })
    );
    assert!(err.to_string().contains("Order"));
}

// ============================================================================
// Property Tests
// ============================================================================

#[test]
fn test_sanitize_is_idempotent() {
    let policy = club_policy();
    for role in ["owner", "member", "visitor"] {
        let once = policy.sanitize(&club(), "Club", role).unwrap();
        let twice = policy.sanitize(&once, "Club", role).unwrap();
        assert_eq!(once, twice, "sanitize is not idempotent for role {}", role);
    }
}

#[test]
fn test_input_is_never_mutated() {
    let policy = club_policy();
    let original = club();
    for role in ["owner", "member", "visitor"] {
        let _ = policy.sanitize(&original, "Club", role).unwrap();
    }
    assert_eq!(original, club());
}

#[test]
fn test_sanitize_all_resolves_once() {
    let records = clubs();
    let sanitized = club_policy()
        .sanitize_all(&records, "Club", "visitor")
        .unwrap();
    assert_eq!(sanitized.len(), 3);
    assert_eq!(
        field_values(&sanitized, "firstName"),
        vec!["Chess", "Debate", "Math"]
    );
    assert!(sanitized.iter().all(|club| club.get("emails").is_none()));
}

#[test]
fn test_rule_modes() {
    let policy = club_policy();
    let rules = policy.rules("Club").unwrap();
    assert_eq!(rules["All"].mode, PolicyMode::Whitelist);
    assert_eq!(rules["owner"].mode, PolicyMode::Blacklist);
}
