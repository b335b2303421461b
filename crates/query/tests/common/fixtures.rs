//! Marketplace records for engine tests.

use serde_json::{Value, json};

/// A user record fixture.
#[derive(Debug, Clone)]
pub struct UserFixture {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Marketplace role.
    pub role: String,
    /// Age in years.
    pub age: Option<i64>,
    /// Account creation timestamp.
    pub created_at: Option<String>,
    /// Club ids the user belongs to.
    pub clubs: Vec<String>,
}

impl UserFixture {
    /// Creates a user with a derived email and the `member` role.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let email = format!("{}@bazaar.test", name.to_lowercase().replace(' ', "."));
        Self {
            name,
            email,
            role: "member".to_string(),
            age: None,
            created_at: None,
            clubs: vec![],
        }
    }

    /// Sets the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Sets the age.
    pub fn with_age(mut self, age: i64) -> Self {
        self.age = Some(age);
        self
    }

    /// Sets the creation timestamp.
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = Some(created_at.into());
        self
    }

    /// Sets club memberships.
    pub fn with_clubs(mut self, clubs: Vec<&str>) -> Self {
        self.clubs = clubs.into_iter().map(String::from).collect();
        self
    }

    /// Builds the stored record, including the private fields a sanitizer
    /// must strip.
    pub fn build(&self) -> Value {
        let mut user = json!({
            "name": self.name,
            "email": self.email,
            "role": self.role,
            "clubs": self.clubs,
            "password": "$2b$10$hash",
            "resetPasswordKey": "reset-key",
            "resetPasswordKeyExpiry": "2030-01-01T00:00:00Z",
            "loginAttempts": 0,
            "lockUntil": null,
            "__v": 0
        });
        if let Some(age) = self.age {
            user["age"] = json!(age);
        }
        if let Some(created_at) = &self.created_at {
            user["createdAt"] = json!(created_at);
        }
        user
    }
}

/// The three-fruit catalogue used by ranking tests.
pub fn fruits() -> Vec<Value> {
    vec![
        json!({"name": "Apple"}),
        json!({"name": "Pineapple"}),
        json!({"name": "Banana"}),
    ]
}

/// A small user base with varied ages, roles and join dates.
pub fn users() -> Vec<Value> {
    vec![
        UserFixture::new("Ada Lovelace")
            .with_age(36)
            .with_role("admin")
            .with_created_at("2023-03-01T10:00:00Z")
            .with_clubs(vec!["chess", "math"])
            .build(),
        UserFixture::new("Alan Turing")
            .with_age(41)
            .with_created_at("2023-06-15")
            .with_clubs(vec!["chess"])
            .build(),
        UserFixture::new("Grace Hopper")
            .with_age(85)
            .with_created_at("2024-01-20T08:30:00Z")
            .build(),
        UserFixture::new("Adam Smith")
            .with_age(17)
            .with_role("guest")
            .with_created_at("2024-05-05")
            .with_clubs(vec!["economics", "chess", "debate"])
            .build(),
    ]
}

/// Club records with nested contact data.
pub fn clubs() -> Vec<Value> {
    vec![
        json!({
            "firstName": "Chess",
            "lastName": "Club",
            "emails": ["chess@bazaar.test", "board@bazaar.test"],
            "phoneNumbers": ["+1 555 0100"],
            "address": {"city": "Oslo", "street": "Main St. 1"},
            "members": 42
        }),
        json!({
            "firstName": "Debate",
            "lastName": "Society",
            "emails": ["debate@bazaar.test"],
            "phoneNumbers": [],
            "address": {"city": "Rome", "street": "Via Roma 3"},
            "members": 7
        }),
        json!({
            "firstName": "Math",
            "lastName": "Circle",
            "emails": [],
            "phoneNumbers": ["+1 555 0199", "+1 555 0100"],
            "address": {"city": "Oslo", "street": "Chess Avenue 9"},
            "members": 15
        }),
    ]
}
