//! Models for user accounts and the authentication payloads built on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// Database representation of a registered account.
pub struct User {
    pub id: String,
    /// Immutable username used for login.
    pub username: String,
    /// Argon2 hash of the user's password.
    pub password_hash: String,
    pub full_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(username: String, password_hash: String, full_name: String) -> Self {
        let now = Utc::now();
        User {
            id: Uuid::new_v4().to_string(),
            username,
            password_hash,
            full_name,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
/// Payload for creating a new account.
pub struct RegisterRequest {
    #[validate(custom(function = "crate::validation::rules::validate_username"))]
    pub username: String,
    #[validate(custom(function = "crate::validation::rules::validate_password_strength"))]
    pub password: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub full_name: String,
}

#[derive(Debug, Deserialize, Validate)]
/// Credentials submitted by a user attempting to authenticate.
pub struct LoginRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
/// Tokens and identity returned after a successful login.
pub struct LoginResponse {
    pub username: String,
    pub full_name: String,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize)]
/// Replacement access token returned by the refresh endpoint.
pub struct RefreshResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
/// Public-facing representation of a user. Never carries the hash.
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub full_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        UserResponse {
            id: user.id,
            username: user.username,
            full_name: user.full_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_users_get_distinct_ids() {
        let a = User::new("alice".into(), "hash".into(), "Alice".into());
        let b = User::new("bob".into(), "hash".into(), "Bob".into());
        assert_ne!(a.id, b.id);
        assert_eq!(a.created_at, a.updated_at);
    }

    #[test]
    fn user_response_never_exposes_the_hash() {
        let user = User::new("alice".into(), "hash".into(), "Alice Example".into());
        let response: UserResponse = user.into();
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["username"], "alice");
        assert_eq!(json["full_name"], "Alice Example");
    }

    #[test]
    fn register_request_rejects_weak_input() {
        let payload = RegisterRequest {
            username: "bad user!".into(),
            password: "short".into(),
            full_name: "".into(),
        };
        let errors = payload.validate().expect_err("should fail validation");
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("password"));
        assert!(fields.contains_key("full_name"));
    }

    #[test]
    fn register_request_accepts_valid_input() {
        let payload = RegisterRequest {
            username: "alice_01".into(),
            password: "hunter2hunter2".into(),
            full_name: "Alice Example".into(),
        };
        assert!(payload.validate().is_ok());
    }
}
