//! Model for the server-side session row backing issued token pairs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
/// One row per active login. Created on login, the access token half is
/// replaced in place on refresh, the whole row is deleted on logout.
pub struct UserSession {
    pub id: String,
    pub user_id: String,
    /// Access token string, the primary lookup key for protected routes.
    pub token: String,
    /// Refresh token string. Not rotated on refresh.
    pub refresh_token: String,
    pub token_expires_at: DateTime<Utc>,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserSession {
    pub fn new(
        user_id: String,
        token: String,
        refresh_token: String,
        token_expires_at: DateTime<Utc>,
        refresh_token_expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        UserSession {
            id: Uuid::new_v4().to_string(),
            user_id,
            token,
            refresh_token,
            token_expires_at,
            refresh_token_expires_at,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replaces the access token half of the session. The refresh token and
    /// its expiry are not rotated.
    pub fn refresh_access_token(&mut self, token: String, token_expires_at: DateTime<Utc>) {
        self.token = token;
        self.token_expires_at = token_expires_at;
        self.updated_at = Utc::now();
    }
}
