use crate::{
    db::connection::DbPool,
    models::{session::UserSession, user::User},
};

pub async fn find_user_by_username(
    pool: &DbPool,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, full_name, created_at, updated_at \
         FROM users WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn insert_user(pool: &DbPool, user: &User) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO users (id, username, password_hash, full_name, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(&user.id)
    .bind(&user.username)
    .bind(&user.password_hash)
    .bind(&user.full_name)
    .bind(user.created_at)
    .bind(user.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn insert_session(pool: &DbPool, session: &UserSession) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_sessions (id, user_id, token, refresh_token, token_expires_at, \
         refresh_token_expires_at, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(&session.id)
    .bind(&session.user_id)
    .bind(&session.token)
    .bind(&session.refresh_token)
    .bind(session.token_expires_at)
    .bind(session.refresh_token_expires_at)
    .bind(session.created_at)
    .bind(session.updated_at)
    .execute(pool)
    .await
    .map(|_| ())
}

pub async fn find_session_by_token(
    pool: &DbPool,
    token: &str,
) -> Result<Option<UserSession>, sqlx::Error> {
    sqlx::query_as::<_, UserSession>(
        "SELECT id, user_id, token, refresh_token, token_expires_at, refresh_token_expires_at, \
         created_at, updated_at FROM user_sessions WHERE token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn find_session_by_refresh_token(
    pool: &DbPool,
    refresh_token: &str,
) -> Result<Option<UserSession>, sqlx::Error> {
    sqlx::query_as::<_, UserSession>(
        "SELECT id, user_id, token, refresh_token, token_expires_at, refresh_token_expires_at, \
         created_at, updated_at FROM user_sessions WHERE refresh_token = $1",
    )
    .bind(refresh_token)
    .fetch_optional(pool)
    .await
}

/// Persists the access token half of the session row in place. Only the
/// columns `UserSession::refresh_access_token` touches are written.
pub async fn update_session_access_token(
    pool: &DbPool,
    session: &UserSession,
) -> Result<u64, sqlx::Error> {
    sqlx::query(
        "UPDATE user_sessions SET token = $1, token_expires_at = $2, updated_at = $3 \
         WHERE id = $4",
    )
    .bind(&session.token)
    .bind(session.token_expires_at)
    .bind(session.updated_at)
    .bind(&session.id)
    .execute(pool)
    .await
    .map(|result| result.rows_affected())
}

pub async fn delete_session_by_token(pool: &DbPool, token: &str) -> Result<u64, sqlx::Error> {
    sqlx::query("DELETE FROM user_sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await
        .map(|result| result.rows_affected())
}
