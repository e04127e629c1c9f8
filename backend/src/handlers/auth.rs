use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap},
    Json,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    db::connection::DbPool,
    error::AppError,
    handlers::auth_repo,
    middleware::auth::AuthUser,
    models::{
        session::UserSession,
        user::{LoginRequest, LoginResponse, RefreshResponse, RegisterRequest, User, UserResponse},
    },
    response::ApiResponse,
    utils::{
        jwt::{TokenCodec, TokenKind},
        password::{hash_password, verify_password},
    },
};

/// Unknown username and wrong password produce the same message so the
/// endpoint cannot be used to enumerate accounts.
const INVALID_CREDENTIALS: &str = "invalid username or password";

pub async fn register(
    State((pool, _codec)): State<(DbPool, TokenCodec)>,
    Json(payload): Json<RegisterRequest>,
) -> Result<ApiResponse<UserResponse>, AppError> {
    payload.validate()?;

    let password_hash = hash_password(&payload.password)?;
    let user = User::new(payload.username, password_hash, payload.full_name);

    auth_repo::insert_user(&pool, &user)
        .await
        .map_err(map_insert_user_error)?;

    Ok(ApiResponse::success(UserResponse::from(user)))
}

pub async fn login(
    State((pool, codec)): State<(DbPool, TokenCodec)>,
    Json(payload): Json<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    payload.validate()?;

    let user = auth_repo::find_user_by_username(&pool, &payload.username)
        .await?
        .ok_or_else(invalid_credentials)?;

    check_credentials(&payload.password, &user.password_hash)?;

    // Both tokens share one issuance instant so the session row's expiries
    // line up exactly with the claims.
    let now = Utc::now();
    let token = codec.issue(&user.username, &user.full_name, TokenKind::Access, now)?;
    let refresh_token = codec.issue(&user.username, &user.full_name, TokenKind::Refresh, now)?;

    let session = UserSession::new(
        user.id.clone(),
        token.clone(),
        refresh_token.clone(),
        now + codec.ttl(TokenKind::Access),
        now + codec.ttl(TokenKind::Refresh),
    );
    auth_repo::insert_session(&pool, &session).await?;

    Ok(ApiResponse::success(LoginResponse {
        username: user.username,
        full_name: user.full_name,
        token,
        refresh_token,
    }))
}

pub async fn logout(
    State((pool, _codec)): State<(DbPool, TokenCodec)>,
    headers: HeaderMap,
) -> Result<ApiResponse<serde_json::Value>, AppError> {
    let token = raw_authorization(&headers);

    // Deleting an already-removed session is still a successful logout.
    let deleted = auth_repo::delete_session_by_token(&pool, token).await?;
    if deleted == 0 {
        tracing::debug!("logout for a session that no longer exists");
    }

    Ok(ApiResponse::ok())
}

pub async fn refresh_token(
    State((pool, codec)): State<(DbPool, TokenCodec)>,
    Extension(user): Extension<AuthUser>,
    headers: HeaderMap,
) -> Result<ApiResponse<RefreshResponse>, AppError> {
    let presented = raw_authorization(&headers);

    let mut session = auth_repo::find_session_by_refresh_token(&pool, presented)
        .await?
        .ok_or_else(|| AppError::Unauthorized("unauthorized".to_string()))?;

    let now = Utc::now();
    let token = codec.issue(&user.username, &user.full_name, TokenKind::Access, now)?;

    session.refresh_access_token(token.clone(), now + codec.ttl(TokenKind::Access));
    let updated = auth_repo::update_session_access_token(&pool, &session).await?;
    if updated == 0 {
        // Session vanished between the middleware check and the update.
        tracing::warn!("refresh raced with session removal");
        return Err(AppError::Unauthorized("unauthorized".to_string()));
    }

    Ok(ApiResponse::success(RefreshResponse { token }))
}

/// Verifies a candidate password against the stored hash, collapsing a
/// mismatch into the generic credential error.
pub fn check_credentials(password: &str, password_hash: &str) -> Result<(), AppError> {
    let matches = verify_password(password, password_hash).map_err(AppError::InternalServerError)?;
    if matches {
        Ok(())
    } else {
        Err(invalid_credentials())
    }
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS.to_string())
}

fn map_insert_user_error(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict("username is already taken".to_string());
        }
    }
    AppError::from(err)
}

fn raw_authorization(headers: &HeaderMap) -> &str {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}
