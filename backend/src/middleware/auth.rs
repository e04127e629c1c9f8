use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};

use crate::{
    db::connection::DbPool,
    error::AppError,
    handlers::auth_repo,
    models::session::UserSession,
    utils::jwt::{TokenCodec, TokenKind},
};

/// Identity attached to the request after successful authentication.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub username: String,
    pub full_name: String,
}

/// Gates routes that require a live access token.
pub async fn auth(
    State((pool, codec)): State<(DbPool, TokenCodec)>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_credential(request.headers());
    let session = lookup_session(&pool, token.as_deref(), TokenKind::Access).await?;
    let user = authorize(token.as_deref(), session.as_ref(), &codec, Utc::now())?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// Gates the refresh endpoint, where the bearer credential is the refresh
/// token rather than the access token.
pub async fn auth_refresh(
    State((pool, codec)): State<(DbPool, TokenCodec)>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_credential(request.headers());
    let session = lookup_session(&pool, token.as_deref(), TokenKind::Refresh).await?;
    let user = authorize(token.as_deref(), session.as_ref(), &codec, Utc::now())?;

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

/// The literal `Authorization` header value. Clients send the token bare,
/// without a "Bearer " scheme prefix.
fn bearer_credential(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_owned())
}

async fn lookup_session(
    pool: &DbPool,
    token: Option<&str>,
    kind: TokenKind,
) -> Result<Option<UserSession>, AppError> {
    let Some(token) = token.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let found = match kind {
        TokenKind::Access => auth_repo::find_session_by_token(pool, token).await,
        TokenKind::Refresh => auth_repo::find_session_by_refresh_token(pool, token).await,
    };

    found.map_err(|err| {
        tracing::error!(error = %err, "session lookup failed");
        AppError::InternalServerError(err.into())
    })
}

/// The per-request decision path. Every rejection collapses to the same
/// uniform 401; the distinguishing cause goes to the server log only.
pub fn authorize(
    token: Option<&str>,
    session: Option<&UserSession>,
    codec: &TokenCodec,
    now: DateTime<Utc>,
) -> Result<AuthUser, AppError> {
    let token = match token.filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => {
            tracing::warn!("authorization header missing or empty");
            return Err(unauthorized());
        }
    };

    if session.is_none() {
        tracing::warn!("no active session for presented token");
        return Err(unauthorized());
    }

    let claims = match codec.validate(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = %err, "token validation failed");
            return Err(unauthorized());
        }
    };

    if claims.is_expired(now) {
        tracing::warn!(expires_at = claims.exp, "token expired");
        return Err(unauthorized());
    }

    Ok(AuthUser {
        username: claims.username,
        full_name: claims.full_name,
    })
}

fn unauthorized() -> AppError {
    AppError::Unauthorized("unauthorized".to_string())
}
