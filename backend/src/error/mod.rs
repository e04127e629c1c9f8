use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{response::ApiResponse, utils::jwt::TokenError};

#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Conflict(String),
    BadRequest(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let envelope = match self {
            AppError::NotFound(msg) => ApiResponse::failure(StatusCode::NOT_FOUND, msg),
            AppError::Unauthorized(msg) => ApiResponse::failure(StatusCode::UNAUTHORIZED, msg),
            AppError::Conflict(msg) => ApiResponse::failure(StatusCode::CONFLICT, msg),
            AppError::BadRequest(msg) => ApiResponse::failure(StatusCode::BAD_REQUEST, msg),
            AppError::InternalServerError(err) => {
                tracing::error!("internal server error: {:?}", err);
                ApiResponse::failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an error occurred in the system",
                )
            }
            AppError::Validation(errors) => ApiResponse::failure_with_details(
                StatusCode::BAD_REQUEST,
                "validation failed",
                json!({ "errors": errors }),
            ),
        };

        envelope.into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("resource not found".to_string()),
            _ => AppError::InternalServerError(err.into()),
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            // A bad token from a client is an auth failure; everything
            // else means our signing setup is broken.
            TokenError::Invalid(_) => AppError::Unauthorized("unauthorized".to_string()),
            other => AppError::InternalServerError(other.into()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(message) => format!("{}: {}", field, message),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        AppError::Validation(messages)
    }
}
