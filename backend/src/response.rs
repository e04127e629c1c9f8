//! JSON envelope shared by every endpoint, success and failure alike.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: u16,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        ApiResponse {
            status: StatusCode::OK.as_u16(),
            message: "success".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<Value> {
    /// Success without a payload, e.g. logout.
    pub fn ok() -> Self {
        ApiResponse {
            status: StatusCode::OK.as_u16(),
            message: "success".to_string(),
            data: None,
        }
    }

    pub fn failure(status: StatusCode, message: impl Into<String>) -> Self {
        ApiResponse {
            status: status.as_u16(),
            message: message.into(),
            data: None,
        }
    }

    pub fn failure_with_details(
        status: StatusCode,
        message: impl Into<String>,
        details: Value,
    ) -> Self {
        ApiResponse {
            status: status.as_u16(),
            message: message.into(),
            data: Some(details),
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
