//! Response envelope and error mapping
//!
//! Every endpoint answers with `{ success, message, error, data }`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};

use crate::service::ServiceError;

/// JSON envelope shared by every endpoint
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            error: None,
            data: Some(data),
        })
    }
}

impl ApiResponse<()> {
    /// Success without a payload
    pub fn done(message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            error: None,
            data: None,
        })
    }

    fn failure(reason: String) -> Self {
        Self {
            success: false,
            message: String::new(),
            error: Some(reason),
            data: None,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of a request handler
#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    /// The request body was not a JSON document
    Body(JsonRejection),
    /// The blocking task running the operation did not complete
    Internal(String),
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(err: JsonRejection) -> Self {
        ApiError::Body(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, reason) = match &self {
            ApiError::Service(e) => {
                let status =
                    StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if e.is_client_error() {
                    warn!(status = status.as_u16(), reason = %e, "request rejected");
                } else {
                    error!(status = status.as_u16(), error = ?e, "request failed");
                }
                (status, e.public_reason())
            }
            ApiError::Body(rejection) => {
                let status = rejection.status();
                warn!(status = status.as_u16(), reason = %rejection.body_text(), "request body rejected");
                (status, rejection.body_text())
            }
            ApiError::Internal(detail) => {
                error!(detail = %detail, "request task failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal error".to_string())
            }
        };

        (status, Json(ApiResponse::failure(reason))).into_response()
    }
}
