/*
 * Responsibility
 * - Shared AppError definition
 * - IntoResponse implementation (HTTP status / JSON error body)
 * - Mapping of OAuth / upstream failures into gateway errors
 */
use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::oauth::OAuthError;

/// Body of every 401 produced by this service. Clients match on it verbatim.
pub const UNAUTHORIZED_BODY: &str = r#"{"status": "unauthorized"}"#;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("payload too large")]
    PayloadTooLarge,
    // Detail is logged, never sent to the caller.
    #[error("bad gateway: {0}")]
    BadGateway(String),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn bad_gateway(detail: impl std::fmt::Display) -> Self {
        Self::BadGateway(detail.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized => {
                return (
                    StatusCode::UNAUTHORIZED,
                    [(header::CONTENT_TYPE, "application/json")],
                    UNAUTHORIZED_BODY,
                )
                    .into_response();
            }
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "request body too large".into(),
            ),
            AppError::BadGateway(detail) => {
                tracing::warn!(detail = %detail, "upstream request failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "BAD_GATEWAY",
                    "upstream request failed".into(),
                )
            }
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<OAuthError> for AppError {
    fn from(e: OAuthError) -> Self {
        match e {
            // The user has to log in again.
            OAuthError::Expired => AppError::Unauthorized,
            other => AppError::bad_gateway(other),
        }
    }
}
