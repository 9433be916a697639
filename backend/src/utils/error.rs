use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::{ErrorResponse, SaveSvgResponse};
use crate::services::{StoreError, llm::LLMError};

/// Client-facing message for every generation failure
pub const INVALID_REQUEST: &str = "Invalid request";

/// Error boundary shared by the generation endpoints
///
/// Every variant renders as `{"error": "Invalid request"}` with status 400;
/// the detailed cause only goes to the log.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error(transparent)]
    Llm(#[from] LLMError),
}

impl ApiError {
    pub fn invalid_body(message: impl Into<String>) -> Self {
        Self::InvalidBody(message.into())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::invalid_body(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("Error generating SVG: {}", self);
        let body = ErrorResponse { error: INVALID_REQUEST.to_string() };
        (StatusCode::BAD_REQUEST, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Errors of the record endpoints, rendered as `{"success": false, "error": ...}`
#[derive(Error, Debug)]
pub enum RecordApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// Any store failure while saving, whatever status the store answered with
    #[error(transparent)]
    Persist(StoreError),
}

impl RecordApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Store(_) | Self::Persist(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for RecordApiError {
    fn from(err: serde_json::Error) -> Self {
        RecordApiError::InvalidInput(err.to_string())
    }
}

impl From<validator::ValidationErrors> for RecordApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        RecordApiError::InvalidInput(err.to_string())
    }
}

impl IntoResponse for RecordApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Record store operation failed: {}", self);
        } else {
            tracing::warn!("Record request rejected: {}", self);
        }
        (status, Json(SaveSvgResponse::failed(self.to_string()))).into_response()
    }
}

pub type RecordResult<T> = Result<T, RecordApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::{Value, json};

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_generation_errors_collapse_to_invalid_request() {
        for err in [
            ApiError::invalid_body("expected array"),
            ApiError::Llm(LLMError::Timeout("60s".into())),
            ApiError::Llm(LLMError::ParseError("eof".into())),
        ] {
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            assert_eq!(body_json(response).await, json!({"error": "Invalid request"}));
        }
    }

    #[tokio::test]
    async fn test_store_failure_is_500_with_message() {
        let err = RecordApiError::from(StoreError::Rejected {
            status: 400,
            message: "Failed to create record.".into(),
        });
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({"success": false, "error": "Failed to create record."})
        );
    }

    #[test]
    fn test_record_error_status() {
        assert_eq!(
            RecordApiError::from(StoreError::NotFound("gone".into())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            RecordApiError::InvalidInput("bad".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            RecordApiError::from(StoreError::Connection("refused".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            RecordApiError::Persist(StoreError::NotFound("Missing collection context.".into()))
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
