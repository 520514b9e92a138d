use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"error": "<message>"}`. Only `Validation` is a
/// client error; everything else is a 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Invalid multipart upload: {0}")]
    Multipart(#[from] MultipartError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Extraction(e) => {
                tracing::error!("Extraction error: {e}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Multipart(e) => {
                tracing::error!("Multipart error ({}): {e}", e.status());
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({ "error": self.to_string() }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use serde_json::Value;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_is_bad_request() {
        let (status, body) = render(AppError::Validation("Invalid job ID".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "Invalid job ID"}));
    }

    #[tokio::test]
    async fn test_extraction_is_server_error_with_message() {
        let err = AppError::from(ExtractionError::Pdf("bad xref".to_string()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "PDF extraction failed: bad xref");
    }

    #[tokio::test]
    async fn test_config_is_server_error() {
        let (status, body) = render(AppError::Config("key missing".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "key missing");
    }
}
