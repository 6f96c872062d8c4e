//! Error type returned by every handler.
//!
//! All error responses share the body `{"message": "..."}`. Internal errors
//! are logged and replaced by a generic message before reaching the client.

use axum::Json;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tax_core::{RepositoryError, ValidationError};
use tax_data::CsvBatchError;
use thiserror::Error;

/// JSON error response body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed request: bad JSON, missing multipart field, unreadable CSV (400).
    #[error("{0}")]
    BadRequest(String),

    /// Input rejected by validation (400).
    #[error("{0}")]
    Validation(String),

    /// Missing or wrong admin credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Resource not found (404).
    #[error("{0}")]
    NotFound(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            Self::Internal(_) => {
                tracing::error!(error = %self, "internal server error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorBody { message });

        if matches!(self, Self::Unauthorized(_)) {
            return (
                status,
                [(header::WWW_AUTHENTICATE, r#"Basic realm="admin""#)],
                body,
            )
                .into_response();
        }

        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<CsvBatchError> for AppError {
    fn from(err: CsvBatchError) -> Self {
        match err {
            CsvBatchError::InvalidRow { .. } => Self::Validation(err.to_string()),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("allowance ceiling not found".to_string()),
            other => Self::Internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[test]
    fn status_codes() {
        assert_eq!(AppError::BadRequest("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Validation("x".into()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::Unauthorized("x".into()).status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Internal("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_error_converts_to_400() {
        let err: AppError = ValidationError::PersonalDeductionTooLow(dec!(5)).into();

        assert!(matches!(err, AppError::Validation(ref msg) if msg.contains("10000")));
    }

    #[test]
    fn csv_header_error_converts_to_bad_request() {
        let err: AppError = CsvBatchError::InvalidHeader.into();

        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn repository_errors_convert() {
        let not_found: AppError = RepositoryError::NotFound.into();
        let db: AppError = RepositoryError::Database("disk I/O error".into()).into();

        assert!(matches!(not_found, AppError::NotFound(_)));
        assert!(matches!(db, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn internal_error_hides_details() {
        let response = AppError::Internal("secret db path".into()).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["message"], "An internal error occurred");
    }

    #[tokio::test]
    async fn unauthorized_sets_challenge_header() {
        let response = AppError::Unauthorized("missing credentials".into()).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            r#"Basic realm="admin""#
        );
        let body = body_json(response).await;
        assert_eq!(body["message"], "missing credentials");
    }
}
