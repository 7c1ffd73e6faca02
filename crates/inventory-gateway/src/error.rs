use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use inventory_core::{FieldIssue, InvalidProductId, IssueCode, StorageError, ValidationError};
use thiserror::Error;
use tracing::error;

use crate::model::{ErrorResponse, INTERNAL_ERROR, INVALID_ID, NOT_FOUND};

pub type Result<T> = std::result::Result<T, AppError>;

/// Every way a request can fail, with its HTTP mapping:
///
/// | variant | status | body |
/// |---|---|---|
/// | `Validation`, `MalformedBody` | 400 | `{"error": [issues]}` |
/// | `InvalidId` | 400 | `{"error": "Id inválido"}` |
/// | `NotFound` | 404 | `{"error": "No encontrado"}` |
/// | `Storage` | 500 | `{"error": "Error interno"}` |
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("request body is not valid JSON: {0}")]
    MalformedBody(String),
    #[error(transparent)]
    InvalidId(#[from] InvalidProductId),
    #[error("resource not found")]
    NotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(err) => {
                let body = ErrorResponse::new(err.into_issues());
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::MalformedBody(message) => {
                let issue = FieldIssue::body(IssueCode::InvalidJson, message);
                let body = ErrorResponse::new(vec![issue]);
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::InvalidId(_) => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(INVALID_ID))).into_response()
            }
            AppError::NotFound => {
                (StatusCode::NOT_FOUND, Json(ErrorResponse::new(NOT_FOUND))).into_response()
            }
            AppError::Storage(err) => {
                // the cause stays in the server log; clients only see a generic message
                error!(error = %err, "storage operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::new(INTERNAL_ERROR)),
                )
                    .into_response()
            }
        }
    }
}
