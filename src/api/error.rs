//! HTTP error handling and response formatting.
//!
//! [`AppError`] wraps [`TableError`] and implements Axum's `IntoResponse`
//! so every endpoint reports failures with the same JSON body.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::libs::TableError;

/// JSON error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Machine-readable error code.
    pub code: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            error: error.into(),
        }
    }
}

#[derive(Debug)]
pub struct AppError(pub TableError);

impl From<TableError> for AppError {
    fn from(e: TableError) -> Self {
        AppError(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError(TableError::InvalidInput(e.body_text()))
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for AppError {}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            TableError::InvalidInput(_)
            | TableError::InvalidFieldType(_)
            | TableError::InvalidFieldValue { .. }
            | TableError::ColumnAdditionFailed { .. }
            | TableError::RowInsertFailed(_) => StatusCode::BAD_REQUEST,
            TableError::TableNotFound(_) => StatusCode::NOT_FOUND,
            TableError::DuplicateTable(_) | TableError::DuplicateColumn { .. } => {
                StatusCode::CONFLICT
            }
            TableError::UnsupportedColumnType { .. }
            | TableError::TableCreationFailed(_)
            | TableError::RowFetchFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(code = self.0.code(), "{}", self.0);
        } else {
            tracing::debug!(code = self.0.code(), "{}", self.0);
        }
        let body = Json(ErrorResponse::new(self.0.code(), self.0.to_string()));
        (status, body).into_response()
    }
}
