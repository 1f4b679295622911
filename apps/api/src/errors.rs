use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::fill::FillError;
use crate::transcript::TranscriptError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unprocessable entity: {0}")]
    UnprocessableEntity(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<FillError> for AppError {
    fn from(e: FillError) -> Self {
        match e {
            FillError::FatalInput(_) | FillError::Transcript(_) => {
                AppError::UnprocessableEntity(e.to_string())
            }
            FillError::Output(_) | FillError::Task(_) => AppError::Internal(e.into()),
        }
    }
}

impl From<TranscriptError> for AppError {
    fn from(e: TranscriptError) -> Self {
        AppError::UnprocessableEntity(e.to_string())
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        AppError::UnprocessableEntity(e.to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        AppError::Validation(format!("Invalid multipart upload: {}", e.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnprocessableEntity(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNPROCESSABLE_ENTITY",
                msg.clone(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::DocxError;

    #[test]
    fn test_fill_errors_map_to_status() {
        let fatal: AppError = FillError::FatalInput(DocxError::MissingPart("word/document.xml".into())).into();
        assert_eq!(fatal.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);

        let output: AppError = FillError::Task("join error".into()).into();
        assert_eq!(output.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_conflict_status() {
        let err = AppError::Conflict("Report is still running".into());
        assert_eq!(err.into_response().status(), StatusCode::CONFLICT);
    }
}
