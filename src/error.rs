//! Error types for Biblio server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::unimarc::{
    validation::FieldViolations, CatalogError, RecordValidationError, UnrecognizedFormat,
    ValidationErrors,
};

/// Numeric error codes returned in every error body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Success = 0,
    Failure = 1,
    DbFailure = 3,
    Duplicate = 8,
    BadValue = 18,
    NoSuchData = 20,
    InvalidReference = 22,
    SchemaViolation = 23,
    UnrecognizedFormat = 24,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown field tag(s): {}", .0.join(", "))]
    InvalidReference(Vec<String>),

    #[error("Duplicate name: {0}")]
    DuplicateName(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Field does not match its schema: {0}")]
    FieldSchema(#[from] ValidationErrors),

    #[error("Record does not match its schema ({} field(s))", .0.len())]
    RecordSchema(Vec<FieldViolations>),

    #[error("Unrecognized format: {0}")]
    UnrecognizedFormat(#[from] UnrecognizedFormat),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl From<RecordValidationError> for AppError {
    fn from(err: RecordValidationError) -> Self {
        match err {
            RecordValidationError::UnknownTags(tags) => AppError::InvalidReference(tags),
            RecordValidationError::Schema(fields) => AppError::RecordSchema(fields),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        AppError::Internal(format!("Field definition catalog is inconsistent: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub code: u32,
    pub error: String,
    pub message: String,
    /// Schema violations or unknown tags, when relevant
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        let (status, code, message, details) = match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorCode::NoSuchData, msg, None),
            AppError::InvalidReference(tags) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::InvalidReference,
                message,
                Some(serde_json::json!({ "unknownTags": tags })),
            ),
            AppError::DuplicateName(msg) => {
                (StatusCode::CONFLICT, ErrorCode::Duplicate, msg, None)
            }
            AppError::Validation(msg) | AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorCode::BadValue, msg, None)
            }
            AppError::FieldSchema(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::SchemaViolation,
                message,
                serde_json::to_value(&errors.violations).ok(),
            ),
            AppError::RecordSchema(fields) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::SchemaViolation,
                message,
                serde_json::to_value(&fields).ok(),
            ),
            AppError::UnrecognizedFormat(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorCode::UnrecognizedFormat,
                message,
                None,
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::DbFailure,
                    "Database error".to_string(),
                    None,
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorCode::Failure,
                    "Internal server error".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            code: code as u32,
            error: format!("{:?}", code),
            message,
            details,
        });

        (status, body).into_response()
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unimarc::{Violation, ViolationKind};

    #[test]
    fn test_status_codes() {
        let cases = [
            (AppError::NotFound("Template 4".into()), StatusCode::NOT_FOUND),
            (AppError::InvalidReference(vec!["999".into()]), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::DuplicateName("Livro".into()), StatusCode::CONFLICT),
            (AppError::Validation("empty".into()), StatusCode::BAD_REQUEST),
            (AppError::UnrecognizedFormat(UnrecognizedFormat), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_record_validation_error_conversion() {
        let err: AppError = RecordValidationError::UnknownTags(vec!["999".into()]).into();
        assert!(matches!(err, AppError::InvalidReference(ref tags) if tags == &["999"]));

        let err: AppError = ValidationErrors {
            violations: vec![Violation { code: 'a', kind: ViolationKind::MissingMandatorySubfield }],
        }
        .into();
        assert!(err.to_string().contains("mandatory subfield $a is missing"));
    }
}
