use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use registration_schema::payloads::{ErrorResponse, FieldError};
use thiserror::Error;

use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload")]
    MalformedPayload,

    #[error("Validation error")]
    Validation(Vec<FieldError>),

    #[error("Email already registered. Only one registration per email is allowed.")]
    DuplicateEmail,

    #[error("Internal server error")]
    InternalError(#[from] Box<dyn std::error::Error + Send + Sync>),
}

impl From<StorageError> for AppError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::DuplicateEmail => AppError::DuplicateEmail,
            other => AppError::InternalError(Box::new(other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match self {
            AppError::MalformedPayload
            | AppError::Validation { .. }
            | AppError::DuplicateEmail => StatusCode::BAD_REQUEST,
            AppError::InternalError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = self.to_string();
        let errors = match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        };

        (status, Json(ErrorResponse { message, errors })).into_response()
    }
}
