//! Typed errors and HTTP mapping.
//!
//! Two error envelopes reach clients: validation failures as
//! `{ "errors": [...] }` and everything else as `{ "error": "..." }`.

use crate::service::validation::FieldError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub const NOT_FOUND_MESSAGE: &str = "Producto No Encontrado";
const INTERNAL_MESSAGE: &str = "Error interno del servidor";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: &'static str, value: String },
    #[error("unknown store backend: {0} (expected postgres or memory)")]
    UnknownBackend(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed with {} error(s)", .0.len())]
    Validation(Vec<FieldError>),
    #[error("not found")]
    NotFound,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Envelope for rule failures collected by the validation gate.
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorBody {
    pub errors: Vec<FieldError>,
}

/// Envelope for every non-validation failure.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Producto No Encontrado")]
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ValidationErrorBody { errors }))
                    .into_response()
            }
            AppError::NotFound => {
                error_response(StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string())
            }
            AppError::BadRequest(message) => error_response(StatusCode::BAD_REQUEST, message),
            AppError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                error_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        }
    }
}

fn error_response(status: StatusCode, error: String) -> Response {
    (status, Json(ErrorBody { error })).into_response()
}
