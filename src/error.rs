//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing reference: {kind} '{id}'")]
    MissingReference { kind: &'static str, id: String },
    #[error("duplicate resource name: {0}")]
    DuplicateResource(String),
    #[error("resource {resource} has no id field")]
    MissingId { resource: String },
    #[error("resource {resource}: {detail}")]
    ShapeMismatch { resource: String, detail: String },
    #[error("setting {name}: {detail}")]
    Setting { name: &'static str, detail: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Permission(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("database: {0}")]
    Storage(sqlx::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        let code = e
            .as_database_error()
            .and_then(|d| d.code())
            .map(|c| c.into_owned());
        match code.as_deref() {
            Some(UNIQUE_VIOLATION) => AppError::Conflict(constraint_message(&e, "already exists")),
            Some(FOREIGN_KEY_VIOLATION) => {
                AppError::Validation(constraint_message(&e, "references a missing record"))
            }
            _ => AppError::Storage(e),
        }
    }
}

fn constraint_message(e: &sqlx::Error, what: &str) -> String {
    match e.as_database_error().and_then(|d| d.constraint()) {
        Some(constraint) => format!("{}: {}", constraint, what),
        None => what.to_string(),
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Permission(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Storage(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            tracing::debug!(status = status.as_u16(), error = %self, "request rejected");
            self.to_string()
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
