use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::auth::AuthError;
use crate::models::response::ApiResponse;
use crate::validation::{field_messages, FieldError};

/// The one message a client sees for any bearer-token failure.
pub const UNAUTHORIZED_MESSAGE: &str = "Invalid or missing authorization token";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {}", field_messages(.0))]
    Validation(Vec<FieldError>),
    #[error("{0}")]
    BadRequest(String),
    #[error("email already registered")]
    DuplicateEmail,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("password hashing failed: {0}")]
    Hashing(#[from] argon2::password_hash::Error),
    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("upload failed: {0}")]
    Upload(#[from] std::io::Error),
    #[error("blocking task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected JSON body");
        AppError::BadRequest("Invalid request payload".to_string())
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::debug!(error = %rejection, "rejected multipart body");
        AppError::BadRequest("Invalid multipart payload".to_string())
    }
}

impl From<MultipartError> for AppError {
    fn from(inner: MultipartError) -> Self {
        tracing::debug!(error = %inner, "failed to read multipart field");
        AppError::BadRequest("Invalid multipart payload".to_string())
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Hashing(_)
            | AppError::Signing(_)
            | AppError::Sqlx(_)
            | AppError::Upload(_)
            | AppError::Task(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (message, data): (String, Value) = match &self {
            AppError::Validation(errors) => (field_messages(errors), json!({ "errors": errors })),
            AppError::BadRequest(msg) => (msg.clone(), json!({})),
            AppError::DuplicateEmail => ("Email ID already exists".to_string(), json!({})),
            AppError::InvalidCredentials => ("Invalid email or password".to_string(), json!({})),
            AppError::Auth(cause) => {
                tracing::debug!(%cause, "authorization failed");
                (UNAUTHORIZED_MESSAGE.to_string(), json!({}))
            }
            AppError::NotFound(what) => (format!("{what} not found"), json!({})),
            _ => {
                tracing::error!(error = %self, "request failed");
                ("Internal server error".to_string(), json!({}))
            }
        };

        (status, Json(ApiResponse::failure(message, data))).into_response()
    }
}
