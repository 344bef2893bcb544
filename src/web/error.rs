use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::broker::BrokerError;
use crate::services::encryption_service::EncryptionError;
use crate::web::middleware::i18n::{current_locale, DEFAULT_LOCALE};
use crate::web::validation::FieldErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),
    #[error("Broker rejected the credentials")]
    BrokerAuthenticationFailed,
    #[error("Broker credentials are not linked")]
    CredentialsRequired,
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("User not found")]
    UserNotFound,
    #[error("User already exists")]
    UserAlreadyExists,
    #[error("Password hashing failed: {0}")]
    PasswordHashingError(String),
    #[error("JWT creation failed: {0}")]
    TokenCreationError(String),
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Broker error: {0}")]
    BrokerError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidInput(_)
            | AppError::Validation(_)
            | AppError::BrokerAuthenticationFailed
            | AppError::CredentialsRequired => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::UserNotFound => StatusCode::NOT_FOUND,
            AppError::UserAlreadyExists => StatusCode::CONFLICT,
            AppError::PasswordHashingError(_)
            | AppError::TokenCreationError(_)
            | AppError::DatabaseError(_)
            | AppError::BrokerError(_)
            | AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let locale = current_locale();
        let body = match self {
            AppError::InvalidInput(msg) => serde_json::json!({ "error": msg }),
            AppError::Validation(fields) => serde_json::json!({
                "error": t!("errors.validation", locale = &locale).to_string(),
                "fields": fields,
            }),
            // The broker rejection message is always the Portuguese one.
            AppError::BrokerAuthenticationFailed => serde_json::json!({
                "error": t!("errors.broker_authentication_failed", locale = DEFAULT_LOCALE).to_string()
            }),
            AppError::CredentialsRequired => {
                serde_json::json!({ "error": t!("errors.credentials_required", locale = &locale).to_string() })
            }
            AppError::Unauthorized => {
                serde_json::json!({ "error": t!("errors.unauthorized", locale = &locale).to_string() })
            }
            AppError::InvalidCredentials => {
                serde_json::json!({ "error": t!("errors.invalid_login", locale = &locale).to_string() })
            }
            AppError::UserNotFound => {
                serde_json::json!({ "error": t!("errors.user_not_found", locale = &locale).to_string() })
            }
            AppError::UserAlreadyExists => {
                serde_json::json!({ "error": t!("errors.email_in_use", locale = &locale).to_string() })
            }
            internal => {
                error!(error = %internal, "Request failed with an internal error.");
                serde_json::json!({ "error": t!("errors.unexpected", locale = &locale).to_string() })
            }
        };
        (status, Json(body)).into_response()
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

impl From<BrokerError> for AppError {
    fn from(err: BrokerError) -> Self {
        AppError::BrokerError(err.to_string())
    }
}

impl From<EncryptionError> for AppError {
    fn from(err: EncryptionError) -> Self {
        AppError::InternalServerError(err.to_string())
    }
}

impl From<FieldErrors> for AppError {
    fn from(fields: FieldErrors) -> Self {
        AppError::Validation(fields)
    }
}
