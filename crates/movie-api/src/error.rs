//! HTTP error mapping

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use validator::ValidationErrors;

use movie_core::DomainError;

use crate::response::{ApiResponse, ErrorBody, MovieView};

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Submitted input is echoed back so the client can redisplay it.
    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, Vec<String>>,
        input: Option<Value>,
    },

    #[error("Conflict: {message}")]
    Conflict {
        code: &'static str,
        message: String,
        data: Option<Value>,
    },

    #[error("Too many requests")]
    TooManyRequests,

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// Attach the submitted form to a validation failure.
    pub fn with_input<T: Serialize>(self, input: &T) -> Self {
        match self {
            ApiError::Validation { message, fields, .. } => ApiError::Validation {
                message,
                fields,
                input: serde_json::to_value(input).ok(),
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Conflict { .. } => StatusCode::CONFLICT,
            ApiError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,
            ApiError::DatabaseError(_) | ApiError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MovieNotFound(_) | DomainError::MovieIdMismatch { .. } => {
                ApiError::NotFound(err.to_string())
            }

            DomainError::InvalidCredentials | DomainError::InvalidToken(_) => {
                ApiError::Unauthorized(err.to_string())
            }

            DomainError::Forbidden { .. } => ApiError::Forbidden(err.to_string()),

            DomainError::Validation(ref errors) => ApiError::Validation {
                message: "The submitted form has errors".to_string(),
                fields: field_errors(errors),
                input: None,
            },

            DomainError::PasswordTooShort
            | DomainError::PasswordTooLong
            | DomainError::PasswordTooWeak => {
                let mut fields = BTreeMap::new();
                fields.insert("password".to_string(), vec![err.to_string()]);
                ApiError::Validation {
                    message: "The submitted form has errors".to_string(),
                    fields,
                    input: None,
                }
            }

            DomainError::EmailAlreadyExists(_) => ApiError::Conflict {
                code: "EMAIL_EXISTS",
                message: err.to_string(),
                data: None,
            },
            DomainError::DisplayNameAlreadyExists(_) => ApiError::Conflict {
                code: "DISPLAY_NAME_EXISTS",
                message: err.to_string(),
                data: None,
            },

            DomainError::MovieNotDeletable { movie } => {
                let message = movie.not_deletable_message();
                ApiError::Conflict {
                    code: "MOVIE_NOT_DELETABLE",
                    message,
                    data: serde_json::to_value(MovieView::from(*movie)).ok(),
                }
            }

            DomainError::DatabaseError(msg) => ApiError::DatabaseError(msg),

            DomainError::ConcurrencyConflict(_)
            | DomainError::PasswordHashError(_)
            | DomainError::TokenGenerationError(_)
            | DomainError::InternalError(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message, fields, data) = match self {
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                ("UNAUTHORIZED", "Authentication required".to_string(), BTreeMap::new(), None)
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                ("FORBIDDEN", msg, BTreeMap::new(), None)
            }
            ApiError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                ("NOT_FOUND", msg, BTreeMap::new(), None)
            }
            ApiError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                ("BAD_REQUEST", msg, BTreeMap::new(), None)
            }
            ApiError::Validation { message, fields, input } => {
                tracing::debug!(fields = ?fields.keys().collect::<Vec<_>>(), "Validation failed");
                ("VALIDATION_ERROR", message, fields, input)
            }
            ApiError::Conflict { code, message, data } => {
                tracing::warn!("Conflict: {}", message);
                (code, message, BTreeMap::new(), data)
            }
            ApiError::TooManyRequests => {
                tracing::warn!("Rate limit exceeded");
                ("TOO_MANY_REQUESTS", "Too many attempts, try again later".to_string(), BTreeMap::new(), None)
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                ("DATABASE_ERROR", "An internal error occurred".to_string(), BTreeMap::new(), None)
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("INTERNAL_ERROR", "An internal error occurred".to_string(), BTreeMap::new(), None)
            }
        };

        let body = ApiResponse::rejected(
            data,
            ErrorBody {
                code: code.to_string(),
                message,
                fields,
            },
        );

        (status, Json(body)).into_response()
    }
}
