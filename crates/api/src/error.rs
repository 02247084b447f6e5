//! HTTP error type.
//!
//! Every failure leaves a handler as an [`AppError`] and reaches the client
//! as `{"error": <message>, "code": <CODE>}` with a matching status.
//! Details of server-side failures are logged, never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quill_core::error::CoreError;
use serde::Serialize;

/// Postgres SQLSTATE for `unique_violation`.
const UNIQUE_VIOLATION: &str = "23505";

const HIDDEN_MESSAGE: &str = "An internal error occurred";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request body or parameters.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// Wire shape of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

impl AppError {
    /// 404 for an entity looked up by a natural key (slug, username, path).
    pub fn not_found_by_key(entity: &'static str, key: impl Into<String>) -> Self {
        CoreError::NotFoundByKey {
            entity,
            key: key.into(),
        }
        .into()
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Core(core) => match core {
                CoreError::NotFound { .. } | CoreError::NotFoundByKey { .. } => {
                    StatusCode::NOT_FOUND
                }
                CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
            },
            AppError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            AppError::Database(err) if unique_constraint(err).is_some() => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self.status() {
            StatusCode::NOT_FOUND => "NOT_FOUND",
            StatusCode::CONFLICT => "CONFLICT",
            StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
            StatusCode::FORBIDDEN => "FORBIDDEN",
            StatusCode::BAD_REQUEST => match self {
                AppError::Core(CoreError::Validation(_)) => "VALIDATION_ERROR",
                _ => "BAD_REQUEST",
            },
            _ => "INTERNAL_ERROR",
        }
    }

    /// Client-facing message.
    fn public_message(&self) -> String {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => {
                format!("{entity} with id {id} not found")
            }
            AppError::Core(CoreError::NotFoundByKey { entity, key }) => {
                format!("{entity} '{key}' not found")
            }
            AppError::Core(
                CoreError::Validation(msg)
                | CoreError::Unauthorized(msg)
                | CoreError::Forbidden(msg),
            ) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
            AppError::Database(sqlx::Error::RowNotFound) => "Resource not found".to_string(),
            AppError::Database(err) => match unique_constraint(err) {
                Some(constraint) => {
                    format!("Duplicate value violates unique constraint: {constraint}")
                }
                None => HIDDEN_MESSAGE.to_string(),
            },
            AppError::InternalError(_) => HIDDEN_MESSAGE.to_string(),
        }
    }
}

/// Name of the violated `uq_*` constraint, if `err` is one.
///
/// Only constraints following the `uq_` naming convention map to 409;
/// other unique violations are treated as bugs.
fn unique_constraint(err: &sqlx::Error) -> Option<&str> {
    let db_err = err.as_database_error()?;
    if db_err.code().as_deref() != Some(UNIQUE_VIOLATION) {
        return None;
    }
    db_err.constraint().filter(|name| name.starts_with("uq_"))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.public_message(),
            code: self.code(),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_errors_keep_their_message() {
        let err = AppError::from(CoreError::Forbidden("Staff only".into()));
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
        assert_eq!(err.code(), "FORBIDDEN");
        assert_eq!(err.public_message(), "Staff only");
    }

    #[test]
    fn validation_and_bad_request_differ_in_code() {
        let validation = AppError::from(CoreError::Validation("text: required".into()));
        let bad = AppError::BadRequest("bad multipart".into());
        assert_eq!(validation.status(), bad.status());
        assert_eq!(validation.code(), "VALIDATION_ERROR");
        assert_eq!(bad.code(), "BAD_REQUEST");
    }

    #[test]
    fn not_found_by_key_names_the_key() {
        let err = AppError::not_found_by_key("Group", "cats");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.public_message(), "Group 'cats' not found");
    }

    #[test]
    fn internal_details_are_hidden() {
        let err = AppError::InternalError("disk on fire".into());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), HIDDEN_MESSAGE);

        let missing = AppError::from(sqlx::Error::RowNotFound);
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }
}
