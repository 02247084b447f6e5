//! Request handlers.
//!
//! Page handlers return JSON view models wrapped in [`DataResponse`]; form
//! submissions answer with a `303 See Other` redirect on success and with the
//! re-rendered form view (values plus field errors) on failure.
//!
//! [`DataResponse`]: crate::response::DataResponse

pub mod admin;
pub mod auth;
pub mod follow;
pub mod posts;

use quill_core::error::CoreError;
use quill_core::forms::FieldErrors;
use quill_db::models::user::User;
use quill_db::repositories::UserRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Submitted (or initial) form values together with their errors.
#[derive(Debug, Serialize)]
pub struct FormView<T: Serialize> {
    pub values: T,
    pub errors: FieldErrors,
}

impl<T: Serialize> FormView<T> {
    pub fn unbound(values: T) -> Self {
        Self {
            values,
            errors: FieldErrors::new(),
        }
    }

    pub fn bound(values: T, errors: FieldErrors) -> Self {
        Self { values, errors }
    }
}

/// Load a user by username or fail with 404.
pub(crate) async fn user_or_404(state: &AppState, username: &str) -> AppResult<User> {
    UserRepo::find_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| AppError::not_found_by_key("User", username))
}

/// Collapse field errors into a single 400 for JSON endpoints.
pub(crate) fn validation_error(errors: &FieldErrors) -> AppError {
    let message = errors
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(" ")))
        .collect::<Vec<_>>()
        .join("; ");
    AppError::Core(CoreError::Validation(message))
}
