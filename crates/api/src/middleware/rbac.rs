//! Staff-only guard for the admin surface.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use quill_core::error::CoreError;

use super::auth::{resolve_user, AuthUser};
use crate::error::AppError;
use crate::state::AppState;

/// Requires a logged-in staff member. Rejects with 401 when anonymous and
/// 403 when the actor is not staff.
///
/// ```ignore
/// async fn admin_only(RequireStaff(admin): RequireStaff) -> AppResult<StatusCode> {
///     Ok(StatusCode::NO_CONTENT)
/// }
/// ```
pub struct RequireStaff(pub AuthUser);

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = resolve_user(parts, state).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "A valid Bearer token is required".into(),
            ))
        })?;
        if !user.is_staff {
            return Err(AppError::Core(CoreError::Forbidden(
                "Staff account required".into(),
            )));
        }
        Ok(RequireStaff(user))
    }
}
