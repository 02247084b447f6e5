//! JWT-based login guards for Axum handlers.

use std::convert::Infallible;

use axum::extract::{FromRequestParts, OriginalUri};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use quill_core::site::login_redirect;
use quill_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::state::AppState;

/// The actor behind a request, taken from a valid Bearer token.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub username: String,
    pub is_staff: bool,
}

/// Resolve the actor from the `Authorization: Bearer <token>` header.
///
/// A missing header, a malformed header and an invalid or expired token all
/// mean "anonymous".
pub fn resolve_user(parts: &Parts, state: &AppState) -> Option<AuthUser> {
    let header = parts.headers.get("authorization")?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?;
    let claims = validate_token(token, &state.config.jwt)
        .map_err(|e| tracing::debug!(error = %e, "Rejected access token"))
        .ok()?;
    Some(AuthUser {
        user_id: claims.sub,
        username: claims.username,
        is_staff: claims.is_staff,
    })
}

/// Rejection of [`RequireLogin`]: a redirect to the login page carrying the
/// original path as `?next=`.
#[derive(Debug)]
pub struct LoginRedirect {
    pub next: String,
}

impl IntoResponse for LoginRedirect {
    fn into_response(self) -> Response {
        Redirect::to(&login_redirect(&self.next)).into_response()
    }
}

/// Requires a logged-in actor.
///
/// ```ignore
/// async fn create(RequireLogin(user): RequireLogin) -> AppResult<Redirect> {
///     tracing::info!(user_id = user.user_id, "creating");
///     Ok(Redirect::to("/"))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireLogin(pub AuthUser);

impl FromRequestParts<AppState> for RequireLogin {
    type Rejection = LoginRedirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_user(parts, state) {
            Some(user) => Ok(RequireLogin(user)),
            None => {
                let uri = parts
                    .extensions
                    .get::<OriginalUri>()
                    .map(|o| &o.0)
                    .unwrap_or(&parts.uri);
                let next = uri
                    .path_and_query()
                    .map(|pq| pq.as_str().to_string())
                    .unwrap_or_else(|| uri.path().to_string());
                tracing::debug!(%next, "Anonymous request to login-only page");
                Err(LoginRedirect { next })
            }
        }
    }
}

/// The actor if there is one; never rejects.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthUser>);

impl MaybeUser {
    pub fn user_id(&self) -> Option<DbId> {
        self.0.as_ref().map(|u| u.user_id)
    }
}

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(MaybeUser(resolve_user(parts, state)))
    }
}
