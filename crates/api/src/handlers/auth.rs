//! Handlers for the `/auth` resource (signup, login).

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use quill_core::error::CoreError;
use quill_core::forms::{self, SignupForm};
use quill_db::models::user::{CreateUser, UserResponse};
use quill_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use super::{validation_error, FormView};
use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::query::NextParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/login/`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}

/// Successful login response.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

/// The login page: an empty form and where to go afterwards.
#[derive(Debug, Serialize)]
pub struct LoginFormView {
    pub form: FormView<LoginRequest>,
    pub next: Option<String>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /auth/signup/
///
/// Register a regular (non-staff) account. A taken username is a 409.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupForm>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    forms::check(&input).map_err(|errors| validation_error(&errors))?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            is_staff: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, username = %user.username, "User signed up");

    Ok((StatusCode::CREATED, DataResponse::json(UserResponse::from(user))))
}

/// GET /auth/login/
///
/// Where login-only pages send anonymous visitors.
pub async fn login_form(Query(params): Query<NextParams>) -> Json<DataResponse<LoginFormView>> {
    DataResponse::json(LoginFormView {
        form: FormView::unbound(LoginRequest::default()),
        next: params.next,
    })
}

/// POST /auth/login/
///
/// Authenticate with username + password and issue an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid username or password".into(),
        ))
    };

    let user = UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(username = %input.username, "Failed login");
        return Err(invalid());
    }

    let access_token =
        generate_access_token(user.id, &user.username, user.is_staff, &state.config.jwt)
            .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(AuthResponse {
        access_token,
        expires_in: state.config.jwt.expires_in_secs(),
        user: UserResponse::from(user),
    }))
}
