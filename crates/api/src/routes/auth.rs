use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Account routes mounted at `/auth`.
///
/// ```text
/// POST   /signup/                    -> signup
/// GET    /login/                     -> login_form
/// POST   /login/                     -> login
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/signup/", post(auth::signup))
        .route("/login/", get(auth::login_form).post(auth::login))
}
