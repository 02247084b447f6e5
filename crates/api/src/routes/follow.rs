//! Route definitions for following authors.

use axum::routing::get;
use axum::Router;

use crate::handlers::follow;
use crate::state::AppState;

/// ```text
/// GET    /follow/                          -> follow_index
/// GET    /profile/{username}/follow/       -> profile_follow
/// GET    /profile/{username}/unfollow/     -> profile_unfollow
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/follow/", get(follow::follow_index))
        .route("/profile/{username}/follow/", get(follow::profile_follow))
        .route(
            "/profile/{username}/unfollow/",
            get(follow::profile_unfollow),
        )
}
