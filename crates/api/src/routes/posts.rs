//! Route definitions for post pages.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;

use crate::cache::{cache_response, ResponseCache};
use crate::handlers::posts;
use crate::state::AppState;

/// The index page, wrapped in the response cache.
///
/// ```text
/// GET    /                           -> index
/// ```
pub fn index_router(cache: Arc<ResponseCache>) -> Router<AppState> {
    Router::new()
        .route("/", get(posts::index))
        .route_layer(middleware::from_fn_with_state(cache, cache_response))
}

/// Uncached post pages.
///
/// ```text
/// GET    /group/{slug}/              -> group_posts
/// GET    /profile/{username}/        -> profile
/// GET    /create/                    -> create_form
/// POST   /create/                    -> create
/// GET    /posts/{post_id}/           -> post_detail
/// POST   /posts/{post_id}/           -> post_detail_submit
/// GET    /posts/{post_id}/edit/      -> edit_form
/// POST   /posts/{post_id}/edit/      -> edit
/// POST   /posts/{post_id}/comment/   -> add_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/group/{slug}/", get(posts::group_posts))
        .route("/profile/{username}/", get(posts::profile))
        .route("/create/", get(posts::create_form).post(posts::create))
        .route(
            "/posts/{post_id}/",
            get(posts::post_detail).post(posts::post_detail_submit),
        )
        .route(
            "/posts/{post_id}/edit/",
            get(posts::edit_form).post(posts::edit),
        )
        .route("/posts/{post_id}/comment/", post(posts::add_comment))
}
