pub mod admin;
pub mod auth;
pub mod follow;
pub mod health;
pub mod posts;

use std::sync::Arc;

use axum::Router;

use crate::cache::ResponseCache;
use crate::state::AppState;

/// Build the site route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                                   index (cached)
/// /group/{slug}/                      group listing
/// /profile/{username}/                author profile
/// /profile/{username}/follow/         follow (login)
/// /profile/{username}/unfollow/       unfollow (login)
/// /follow/                            followed-authors feed (login)
/// /create/                            create form, submit (login)
/// /posts/{post_id}/                   detail, comment preview (login)
/// /posts/{post_id}/edit/              edit form, submit (author)
/// /posts/{post_id}/comment/           add comment (login)
///
/// /auth/signup/                       register
/// /auth/login/                        login form, token issue
///
/// /admin/groups/                      create group (staff)
/// /admin/cache/clear                  clear response cache (staff)
/// ```
pub fn app_routes(cache: Arc<ResponseCache>) -> Router<AppState> {
    Router::new()
        .merge(posts::index_router(cache))
        .merge(posts::router())
        .merge(follow::router())
        .nest("/auth", auth::router())
        .nest("/admin", admin::router())
}
