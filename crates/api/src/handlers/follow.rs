//! Handlers for the follow feed and follow / unfollow actions.

use axum::extract::{Path, Query, State};
use axum::response::Redirect;
use axum::Json;
use quill_core::follow::{follow_action, FollowAction};
use quill_core::pagination::PageOf;
use quill_core::site::{FOLLOW_INDEX_PATH, POSTS_PER_PAGE};
use quill_db::models::post::{PostFilter, PostView};
use quill_db::repositories::{FollowRepo, PostRepo};
use serde::Serialize;

use super::user_or_404;
use crate::error::AppResult;
use crate::middleware::auth::RequireLogin;
use crate::query::PageParams;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FollowIndexView {
    pub page_obj: PageOf<PostView>,
}

/// GET /follow/
///
/// Posts by every author the viewer follows, newest first.
pub async fn follow_index(
    RequireLogin(user): RequireLogin,
    State(state): State<AppState>,
    Query(params): Query<PageParams>,
) -> AppResult<Json<DataResponse<FollowIndexView>>> {
    let page_obj = PostRepo::list_page(
        &state.pool,
        PostFilter::FollowedBy(user.user_id),
        params.raw(),
        POSTS_PER_PAGE,
    )
    .await?;
    Ok(DataResponse::json(FollowIndexView { page_obj }))
}

/// GET /profile/{username}/follow/
///
/// Idempotent. Following yourself is silently ignored.
pub async fn profile_follow(
    RequireLogin(user): RequireLogin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Redirect> {
    let author = user_or_404(&state, &username).await?;

    match follow_action(user.user_id, author.id) {
        FollowAction::GetOrCreate => {
            let created = FollowRepo::get_or_create(&state.pool, user.user_id, author.id).await?;
            tracing::info!(user_id = user.user_id, author_id = author.id, created, "Follow");
        }
        FollowAction::IgnoreSelf => {
            tracing::debug!(user_id = user.user_id, "Ignored self-follow");
        }
    }

    Ok(Redirect::to(FOLLOW_INDEX_PATH))
}

/// GET /profile/{username}/unfollow/
///
/// Removes the relation if it exists; a missing relation is not an error.
pub async fn profile_unfollow(
    RequireLogin(user): RequireLogin,
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> AppResult<Redirect> {
    let author = user_or_404(&state, &username).await?;
    let removed = FollowRepo::delete(&state.pool, user.user_id, author.id).await?;
    tracing::info!(user_id = user.user_id, author_id = author.id, removed, "Unfollow");
    Ok(Redirect::to(FOLLOW_INDEX_PATH))
}
