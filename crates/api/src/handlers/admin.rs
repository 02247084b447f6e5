//! Staff-only handlers: group management and cache control.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use quill_core::forms::{self, GroupForm};
use quill_db::models::group::{CreateGroup, Group};
use quill_db::repositories::GroupRepo;

use super::validation_error;
use crate::error::AppResult;
use crate::middleware::rbac::RequireStaff;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /admin/groups/
///
/// A duplicate slug is a 409 via `uq_groups_slug`.
pub async fn create_group(
    RequireStaff(admin): RequireStaff,
    State(state): State<AppState>,
    Json(input): Json<GroupForm>,
) -> AppResult<(StatusCode, Json<DataResponse<Group>>)> {
    forms::check(&input).map_err(|errors| validation_error(&errors))?;

    let group = GroupRepo::create(
        &state.pool,
        &CreateGroup {
            title: input.title,
            slug: input.slug,
            description: input.description,
        },
    )
    .await?;

    tracing::info!(
        group_id = group.id,
        slug = %group.slug,
        admin_id = admin.user_id,
        "Group created"
    );

    Ok((StatusCode::CREATED, DataResponse::json(group)))
}

/// POST /admin/cache/clear
pub async fn clear_cache(
    RequireStaff(admin): RequireStaff,
    State(state): State<AppState>,
) -> StatusCode {
    let entries = state.cache.len().await;
    state.cache.clear().await;
    tracing::info!(admin_id = admin.user_id, entries, "Response cache cleared");
    StatusCode::NO_CONTENT
}
