use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Staff routes mounted at `/admin`.
///
/// ```text
/// POST   /groups/                    -> create_group
/// POST   /cache/clear                -> clear_cache
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/groups/", post(admin::create_group))
        .route("/cache/clear", post(admin::clear_cache))
}
