//! Liveness check. Kept outside the JSON `data` envelope so load balancers
//! can read it directly.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthReport {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    /// Entries currently held by the index page cache.
    pub cached_pages: usize,
    /// How long a cached page is served, in seconds.
    pub cache_ttl_secs: u64,
}

/// `200` with `status: "ok"` when the database answers, otherwise `503`
/// with `status: "degraded"`.
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthReport>) {
    let database = match quill_db::health_check(&state.pool).await {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Database unreachable from health check");
            false
        }
    };

    let (code, status) = if database {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded")
    };

    let report = HealthReport {
        status,
        version: env!("CARGO_PKG_VERSION"),
        database,
        cached_pages: state.cache.len().await,
        cache_ttl_secs: state.cache.ttl().as_secs(),
    };
    (code, Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
