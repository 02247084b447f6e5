//! Whole-response cache for public pages.
//!
//! [`ResponseCache`] keeps fully rendered responses keyed by request path and
//! query string. Entries older than the configured TTL are never served and
//! are replaced on the next miss. The [`cache_response`] middleware wires the
//! cache in front of a route.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tokio::sync::RwLock;

/// Upper bound on a response body the cache will buffer.
const MAX_CACHED_BODY_BYTES: usize = 8 * 1024 * 1024;

/// A stored response.
#[derive(Debug, Clone)]
pub struct CachedResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
    stored_at: Instant,
}

impl CachedResponse {
    pub fn new(status: StatusCode, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            status,
            headers,
            body,
            stored_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }

    fn to_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }
}

/// TTL cache of rendered responses.
///
/// Thread-safe via interior `RwLock`; shared across handlers behind an `Arc`.
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// A fresh entry for `key`, if one exists.
    pub async fn get(&self, key: &str) -> Option<CachedResponse> {
        self.entries
            .read()
            .await
            .get(key)
            .filter(|entry| entry.is_fresh(self.ttl))
            .cloned()
    }

    pub async fn insert(&self, key: String, response: CachedResponse) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_fresh(self.ttl));
        entries.insert(key, response);
    }

    /// Drop every entry.
    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    /// Number of stored entries, fresh or not.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Serve `GET` requests from `cache`, storing successful responses.
///
/// ```ignore
/// Router::new()
///     .route("/", get(index))
///     .route_layer(middleware::from_fn_with_state(cache, cache_response))
/// ```
pub async fn cache_response(
    State(cache): State<Arc<ResponseCache>>,
    request: Request,
    next: Next,
) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let key = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    if let Some(hit) = cache.get(&key).await {
        tracing::debug!(%key, "Response cache hit");
        return hit.to_response();
    }

    let response = next.run(request).await;
    if response.status() != StatusCode::OK {
        return response;
    }

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_CACHED_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(error = %e, %key, "Failed to buffer response for caching");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    cache
        .insert(
            key.clone(),
            CachedResponse::new(parts.status, parts.headers.clone(), bytes.clone()),
        )
        .await;
    tracing::debug!(%key, "Response cached");

    Response::from_parts(parts, Body::from(bytes))
}
