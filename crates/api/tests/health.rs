//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{body_json, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_check_returns_ok_with_json(pool: PgPool) {
    let t = common::build_test_app(pool);
    let response = get(t.app(), "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["database"], true);
    assert_eq!(json["cached_pages"], 0);
    assert_eq!(json["cache_ttl_secs"], 20);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn health_reports_cached_pages(pool: PgPool) {
    let t = common::build_test_app(pool);
    assert_eq!(get(t.app(), "/").await.status(), StatusCode::OK);

    let json = body_json(get(t.app(), "/health").await).await;
    assert_eq!(json["cached_pages"], 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn unknown_route_returns_json_404(pool: PgPool) {
    let t = common::build_test_app(pool);
    let response = get(t.app(), "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let t = common::build_test_app(pool);
    let response = get(t.app(), "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cached_index_still_gets_a_fresh_request_id(pool: PgPool) {
    let t = common::build_test_app(pool);
    let first = get(t.app(), "/").await;
    let second = get(t.app(), "/").await;

    let id = |r: &axum::http::Response<axum::body::Body>| {
        r.headers()
            .get("x-request-id")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    };
    assert_ne!(id(&first), id(&second));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_preflight_allows_configured_origin(pool: PgPool) {
    let t = common::build_test_app(pool);
    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/create/")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(t.app(), request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn cors_headers_are_added_to_regular_responses(pool: PgPool) {
    let t = common::build_test_app(pool);
    let request = axum::http::Request::builder()
        .uri("/health")
        .header("origin", "http://localhost:5173")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = tower::ServiceExt::oneshot(t.app(), request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "http://localhost:5173"
    );
}
