//! Shared helpers for the API integration tests.
#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{header, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use quill_api::auth::jwt::{generate_access_token, JwtConfig};
use quill_api::auth::password::hash_password;
use quill_api::config::{LogFormat, ServerConfig};
use quill_api::router::build_app_router;
use quill_api::state::AppState;
use quill_core::types::DbId;
use quill_db::models::group::{CreateGroup, Group};
use quill_db::models::post::{CreatePost, Post};
use quill_db::models::user::{CreateUser, User};
use quill_db::repositories::{GroupRepo, PostRepo, UserRepo};
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "test_password_123!";

const BOUNDARY: &str = "quill-test-boundary";

/// 2x1 GIF used for upload tests.
pub const SMALL_GIF: &[u8] = &[
    0x47, 0x49, 0x46, 0x38, 0x39, 0x61, 0x02, 0x00, 0x01, 0x00, 0x80, 0x00, 0x00, 0x00, 0x00,
    0x00, 0xFF, 0xFF, 0xFF, 0x21, 0xF9, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x2C, 0x00, 0x00,
    0x00, 0x00, 0x02, 0x00, 0x01, 0x00, 0x00, 0x02, 0x02, 0x0C, 0x0A, 0x00, 0x3B,
];

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults and the given media root.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_root: media_root.to_path_buf(),
        index_cache_secs: 20,
        log_format: LogFormat::Pretty,
        jwt: test_jwt_config(),
    }
}

/// The full application plus handles the tests need to poke at.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub media: TempDir,
}

impl TestApp {
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router, with all middleware layers, over
/// `pool` and a throwaway media root.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let media = tempfile::tempdir().expect("tempdir should be created");
    let config = test_config(media.path());
    let state = AppState::new(pool, config.clone());
    let router = build_app_router(state.clone(), &config);
    TestApp {
        router,
        state,
        media,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &PgPool, username: &str, is_staff: bool) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@test.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        is_staff,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

pub async fn create_group(pool: &PgPool, slug: &str) -> Group {
    GroupRepo::create(
        pool,
        &CreateGroup {
            title: format!("Group {slug}"),
            slug: slug.to_string(),
            description: "Test group".to_string(),
        },
    )
    .await
    .expect("group creation should succeed")
}

pub async fn create_post(
    pool: &PgPool,
    author_id: DbId,
    group_id: Option<DbId>,
    text: &str,
) -> Post {
    PostRepo::create(
        pool,
        &CreatePost {
            text: text.to_string(),
            group_id,
            author_id,
            image: None,
        },
    )
    .await
    .expect("post creation should succeed")
}

pub async fn count_rows(pool: &PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

/// A valid access token for `user`.
pub fn token_for(user: &User) -> String {
    generate_access_token(user.id, &user.username, user.is_staff, &test_jwt_config())
        .expect("token generation should succeed")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

fn with_auth(
    builder: axum::http::request::Builder,
    token: Option<&str>,
) -> axum::http::request::Builder {
    match token {
        Some(token) => builder.header(header::AUTHORIZATION, format!("Bearer {token}")),
        None => builder,
    }
}

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    get_auth(app, uri, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: Option<&str>) -> Response<Body> {
    let request = with_auth(Request::builder().uri(uri), token)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_form(app: Router, uri: &str, body: &str, token: Option<&str>) -> Response<Body> {
    let request = with_auth(Request::builder().method("POST").uri(uri), token)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: Option<&str>,
) -> Response<Body> {
    let request = with_auth(Request::builder().method("POST").uri(uri), token)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// POST a `multipart/form-data` body with text `fields` and an optional
/// `image` file given as `(filename, bytes)`.
pub async fn post_multipart(
    app: Router,
    uri: &str,
    fields: &[(&str, &str)],
    image: Option<(&str, &[u8])>,
    token: Option<&str>,
) -> Response<Body> {
    let mut body: Vec<u8> = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, bytes)) = image {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"image\"; \
                 filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let request = with_auth(Request::builder().method("POST").uri(uri), token)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}

/// Assert a `303 See Other` and return its `Location`.
pub fn assert_redirect(response: &Response<Body>) -> String {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect must carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// Texts of the posts on a listing page, in order.
pub fn item_texts(json: &serde_json::Value) -> Vec<String> {
    json["data"]["page_obj"]["items"]
        .as_array()
        .expect("listing must have items")
        .iter()
        .map(|item| item["text"].as_str().unwrap().to_string())
        .collect()
}
