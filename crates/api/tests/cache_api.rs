//! Integration tests for the index response cache.

mod common;

use axum::http::StatusCode;
use common::{body_json, create_post, create_user, get, item_texts, post_json, token_for};
use quill_db::repositories::PostRepo;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn index_stays_cached_after_delete_until_cleared(pool: PgPool) {
    let author = create_user(&pool, "leo", false).await;
    let post = create_post(&pool, author.id, None, "soon gone").await;
    let t = common::build_test_app(pool.clone());

    let before = body_json(get(t.app(), "/").await).await;
    assert_eq!(item_texts(&before), vec!["soon gone"]);

    assert!(PostRepo::delete(&pool, post.id).await.unwrap());

    let cached = body_json(get(t.app(), "/").await).await;
    assert_eq!(cached, before);

    t.state.cache.clear().await;
    let fresh = body_json(get(t.app(), "/").await).await;
    assert!(item_texts(&fresh).is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn other_listings_are_not_cached(pool: PgPool) {
    let author = create_user(&pool, "leo", false).await;
    let post = create_post(&pool, author.id, None, "soon gone").await;
    let t = common::build_test_app(pool.clone());

    get(t.app(), "/profile/leo/").await;
    PostRepo::delete(&pool, post.id).await.unwrap();

    let json = body_json(get(t.app(), "/profile/leo/").await).await;
    assert!(item_texts(&json).is_empty());
    assert_eq!(t.state.cache.len().await, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn staff_can_clear_cache_over_http(pool: PgPool) {
    let author = create_user(&pool, "leo", false).await;
    let admin = create_user(&pool, "root", true).await;
    let post = create_post(&pool, author.id, None, "soon gone").await;
    let t = common::build_test_app(pool.clone());

    get(t.app(), "/").await;
    PostRepo::delete(&pool, post.id).await.unwrap();

    let denied = post_json(
        t.app(),
        "/admin/cache/clear",
        serde_json::json!({}),
        Some(&token_for(&author)),
    )
    .await;
    assert_eq!(denied.status(), StatusCode::FORBIDDEN);
    assert_eq!(t.state.cache.len().await, 1);

    let cleared = post_json(
        t.app(),
        "/admin/cache/clear",
        serde_json::json!({}),
        Some(&token_for(&admin)),
    )
    .await;
    assert_eq!(cleared.status(), StatusCode::NO_CONTENT);

    let fresh = body_json(get(t.app(), "/").await).await;
    assert!(item_texts(&fresh).is_empty());
}
