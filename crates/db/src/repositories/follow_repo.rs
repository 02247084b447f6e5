//! Repository for the `follows` table.
//!
//! The `(user_id, author_id)` pair is unique (`uq_follows_user_author`) and a
//! user can never follow themself (`ck_follows_not_self`).

use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::follow::Follow;

const COLUMNS: &str = "id, user_id, author_id, created_at, updated_at";

/// Provides follow / unfollow operations.
pub struct FollowRepo;

impl FollowRepo {
    /// Make `user_id` follow `author_id` unless they already do.
    ///
    /// Returns `true` if a new row was inserted.
    pub async fn get_or_create(
        pool: &PgPool,
        user_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT INTO follows (user_id, author_id) VALUES ($1, $2) \
             ON CONFLICT (user_id, author_id) DO NOTHING",
        )
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Remove the `(user_id, author_id)` relation if present.
    ///
    /// Returns the number of deleted rows (0 or 1).
    pub async fn delete(pool: &PgPool, user_id: DbId, author_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM follows WHERE user_id = $1 AND author_id = $2")
            .bind(user_id)
            .bind(author_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        author_id: DbId,
    ) -> Result<Option<Follow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM follows WHERE user_id = $1 AND author_id = $2");
        sqlx::query_as::<_, Follow>(&query)
            .bind(user_id)
            .bind(author_id)
            .fetch_optional(pool)
            .await
    }

    /// Whether `user_id` follows `author_id`.
    pub async fn exists(
        pool: &PgPool,
        user_id: DbId,
        author_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM follows WHERE user_id = $1 AND author_id = $2)",
        )
        .bind(user_id)
        .bind(author_id)
        .fetch_one(pool)
        .await
    }

    /// Total number of follow rows.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows")
            .fetch_one(pool)
            .await
    }

    /// How many users follow `author_id`.
    pub async fn count_followers(pool: &PgPool, author_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(pool)
            .await
    }

    /// How many authors `user_id` follows.
    pub async fn count_following(pool: &PgPool, user_id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE user_id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
    }
}
