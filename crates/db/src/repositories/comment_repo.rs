//! Repository for the `comments` table.

use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::comment::{Comment, CommentView, CreateComment};

const COLUMNS: &str = "id, text, created, post_id, author_id, created_at, updated_at";

/// Provides create and listing operations for comments.
pub struct CommentRepo;

impl CommentRepo {
    /// Insert a comment on `input.post_id` written by `input.author_id`.
    pub async fn create(pool: &PgPool, input: &CreateComment) -> Result<Comment, sqlx::Error> {
        let query = format!(
            "INSERT INTO comments (text, post_id, author_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Comment>(&query)
            .bind(&input.text)
            .bind(input.post_id)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Comments on a post with their authors, newest first.
    pub async fn list_for_post(
        pool: &PgPool,
        post_id: DbId,
    ) -> Result<Vec<CommentView>, sqlx::Error> {
        sqlx::query_as::<_, CommentView>(
            "SELECT c.id, c.text, c.created, c.post_id, c.author_id, \
                    u.username AS author_username \
             FROM comments c \
             JOIN users u ON u.id = c.author_id \
             WHERE c.post_id = $1 \
             ORDER BY c.created DESC, c.id DESC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }

    /// Total number of stored comments.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM comments")
            .fetch_one(pool)
            .await
    }
}
