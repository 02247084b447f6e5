//! Comment entity model and DTOs.

use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `comments` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Comment {
    pub id: DbId,
    pub text: String,
    pub created: Timestamp,
    pub post_id: DbId,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A comment joined with its author's username, as shown under a post.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentView {
    pub id: DbId,
    pub text: String,
    pub created: Timestamp,
    pub post_id: DbId,
    pub author_id: DbId,
    pub author_username: String,
}

/// DTO for creating a new comment.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateComment {
    pub post_id: DbId,
    pub author_id: DbId,
    pub text: String,
}
