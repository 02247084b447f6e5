//! Follow relation model.

use quill_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `follows` table: `user_id` follows `author_id`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Follow {
    pub id: DbId,
    pub user_id: DbId,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
