//! Accounts.

use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::user::{CreateUser, User};

const USER_COLUMNS: &str = "id, username, email, password_hash, is_staff, created_at, updated_at";

pub struct UserRepo;

impl UserRepo {
    /// Fails with a `uq_users_username` violation on a taken username.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (username, email, password_hash, is_staff)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(input.is_staff)
        .fetch_one(pool)
        .await
    }

    /// Exact, case-sensitive match; this is how profile URLs resolve.
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1"))
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Remove an account together with its posts, comments and follow rows.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let deleted = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?
            .rows_affected();
        Ok(deleted == 1)
    }
}
