//! Repository for the `posts` table.
//!
//! Listings always go through [`PostRepo::list_page`], which counts the
//! filtered rows, resolves the requested page and fetches that slice
//! newest-first.

use quill_core::pagination::{Page, PageOf, Paginator};
use quill_core::types::DbId;
use sqlx::PgPool;

use crate::models::post::{CreatePost, Post, PostFilter, PostView, UpdatePost};

/// Column list for plain `posts` rows.
const COLUMNS: &str = "id, text, pub_date, group_id, author_id, image, created_at, updated_at";

/// Joined select used by every listing and by the detail view.
const VIEW_SELECT: &str = "\
    SELECT p.id, p.text, p.pub_date, p.image, \
           p.author_id, u.username AS author_username, \
           p.group_id, g.slug AS group_slug, g.title AS group_title, \
           (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count \
    FROM posts p \
    JOIN users u ON u.id = p.author_id \
    LEFT JOIN groups g ON g.id = p.group_id";

/// Newest first; ids break ties between posts published in the same instant.
const ORDER_BY: &str = "ORDER BY p.pub_date DESC, p.id DESC";

/// `WHERE` clause for a filter plus the id it binds as `$1`, if any.
fn filter_clause(filter: PostFilter) -> (&'static str, Option<DbId>) {
    match filter {
        PostFilter::All => ("", None),
        PostFilter::Group(id) => ("WHERE p.group_id = $1", Some(id)),
        PostFilter::Author(id) => ("WHERE p.author_id = $1", Some(id)),
        PostFilter::FollowedBy(id) => (
            "WHERE p.author_id IN (SELECT f.author_id FROM follows f WHERE f.user_id = $1)",
            Some(id),
        ),
    }
}

/// Provides CRUD and listing operations for posts.
pub struct PostRepo;

impl PostRepo {
    /// Insert a new post owned by `input.author_id`. `pub_date` is set by the
    /// database.
    pub async fn create(pool: &PgPool, input: &CreatePost) -> Result<Post, sqlx::Error> {
        let query = format!(
            "INSERT INTO posts (text, group_id, author_id, image)
             VALUES ($1, $2, $3, COALESCE($4, ''))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(&input.text)
            .bind(input.group_id)
            .bind(input.author_id)
            .bind(&input.image)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Post>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM posts WHERE id = $1");
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a post in its joined listing shape.
    pub async fn find_view_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PostView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} WHERE p.id = $1");
        sqlx::query_as::<_, PostView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Update text, group, author and (when given) image.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdatePost,
    ) -> Result<Option<Post>, sqlx::Error> {
        let query = format!(
            "UPDATE posts SET
                text = $2,
                group_id = $3,
                author_id = $4,
                image = COALESCE($5, image)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Post>(&query)
            .bind(id)
            .bind(&input.text)
            .bind(input.group_id)
            .bind(input.author_id)
            .bind(&input.image)
            .fetch_optional(pool)
            .await
    }

    /// Delete a post and, through the foreign key, its comments.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Number of posts matching `filter`.
    pub async fn count(pool: &PgPool, filter: PostFilter) -> Result<i64, sqlx::Error> {
        let (clause, bind) = filter_clause(filter);
        let query = format!("SELECT COUNT(*) FROM posts p {clause}");
        let mut q = sqlx::query_scalar::<_, i64>(&query);
        if let Some(id) = bind {
            q = q.bind(id);
        }
        q.fetch_one(pool).await
    }

    /// Fetch one already-resolved page of posts matching `filter`.
    pub async fn list(
        pool: &PgPool,
        filter: PostFilter,
        page: &Page,
    ) -> Result<Vec<PostView>, sqlx::Error> {
        let (clause, bind) = filter_clause(filter);
        let (limit_param, offset_param) = if bind.is_some() { (2, 3) } else { (1, 2) };
        let query = format!(
            "{VIEW_SELECT} {clause} {ORDER_BY} LIMIT ${limit_param} OFFSET ${offset_param}"
        );
        let mut q = sqlx::query_as::<_, PostView>(&query);
        if let Some(id) = bind {
            q = q.bind(id);
        }
        q.bind(page.per_page)
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Count, resolve the raw `?page=` value and fetch that page.
    ///
    /// Out-of-range page numbers land on the last page; garbage lands on the
    /// first.
    pub async fn list_page(
        pool: &PgPool,
        filter: PostFilter,
        raw_page: Option<&str>,
        per_page: i64,
    ) -> Result<PageOf<PostView>, sqlx::Error> {
        let total = Self::count(pool, filter).await?;
        let page = Paginator::new(total, per_page).get_page(raw_page);
        let items = Self::list(pool, filter, &page).await?;
        tracing::debug!(?filter, page = page.number, total, "Listed posts");
        Ok(PageOf::new(items, page))
    }
}
