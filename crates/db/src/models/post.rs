//! Post entity model, DTOs and listing filter.

use quill_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `posts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
    pub id: DbId,
    pub text: String,
    pub pub_date: Timestamp,
    pub group_id: Option<DbId>,
    pub author_id: DbId,
    /// Media-relative image path, empty when the post has no image.
    pub image: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A post joined with its author, group and comment count.
///
/// This is the item type of every post listing.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PostView {
    pub id: DbId,
    pub text: String,
    pub pub_date: Timestamp,
    pub image: String,
    pub author_id: DbId,
    pub author_username: String,
    pub group_id: Option<DbId>,
    pub group_slug: Option<String>,
    pub group_title: Option<String>,
    pub comment_count: i64,
}

/// DTO for creating a new post.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePost {
    pub text: String,
    pub group_id: Option<DbId>,
    pub author_id: DbId,
    pub image: Option<String>,
}

/// DTO for editing a post.
///
/// `group_id` is written as given (`None` clears the group). `image` is only
/// replaced when `Some`. The author is re-asserted by the caller and the
/// publication date is never touched.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePost {
    pub text: String,
    pub group_id: Option<DbId>,
    pub author_id: DbId,
    pub image: Option<String>,
}

/// Which posts a listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post.
    All,
    /// Posts assigned to the group.
    Group(DbId),
    /// Posts written by the user.
    Author(DbId),
    /// Posts by every author the user follows.
    FollowedBy(DbId),
}
