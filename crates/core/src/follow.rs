//! Rules for the follow relation.

use crate::types::DbId;

/// What a follow request should do once both users are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowAction {
    /// Insert the `(user, author)` pair unless it already exists.
    GetOrCreate,
    /// The user asked to follow themself; store nothing.
    IgnoreSelf,
}

/// Decide how to handle `user_id` following `author_id`.
pub fn follow_action(user_id: DbId, author_id: DbId) -> FollowAction {
    if user_id == author_id {
        FollowAction::IgnoreSelf
    } else {
        FollowAction::GetOrCreate
    }
}
