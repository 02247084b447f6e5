//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts, and an update DTO where rows are mutable
//! - Joined read models used by listing views

pub mod comment;
pub mod follow;
pub mod group;
pub mod post;
pub mod user;
