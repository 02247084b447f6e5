//! HTTP surface of Quill: JSON page views, form submissions, auth guards
//! and the index page cache. `main.rs` only wires configuration to
//! [`router::build_app_router`].

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod handlers;
pub mod media;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod submission;
