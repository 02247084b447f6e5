//! Authentication and authorization guards.
//!
//! Guards are extractors, checked before a handler body runs:
//!
//! - [`auth::RequireLogin`] -- Logged-in actor, otherwise redirect to the login page.
//! - [`auth::MaybeUser`] -- Optional actor for public pages.
//! - [`rbac::RequireStaff`] -- Logged-in staff member, otherwise 401/403.

pub mod auth;
pub mod rbac;
