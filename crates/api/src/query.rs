//! Shared query parameter types for API handlers.

use serde::Deserialize;

/// `?page=` on paginated listings.
///
/// Kept as a raw string: anything that is not a number still renders the
/// first page instead of failing the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
}

impl PageParams {
    pub fn raw(&self) -> Option<&str> {
        self.page.as_deref()
    }
}

/// `?next=` on the login page.
#[derive(Debug, Default, Deserialize)]
pub struct NextParams {
    pub next: Option<String>,
}
