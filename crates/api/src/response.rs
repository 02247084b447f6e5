//! The `{ "data": ... }` envelope every JSON page is wrapped in.

use axum::Json;
use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    /// Wrap `data` and turn it into a JSON response body.
    ///
    /// ```ignore
    /// Ok(DataResponse::json(view))
    /// ```
    pub fn json(data: T) -> Json<Self> {
        Json(Self { data })
    }
}
