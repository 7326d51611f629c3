//! Shared response envelope types for API handlers.
//!
//! Document and single-version endpoints use a `{ "data": ... }` envelope.
//! The history and create/restore endpoints return their payloads bare.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: document }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
