//! Route definitions for version lineages.
//!
//! ```text
//! GET    /{id}            get_version
//! PATCH  /{id}            update_version
//! GET    /{id}/history    list_versions
//! POST   /{id}/versions   create_version
//! POST   /{id}/restore    restore_version
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::versions;
use crate::state::AppState;

/// Version routes, mounted at `/versions`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(versions::get_version).patch(versions::update_version),
        )
        .route("/{id}/history", get(versions::list_versions))
        .route("/{id}/versions", post(versions::create_version))
        .route("/{id}/restore", post(versions::restore_version))
}
