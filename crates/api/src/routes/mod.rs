pub mod documents;
pub mod health;
pub mod versions;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /documents                      create (POST)
/// /documents/{id}                 get, delete
///
/// /versions/{id}                  get, patch (latest only)
/// /versions/{id}/history          list versions in the lineage
/// /versions/{id}/versions         create version (POST)
/// /versions/{id}/restore          restore version (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/documents", documents::router())
        .nest("/versions", versions::router())
}
