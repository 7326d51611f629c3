use axum::routing::{get, post};
use axum::Router;

use crate::handlers::documents;
use crate::state::AppState;

/// Document routes, mounted at `/documents`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(documents::create_document))
        .route(
            "/{id}",
            get(documents::get_document).delete(documents::delete_document),
        )
}
