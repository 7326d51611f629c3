//! Handlers for documents and their lineage roots.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use validator::Validate;

use docvault_core::document::{MAX_DOCUMENT_NAME_LENGTH, MAX_DOCUMENT_TYPE_LENGTH};
use docvault_core::lineage::node::{Document, VersionNode};
use docvault_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// `validator` length bounds are `u64`; mirror the core limits.
const MAX_NAME_LEN: u64 = MAX_DOCUMENT_NAME_LENGTH as u64;
const MAX_TYPE_LEN: u64 = MAX_DOCUMENT_TYPE_LENGTH as u64;

/// Request body for `POST /documents`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateDocumentRequest {
    #[validate(length(min = 1, max = MAX_NAME_LEN))]
    pub name: String,
    #[validate(length(min = 1, max = MAX_TYPE_LEN))]
    pub document_type: String,
    pub subject_id: Option<DbId>,
    /// Initial content snapshot; an empty object when omitted.
    pub content: Option<serde_json::Value>,
}

/// A freshly created document together with its root version.
#[derive(Debug, Serialize)]
pub struct CreatedDocument {
    pub document: Document,
    pub root_version: VersionNode,
}

// ---------------------------------------------------------------------------
// POST /documents
// ---------------------------------------------------------------------------

pub async fn create_document(
    State(state): State<AppState>,
    auth: AuthUser,
    payload: Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    input.validate()?;

    let content = input
        .content
        .unwrap_or_else(|| serde_json::Value::Object(Default::default()));
    let (document, root_version) = state
        .engine
        .create_document(
            &auth.caller(),
            &input.name,
            &input.document_type,
            input.subject_id,
            content,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: CreatedDocument {
                document,
                root_version,
            },
        }),
    ))
}

// ---------------------------------------------------------------------------
// GET /documents/{id}
// ---------------------------------------------------------------------------

pub async fn get_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let document = state.engine.get_document(&auth.caller(), id).await?;
    Ok(Json(DataResponse { data: document }))
}

// ---------------------------------------------------------------------------
// DELETE /documents/{id}
// ---------------------------------------------------------------------------

/// Delete a document and every version in its lineage.
pub async fn delete_document(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    state.engine.delete_document(&auth.caller(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
