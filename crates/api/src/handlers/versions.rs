//! Handlers for version lineage operations.
//!
//! History, create and restore return their payloads bare (camelCase), as
//! the document editor consumes them directly. Single-version reads and
//! patches use the standard data envelope.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use docvault_core::lineage::history::VersionHistory;
use docvault_core::lineage::node::{VersionPatch, VersionStatus};
use docvault_core::types::DbId;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PATCH /versions/{id}`.
#[derive(Debug, Deserialize)]
pub struct UpdateVersionRequest {
    pub content: Option<serde_json::Value>,
    pub status: Option<VersionStatus>,
}

/// Request body for `POST /versions/{id}/versions`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVersionRequest {
    /// Replaces the source's content on the new node when present.
    pub content: Option<serde_json::Value>,
}

/// Request body for `POST /versions/{id}/restore`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestoreVersionRequest {
    /// The version the editor currently has open, if any.
    pub current_version_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// GET /versions/{id}
// ---------------------------------------------------------------------------

pub async fn get_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let node = state.engine.get_version(&auth.caller(), id).await?;
    Ok(Json(DataResponse { data: node }))
}

// ---------------------------------------------------------------------------
// PATCH /versions/{id}
// ---------------------------------------------------------------------------

/// Autosave or finalize a version that has not been superseded yet.
pub async fn update_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    payload: Result<Json<UpdateVersionRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let patch = VersionPatch {
        content: input.content,
        status: input.status,
    };
    let node = state
        .engine
        .update_version(&auth.caller(), id, &patch)
        .await?;
    Ok(Json(DataResponse { data: node }))
}

// ---------------------------------------------------------------------------
// GET /versions/{id}/history
// ---------------------------------------------------------------------------

pub async fn list_versions(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<VersionHistory>> {
    let history = state.engine.history(&auth.caller(), id).await?;
    Ok(Json(history))
}

// ---------------------------------------------------------------------------
// POST /versions/{id}/versions
// ---------------------------------------------------------------------------

pub async fn create_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    payload: Result<Json<CreateVersionRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let created = state
        .engine
        .create_version(&auth.caller(), id, input.content)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

// ---------------------------------------------------------------------------
// POST /versions/{id}/restore
// ---------------------------------------------------------------------------

/// Copy version `id` into a new leaf at the head of the numbering.
pub async fn restore_version(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    payload: Result<Json<RestoreVersionRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(input) = payload?;
    let created = state
        .engine
        .restore_version(&auth.caller(), id, input.current_version_id)
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}
