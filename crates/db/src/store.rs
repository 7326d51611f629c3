//! Postgres implementation of the engine's [`VersionStore`].

use async_trait::async_trait;
use docvault_core::lineage::node::{Document, NewDocument, NewVersionNode, VersionNode, VersionPatch};
use docvault_core::lineage::store::{HeadUpdate, StoreError, StoreResult, VersionStore};
use docvault_core::types::DbId;

use crate::models::document_version::{DocumentVersionRow, HeadPatchOutcome};
use crate::repositories::{DocumentRepo, DocumentVersionRepo};
use crate::DbPool;

/// PostgreSQL unique constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// [`VersionStore`] backed by the `documents` / `document_versions` tables.
#[derive(Debug, Clone)]
pub struct PgVersionStore {
    pool: DbPool,
}

impl PgVersionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

/// Classify a sqlx error for the engine.
///
/// Unique constraint violations on `uq_`-prefixed constraints become
/// [`StoreError::Conflict`] so the writer can retry with the next number.
/// Everything else is a backend failure.
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return StoreError::Conflict(constraint.to_string());
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    StoreError::Backend(err.to_string())
}

fn into_node(row: DocumentVersionRow) -> StoreResult<VersionNode> {
    let id = row.id;
    VersionNode::try_from(row).map_err(|e| {
        tracing::error!(version_id = id, error = %e, "Undecodable version row");
        StoreError::Backend(format!("version {id}: {e}"))
    })
}

#[async_trait]
impl VersionStore for PgVersionStore {
    async fn find_version(&self, id: DbId) -> StoreResult<Option<VersionNode>> {
        DocumentVersionRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(into_node)
            .transpose()
    }

    async fn list_children(&self, parent_ids: &[DbId]) -> StoreResult<Vec<VersionNode>> {
        DocumentVersionRepo::list_by_parent_ids(&self.pool, parent_ids)
            .await
            .map_err(map_sqlx_error)?
            .into_iter()
            .map(into_node)
            .collect()
    }

    async fn max_version_number(&self, document_id: DbId) -> StoreResult<Option<i32>> {
        DocumentVersionRepo::max_version_number(&self.pool, document_id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn insert_version(&self, input: &NewVersionNode) -> StoreResult<VersionNode> {
        let row = DocumentVersionRepo::insert(&self.pool, input)
            .await
            .map_err(map_sqlx_error)?;
        into_node(row)
    }

    async fn update_head(&self, id: DbId, patch: &VersionPatch) -> StoreResult<HeadUpdate> {
        match DocumentVersionRepo::update_head(&self.pool, id, patch)
            .await
            .map_err(map_sqlx_error)?
        {
            HeadPatchOutcome::Updated(row) => Ok(HeadUpdate::Updated(into_node(row)?)),
            HeadPatchOutcome::Superseded => Ok(HeadUpdate::Superseded),
            HeadPatchOutcome::Missing => Ok(HeadUpdate::NotFound),
        }
    }

    async fn create_document(&self, input: &NewDocument) -> StoreResult<(Document, VersionNode)> {
        let (document, root) = DocumentRepo::create_with_root(&self.pool, input)
            .await
            .map_err(map_sqlx_error)?;
        Ok((document.into(), into_node(root)?))
    }

    async fn find_document(&self, id: DbId) -> StoreResult<Option<Document>> {
        Ok(DocumentRepo::find_by_id(&self.pool, id)
            .await
            .map_err(map_sqlx_error)?
            .map(Document::from))
    }

    async fn delete_document(&self, id: DbId) -> StoreResult<bool> {
        DocumentRepo::delete(&self.pool, id)
            .await
            .map_err(map_sqlx_error)
    }

    async fn ping(&self) -> StoreResult<()> {
        crate::health_check(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}
