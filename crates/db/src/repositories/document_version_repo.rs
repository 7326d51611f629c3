//! Repository for the `document_versions` table.
//!
//! Every read joins `documents` (aliased `d`) onto `document_versions`
//! (aliased `v`) so rows carry document metadata.

use docvault_core::lineage::node::{NewVersionNode, VersionPatch};
use docvault_core::types::DbId;
use sqlx::PgPool;

use crate::models::document_version::{DocumentVersionRow, HeadPatchOutcome};

/// Column list for joined version queries.
pub(crate) const VERSION_COLUMNS: &str = "v.id, v.document_id, v.parent_id, v.version_number, \
    v.status, v.content, v.organization_id, d.name, d.document_type, d.subject_id, \
    v.created_by, v.created_at, v.updated_at";

/// Provides lookup and append operations for version lineages.
pub struct DocumentVersionRepo;

impl DocumentVersionRepo {
    /// Find a version by its primary key.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<DocumentVersionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {VERSION_COLUMNS}
             FROM document_versions v JOIN documents d ON d.id = v.document_id
             WHERE v.id = $1"
        );
        sqlx::query_as::<_, DocumentVersionRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List every version whose parent is one of `parent_ids`.
    pub async fn list_by_parent_ids(
        pool: &PgPool,
        parent_ids: &[DbId],
    ) -> Result<Vec<DocumentVersionRow>, sqlx::Error> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!(
            "SELECT {VERSION_COLUMNS}
             FROM document_versions v JOIN documents d ON d.id = v.document_id
             WHERE v.parent_id = ANY($1)
             ORDER BY v.id"
        );
        sqlx::query_as::<_, DocumentVersionRow>(&query)
            .bind(parent_ids)
            .fetch_all(pool)
            .await
    }

    /// Highest version number assigned within a document.
    pub async fn max_version_number(
        pool: &PgPool,
        document_id: DbId,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: (Option<i32>,) =
            sqlx::query_as("SELECT MAX(version_number) FROM document_versions WHERE document_id = $1")
                .bind(document_id)
                .fetch_one(pool)
                .await?;
        Ok(row.0)
    }

    /// Insert a non-root version with an explicit version number.
    ///
    /// Fails with a unique violation on `uq_document_versions_document_number`
    /// when the number is already taken; the caller picks the next candidate.
    pub async fn insert(
        pool: &PgPool,
        input: &NewVersionNode,
    ) -> Result<DocumentVersionRow, sqlx::Error> {
        let query = format!(
            "WITH inserted AS (
                INSERT INTO document_versions
                    (document_id, parent_id, version_number, status, content, organization_id, created_by)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                RETURNING *
             )
             SELECT {VERSION_COLUMNS}
             FROM inserted v JOIN documents d ON d.id = v.document_id"
        );
        sqlx::query_as::<_, DocumentVersionRow>(&query)
            .bind(input.document_id)
            .bind(input.parent_id)
            .bind(input.version_number)
            .bind(input.status.as_str())
            .bind(&input.content)
            .bind(input.organization_id)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    /// Patch a version in place if, and only if, it holds the highest
    /// version number of its document.
    ///
    /// The version row and its document row are locked `FOR UPDATE` first.
    /// Every version insert takes a key-share lock on the document row for
    /// its foreign key check, so no newer version can be committed between
    /// the `MAX(version_number)` check and the update.
    pub async fn update_head(
        pool: &PgPool,
        id: DbId,
        patch: &VersionPatch,
    ) -> Result<HeadPatchOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId, i32)> = sqlx::query_as(
            "SELECT v.document_id, v.version_number
             FROM document_versions v JOIN documents d ON d.id = v.document_id
             WHERE v.id = $1
             FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((document_id, version_number)) = locked else {
            return Ok(HeadPatchOutcome::Missing);
        };

        let (latest,): (Option<i32>,) =
            sqlx::query_as("SELECT MAX(version_number) FROM document_versions WHERE document_id = $1")
                .bind(document_id)
                .fetch_one(&mut *tx)
                .await?;
        if latest.is_some_and(|max| version_number < max) {
            return Ok(HeadPatchOutcome::Superseded);
        }

        let query = format!(
            "WITH updated AS (
                UPDATE document_versions SET
                    content = COALESCE($2, content),
                    status = COALESCE($3, status),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
             )
             SELECT {VERSION_COLUMNS}
             FROM updated v JOIN documents d ON d.id = v.document_id"
        );
        let row = sqlx::query_as::<_, DocumentVersionRow>(&query)
            .bind(id)
            .bind(patch.content.as_ref())
            .bind(patch.status.map(|s| s.as_str()))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(HeadPatchOutcome::Updated(row))
    }
}
