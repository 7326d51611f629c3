//! Repository for the `documents` table.

use docvault_core::lineage::node::NewDocument;
use docvault_core::types::DbId;
use sqlx::PgPool;

use crate::models::document::DocumentRow;
use crate::models::document_version::DocumentVersionRow;
use crate::repositories::document_version_repo::VERSION_COLUMNS;

/// Column list for documents queries.
const COLUMNS: &str = "id, organization_id, name, document_type, subject_id, \
    created_by, created_at, updated_at";

/// Provides CRUD operations for documents.
pub struct DocumentRepo;

impl DocumentRepo {
    /// Insert a document and its root version (v1, draft) in one transaction.
    pub async fn create_with_root(
        pool: &PgPool,
        input: &NewDocument,
    ) -> Result<(DocumentRow, DocumentVersionRow), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO documents (organization_id, name, document_type, subject_id, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let document = sqlx::query_as::<_, DocumentRow>(&query)
            .bind(input.organization_id)
            .bind(&input.name)
            .bind(&input.document_type)
            .bind(input.subject_id)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "WITH inserted AS (
                INSERT INTO document_versions
                    (document_id, parent_id, version_number, status, content, organization_id, created_by)
                VALUES ($1, NULL, 1, 'draft', $2, $3, $4)
                RETURNING *
             )
             SELECT {VERSION_COLUMNS}
             FROM inserted v JOIN documents d ON d.id = v.document_id"
        );
        let root = sqlx::query_as::<_, DocumentVersionRow>(&query)
            .bind(document.id)
            .bind(&input.content)
            .bind(input.organization_id)
            .bind(input.created_by)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((document, root))
    }

    /// Find a document by its primary key.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<DocumentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM documents WHERE id = $1");
        sqlx::query_as::<_, DocumentRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Delete a document. Its versions go with it via `ON DELETE CASCADE`.
    ///
    /// Returns `true` if a row was deleted.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
