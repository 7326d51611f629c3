//! Document version row model.
//!
//! Rows are read joined with `documents` so each node carries its document
//! metadata (name, type, subject).

use docvault_core::error::CoreError;
use docvault_core::lineage::node::{VersionNode, VersionStatus};
use docvault_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A `document_versions` row joined with its document's metadata.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentVersionRow {
    pub id: DbId,
    pub document_id: DbId,
    pub parent_id: Option<DbId>,
    pub version_number: i32,
    pub status: String,
    pub content: serde_json::Value,
    pub organization_id: DbId,
    pub name: String,
    pub document_type: String,
    pub subject_id: Option<DbId>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<DocumentVersionRow> for VersionNode {
    type Error = CoreError;

    fn try_from(row: DocumentVersionRow) -> Result<Self, Self::Error> {
        let status: VersionStatus = row.status.parse()?;
        Ok(VersionNode {
            id: row.id,
            document_id: row.document_id,
            parent_id: row.parent_id,
            version_number: row.version_number,
            status,
            content: row.content,
            organization_id: row.organization_id,
            name: row.name,
            document_type: row.document_type,
            subject_id: row.subject_id,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Result of a guarded in-place update of a version row.
#[derive(Debug)]
pub enum HeadPatchOutcome {
    Updated(DocumentVersionRow),
    Superseded,
    Missing,
}
