//! Document row model.

use docvault_core::lineage::node::Document;
use docvault_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `documents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DocumentRow {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub document_type: String,
    pub subject_id: Option<DbId>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<DocumentRow> for Document {
    fn from(row: DocumentRow) -> Self {
        Document {
            id: row.id,
            organization_id: row.organization_id,
            name: row.name,
            document_type: row.document_type,
            subject_id: row.subject_id,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
