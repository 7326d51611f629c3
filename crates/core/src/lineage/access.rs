//! Organization scoping for lineage operations.
//!
//! The authentication layer resolves who the caller is and which
//! organization they act for. The engine makes no authorization decisions of
//! its own beyond comparing that organization with the one stored on the
//! node or document being touched.

use serde::{Deserialize, Serialize};

use super::node::{Document, VersionNode};
use crate::error::CoreError;
use crate::types::DbId;

/// The authenticated caller, as resolved by the access guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
    pub user_id: DbId,
    pub organization_id: DbId,
}

/// Entity name reported for missing or foreign version nodes.
pub const VERSION_ENTITY: &str = "DocumentVersion";

/// Entity name reported for missing or foreign documents.
pub const DOCUMENT_ENTITY: &str = "Document";

/// Confirm the caller may see `node`.
///
/// A foreign node is reported as [`CoreError::NotFound`], never `Forbidden`,
/// so callers cannot probe for ids belonging to other organizations.
pub fn authorize_version(caller: &Caller, node: &VersionNode) -> Result<(), CoreError> {
    if node.organization_id != caller.organization_id {
        tracing::warn!(
            version_id = node.id,
            user_id = caller.user_id,
            caller_org = caller.organization_id,
            "Cross-organization version access rejected"
        );
        return Err(CoreError::NotFound {
            entity: VERSION_ENTITY,
            id: node.id,
        });
    }
    Ok(())
}

/// Confirm the caller may see `document`. Same rules as [`authorize_version`].
pub fn authorize_document(caller: &Caller, document: &Document) -> Result<(), CoreError> {
    if document.organization_id != caller.organization_id {
        tracing::warn!(
            document_id = document.id,
            user_id = caller.user_id,
            caller_org = caller.organization_id,
            "Cross-organization document access rejected"
        );
        return Err(CoreError::NotFound {
            entity: DOCUMENT_ENTITY,
            id: document.id,
        });
    }
    Ok(())
}
