//! Document lifecycle: creation with a root version, lookup, cascade delete.

use super::access::{authorize_document, Caller, DOCUMENT_ENTITY};
use super::node::{Document, NewDocument, VersionNode};
use super::LineageEngine;
use crate::document::{validate_content, validate_document_name, validate_document_type};
use crate::error::CoreError;
use crate::types::DbId;

impl LineageEngine {
    /// Create a document for the caller's organization together with its
    /// lineage root (version 1, draft, no parent).
    pub async fn create_document(
        &self,
        caller: &Caller,
        name: &str,
        document_type: &str,
        subject_id: Option<DbId>,
        content: serde_json::Value,
    ) -> Result<(Document, VersionNode), CoreError> {
        validate_document_name(name)?;
        validate_document_type(document_type)?;
        validate_content(&content, self.config().max_content_bytes)?;

        let input = NewDocument {
            organization_id: caller.organization_id,
            name: name.to_string(),
            document_type: document_type.to_string(),
            subject_id,
            created_by: caller.user_id,
            content,
        };
        let (document, root) = self.store().create_document(&input).await?;

        tracing::info!(
            document_id = document.id,
            root_id = root.id,
            organization_id = document.organization_id,
            user_id = caller.user_id,
            "Document created"
        );
        Ok((document, root))
    }

    pub async fn get_document(&self, caller: &Caller, id: DbId) -> Result<Document, CoreError> {
        let document = self
            .store()
            .find_document(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: DOCUMENT_ENTITY,
                id,
            })?;
        authorize_document(caller, &document)?;
        Ok(document)
    }

    /// Delete a document and its entire lineage.
    pub async fn delete_document(&self, caller: &Caller, id: DbId) -> Result<(), CoreError> {
        self.get_document(caller, id).await?;
        if !self.store().delete_document(id).await? {
            return Err(CoreError::NotFound {
                entity: DOCUMENT_ENTITY,
                id,
            });
        }
        tracing::info!(document_id = id, user_id = caller.user_id, "Document deleted");
        Ok(())
    }
}
