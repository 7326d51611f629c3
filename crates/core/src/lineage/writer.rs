//! Version creation, restore, and in-place edits of the latest version.
//!
//! History is strictly append-only: creating or restoring a version inserts a
//! single new leaf and never touches an existing node. A failed write
//! therefore leaves the lineage exactly as it was.
//!
//! Version numbers come from a lineage-wide monotonic counter rather than
//! `parent + 1`, so they stay unique across branches. After a restore the
//! new node's number is the lineage maximum plus one, not its parent's
//! number plus one. The store's unique constraint on
//! `(document_id, version_number)` makes assignment atomic; on a collision
//! the writer retries with the next candidate.

use serde::Serialize;

use super::access::Caller;
use super::node::{NewVersionNode, VersionNode, VersionPatch, VersionStatus};
use super::store::{HeadUpdate, StoreError};
use super::LineageEngine;
use crate::document::validate_content;
use crate::error::CoreError;
use crate::lineage::access::VERSION_ENTITY;
use crate::types::DbId;

/// Outcome of [`LineageEngine::create_version`] and
/// [`LineageEngine::restore_version`]. The caller should switch its editing
/// context to `id`; the previously open node is now a historical leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedVersion {
    pub id: DbId,
    pub version: i32,
    pub message: String,
}

impl LineageEngine {
    /// Append a new draft version below `from_id`.
    ///
    /// The new node copies `from_id`'s content unless `content_override` is
    /// given. `from_id` itself is not modified.
    pub async fn create_version(
        &self,
        caller: &Caller,
        from_id: DbId,
        content_override: Option<serde_json::Value>,
    ) -> Result<CreatedVersion, CoreError> {
        let source = self.get_version(caller, from_id).await?;
        if let Some(content) = &content_override {
            validate_content(content, self.config().max_content_bytes)?;
        }
        let content = content_override.unwrap_or_else(|| source.content.clone());

        let node = self.append_leaf(caller, &source, content, None).await?;
        tracing::info!(
            version_id = node.id,
            parent_id = source.id,
            document_id = node.document_id,
            version = node.version_number,
            user_id = caller.user_id,
            "Version created"
        );

        Ok(CreatedVersion {
            id: node.id,
            version: node.version_number,
            message: format!("Version {} created", node.version_number),
        })
    }

    /// Bring an older version forward as a new draft leaf.
    ///
    /// The new node is a child of `target_id` carrying an exact copy of its
    /// content. Neither the target nor any newer node is changed. When the
    /// caller passes the version it currently has open, that version must be
    /// in the same lineage and must not be the target itself.
    pub async fn restore_version(
        &self,
        caller: &Caller,
        target_id: DbId,
        current_id: Option<DbId>,
    ) -> Result<CreatedVersion, CoreError> {
        let target = self.get_version(caller, target_id).await?;

        if let Some(current_id) = current_id {
            let current = self.get_version(caller, current_id).await?;
            if current.document_id != target.document_id {
                return Err(CoreError::Validation(format!(
                    "Version {target_id} does not belong to the same document as version {current_id}"
                )));
            }
            if current.id == target.id {
                return Err(CoreError::Validation(format!(
                    "Version {} is already the open version",
                    target.version_number
                )));
            }
        }

        let latest = self
            .store()
            .max_version_number(target.document_id)
            .await?
            .unwrap_or(target.version_number);
        if target.version_number >= latest {
            return Err(CoreError::Validation(format!(
                "Version {} is the latest version; there is no newer state to restore from",
                target.version_number
            )));
        }

        let node = self
            .append_leaf(caller, &target, target.content.clone(), Some(latest))
            .await?;
        tracing::info!(
            version_id = node.id,
            restored_from = target.id,
            document_id = node.document_id,
            version = node.version_number,
            user_id = caller.user_id,
            "Version restored"
        );

        Ok(CreatedVersion {
            id: node.id,
            version: node.version_number,
            message: format!(
                "Restored version {} as version {}",
                target.version_number, node.version_number
            ),
        })
    }

    /// Patch the content or status of the document's latest version.
    ///
    /// Any version that a later create or restore has numbered past is
    /// immutable, including siblings left behind as childless leaves, and
    /// yields [`CoreError::Conflict`].
    pub async fn update_version(
        &self,
        caller: &Caller,
        id: DbId,
        patch: &VersionPatch,
    ) -> Result<VersionNode, CoreError> {
        if patch.is_empty() {
            return Err(CoreError::Validation(
                "Update must change content or status".to_string(),
            ));
        }
        let node = self.get_version(caller, id).await?;
        if let Some(content) = &patch.content {
            validate_content(content, self.config().max_content_bytes)?;
        }

        match self.store().update_head(id, patch).await? {
            HeadUpdate::Updated(updated) => {
                tracing::debug!(version_id = id, status = %updated.status, "Version patched");
                Ok(updated)
            }
            HeadUpdate::Superseded => Err(CoreError::Conflict(format!(
                "Version {} has been superseded and can no longer be edited",
                node.version_number
            ))),
            HeadUpdate::NotFound => Err(CoreError::NotFound {
                entity: VERSION_ENTITY,
                id,
            }),
        }
    }

    /// Insert a new draft child of `parent` under the next free number.
    ///
    /// `known_max` skips the initial counter read when the caller already
    /// has it.
    async fn append_leaf(
        &self,
        caller: &Caller,
        parent: &VersionNode,
        content: serde_json::Value,
        known_max: Option<i32>,
    ) -> Result<VersionNode, CoreError> {
        let current_max = match known_max {
            Some(max) => max,
            None => self
                .store()
                .max_version_number(parent.document_id)
                .await?
                .unwrap_or(parent.version_number),
        };
        let mut candidate = current_max + 1;
        let attempts = self.config().max_insert_attempts.max(1);

        for attempt in 1..=attempts {
            let input = NewVersionNode {
                document_id: parent.document_id,
                parent_id: parent.id,
                version_number: candidate,
                status: VersionStatus::Draft,
                content: content.clone(),
                organization_id: parent.organization_id,
                created_by: caller.user_id,
            };
            match self.store().insert_version(&input).await {
                Ok(node) => return Ok(node),
                Err(StoreError::Conflict(detail)) => {
                    tracing::warn!(
                        document_id = parent.document_id,
                        candidate,
                        attempt,
                        %detail,
                        "Version number already taken, retrying with next candidate"
                    );
                    candidate += 1;
                }
                Err(err) => {
                    tracing::error!(
                        document_id = parent.document_id,
                        parent_id = parent.id,
                        error = %err,
                        "Version insert failed"
                    );
                    return Err(err.into());
                }
            }
        }

        Err(CoreError::WriteConflict(format!(
            "Could not assign a version number for document {} after {attempts} attempts",
            parent.document_id
        )))
    }
}
