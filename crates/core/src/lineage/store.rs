//! Persistence contract for version lineages.
//!
//! The engine never holds lineage state in memory between calls; every
//! operation reads and writes through a [`VersionStore`]. Implementations
//! must make [`VersionStore::insert_version`] atomic with a uniqueness
//! guarantee on `(document_id, version_number)`.

use async_trait::async_trait;

use super::node::{Document, NewDocument, NewVersionNode, VersionNode, VersionPatch};
use crate::error::CoreError;
use crate::types::DbId;

/// Errors surfaced by a [`VersionStore`] implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write. Callers may retry.
    #[error("Unique constraint violated: {0}")]
    Conflict(String),

    /// Any other backend failure (connection, decoding, constraint).
    #[error("Store backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict(msg) => CoreError::WriteConflict(msg),
            StoreError::Backend(msg) => CoreError::Internal(msg),
        }
    }
}

/// Outcome of an in-place patch of a lineage's latest version.
#[derive(Debug, Clone, PartialEq)]
pub enum HeadUpdate {
    /// The node held the highest version number and has been patched.
    Updated(VersionNode),
    /// A newer version exists in the lineage; the node is immutable.
    Superseded,
    /// No node with that id exists.
    NotFound,
}

/// Storage collaborator for the lineage engine.
#[async_trait]
pub trait VersionStore: Send + Sync {
    /// Point lookup of a version node.
    async fn find_version(&self, id: DbId) -> StoreResult<Option<VersionNode>>;

    /// Batched lookup of every node whose `parent_id` is in `parent_ids`.
    async fn list_children(&self, parent_ids: &[DbId]) -> StoreResult<Vec<VersionNode>>;

    /// Highest version number currently assigned within a document's lineage.
    async fn max_version_number(&self, document_id: DbId) -> StoreResult<Option<i32>>;

    /// Atomically insert a non-root node.
    ///
    /// Returns [`StoreError::Conflict`] if the version number is taken.
    async fn insert_version(&self, input: &NewVersionNode) -> StoreResult<VersionNode>;

    /// Patch a node in place, but only while it holds the highest version
    /// number of its document.
    ///
    /// The check and the write must happen atomically with respect to
    /// concurrent [`VersionStore::insert_version`] calls on the same document.
    async fn update_head(&self, id: DbId, patch: &VersionPatch) -> StoreResult<HeadUpdate>;

    /// Insert a document and its root version (v1, draft) atomically.
    async fn create_document(&self, input: &NewDocument) -> StoreResult<(Document, VersionNode)>;

    async fn find_document(&self, id: DbId) -> StoreResult<Option<Document>>;

    /// Delete a document and, by cascade, its whole lineage.
    ///
    /// Returns `true` if a document was deleted.
    async fn delete_document(&self, id: DbId) -> StoreResult<bool>;

    /// Cheap liveness probe used by health checks.
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
