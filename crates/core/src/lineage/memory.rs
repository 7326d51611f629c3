//! In-process [`VersionStore`] backed by ordered maps.
//!
//! Used by engine unit tests, API integration tests, and local tooling that
//! runs without Postgres. Enforces the same constraints as the database
//! schema: unique `(document_id, version_number)`, cascade on document
//! delete, and atomic latest-version-only patches.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use super::node::{Document, NewDocument, NewVersionNode, VersionNode, VersionPatch, VersionStatus};
use super::store::{HeadUpdate, StoreError, StoreResult, VersionStore};
use crate::types::DbId;

#[derive(Debug, Default)]
struct Tables {
    next_id: DbId,
    documents: BTreeMap<DbId, Document>,
    versions: BTreeMap<DbId, VersionNode>,
}

impl Tables {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Thread-safe in-memory version store.
#[derive(Debug, Default)]
pub struct MemoryVersionStore {
    tables: Mutex<Tables>,
    fail_writes: AtomicBool,
}

impl MemoryVersionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail with [`StoreError::Backend`].
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Insert a node exactly as given, bypassing every constraint.
    ///
    /// Only meant for building corrupted fixtures (cycles, dangling parents).
    pub fn seed_version(&self, node: VersionNode) -> StoreResult<()> {
        let mut tables = self.lock()?;
        tables.next_id = tables.next_id.max(node.id);
        tables.versions.insert(node.id, node);
        Ok(())
    }

    /// Total number of version rows across all documents.
    pub fn version_count(&self) -> StoreResult<usize> {
        Ok(self.lock()?.versions.len())
    }

    fn lock(&self) -> StoreResult<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }

    fn check_writable(&self) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("simulated write failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl VersionStore for MemoryVersionStore {
    async fn find_version(&self, id: DbId) -> StoreResult<Option<VersionNode>> {
        Ok(self.lock()?.versions.get(&id).cloned())
    }

    async fn list_children(&self, parent_ids: &[DbId]) -> StoreResult<Vec<VersionNode>> {
        let tables = self.lock()?;
        Ok(tables
            .versions
            .values()
            .filter(|v| v.parent_id.is_some_and(|p| parent_ids.contains(&p)))
            .cloned()
            .collect())
    }

    async fn max_version_number(&self, document_id: DbId) -> StoreResult<Option<i32>> {
        let tables = self.lock()?;
        Ok(tables
            .versions
            .values()
            .filter(|v| v.document_id == document_id)
            .map(|v| v.version_number)
            .max())
    }

    async fn insert_version(&self, input: &NewVersionNode) -> StoreResult<VersionNode> {
        self.check_writable()?;
        let mut tables = self.lock()?;

        let document = tables
            .documents
            .get(&input.document_id)
            .cloned()
            .ok_or_else(|| {
                StoreError::Backend(format!(
                    "foreign key violation: document {} does not exist",
                    input.document_id
                ))
            })?;
        if !tables.versions.contains_key(&input.parent_id) {
            return Err(StoreError::Backend(format!(
                "foreign key violation: parent version {} does not exist",
                input.parent_id
            )));
        }
        let taken = tables.versions.values().any(|v| {
            v.document_id == input.document_id && v.version_number == input.version_number
        });
        if taken {
            return Err(StoreError::Conflict(format!(
                "uq_document_versions_document_number ({}, {})",
                input.document_id, input.version_number
            )));
        }

        let now = Utc::now();
        let node = VersionNode {
            id: tables.allocate_id(),
            document_id: input.document_id,
            parent_id: Some(input.parent_id),
            version_number: input.version_number,
            status: input.status,
            content: input.content.clone(),
            organization_id: input.organization_id,
            name: document.name,
            document_type: document.document_type,
            subject_id: document.subject_id,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.versions.insert(node.id, node.clone());
        Ok(node)
    }

    async fn update_head(&self, id: DbId, patch: &VersionPatch) -> StoreResult<HeadUpdate> {
        self.check_writable()?;
        let mut tables = self.lock()?;

        let Some(document_id) = tables.versions.get(&id).map(|v| v.document_id) else {
            return Ok(HeadUpdate::NotFound);
        };
        let latest = tables
            .versions
            .values()
            .filter(|v| v.document_id == document_id)
            .map(|v| v.version_number)
            .max();
        let Some(node) = tables.versions.get_mut(&id) else {
            return Ok(HeadUpdate::NotFound);
        };
        if latest.is_some_and(|max| node.version_number < max) {
            return Ok(HeadUpdate::Superseded);
        }
        if let Some(content) = &patch.content {
            node.content = content.clone();
        }
        if let Some(status) = patch.status {
            node.status = status;
        }
        node.updated_at = Utc::now();
        Ok(HeadUpdate::Updated(node.clone()))
    }

    async fn create_document(&self, input: &NewDocument) -> StoreResult<(Document, VersionNode)> {
        self.check_writable()?;
        let mut tables = self.lock()?;

        let now = Utc::now();
        let document = Document {
            id: tables.allocate_id(),
            organization_id: input.organization_id,
            name: input.name.clone(),
            document_type: input.document_type.clone(),
            subject_id: input.subject_id,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        let root = VersionNode {
            id: tables.allocate_id(),
            document_id: document.id,
            parent_id: None,
            version_number: 1,
            status: VersionStatus::Draft,
            content: input.content.clone(),
            organization_id: input.organization_id,
            name: document.name.clone(),
            document_type: document.document_type.clone(),
            subject_id: document.subject_id,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        tables.documents.insert(document.id, document.clone());
        tables.versions.insert(root.id, root.clone());
        Ok((document, root))
    }

    async fn find_document(&self, id: DbId) -> StoreResult<Option<Document>> {
        Ok(self.lock()?.documents.get(&id).cloned())
    }

    async fn delete_document(&self, id: DbId) -> StoreResult<bool> {
        self.check_writable()?;
        let mut tables = self.lock()?;
        if tables.documents.remove(&id).is_none() {
            return Ok(false);
        }
        tables.versions.retain(|_, v| v.document_id != id);
        Ok(true)
    }
}
