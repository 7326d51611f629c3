//! Document version lineage engine.
//!
//! A document's edit history is a tree of [`node::VersionNode`]s linked by
//! parent ids. Restoring an old version appends a new child of that version,
//! so siblings are normal and nothing is ever rewritten once superseded.
//!
//! - [`resolver`] walks parent pointers up to the lineage root.
//! - [`expander`] discovers every descendant of a root.
//! - [`history`] combines both into the version listing a caller sees.
//! - [`writer`] appends new versions and restores old ones.
//! - [`access`] compares the caller's organization with the lineage's.
//!
//! "Current version" is never stored: it is whichever node id a caller has
//! open, and two callers may have different current nodes in one lineage.

pub mod access;
pub mod documents;
pub mod expander;
pub mod history;
pub mod memory;
pub mod node;
pub mod resolver;
pub mod store;
pub mod writer;

use std::sync::Arc;

use crate::document::DEFAULT_MAX_CONTENT_BYTES;
use store::VersionStore;

/// Default bound on parent hops when resolving a lineage root.
pub const DEFAULT_MAX_LINEAGE_DEPTH: usize = 1000;

/// Default number of insert attempts before a numbering collision is fatal.
pub const DEFAULT_MAX_INSERT_ATTEMPTS: u32 = 5;

/// Tunables for the lineage engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineageConfig {
    /// Maximum parent hops before root resolution gives up with a cycle error.
    pub max_lineage_depth: usize,
    /// Insert attempts per version creation under numbering conflicts.
    pub max_insert_attempts: u32,
    /// Maximum serialized size of a content snapshot.
    pub max_content_bytes: usize,
}

impl Default for LineageConfig {
    fn default() -> Self {
        Self {
            max_lineage_depth: DEFAULT_MAX_LINEAGE_DEPTH,
            max_insert_attempts: DEFAULT_MAX_INSERT_ATTEMPTS,
            max_content_bytes: DEFAULT_MAX_CONTENT_BYTES,
        }
    }
}

/// Entry point for all lineage operations.
///
/// Stateless apart from its store handle, so it is cheap to share across
/// request handlers and safe to run in many workers at once.
#[derive(Clone)]
pub struct LineageEngine {
    store: Arc<dyn VersionStore>,
    config: LineageConfig,
}

impl LineageEngine {
    pub fn new(store: Arc<dyn VersionStore>, config: LineageConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LineageConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn VersionStore {
        self.store.as_ref()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Hand-built nodes for resolver and expander tests.

    use chrono::Utc;

    use super::memory::MemoryVersionStore;
    use super::node::{VersionNode, VersionStatus};
    use crate::types::DbId;

    pub fn node(id: DbId, parent_id: Option<DbId>, version_number: i32) -> VersionNode {
        VersionNode {
            id,
            document_id: 1,
            parent_id,
            version_number,
            status: VersionStatus::Draft,
            content: serde_json::json!({ "version": version_number }),
            organization_id: 1,
            name: "Incident Response Plan".to_string(),
            document_type: "plan".to_string(),
            subject_id: None,
            created_by: 1,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    pub fn seeded_store(nodes: Vec<VersionNode>) -> MemoryVersionStore {
        let store = MemoryVersionStore::new();
        for node in nodes {
            store.seed_version(node).expect("seed fixture node");
        }
        store
    }
}
