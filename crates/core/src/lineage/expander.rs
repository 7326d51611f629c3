//! Full-tree discovery for a lineage.
//!
//! Restores of restores create descendants at arbitrary depth, so a single
//! "children of root" query is not enough. Expansion runs frontier rounds:
//! each round issues one batched [`VersionStore::list_children`] call for the
//! ids discovered in the previous round and stops once a round adds nothing.
//!
//! Cost is one store round-trip per tree level, O(N) in the degenerate chain
//! case. That is fine for per-document lineages of tens of nodes; past about
//! a thousand nodes a single recursive query in the store would be needed.
//!
//! A node inserted while expansion is running may be missed; it shows up on
//! the next fetch. The result is never wrong, only momentarily stale.

use std::collections::HashSet;

use super::access::VERSION_ENTITY;
use super::node::VersionNode;
use super::store::VersionStore;
use crate::error::CoreError;
use crate::types::DbId;

/// Return every node of the lineage rooted at `root_id`, root included.
///
/// Nodes come back in discovery order (breadth-first); ordering for display
/// is applied by the history view.
pub async fn expand(store: &dyn VersionStore, root_id: DbId) -> Result<Vec<VersionNode>, CoreError> {
    let root = store
        .find_version(root_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: VERSION_ENTITY,
            id: root_id,
        })?;
    expand_from(store, root).await
}

/// Same as [`expand`] for a root node the caller already holds.
pub async fn expand_from(
    store: &dyn VersionStore,
    root: VersionNode,
) -> Result<Vec<VersionNode>, CoreError> {
    let root_id = root.id;
    let mut visited: HashSet<DbId> = HashSet::from([root_id]);
    let mut frontier: Vec<DbId> = vec![root_id];
    let mut nodes = vec![root];
    let mut rounds = 0usize;

    while !frontier.is_empty() {
        rounds += 1;
        let children = store.list_children(&frontier).await?;

        frontier = Vec::new();
        for child in children {
            if visited.insert(child.id) {
                frontier.push(child.id);
                nodes.push(child);
            }
        }
    }

    tracing::debug!(root_id, rounds, count = nodes.len(), "Expanded lineage");
    Ok(nodes)
}
