//! Lineage root resolution.

use std::collections::HashSet;

use super::access::VERSION_ENTITY;
use super::node::VersionNode;
use super::store::VersionStore;
use crate::error::CoreError;
use crate::types::DbId;

/// Walk `parent_id` pointers upward from `node_id` and return the root node.
///
/// The walk is bounded by `max_depth` parent hops and by a visited set, so a
/// corrupted parent chain terminates with [`CoreError::LineageCycle`] instead
/// of looping. A dangling parent pointer yields [`CoreError::BrokenLineage`];
/// the last node reached is never passed off as the root.
pub async fn resolve_root(
    store: &dyn VersionStore,
    node_id: DbId,
    max_depth: usize,
) -> Result<VersionNode, CoreError> {
    let mut current = store
        .find_version(node_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: VERSION_ENTITY,
            id: node_id,
        })?;

    let mut visited: HashSet<DbId> = HashSet::new();
    visited.insert(current.id);

    while let Some(parent_id) = current.parent_id {
        let depth = visited.len();
        if depth > max_depth || !visited.insert(parent_id) {
            tracing::error!(
                start_id = node_id,
                at_id = current.id,
                parent_id,
                depth,
                max_depth,
                "Lineage walk did not terminate at a root"
            );
            return Err(CoreError::LineageCycle { id: node_id, depth });
        }

        current = match store.find_version(parent_id).await? {
            Some(parent) => parent,
            None => {
                tracing::error!(
                    start_id = node_id,
                    child_id = current.id,
                    parent_id,
                    "Lineage parent pointer is dangling"
                );
                return Err(CoreError::BrokenLineage {
                    id: current.id,
                    missing_parent: parent_id,
                });
            }
        };
    }

    Ok(current)
}
