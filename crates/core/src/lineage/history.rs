//! Version history view: resolve the root, expand the tree, present it.

use serde::Serialize;

use super::access::{authorize_version, Caller, VERSION_ENTITY};
use super::expander::expand_from;
use super::node::{VersionNode, VersionStatus};
use super::resolver::resolve_root;
use super::LineageEngine;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// The full history of a lineage as seen from one caller's open version.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionHistory {
    /// Version number of the node the caller asked about.
    pub current_version: i32,
    /// Every node of the lineage, newest version number first.
    pub versions: Vec<VersionSummary>,
}

/// One row of a [`VersionHistory`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSummary {
    pub id: DbId,
    pub parent_id: Option<DbId>,
    pub name: String,
    pub version: i32,
    pub status: VersionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Display flag for the requested node. Never persisted.
    pub is_current: bool,
}

impl LineageEngine {
    /// Fetch a single version node visible to `caller`.
    pub async fn get_version(&self, caller: &Caller, id: DbId) -> Result<VersionNode, CoreError> {
        let node = self
            .store()
            .find_version(id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: VERSION_ENTITY,
                id,
            })?;
        authorize_version(caller, &node)?;
        Ok(node)
    }

    /// List every version in the lineage containing `node_id`.
    ///
    /// A lineage holding only its root yields a single entry, not an error.
    pub async fn history(&self, caller: &Caller, node_id: DbId) -> Result<VersionHistory, CoreError> {
        let viewed = self.get_version(caller, node_id).await?;
        let root = resolve_root(self.store(), viewed.id, self.config().max_lineage_depth).await?;
        let root_id = root.id;
        let nodes = expand_from(self.store(), root).await?;

        let history = build_history(&viewed, nodes)?;
        tracing::debug!(
            version_id = node_id,
            root_id,
            count = history.versions.len(),
            "Built version history"
        );
        Ok(history)
    }
}

/// Order an expanded lineage for display and flag the viewed node.
///
/// Fails if the viewed node is missing from the set or if any node belongs
/// to a different organization: both mean the stored tree is inconsistent,
/// and an incomplete history must not be shown as if it were whole.
pub fn build_history(
    viewed: &VersionNode,
    mut nodes: Vec<VersionNode>,
) -> Result<VersionHistory, CoreError> {
    if !nodes.iter().any(|n| n.id == viewed.id) {
        tracing::error!(
            version_id = viewed.id,
            count = nodes.len(),
            "Viewed version is not reachable from its lineage root"
        );
        return Err(CoreError::Internal(format!(
            "Version {} is not reachable from its lineage root",
            viewed.id
        )));
    }
    if let Some(foreign) = nodes
        .iter()
        .find(|n| n.organization_id != viewed.organization_id)
    {
        tracing::error!(
            version_id = viewed.id,
            foreign_id = foreign.id,
            expected_org = viewed.organization_id,
            found_org = foreign.organization_id,
            "Lineage spans more than one organization"
        );
        return Err(CoreError::Internal(format!(
            "Lineage of version {} spans more than one organization",
            viewed.id
        )));
    }

    nodes.sort_by(|a, b| {
        b.version_number
            .cmp(&a.version_number)
            .then_with(|| b.id.cmp(&a.id))
    });

    let versions = nodes
        .into_iter()
        .map(|n| VersionSummary {
            is_current: n.id == viewed.id,
            id: n.id,
            parent_id: n.parent_id,
            name: n.name,
            version: n.version_number,
            status: n.status,
            created_at: n.created_at,
            updated_at: n.updated_at,
        })
        .collect();

    Ok(VersionHistory {
        current_version: viewed.version_number,
        versions,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::lineage::fixtures::{node, seeded_store};
    use crate::lineage::LineageConfig;
    use assert_matches::assert_matches;

    fn engine(nodes: Vec<VersionNode>) -> LineageEngine {
        LineageEngine::new(Arc::new(seeded_store(nodes)), LineageConfig::default())
    }

    const CALLER: Caller = Caller {
        user_id: 1,
        organization_id: 1,
    };

    #[tokio::test]
    async fn history_is_sorted_descending_with_current_flag() {
        let engine = engine(vec![
            node(1, None, 1),
            node(2, Some(1), 2),
            node(3, Some(1), 3),
        ]);

        let history = engine.history(&CALLER, 2).await.unwrap();
        assert_eq!(history.current_version, 2);
        let versions: Vec<(i32, bool)> = history
            .versions
            .iter()
            .map(|v| (v.version, v.is_current))
            .collect();
        assert_eq!(versions, vec![(3, false), (2, true), (1, false)]);
    }

    #[tokio::test]
    async fn every_node_sees_the_whole_lineage() {
        let engine = engine(vec![
            node(1, None, 1),
            node(2, Some(1), 2),
            node(3, Some(2), 3),
            node(4, Some(1), 4),
            node(5, Some(4), 5),
        ]);
        for id in 1..=5 {
            let history = engine.history(&CALLER, id).await.unwrap();
            assert_eq!(history.versions.len(), 5);
            assert!(history.versions.iter().any(|v| v.id == id && v.is_current));
        }
    }

    #[tokio::test]
    async fn root_only_lineage_has_one_entry() {
        let engine = engine(vec![node(1, None, 1)]);
        let history = engine.history(&CALLER, 1).await.unwrap();
        assert_eq!(history.versions.len(), 1);
        assert!(history.versions[0].is_current);
    }

    #[tokio::test]
    async fn foreign_caller_gets_not_found() {
        let engine = engine(vec![node(1, None, 1)]);
        let stranger = Caller {
            user_id: 9,
            organization_id: 2,
        };
        assert_matches!(
            engine.history(&stranger, 1).await,
            Err(CoreError::NotFound { id: 1, .. })
        );
    }

    #[tokio::test]
    async fn cyclic_lineage_fails_instead_of_partial_history() {
        let engine = engine(vec![node(1, Some(2), 1), node(2, Some(1), 2)]);
        assert_matches!(
            engine.history(&CALLER, 1).await,
            Err(CoreError::LineageCycle { .. })
        );
    }

    #[tokio::test]
    async fn mixed_organizations_are_rejected() {
        let mut foreign = node(2, Some(1), 2);
        foreign.organization_id = 2;
        let engine = engine(vec![node(1, None, 1), foreign]);
        assert_matches!(engine.history(&CALLER, 1).await, Err(CoreError::Internal(_)));
    }

    #[test]
    fn history_serializes_camel_case() {
        let history = build_history(&node(1, None, 1), vec![node(1, None, 1)]).unwrap();
        let json = serde_json::to_value(&history).unwrap();
        assert_eq!(json["currentVersion"], 1);
        assert_eq!(json["versions"][0]["isCurrent"], true);
        assert_eq!(json["versions"][0]["status"], "draft");
        assert!(json["versions"][0].get("createdAt").is_some());
    }
}
