//! End-to-end lineage scenarios run against the in-memory store.

use std::sync::Arc;

use assert_matches::assert_matches;
use chrono::Utc;
use serde_json::json;

use docvault_core::error::CoreError;
use docvault_core::lineage::access::Caller;
use docvault_core::lineage::expander::expand;
use docvault_core::lineage::memory::MemoryVersionStore;
use docvault_core::lineage::node::{VersionNode, VersionPatch, VersionStatus};
use docvault_core::lineage::resolver::resolve_root;
use docvault_core::lineage::store::VersionStore;
use docvault_core::lineage::{LineageConfig, LineageEngine};

const CALLER: Caller = Caller {
    user_id: 21,
    organization_id: 3,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn setup() -> (LineageEngine, Arc<MemoryVersionStore>, VersionNode) {
    let store = Arc::new(MemoryVersionStore::new());
    let engine = LineageEngine::new(store.clone(), LineageConfig::default());
    let (_, root) = engine
        .create_document(
            &CALLER,
            "SOC 2 System Description",
            "system_description",
            Some(77),
            json!({"sections": ["overview"]}),
        )
        .await
        .unwrap();
    (engine, store, root)
}

fn dangling(id: i64, parent_id: Option<i64>) -> VersionNode {
    VersionNode {
        id,
        document_id: 1,
        parent_id,
        version_number: id as i32,
        status: VersionStatus::Draft,
        content: json!({}),
        organization_id: CALLER.organization_id,
        name: "Corrupted".to_string(),
        document_type: "policy".to_string(),
        subject_id: None,
        created_by: CALLER.user_id,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[tokio::test]
async fn finalized_second_version_heads_the_history() {
    let (engine, _, root) = setup().await;

    let v2 = engine.create_version(&CALLER, root.id, None).await.unwrap();
    engine
        .update_version(
            &CALLER,
            v2.id,
            &VersionPatch {
                content: None,
                status: Some(VersionStatus::Final),
            },
        )
        .await
        .unwrap();

    let history = engine.history(&CALLER, v2.id).await.unwrap();
    let rows: Vec<(i32, bool, VersionStatus)> = history
        .versions
        .iter()
        .map(|v| (v.version, v.is_current, v.status))
        .collect();
    assert_eq!(
        rows,
        vec![
            (2, true, VersionStatus::Final),
            (1, false, VersionStatus::Draft),
        ]
    );
}

#[tokio::test]
async fn restoring_root_from_second_version_adds_third_node() {
    let (engine, store, root) = setup().await;
    let v2 = engine
        .create_version(&CALLER, root.id, Some(json!({"sections": ["overview", "scope"]})))
        .await
        .unwrap();
    let v2_node = store.find_version(v2.id).await.unwrap().unwrap();

    let v3 = engine
        .restore_version(&CALLER, root.id, Some(v2.id))
        .await
        .unwrap();
    assert_eq!(v3.version, 3);

    let v3_node = store.find_version(v3.id).await.unwrap().unwrap();
    assert_eq!(v3_node.content, root.content);
    assert_eq!(store.find_version(root.id).await.unwrap().unwrap(), root);
    assert_eq!(store.find_version(v2.id).await.unwrap().unwrap(), v2_node);

    let history = engine.history(&CALLER, v3.id).await.unwrap();
    assert_eq!(history.versions.len(), 3);
    assert_eq!(history.current_version, 3);
}

#[tokio::test]
async fn cyclic_fixture_fails_resolution() {
    let store = MemoryVersionStore::new();
    store.seed_version(dangling(100, Some(200))).unwrap();
    store.seed_version(dangling(200, Some(100))).unwrap();

    assert_matches!(
        resolve_root(&store, 100, 1000).await,
        Err(CoreError::LineageCycle { id: 100, .. })
    );
}

#[tokio::test]
async fn concurrent_creates_from_root_yield_distinct_leaves() {
    let (engine, store, root) = setup().await;

    let (a, b) = tokio::join!(
        engine.create_version(&CALLER, root.id, None),
        engine.create_version(&CALLER, root.id, None),
    );
    let (a, b) = (a.unwrap(), b.unwrap());

    assert_ne!(a.id, b.id);
    assert_ne!(a.version, b.version);
    for id in [a.id, b.id] {
        let node = store.find_version(id).await.unwrap().unwrap();
        assert_eq!(node.parent_id, Some(root.id));
    }
}

#[tokio::test]
async fn root_only_document_has_single_current_entry() {
    let (engine, _, root) = setup().await;

    let history = engine.history(&CALLER, root.id).await.unwrap();
    assert_eq!(history.versions.len(), 1);
    assert!(history.versions[0].is_current);

    assert_matches!(
        engine.restore_version(&CALLER, root.id, None).await,
        Err(CoreError::Validation(_))
    );
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[tokio::test]
async fn every_node_is_in_its_own_expanded_lineage() {
    let (engine, store, root) = setup().await;

    // Build a branching tree: chains of restores off several ancestors.
    let mut ids = vec![root.id];
    for step in 0..12usize {
        let from = ids[step / 2];
        let latest = *ids.last().unwrap();
        let created = if step % 3 == 2 && from != latest {
            engine.restore_version(&CALLER, from, Some(latest)).await
        } else {
            engine.create_version(&CALLER, from, None).await
        }
        .unwrap();
        ids.push(created.id);
    }

    for id in &ids {
        let root_node = resolve_root(store.as_ref(), *id, 1000).await.unwrap();
        assert_eq!(root_node.id, root.id);
        let lineage = expand(store.as_ref(), root_node.id).await.unwrap();
        assert!(lineage.iter().any(|n| n.id == *id));
        assert_eq!(lineage.len(), ids.len());
    }

    let mut numbers: Vec<i32> = expand(store.as_ref(), root.id)
        .await
        .unwrap()
        .iter()
        .map(|n| n.version_number)
        .collect();
    numbers.sort_unstable();
    numbers.dedup();
    assert_eq!(numbers.len(), ids.len(), "version numbers must be unique");
}

#[tokio::test]
async fn failed_restore_keeps_in_progress_edits() {
    let (engine, store, root) = setup().await;
    let v2 = engine.create_version(&CALLER, root.id, None).await.unwrap();
    let draft = json!({"sections": ["overview", "unsaved work"]});
    engine
        .update_version(
            &CALLER,
            v2.id,
            &VersionPatch {
                content: Some(draft.clone()),
                status: None,
            },
        )
        .await
        .unwrap();

    store.set_fail_writes(true);
    assert_matches!(
        engine.restore_version(&CALLER, root.id, Some(v2.id)).await,
        Err(CoreError::Internal(_))
    );
    store.set_fail_writes(false);

    let v2_node = store.find_version(v2.id).await.unwrap().unwrap();
    assert_eq!(v2_node.content, draft);
    assert_eq!(store.version_count().unwrap(), 2);
}

#[tokio::test]
async fn restored_over_version_can_no_longer_be_edited() {
    let (engine, store, root) = setup().await;
    let v2 = engine
        .create_version(&CALLER, root.id, Some(json!({"sections": ["v2"]})))
        .await
        .unwrap();
    let v3 = engine
        .restore_version(&CALLER, root.id, Some(v2.id))
        .await
        .unwrap();
    assert_eq!(v3.version, 3);

    // v2 has no children, but v3 has numbered past it.
    let rewrite = VersionPatch {
        content: Some(json!({"sections": ["rewritten history"]})),
        status: Some(VersionStatus::Final),
    };
    assert_matches!(
        engine.update_version(&CALLER, v2.id, &rewrite).await,
        Err(CoreError::Conflict(_))
    );

    let v2_node = store.find_version(v2.id).await.unwrap().unwrap();
    assert_eq!(v2_node.content, json!({"sections": ["v2"]}));
    assert_eq!(v2_node.status, VersionStatus::Draft);

    // Sibling branches left behind by create_version are frozen too.
    let v4 = engine.create_version(&CALLER, root.id, None).await.unwrap();
    assert_matches!(
        engine.update_version(&CALLER, v3.id, &rewrite).await,
        Err(CoreError::Conflict(_))
    );
    assert!(engine.update_version(&CALLER, v4.id, &rewrite).await.is_ok());
}
