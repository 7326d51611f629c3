//! Version node and document types shared by the engine and its stores.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Editorial status of a single version node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionStatus {
    Draft,
    Final,
}

impl VersionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VersionStatus::Draft => "draft",
            VersionStatus::Final => "final",
        }
    }
}

impl fmt::Display for VersionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VersionStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(VersionStatus::Draft),
            "final" => Ok(VersionStatus::Final),
            other => Err(CoreError::Validation(format!(
                "Unknown version status '{other}', expected 'draft' or 'final'"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entities
// ---------------------------------------------------------------------------

/// A compliance document: the owner of exactly one version lineage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DbId,
    pub organization_id: DbId,
    pub name: String,
    pub document_type: String,
    /// The entity the document is about (vendor, system, policy owner).
    pub subject_id: Option<DbId>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One node of a document's version tree.
///
/// Document metadata (`name`, `document_type`, `subject_id`) is carried on
/// every node so history listings need no second lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionNode {
    pub id: DbId,
    pub document_id: DbId,
    /// `None` only on the lineage root.
    pub parent_id: Option<DbId>,
    pub version_number: i32,
    pub status: VersionStatus,
    pub content: serde_json::Value,
    pub organization_id: DbId,
    pub name: String,
    pub document_type: String,
    pub subject_id: Option<DbId>,
    pub created_by: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl VersionNode {
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Input for creating a document together with its root version.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDocument {
    pub organization_id: DbId,
    pub name: String,
    pub document_type: String,
    pub subject_id: Option<DbId>,
    pub created_by: DbId,
    pub content: serde_json::Value,
}

/// Input for inserting a non-root version node.
///
/// The store must reject the insert with
/// [`StoreError::Conflict`](super::store::StoreError::Conflict) when
/// `version_number` is already taken within `document_id`.
#[derive(Debug, Clone)]
pub struct NewVersionNode {
    pub document_id: DbId,
    pub parent_id: DbId,
    pub version_number: i32,
    pub status: VersionStatus,
    pub content: serde_json::Value,
    pub organization_id: DbId,
    pub created_by: DbId,
}

/// In-place patch of the latest version of a lineage. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VersionPatch {
    pub content: Option<serde_json::Value>,
    pub status: Option<VersionStatus>,
}

impl VersionPatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.status.is_none()
    }
}
