use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    /// The parent chain starting at `id` revisits a node or exceeds the
    /// configured depth bound.
    #[error("Lineage cycle detected walking up from version {id} after {depth} steps")]
    LineageCycle { id: DbId, depth: usize },

    /// Version `id` points at a parent that does not exist.
    #[error("Broken lineage: version {id} references missing parent {missing_parent}")]
    BrokenLineage { id: DbId, missing_parent: DbId },

    /// Version number assignment kept colliding with concurrent writers.
    #[error("Write conflict: {0}")]
    WriteConflict(String),
}
