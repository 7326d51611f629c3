use std::sync::Arc;

use docvault_core::lineage::LineageEngine;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Lineage engine bound to the configured version store.
    pub engine: LineageEngine,
    /// Server configuration (accessed by middleware and handlers).
    pub config: Arc<ServerConfig>,
}
