//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::service::ProbeOrchestrator;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Orchestrator running one probe per invocation.
    pub orchestrator: Arc<ProbeOrchestrator>,
}
