//! HTTP invocation surface: route handlers, DTOs, router composition.
//!
//! The probe endpoint is mounted under `/api/v1`; the liveness route
//! sits at the root.

pub mod dto;
pub mod handlers;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete router with all endpoints.
pub fn build_router() -> Router<AppState> {
    Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes())
}
