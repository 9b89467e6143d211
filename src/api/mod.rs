//! HTTP layer: route handlers, DTOs, extractors, and minimal HTML views.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod render;

use axum::Router;

use crate::app_state::AppState;

/// Builds the complete router with all endpoints.
pub fn build_router() -> Router<AppState> {
    handlers::routes()
}
