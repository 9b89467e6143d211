//! HTTP endpoint handlers organized by surface.

pub mod admin;
pub mod registro;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all route groups.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(registro::routes())
        .merge(admin::routes())
        .merge(system::routes())
}
