//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::config::AppConfig;
use crate::domain::SessionStore;
use crate::service::{EventAdminService, ExportService, RegistrationService};

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Registration submissions.
    pub registration: RegistrationService,
    /// Event creation/activation and panel listings.
    pub admin: EventAdminService,
    /// CSV export.
    pub export: ExportService,
    /// Live admin sessions.
    pub sessions: Arc<SessionStore>,
    /// Static configuration (admin credentials, mount prefix).
    pub config: Arc<AppConfig>,
}
