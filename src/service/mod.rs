//! Service layer: business logic orchestration.
//!
//! Each service validates its input before touching the store, then runs
//! one or more statements through [`crate::persistence::PgStore`] and
//! translates constraint violations into the error taxonomy.

pub mod event_admin;
pub mod export;
pub mod registration;

pub use event_admin::{CreateEventoInput, EventAdminService};
pub use export::{CsvExport, ExportService};
pub use registration::{RegistrationService, RegistroSubmission};
