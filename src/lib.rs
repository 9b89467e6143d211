//! # registro-server
//!
//! Event registration web service: attendees submit a signup form for the
//! currently active event, and staff review, filter, and export the
//! registrants through a session-protected admin panel.
//!
//! At most one event is active at a time; the root path redirects to its
//! form. Duplicate submissions are rejected by a per-event unique email
//! constraint enforced at the database, which is the sole concurrency
//! guard the service relies on.
//!
//! ## Architecture
//!
//! ```text
//! Clients (browser, fetch)
//!     │
//!     ├── HTTP Handlers + views (api/)
//!     │     └── AdminGate (session cookie → SessionStore)
//!     │
//!     ├── RegistrationService / EventAdminService / ExportService (service/)
//!     │
//!     ├── PgStore (persistence/)
//!     │
//!     └── PostgreSQL (evento, registro)
//! ```

pub mod api;
pub mod app_state;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
