//! Persistence layer: PostgreSQL storage for events and registrations.
//!
//! All SQL lives here. The concrete implementation uses `sqlx::PgPool`
//! for async PostgreSQL access; connections are acquired from the pool
//! per statement and returned on drop on every exit path.

pub mod models;
pub mod postgres;

pub use models::{ExportRow, RegistroConEvento};
pub use postgres::PgStore;
