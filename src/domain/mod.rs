//! Domain layer: event and registration models plus the admin session store.
//!
//! This module contains the persistent domain model (`evento`, `registro`
//! rows and their input forms), the pure normalization and parsing rules
//! applied to user input, and the in-memory session store backing the
//! admin gate.

pub mod evento;
pub mod registro;
pub mod session;

pub use evento::{Evento, NewEvento, parse_fecha};
pub use registro::{NewRegistro, normalize_email, parse_consentimiento};
pub use session::{AdminClaims, Flash, SessionId, SessionStore};
