//! Event model and the lenient date parsing applied to admin input.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A single event (`evento` row).
///
/// The slug is immutable after creation and unique across all events.
/// At most one event has `activo = true` at any time; that event is the
/// one the root path redirects to and the only one accepting
/// registrations.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Evento {
    /// Surrogate identifier, assigned at creation.
    pub id: i64,
    /// URL-safe unique identifier.
    pub slug: String,
    /// Display title.
    pub titulo: String,
    /// Optional start timestamp.
    pub fecha_inicio: Option<DateTime<Utc>>,
    /// Optional end timestamp.
    pub fecha_fin: Option<DateTime<Utc>>,
    /// Optional free-text location.
    pub lugar: Option<String>,
    /// Whether this is the active event.
    pub activo: bool,
    /// Server-assigned creation timestamp.
    pub creado_en: DateTime<Utc>,
}

/// Validated input for creating an event.
///
/// Produced by the event administration service after trimming required
/// fields and leniently parsing the optional dates.
#[derive(Debug, Clone)]
pub struct NewEvento {
    /// URL-safe unique identifier.
    pub slug: String,
    /// Display title.
    pub titulo: String,
    /// Optional start timestamp.
    pub fecha_inicio: Option<DateTime<Utc>>,
    /// Optional end timestamp.
    pub fecha_fin: Option<DateTime<Utc>>,
    /// Optional free-text location.
    pub lugar: Option<String>,
    /// Whether the event should become the active one.
    pub activo: bool,
}

/// Accepted input formats, in order of preference. The `T` variants cover
/// HTML `datetime-local` inputs, the space variants manual entry.
const FECHA_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Leniently parses an optional event date.
///
/// Tries full datetime with seconds, datetime without seconds, then
/// date-only (midnight). The first successful parse wins. Empty or
/// unparseable input yields `None` rather than an error: malformed
/// optional dates are silently dropped, never rejected.
#[must_use]
pub fn parse_fecha(input: &str) -> Option<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    for format in FECHA_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc())
}
