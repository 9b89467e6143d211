//! Read models produced by join queries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// Registration joined with its event, as listed on the admin panel.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct RegistroConEvento {
    /// Registration id.
    pub id: i64,
    /// Event slug.
    pub slug: String,
    /// Event title.
    pub titulo: String,
    /// Attendee first name.
    pub nombre: String,
    /// Attendee last name(s).
    pub apellidos: String,
    /// Normalized email.
    pub email: String,
    /// Optional phone number.
    pub telefono: Option<String>,
    /// Optional institution.
    pub institucion: Option<String>,
    /// Optional degree program or department.
    pub carrera_o_area: Option<String>,
    /// Optional topics of interest.
    pub temas_interes: Option<String>,
    /// Consent flag.
    pub consentimiento: bool,
    /// Attendance mark timestamp.
    pub asistencia_marcarda_en: Option<DateTime<Utc>>,
    /// Registration creation timestamp.
    pub creado_en: DateTime<Utc>,
}

/// One CSV data row for the export, column order fixed by the export
/// contract: slug, titulo, nombre, apellidos, email, telefono,
/// institucion, carrera_o_area, temas_interes, consentimiento,
/// asistencia_marcarda_en, creado_en.
#[derive(Debug, Clone, FromRow)]
pub struct ExportRow {
    /// Event slug.
    pub slug: String,
    /// Event title.
    pub titulo: String,
    /// Attendee first name.
    pub nombre: String,
    /// Attendee last name(s).
    pub apellidos: String,
    /// Normalized email.
    pub email: String,
    /// Optional phone number.
    pub telefono: Option<String>,
    /// Optional institution.
    pub institucion: Option<String>,
    /// Optional degree program or department.
    pub carrera_o_area: Option<String>,
    /// Optional topics of interest.
    pub temas_interes: Option<String>,
    /// Consent flag.
    pub consentimiento: bool,
    /// Attendance mark timestamp.
    pub asistencia_marcarda_en: Option<DateTime<Utc>>,
    /// Registration creation timestamp.
    pub creado_en: DateTime<Utc>,
}
