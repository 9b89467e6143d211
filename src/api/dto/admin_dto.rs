//! Admin panel form and query DTOs.

use serde::Deserialize;

/// Login form body for `POST /admin/login`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    /// Admin username.
    #[serde(default)]
    pub user: String,
    /// Admin password.
    #[serde(default)]
    pub password: String,
}

/// Event creation form body for `POST /admin/evento`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateEventoForm {
    /// URL-safe unique identifier.
    #[serde(default)]
    pub slug: Option<String>,
    /// Display title.
    #[serde(default)]
    pub titulo: Option<String>,
    /// Optional start date, leniently parsed.
    #[serde(default)]
    pub fecha_inicio: Option<String>,
    /// Optional end date, leniently parsed.
    #[serde(default)]
    pub fecha_fin: Option<String>,
    /// Optional free-text location.
    #[serde(default)]
    pub lugar: Option<String>,
    /// Checkbox token; present as `"on"` when checked.
    #[serde(default)]
    pub activo: Option<String>,
}

/// Query string for `GET /admin`: optional slug filter for the
/// registration listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PanelQuery {
    /// Event slug to list registrations for.
    #[serde(default)]
    pub slug: Option<String>,
}

/// Query string for `GET /admin/export`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExportQuery {
    /// Event slug to export; required.
    #[serde(default)]
    pub slug: Option<String>,
}
