//! Event administration service: create, activate, list events.

use crate::domain::{Evento, NewEvento, parse_fecha};
use crate::error::AppError;
use crate::persistence::{PgStore, RegistroConEvento};

/// Raw event-creation input from the admin form.
#[derive(Debug, Clone, Default)]
pub struct CreateEventoInput {
    /// URL-safe unique identifier.
    pub slug: Option<String>,
    /// Display title.
    pub titulo: Option<String>,
    /// Optional start date, leniently parsed.
    pub fecha_inicio: Option<String>,
    /// Optional end date, leniently parsed.
    pub fecha_fin: Option<String>,
    /// Optional free-text location.
    pub lugar: Option<String>,
    /// Whether the new event should become the active one.
    pub activo: bool,
}

/// Creates events, enforces the single-active-event invariant, and feeds
/// the admin panel listings.
#[derive(Debug, Clone)]
pub struct EventAdminService {
    store: PgStore,
}

impl EventAdminService {
    /// Creates a new `EventAdminService`.
    #[must_use]
    pub fn new(store: PgStore) -> Self {
        Self { store }
    }

    /// Creates an event. When `activo` is requested, all other events are
    /// deactivated in the same transaction as the insert.
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] when slug or titulo is missing.
    /// - [`AppError::Conflict`] when the slug already exists.
    /// - [`AppError::Capacity`] / [`AppError::Store`] on store failure.
    pub async fn create(&self, input: CreateEventoInput) -> Result<i64, AppError> {
        let nuevo = validate_create(input)?;
        let id = self.store.create_evento(&nuevo).await?;
        tracing::info!(slug = %nuevo.slug, evento_id = id, activo = nuevo.activo, "evento creado");
        Ok(id)
    }

    /// Makes the given event the single active one. Unknown ids fail
    /// without mutating any state.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] for an unknown id.
    /// - [`AppError::Capacity`] / [`AppError::Store`] on store failure.
    pub async fn activate(&self, id: i64) -> Result<(), AppError> {
        self.store.activate_evento(id).await?;
        tracing::info!(evento_id = id, "evento activado");
        Ok(())
    }

    /// Looks up the active event with the given slug, for rendering the
    /// registration form.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] when no active event has the slug.
    /// - [`AppError::Capacity`] / [`AppError::Store`] on store failure.
    pub async fn active_event_by_slug(&self, slug: &str) -> Result<Evento, AppError> {
        self.store
            .find_active_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Evento no encontrado o inactivo".to_string()))
    }

    /// Returns the slug the root path should redirect to: the most
    /// recently created active event.
    ///
    /// Zero active events is an operator problem, not a user error — the
    /// site is unusable until an event is created and activated.
    ///
    /// # Errors
    ///
    /// - [`AppError::Configuration`] when no event is active.
    /// - [`AppError::Capacity`] / [`AppError::Store`] on store failure.
    pub async fn default_slug(&self) -> Result<String, AppError> {
        self.store.default_active_slug().await?.ok_or_else(|| {
            AppError::Configuration("no hay ningún evento activo".to_string())
        })
    }

    /// Lists all events for the panel selector, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Capacity`] / [`AppError::Store`] on store
    /// failure.
    pub async fn list_events(&self) -> Result<Vec<Evento>, AppError> {
        self.store.list_eventos().await
    }

    /// Lists registrations for the given slug, most recent first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Capacity`] / [`AppError::Store`] on store
    /// failure.
    pub async fn registros_by_slug(
        &self,
        slug: &str,
    ) -> Result<Vec<RegistroConEvento>, AppError> {
        self.store.registros_by_slug(slug).await
    }
}

/// Checks required fields and leniently parses the optional dates.
///
/// Malformed dates are silently dropped rather than rejected; only a
/// missing slug or titulo aborts the operation.
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the missing field.
pub fn validate_create(input: CreateEventoInput) -> Result<NewEvento, AppError> {
    let slug = match input.slug.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => return Err(AppError::Validation("Falta: slug".to_string())),
    };
    let titulo = match input.titulo.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => return Err(AppError::Validation("Falta: titulo".to_string())),
    };

    Ok(NewEvento {
        slug,
        titulo,
        fecha_inicio: input.fecha_inicio.as_deref().and_then(parse_fecha),
        fecha_fin: input.fecha_fin.as_deref().and_then(parse_fecha),
        lugar: input
            .lugar
            .as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string),
        activo: input.activo,
    })
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn create_requires_slug_and_titulo() {
        let result = validate_create(CreateEventoInput {
            slug: Some("ponencia-ia-ago2025".to_string()),
            ..CreateEventoInput::default()
        });
        let Err(AppError::Validation(msg)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(msg, "Falta: titulo");

        let result = validate_create(CreateEventoInput {
            titulo: Some("Ponencia IA".to_string()),
            ..CreateEventoInput::default()
        });
        let Err(AppError::Validation(msg)) = result else {
            panic!("expected validation error");
        };
        assert_eq!(msg, "Falta: slug");
    }

    #[test]
    fn malformed_dates_become_absent_not_errors() {
        let result = validate_create(CreateEventoInput {
            slug: Some("taller".to_string()),
            titulo: Some("Taller".to_string()),
            fecha_inicio: Some("sometime soon".to_string()),
            fecha_fin: Some(String::new()),
            ..CreateEventoInput::default()
        });
        let Ok(nuevo) = result else {
            panic!("lenient parsing must not reject");
        };
        assert!(nuevo.fecha_inicio.is_none());
        assert!(nuevo.fecha_fin.is_none());
    }

    #[test]
    fn valid_dates_are_parsed() {
        let result = validate_create(CreateEventoInput {
            slug: Some("taller".to_string()),
            titulo: Some("Taller".to_string()),
            fecha_inicio: Some("2025-08-20T18:30".to_string()),
            fecha_fin: Some("2025-08-21".to_string()),
            lugar: Some(" Auditorio B ".to_string()),
            activo: true,
        });
        let Ok(nuevo) = result else {
            panic!("expected valid input");
        };
        assert!(nuevo.fecha_inicio.is_some());
        assert!(nuevo.fecha_fin.is_some());
        assert_eq!(nuevo.lugar.as_deref(), Some("Auditorio B"));
        assert!(nuevo.activo);
    }
}
