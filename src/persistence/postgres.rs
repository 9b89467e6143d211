//! PostgreSQL implementation of the storage layer.
//!
//! Constraint violations are translated at the statement that can raise
//! them: a duplicate `(id_evento, email)` or a duplicate slug becomes
//! [`AppError::Conflict`]; pool exhaustion becomes [`AppError::Capacity`]
//! via the `From<sqlx::Error>` conversion; everything else is a
//! [`AppError::Store`].

use sqlx::PgPool;

use super::models::{ExportRow, RegistroConEvento};
use crate::domain::{Evento, NewEvento, NewRegistro};
use crate::error::AppError;

/// PostgreSQL-backed store using `sqlx::PgPool`.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Creates a new store with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Looks up an **active** event by slug. Inactive events with the
    /// same slug are invisible through this path.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Capacity`] on pool exhaustion or
    /// [`AppError::Store`] on any other database failure.
    pub async fn find_active_by_slug(&self, slug: &str) -> Result<Option<Evento>, AppError> {
        let evento = sqlx::query_as::<_, Evento>(
            "SELECT id, slug, titulo, fecha_inicio, fecha_fin, lugar, activo, creado_en \
             FROM evento WHERE slug = $1 AND activo = TRUE",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        Ok(evento)
    }

    /// Returns the slug of the most recently created active event, if any.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Capacity`] or [`AppError::Store`] on database
    /// failure.
    pub async fn default_active_slug(&self) -> Result<Option<String>, AppError> {
        let slug = sqlx::query_scalar::<_, String>(
            "SELECT slug FROM evento WHERE activo = TRUE ORDER BY creado_en DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(slug)
    }

    /// Lists all events, most recently created first.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Capacity`] or [`AppError::Store`] on database
    /// failure.
    pub async fn list_eventos(&self) -> Result<Vec<Evento>, AppError> {
        let eventos = sqlx::query_as::<_, Evento>(
            "SELECT id, slug, titulo, fecha_inicio, fecha_fin, lugar, activo, creado_en \
             FROM evento ORDER BY creado_en DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(eventos)
    }

    /// Inserts a new event, returning its id.
    ///
    /// When `activo` is requested, every other event is deactivated in the
    /// **same transaction** as the insert, so the single-active-event
    /// invariant holds even if the insert itself fails (duplicate slug):
    /// the rollback restores the previously active event.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the slug already exists,
    /// [`AppError::Capacity`] on pool exhaustion or [`AppError::Store`]
    /// on any other database failure.
    pub async fn create_evento(&self, new: &NewEvento) -> Result<i64, AppError> {
        let mut tx = self.pool.begin().await?;

        if new.activo {
            sqlx::query("UPDATE evento SET activo = FALSE WHERE activo = TRUE")
                .execute(&mut *tx)
                .await?;
        }

        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO evento (slug, titulo, fecha_inicio, fecha_fin, lugar, activo) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
        )
        .bind(&new.slug)
        .bind(&new.titulo)
        .bind(new.fecha_inicio)
        .bind(new.fecha_fin)
        .bind(&new.lugar)
        .bind(new.activo)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Ya existe un evento con ese slug.".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        tx.commit().await?;
        Ok(id)
    }

    /// Makes the given event the single active one.
    ///
    /// Existence is checked before any mutation and the clear-all plus
    /// set-one updates run in one transaction: an unknown id leaves the
    /// previously active event untouched, and no reader can observe a
    /// zero-active or double-active window.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] for an unknown id,
    /// [`AppError::Capacity`] or [`AppError::Store`] on database failure.
    pub async fn activate_evento(&self, id: i64) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM evento WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound("Evento no encontrado".to_string()));
        }

        sqlx::query("UPDATE evento SET activo = FALSE WHERE activo = TRUE")
            .execute(&mut *tx)
            .await?;
        sqlx::query("UPDATE evento SET activo = TRUE WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Inserts a registration for the given event, stamping
    /// `asistencia_marcarda_en` server-side at insert time.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the `(id_evento, email)` pair
    /// already exists, [`AppError::Capacity`] on pool exhaustion or
    /// [`AppError::Store`] on any other database failure.
    pub async fn insert_registro(
        &self,
        id_evento: i64,
        new: &NewRegistro,
    ) -> Result<i64, AppError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO registro \
             (id_evento, nombre, apellidos, email, telefono, institucion, carrera_o_area, \
              temas_interes, consentimiento, asistencia_marcarda_en, ip, user_agent) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, now(), $10, $11) RETURNING id",
        )
        .bind(id_evento)
        .bind(&new.nombre)
        .bind(&new.apellidos)
        .bind(&new.email)
        .bind(&new.telefono)
        .bind(&new.institucion)
        .bind(&new.carrera_o_area)
        .bind(&new.temas_interes)
        .bind(new.consentimiento)
        .bind(&new.ip)
        .bind(&new.user_agent)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Este email ya está registrado para este evento.".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        Ok(id)
    }

    /// Lists registrations for the event with the given slug, most recent
    /// first, joined with the event for display.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Capacity`] or [`AppError::Store`] on database
    /// failure.
    pub async fn registros_by_slug(&self, slug: &str) -> Result<Vec<RegistroConEvento>, AppError> {
        let registros = sqlx::query_as::<_, RegistroConEvento>(
            "SELECT r.id, e.slug, e.titulo, r.nombre, r.apellidos, r.email, r.telefono, \
                    r.institucion, r.carrera_o_area, r.temas_interes, r.consentimiento, \
                    r.asistencia_marcarda_en, r.creado_en \
             FROM registro r JOIN evento e ON e.id = r.id_evento \
             WHERE e.slug = $1 ORDER BY r.creado_en DESC",
        )
        .bind(slug)
        .fetch_all(&self.pool)
        .await?;

        Ok(registros)
    }

    /// Fetches the export rows for the event with the given slug, most
    /// recent first, in the fixed CSV column order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Capacity`] or [`AppError::Store`] on database
    /// failure.
    pub async fn export_rows(&self, slug: &str) -> Result<Vec<ExportRow>, AppError> {
        let rows = sqlx::query_as::<_, ExportRow>(
            "SELECT e.slug, e.titulo, r.nombre, r.apellidos, r.email, r.telefono, \
                    r.institucion, r.carrera_o_area, r.temas_interes, r.consentimiento, \
                    r.asistencia_marcarda_en, r.creado_en \
             FROM registro r JOIN evento e ON e.id = r.id_evento \
             WHERE e.slug = $1 ORDER BY r.creado_en DESC",
        )
        .bind(slug)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

/// Whether the error is a unique-constraint violation, as opposed to any
/// other database failure.
fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
