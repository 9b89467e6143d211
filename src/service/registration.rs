//! Registration service: validates and inserts attendee submissions.

use crate::domain::{NewRegistro, normalize_email, parse_consentimiento};
use crate::error::AppError;
use crate::persistence::PgStore;

/// Raw submission as received from the form or JSON body, before any
/// validation. All fields are optional at this stage; validation decides
/// which absences are errors.
#[derive(Debug, Clone, Default)]
pub struct RegistroSubmission {
    /// Target event slug.
    pub slug: Option<String>,
    /// Attendee first name.
    pub nombre: Option<String>,
    /// Attendee last name(s).
    pub apellidos: Option<String>,
    /// Attendee email.
    pub email: Option<String>,
    /// Optional phone number.
    pub telefono: Option<String>,
    /// Optional institution.
    pub institucion: Option<String>,
    /// Optional degree program or department.
    pub carrera_o_area: Option<String>,
    /// Optional topics of interest.
    pub temas_interes: Option<String>,
    /// Raw consent token (`"1"`, `"true"`, `"on"` are truthy).
    pub consentimiento: Option<String>,
    /// Client IP (X-Forwarded-For or socket peer).
    pub ip: String,
    /// Client user agent.
    pub user_agent: String,
}

/// Validates and inserts attendee submissions against the active event.
#[derive(Debug, Clone)]
pub struct RegistrationService {
    store: PgStore,
}

impl RegistrationService {
    /// Creates a new `RegistrationService`.
    #[must_use]
    pub fn new(store: PgStore) -> Self {
        Self { store }
    }

    /// Submits a registration: validate, resolve the active event by
    /// slug, insert exactly one row.
    ///
    /// Validation runs before any store access; on any error path zero
    /// rows are written (the insert is a single atomic statement).
    ///
    /// # Errors
    ///
    /// - [`AppError::Validation`] when a required field is missing.
    /// - [`AppError::NotFound`] when no **active** event has the slug.
    /// - [`AppError::Conflict`] when the email is already registered for
    ///   the event.
    /// - [`AppError::Capacity`] / [`AppError::Store`] on store failure.
    pub async fn submit(&self, submission: RegistroSubmission) -> Result<(), AppError> {
        let (slug, nuevo) = validate_submission(submission)?;

        let evento = self
            .store
            .find_active_by_slug(&slug)
            .await?
            .ok_or_else(|| AppError::NotFound("Evento no encontrado o inactivo".to_string()))?;

        let id = self.store.insert_registro(evento.id, &nuevo).await?;

        tracing::info!(%slug, registro_id = id, email = %nuevo.email, "registro creado");
        Ok(())
    }
}

/// Checks required fields and normalizes the submission.
///
/// `slug`, `nombre`, `apellidos` and `email` must be non-empty after
/// trimming; the error message names the first missing field. Optional
/// fields are trimmed, with empty values stored as absent.
///
/// # Errors
///
/// Returns [`AppError::Validation`] naming the missing field.
pub fn validate_submission(
    submission: RegistroSubmission,
) -> Result<(String, NewRegistro), AppError> {
    let slug = required("slug", submission.slug.as_deref())?;
    let nombre = required("nombre", submission.nombre.as_deref())?;
    let apellidos = required("apellidos", submission.apellidos.as_deref())?;
    let email_raw = required("email", submission.email.as_deref())?;

    let nuevo = NewRegistro {
        nombre,
        apellidos,
        email: normalize_email(&email_raw),
        telefono: optional(submission.telefono.as_deref()),
        institucion: optional(submission.institucion.as_deref()),
        carrera_o_area: optional(submission.carrera_o_area.as_deref()),
        temas_interes: optional(submission.temas_interes.as_deref()),
        consentimiento: submission
            .consentimiento
            .as_deref()
            .is_some_and(parse_consentimiento),
        ip: submission.ip,
        user_agent: submission.user_agent,
    };

    Ok((slug, nuevo))
}

fn required(field: &str, value: Option<&str>) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Validation(format!("Falta: {field}"))),
    }
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn full_submission() -> RegistroSubmission {
        RegistroSubmission {
            slug: Some("ponencia-ia-ago2025".to_string()),
            nombre: Some(" Ana ".to_string()),
            apellidos: Some("Lopez".to_string()),
            email: Some(" Ana@X.com ".to_string()),
            telefono: Some("555-0100".to_string()),
            institucion: Some("  ".to_string()),
            carrera_o_area: None,
            temas_interes: Some("IA aplicada".to_string()),
            consentimiento: Some("on".to_string()),
            ip: "203.0.113.7".to_string(),
            user_agent: "Mozilla/5.0".to_string(),
        }
    }

    #[test]
    fn valid_submission_is_normalized() {
        let result = validate_submission(full_submission());
        let Ok((slug, nuevo)) = result else {
            panic!("expected valid submission");
        };
        assert_eq!(slug, "ponencia-ia-ago2025");
        assert_eq!(nuevo.nombre, "Ana");
        assert_eq!(nuevo.email, "ana@x.com");
        // Whitespace-only optional fields are stored as absent.
        assert!(nuevo.institucion.is_none());
        assert_eq!(nuevo.temas_interes.as_deref(), Some("IA aplicada"));
        assert!(nuevo.consentimiento);
    }

    #[test]
    fn missing_required_field_is_named() {
        for field in ["slug", "nombre", "apellidos", "email"] {
            let mut submission = full_submission();
            match field {
                "slug" => submission.slug = None,
                "nombre" => submission.nombre = Some("   ".to_string()),
                "apellidos" => submission.apellidos = Some(String::new()),
                _ => submission.email = None,
            }
            let result = validate_submission(submission);
            let Err(AppError::Validation(msg)) = result else {
                panic!("expected validation error for {field}");
            };
            assert_eq!(msg, format!("Falta: {field}"));
        }
    }

    #[test]
    fn absent_consent_is_falsy() {
        let mut submission = full_submission();
        submission.consentimiento = None;
        let Ok((_, nuevo)) = validate_submission(submission) else {
            panic!("expected valid submission");
        };
        assert!(!nuevo.consentimiento);
    }

    #[test]
    fn email_case_variants_normalize_to_same_value() {
        let mut a = full_submission();
        a.email = Some("ANA@X.COM".to_string());
        let mut b = full_submission();
        b.email = Some("  ana@x.com".to_string());

        let Ok((_, reg_a)) = validate_submission(a) else {
            panic!("expected valid");
        };
        let Ok((_, reg_b)) = validate_submission(b) else {
            panic!("expected valid");
        };
        assert_eq!(reg_a.email, reg_b.email);
    }
}
