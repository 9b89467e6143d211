//! Public registration endpoint DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::service::RegistroSubmission;

/// Request body for `POST /api/registro`, JSON or form-encoded.
///
/// Everything is optional at the wire level; the registration service
/// decides which absences are validation errors. `consentimiento` is
/// accepted as a JSON bool, number, or string to tolerate both checkbox
/// posts (`"on"`) and script-built JSON (`true` / `"1"`).
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct RegistroRequest {
    /// Target event slug.
    #[serde(default)]
    pub slug: Option<String>,
    /// Attendee first name.
    #[serde(default)]
    pub nombre: Option<String>,
    /// Attendee last name(s).
    #[serde(default)]
    pub apellidos: Option<String>,
    /// Attendee email.
    #[serde(default)]
    pub email: Option<String>,
    /// Optional phone number.
    #[serde(default)]
    pub telefono: Option<String>,
    /// Optional institution.
    #[serde(default)]
    pub institucion: Option<String>,
    /// Optional degree program or department.
    #[serde(default)]
    pub carrera_o_area: Option<String>,
    /// Optional topics of interest.
    #[serde(default)]
    pub temas_interes: Option<String>,
    /// Consent flag token.
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub consentimiento: Option<serde_json::Value>,
}

impl RegistroRequest {
    /// Converts the wire DTO into a service submission, stringifying the
    /// consent token and attaching the request provenance.
    #[must_use]
    pub fn into_submission(self, ip: String, user_agent: String) -> RegistroSubmission {
        RegistroSubmission {
            slug: self.slug,
            nombre: self.nombre,
            apellidos: self.apellidos,
            email: self.email,
            telefono: self.telefono,
            institucion: self.institucion,
            carrera_o_area: self.carrera_o_area,
            temas_interes: self.temas_interes,
            consentimiento: self.consentimiento.as_ref().map(consent_token),
            ip,
            user_agent,
        }
    }
}

/// Success body for `POST /api/registro`: exactly `{"ok": true}`.
#[derive(Debug, Serialize, ToSchema)]
pub struct OkResponse {
    /// Always `true` on success.
    pub ok: bool,
}

/// Stringifies a JSON consent value so the domain rule (`"1"`, `"true"`,
/// `"on"` truthy) applies uniformly to every encoding.
fn consent_token(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::domain::parse_consentimiento;

    #[test]
    fn consent_accepts_bool_number_and_string() {
        assert_eq!(consent_token(&serde_json::json!(true)), "true");
        assert_eq!(consent_token(&serde_json::json!(1)), "1");
        assert_eq!(consent_token(&serde_json::json!("on")), "on");

        assert!(parse_consentimiento(&consent_token(&serde_json::json!(true))));
        assert!(parse_consentimiento(&consent_token(&serde_json::json!(1))));
        assert!(!parse_consentimiento(&consent_token(&serde_json::json!(false))));
        assert!(!parse_consentimiento(&consent_token(&serde_json::json!(0))));
    }

    #[test]
    fn json_body_deserializes_with_missing_fields() {
        let parsed: Result<RegistroRequest, _> =
            serde_json::from_str(r#"{"slug":"taller","email":"ana@x.com"}"#);
        let Ok(req) = parsed else {
            panic!("expected deserialization");
        };
        assert_eq!(req.slug.as_deref(), Some("taller"));
        assert!(req.nombre.is_none());
        assert!(req.consentimiento.is_none());
    }

    #[test]
    fn into_submission_carries_provenance() {
        let req = RegistroRequest {
            slug: Some("taller".to_string()),
            consentimiento: Some(serde_json::json!("1")),
            ..RegistroRequest::default()
        };
        let submission = req.into_submission("203.0.113.7".to_string(), "curl/8".to_string());
        assert_eq!(submission.ip, "203.0.113.7");
        assert_eq!(submission.user_agent, "curl/8");
        assert_eq!(submission.consentimiento.as_deref(), Some("1"));
    }
}
