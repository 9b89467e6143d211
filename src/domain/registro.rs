//! Registration input model and the normalization rules applied to
//! submissions.
//!
//! A `registro` row is created exactly once per successful submission
//! and is immutable thereafter; the service never updates or deletes
//! registrations, so reads go through the join models in
//! [`crate::persistence::models`]. The `(id_evento, email)` pair is
//! unique at the store level, which is the sole defense against
//! duplicate and concurrent double-submissions.

/// Validated and normalized registration input, ready to insert.
#[derive(Debug, Clone)]
pub struct NewRegistro {
    /// Trimmed first name.
    pub nombre: String,
    /// Trimmed last name(s).
    pub apellidos: String,
    /// Trimmed, lower-cased email.
    pub email: String,
    /// Trimmed phone number, if given.
    pub telefono: Option<String>,
    /// Trimmed institution, if given.
    pub institucion: Option<String>,
    /// Trimmed degree program or department, if given.
    pub carrera_o_area: Option<String>,
    /// Trimmed topics of interest, if given.
    pub temas_interes: Option<String>,
    /// Parsed consent flag.
    pub consentimiento: bool,
    /// Client IP as reported by the proxy or socket.
    pub ip: String,
    /// Client user agent.
    pub user_agent: String,
}

/// Normalizes an email for storage and comparison: trimmed and
/// lower-cased. Uniqueness per event is enforced on this normalized form.
#[must_use]
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Parses the consent flag. The literal tokens `"1"`, `"true"` and `"on"`
/// are truthy (`"true"`/`"on"` case-insensitively); anything else is
/// falsy.
#[must_use]
pub fn parse_consentimiento(raw: &str) -> bool {
    raw == "1" || raw.eq_ignore_ascii_case("true") || raw.eq_ignore_ascii_case("on")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_trimmed_and_lowercased() {
        assert_eq!(normalize_email("  Ana@X.com "), "ana@x.com");
        assert_eq!(normalize_email("ANA@X.COM"), "ana@x.com");
    }

    #[test]
    fn email_normalization_is_idempotent() {
        let once = normalize_email(" Ana@X.com ");
        assert_eq!(normalize_email(&once), once);
    }

    #[test]
    fn consent_truthy_tokens() {
        assert!(parse_consentimiento("1"));
        assert!(parse_consentimiento("true"));
        assert!(parse_consentimiento("TRUE"));
        assert!(parse_consentimiento("on"));
        assert!(parse_consentimiento("On"));
    }

    #[test]
    fn consent_everything_else_is_falsy() {
        assert!(!parse_consentimiento("0"));
        assert!(!parse_consentimiento("yes"));
        assert!(!parse_consentimiento(""));
        assert!(!parse_consentimiento("  1"));
    }
}
