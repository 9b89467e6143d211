//! Service error types with HTTP status code mapping.
//!
//! [`AppError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All API error responses follow this shape:
/// ```json
/// {
///   "ok": false,
///   "error": {
///     "code": 2002,
///     "message": "Este email ya está registrado para este evento."
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`; mirrors the `{"ok": true}` success envelope.
    pub ok: bool,
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`AppError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category                | HTTP Status                  |
/// |-----------|-------------------------|------------------------------|
/// | 1000–1999 | Validation              | 400 Bad Request              |
/// | 2000–2999 | Not Found / Conflict    | 404 Not Found / 409 Conflict |
/// | 3000–3999 | Server / Configuration  | 500 Internal Server Error    |
/// | 503       | Capacity (transient)    | 503 Service Unavailable      |
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A required field is missing or malformed. The message names the
    /// offending field and is safe to show to the user.
    #[error("{0}")]
    Validation(String),

    /// No matching event (or only an inactive one) for the given slug or id.
    #[error("{0}")]
    NotFound(String),

    /// Unique-constraint violation: duplicate registration or slug.
    #[error("{0}")]
    Conflict(String),

    /// Operator misconfiguration, e.g. no active event exists so the root
    /// path has nowhere to redirect. Never the caller's fault.
    #[error("configuración inválida: {0}")]
    Configuration(String),

    /// Connection pool exhausted; the caller may retry later.
    #[error("Servicio no disponible, intenta de nuevo")]
    Capacity,

    /// Any other database failure. Full detail is logged server-side;
    /// clients receive a generic message.
    #[error("store error: {0}")]
    Store(String),
}

impl AppError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::Validation(_) => 1001,
            Self::NotFound(_) => 2001,
            Self::Conflict(_) => 2002,
            Self::Configuration(_) => 3002,
            Self::Capacity => 503,
            Self::Store(_) => 3001,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Configuration(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Capacity => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    /// Message exposed to clients. Store failures are collapsed to a
    /// generic message; everything else is already user-safe.
    #[must_use]
    pub fn public_message(&self) -> String {
        match self {
            Self::Store(_) => "Error interno del servidor".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<sqlx::Error> for AppError {
    /// Pool exhaustion is distinguished from every other database failure
    /// so handlers can answer 503 instead of 500.
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => Self::Capacity,
            other => Self::Store(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Internal detail stays in the server log.
        match &self {
            Self::Store(detail) => tracing::error!(%detail, "database error"),
            Self::Configuration(detail) => tracing::error!(%detail, "configuration error"),
            Self::Capacity => tracing::warn!("connection pool exhausted"),
            other => tracing::debug!(error = %other, "request failed"),
        }

        let body = ErrorResponse {
            ok: false,
            error: ErrorBody {
                code: self.error_code(),
                message: self.public_message(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(
            AppError::Validation("Falta: email".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::NotFound("evento".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::Conflict("duplicado".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::Configuration("sin evento activo".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::Capacity.status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            AppError::Store("boom".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn pool_timeout_maps_to_capacity() {
        let err = AppError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Capacity));
    }

    #[test]
    fn other_sqlx_errors_map_to_store() {
        let err = AppError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, AppError::Store(_)));
    }

    #[test]
    fn store_detail_is_not_exposed() {
        let err = AppError::Store("password=hunter2".into());
        assert!(!err.public_message().contains("hunter2"));
    }
}
