//! Request extractors: dual-format bodies, client provenance, and the
//! admin gate.

use std::convert::Infallible;
use std::net::SocketAddr;

use axum::extract::connect_info::ConnectInfo;
use axum::extract::{Form, FromRequest, FromRequestParts, Json, Request};
use axum::http::header;
use axum::http::request::Parts;
use axum::response::Redirect;

use crate::app_state::AppState;
use crate::domain::SessionId;
use crate::error::AppError;

/// Name of the session cookie handed to the client.
pub const SESSION_COOKIE: &str = "registro_session";

/// Accepts either a JSON or a form-encoded request body, selected by the
/// `Content-Type` header. The public registration endpoint serves both
/// the site's fetch calls (JSON) and plain HTML form posts.
#[derive(Debug)]
pub struct JsonOrForm<T>(#[doc = "The parsed body."] pub T);

impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: serde::de::DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.starts_with("application/json") {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            Ok(Self(value))
        } else {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(|e| AppError::Validation(e.body_text()))?;
            Ok(Self(value))
        }
    }
}

/// Request provenance captured for audit: client IP and user agent.
///
/// The IP is the `X-Forwarded-For` header verbatim when present (the
/// service is expected to sit behind a proxy), falling back to the socket
/// peer address. Neither value is validated.
#[derive(Debug, Clone)]
pub struct ClientMeta {
    /// Client IP (or the raw forwarded-for header value).
    pub ip: String,
    /// Client user agent, empty when absent.
    pub user_agent: String,
}

impl<S> FromRequestParts<S> for ClientMeta
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let ip = parts
            .headers
            .get("x-forwarded-for")
            .and_then(|v| v.to_str().ok())
            .map(ToString::to_string)
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            })
            .unwrap_or_default();

        let user_agent = parts
            .headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        Ok(Self { ip, user_agent })
    }
}

/// Admin gate: proves the caller holds an authenticated session.
///
/// Every administration handler takes this extractor as its first
/// argument; an unauthenticated caller is redirected to the login page
/// before the handler body runs, so protected operations have zero side
/// effects for anonymous callers.
#[derive(Debug, Clone, Copy)]
pub struct AdminGate {
    /// The authenticated session.
    pub session_id: SessionId,
}

impl FromRequestParts<AppState> for AdminGate {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(id) = session_id_from_cookies(&parts.headers)
            && state.sessions.is_admin(id).await
        {
            return Ok(Self { session_id: id });
        }
        Err(Redirect::to(&state.config.path("/admin/login")))
    }
}

/// Extracts the session id from the `Cookie` header, if present and
/// well-formed. Anything unparseable is treated as no session.
#[must_use]
pub fn session_id_from_cookies(headers: &axum::http::HeaderMap) -> Option<SessionId> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;
    for pair in cookie_header.split(';') {
        if let Some((name, value)) = pair.trim().split_once('=')
            && name.trim() == SESSION_COOKIE
            && let Ok(id) = value.trim().parse::<SessionId>()
        {
            return Some(id);
        }
    }
    None
}

/// `Set-Cookie` value installing the session cookie.
#[must_use]
pub fn session_cookie(id: SessionId) -> String {
    format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax")
}

/// `Set-Cookie` value clearing the session cookie.
#[must_use]
pub fn clear_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::http::{HeaderMap, HeaderValue};

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Ok(v) = HeaderValue::from_str(value) {
            headers.insert(header::COOKIE, v);
        }
        headers
    }

    #[test]
    fn extracts_session_id_among_other_cookies() {
        let id = SessionId::new();
        let headers =
            headers_with_cookie(&format!("theme=dark; {SESSION_COOKIE}={id}; lang=es"));
        assert_eq!(session_id_from_cookies(&headers), Some(id));
    }

    #[test]
    fn missing_or_malformed_cookie_yields_none() {
        assert!(session_id_from_cookies(&HeaderMap::new()).is_none());

        let headers = headers_with_cookie("theme=dark");
        assert!(session_id_from_cookies(&headers).is_none());

        let headers = headers_with_cookie(&format!("{SESSION_COOKIE}=not-a-uuid"));
        assert!(session_id_from_cookies(&headers).is_none());
    }

    #[test]
    fn cookie_round_trip() {
        let id = SessionId::new();
        let set_cookie = session_cookie(id);
        let Some((pair, _)) = set_cookie.split_once(';') else {
            panic!("expected cookie attributes");
        };
        let headers = headers_with_cookie(pair);
        assert_eq!(session_id_from_cookies(&headers), Some(id));
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        assert!(clear_session_cookie().contains("Max-Age=0"));
    }
}
