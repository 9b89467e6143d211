//! In-memory admin session store.
//!
//! Sessions carry exactly one claim — "is this caller an administrator" —
//! plus an optional one-shot flash message for the admin pages. The
//! client holds only an opaque [`SessionId`] in a cookie; all state lives
//! server-side in [`SessionStore`].

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use tokio::sync::RwLock;

/// Opaque session token handed to the client as a cookie value.
///
/// Wraps a UUID v4. Generated at login (or when a flash message must be
/// attached to an anonymous caller) and invalidated on logout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(uuid::Uuid);

impl SessionId {
    /// Creates a new random `SessionId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(uuid::Uuid::parse_str(s)?))
    }
}

/// One-shot message shown on the next admin page render.
#[derive(Debug, Clone)]
pub struct Flash {
    /// Display category (`"success"` or `"danger"`).
    pub kind: &'static str,
    /// User-facing message.
    pub message: String,
}

impl Flash {
    /// Success flash.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: "success",
            message: message.into(),
        }
    }

    /// Error flash.
    #[must_use]
    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            kind: "danger",
            message: message.into(),
        }
    }
}

/// Per-session server-side state.
///
/// The only authorization state is the boolean admin claim; there are no
/// roles and no expiry beyond what the cookie transport provides.
#[derive(Debug, Clone, Default)]
pub struct AdminClaims {
    /// Whether this session passed the static-credential login.
    pub is_admin: bool,
    /// Pending one-shot message, consumed on next render.
    pub flash: Option<Flash>,
}

/// Central store for all live sessions.
///
/// Uses a `RwLock<HashMap<...>>`: reads (the gate check on every admin
/// request) are concurrent, writes (login, logout, flash) are serialized.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<SessionId, AdminClaims>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
        }
    }

    /// Issues a fresh authenticated session. Called only after the
    /// static credentials matched.
    pub async fn create_admin(&self) -> SessionId {
        let id = SessionId::new();
        let mut map = self.sessions.write().await;
        map.insert(
            id,
            AdminClaims {
                is_admin: true,
                flash: None,
            },
        );
        id
    }

    /// Issues a fresh anonymous session, used to carry a flash message
    /// (e.g. a failed login) for a caller that has no session yet.
    pub async fn create_anonymous(&self) -> SessionId {
        let id = SessionId::new();
        let mut map = self.sessions.write().await;
        map.insert(id, AdminClaims::default());
        id
    }

    /// Returns `true` if the session exists and is authenticated.
    pub async fn is_admin(&self, id: SessionId) -> bool {
        let map = self.sessions.read().await;
        map.get(&id).is_some_and(|claims| claims.is_admin)
    }

    /// Returns `true` if the session exists at all (admin or anonymous).
    pub async fn exists(&self, id: SessionId) -> bool {
        self.sessions.read().await.contains_key(&id)
    }

    /// Unconditionally invalidates a session. Used by logout; unknown ids
    /// are a no-op.
    pub async fn remove(&self, id: SessionId) {
        let mut map = self.sessions.write().await;
        map.remove(&id);
    }

    /// Attaches a one-shot flash message to an existing session. Unknown
    /// ids are a no-op.
    pub async fn set_flash(&self, id: SessionId, flash: Flash) {
        let mut map = self.sessions.write().await;
        if let Some(claims) = map.get_mut(&id) {
            claims.flash = Some(flash);
        }
    }

    /// Takes the pending flash message, leaving none behind.
    pub async fn take_flash(&self, id: SessionId) -> Option<Flash> {
        let mut map = self.sessions.write().await;
        map.get_mut(&id).and_then(|claims| claims.flash.take())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn login_issues_admin_session() {
        let store = SessionStore::new();
        let id = store.create_admin().await;
        assert!(store.is_admin(id).await);
    }

    #[tokio::test]
    async fn unknown_session_is_not_admin() {
        let store = SessionStore::new();
        assert!(!store.is_admin(SessionId::new()).await);
    }

    #[tokio::test]
    async fn anonymous_session_is_not_admin() {
        let store = SessionStore::new();
        let id = store.create_anonymous().await;
        assert!(store.exists(id).await);
        assert!(!store.is_admin(id).await);
    }

    #[tokio::test]
    async fn logout_invalidates_session() {
        let store = SessionStore::new();
        let id = store.create_admin().await;
        store.remove(id).await;
        assert!(!store.is_admin(id).await);
        assert!(!store.exists(id).await);
    }

    #[tokio::test]
    async fn flash_is_consumed_once() {
        let store = SessionStore::new();
        let id = store.create_admin().await;
        store.set_flash(id, Flash::danger("Credenciales inválidas")).await;

        let first = store.take_flash(id).await;
        let Some(flash) = first else {
            panic!("expected flash");
        };
        assert_eq!(flash.kind, "danger");
        assert_eq!(flash.message, "Credenciales inválidas");

        assert!(store.take_flash(id).await.is_none());
    }

    #[test]
    fn session_id_round_trips_through_string() {
        let id = SessionId::new();
        let parsed = id.to_string().parse::<SessionId>();
        let Ok(parsed) = parsed else {
            panic!("expected parse");
        };
        assert_eq!(parsed, id);
    }

    #[test]
    fn garbage_cookie_value_does_not_parse() {
        assert!("not-a-uuid".parse::<SessionId>().is_err());
    }
}
