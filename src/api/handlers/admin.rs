//! Administration handlers: login gate, panel, event management, export.
//!
//! Every protected handler takes [`AdminGate`] as its first extractor;
//! anonymous callers are redirected to the login page before any handler
//! body runs. Panel outcomes are reported as a one-shot flash message
//! plus a redirect back to the panel.

use axum::Router;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, header};
use axum::response::{AppendHeaders, Html, IntoResponse, Redirect};
use axum::routing::{get, post};

use crate::api::dto::{CreateEventoForm, ExportQuery, LoginForm, PanelQuery};
use crate::api::extract::{
    AdminGate, clear_session_cookie, session_cookie, session_id_from_cookies,
};
use crate::api::render;
use crate::app_state::AppState;
use crate::domain::{Flash, parse_consentimiento};
use crate::error::AppError;
use crate::service::CreateEventoInput;

/// `GET /admin/login` — login form, with any flashed error.
pub async fn login_form(State(state): State<AppState>, headers: HeaderMap) -> Html<String> {
    let flash = match session_id_from_cookies(&headers) {
        Some(id) => state.sessions.take_flash(id).await,
        None => None,
    };
    Html(render::login_page(flash.as_ref(), &state.config))
}

/// `POST /admin/login` — authenticates against the static credential
/// pair.
///
/// On match a fresh session token is issued (any previous one is
/// invalidated) and the caller lands on the panel. On mismatch the
/// caller returns to the login form with a flashed error that does not
/// reveal which field was wrong.
pub async fn login_submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    axum::Form(form): axum::Form<LoginForm>,
) -> impl IntoResponse {
    let previous = session_id_from_cookies(&headers);

    if form.user == state.config.admin_user && form.password == state.config.admin_password {
        if let Some(old) = previous {
            state.sessions.remove(old).await;
        }
        let id = state.sessions.create_admin().await;
        tracing::info!("admin login");
        return (
            AppendHeaders([(header::SET_COOKIE, session_cookie(id))]),
            Redirect::to(&state.config.path("/admin")),
        );
    }

    tracing::warn!(user = %form.user, "failed admin login");
    let id = match previous {
        Some(id) if state.sessions.exists(id).await => id,
        _ => state.sessions.create_anonymous().await,
    };
    state
        .sessions
        .set_flash(id, Flash::danger("Credenciales inválidas"))
        .await;
    (
        AppendHeaders([(header::SET_COOKIE, session_cookie(id))]),
        Redirect::to(&state.config.path("/admin/login")),
    )
}

/// `GET /admin/logout` — unconditionally ends the session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(id) = session_id_from_cookies(&headers) {
        state.sessions.remove(id).await;
    }
    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie())]),
        Redirect::to(&state.config.path("/admin/login")),
    )
}

/// `GET /admin` — panel: event selector plus registrations for the
/// optional `?slug=` filter.
///
/// # Errors
///
/// Returns [`AppError::Capacity`] or [`AppError::Store`] on store
/// failure.
pub async fn panel(
    gate: AdminGate,
    State(state): State<AppState>,
    Query(query): Query<PanelQuery>,
) -> Result<Html<String>, AppError> {
    let flash = state.sessions.take_flash(gate.session_id).await;
    let eventos = state.admin.list_events().await?;

    let slug = query
        .slug
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    let registros = if slug.is_empty() {
        Vec::new()
    } else {
        state.admin.registros_by_slug(&slug).await?
    };

    Ok(Html(render::panel_page(
        flash.as_ref(),
        &eventos,
        &registros,
        &slug,
        &state.config,
    )))
}

/// `POST /admin/evento` — creates an event; outcome is flashed and the
/// caller returns to the panel.
pub async fn create_evento(
    gate: AdminGate,
    State(state): State<AppState>,
    axum::Form(form): axum::Form<CreateEventoForm>,
) -> Redirect {
    let input = CreateEventoInput {
        slug: form.slug,
        titulo: form.titulo,
        fecha_inicio: form.fecha_inicio,
        fecha_fin: form.fecha_fin,
        lugar: form.lugar,
        activo: form.activo.as_deref().is_some_and(parse_consentimiento),
    };

    let flash = match state.admin.create(input).await {
        Ok(_) => Flash::success("Evento creado"),
        Err(e) => Flash::danger(e.public_message()),
    };
    state.sessions.set_flash(gate.session_id, flash).await;
    Redirect::to(&state.config.path("/admin"))
}

/// `POST /admin/evento/{id}/activar` — makes the event the single active
/// one; outcome is flashed and the caller returns to the panel.
pub async fn activar_evento(
    gate: AdminGate,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Redirect {
    let flash = match state.admin.activate(id).await {
        Ok(()) => Flash::success("Evento activado"),
        Err(e) => Flash::danger(e.public_message()),
    };
    state.sessions.set_flash(gate.session_id, flash).await;
    Redirect::to(&state.config.path("/admin"))
}

/// `GET /admin/export?slug=` — CSV download of all registrants for the
/// event.
///
/// # Errors
///
/// Returns [`AppError::Validation`] (400) when `slug` is missing,
/// [`AppError::Capacity`] or [`AppError::Store`] on store failure.
pub async fn export(
    _gate: AdminGate,
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    let export = state
        .export
        .export_csv(query.slug.as_deref().unwrap_or(""))
        .await?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "text/csv; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", export.filename),
            ),
        ],
        export.bytes,
    ))
}

/// Administration routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/login", get(login_form).post(login_submit))
        .route("/admin/logout", get(logout))
        .route("/admin", get(panel))
        .route("/admin/evento", post(create_evento))
        .route("/admin/evento/{id}/activar", post(activar_evento))
        .route("/admin/export", get(export))
}
