//! Public handlers: root redirect, registration form, submission API.

use axum::Router;
use axum::extract::{Path, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};

use crate::api::dto::{OkResponse, RegistroRequest};
use crate::api::extract::{ClientMeta, JsonOrForm};
use crate::api::render;
use crate::app_state::AppState;
use crate::error::{AppError, ErrorResponse};

/// `GET /` — redirects to the active event's registration form.
///
/// # Errors
///
/// Returns [`AppError::Configuration`] (500) when zero events are
/// active: the site is unusable until an administrator activates one.
pub async fn index(State(state): State<AppState>) -> Result<Redirect, AppError> {
    let slug = state.admin.default_slug().await?;
    Ok(Redirect::to(&state.config.path(&format!("/evento/{slug}"))))
}

/// `GET /evento/{slug}` — renders the registration form.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] when no active event has the slug;
/// inactive events with the same slug stay invisible.
pub async fn evento_form(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Html<String>, AppError> {
    let evento = state.admin.active_event_by_slug(&slug).await?;
    Ok(Html(render::registro_form(&evento, &state.config)))
}

/// `GET /success` — static confirmation page.
pub async fn success() -> Html<String> {
    Html(render::success_page())
}

/// `POST /api/registro` — submits a registration (JSON or form body).
///
/// # Errors
///
/// Returns [`AppError::Validation`] (400), [`AppError::NotFound`] (404),
/// [`AppError::Conflict`] (409 duplicate email), [`AppError::Capacity`]
/// (503) or [`AppError::Store`] (500).
#[utoipa::path(
    post,
    path = "/api/registro",
    tag = "Registro",
    summary = "Submit a registration",
    description = "Registers an attendee for the active event matching the given slug. \
                   Accepts JSON or form-encoded bodies. Email is normalized to lower case; \
                   one registration per email per event.",
    request_body = RegistroRequest,
    responses(
        (status = 200, description = "Registration stored", body = OkResponse),
        (status = 400, description = "Missing required field", body = ErrorResponse),
        (status = 404, description = "Event not found or inactive", body = ErrorResponse),
        (status = 409, description = "Email already registered for this event", body = ErrorResponse),
        (status = 503, description = "Connection pool exhausted", body = ErrorResponse),
    )
)]
pub async fn api_registro(
    State(state): State<AppState>,
    meta: ClientMeta,
    JsonOrForm(req): JsonOrForm<RegistroRequest>,
) -> Result<axum::Json<OkResponse>, AppError> {
    let submission = req.into_submission(meta.ip, meta.user_agent);
    state.registration.submit(submission).await?;
    Ok(axum::Json(OkResponse { ok: true }))
}

/// Public routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/evento/{slug}", get(evento_form))
        .route("/success", get(success))
        .route("/api/registro", post(api_registro))
}
