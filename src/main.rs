//! registro-server entry point.
//!
//! Starts the Axum HTTP server: public registration form and API plus the
//! session-protected admin panel.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use registro_server::api;
use registro_server::app_state::AppState;
use registro_server::config::AppConfig;
use registro_server::domain::SessionStore;
use registro_server::persistence::PgStore;
use registro_server::service::{EventAdminService, ExportService, RegistrationService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = AppConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting registro-server");

    // Connect the bounded pool; exhausting it surfaces as PoolTimedOut
    // after the acquire timeout, which handlers answer with 503.
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_acquire_timeout_secs))
        .connect(&config.database_url)
        .await?;

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("migrations applied");

    // Build service layer
    let store = PgStore::new(pool);
    let app_state = AppState {
        registration: RegistrationService::new(store.clone()),
        admin: EventAdminService::new(store.clone()),
        export: ExportService::new(store),
        sessions: Arc::new(SessionStore::new()),
        config: Arc::new(config.clone()),
    };

    // Build router, honoring the optional mount prefix
    let routes = api::build_router().with_state(app_state);
    let app: Router = if config.url_prefix.is_empty() {
        routes
    } else {
        Router::new().nest(&config.url_prefix, routes)
    };
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
