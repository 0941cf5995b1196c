//! PawPost Backend
//!
//! REST backend for composing rescue and blacklist posts, saving them as
//! templates, and documenting incidents with evidence, timelines and links.

mod api;
mod auth;
mod config;
mod csv_io;
mod db;
mod errors;
mod form;
mod format;
mod models;
mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat, TemplateBackend};
use db::{Repository, SqliteTemplateStore};
use store::{MemoryTemplateStore, TemplateStore};

/// Room for multipart framing and the text parts around an upload.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub templates: Arc<dyn TemplateStore>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting PawPost Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Upload directory: {:?}", config.upload_dir);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Warn if PSK is not configured
    if config.api_psk.is_none() {
        tracing::warn!("No API PSK configured (PAWPOST_API_PSK). Authentication is disabled!");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    tokio::fs::create_dir_all(&config.upload_dir).await?;

    let templates: Arc<dyn TemplateStore> = match config.template_backend {
        TemplateBackend::Sqlite => Arc::new(SqliteTemplateStore::new(pool.clone())),
        TemplateBackend::Memory => {
            tracing::warn!("Templates are kept in memory and will not survive a restart");
            Arc::new(MemoryTemplateStore::new())
        }
    };

    // Create application state
    let state = AppState {
        repo: Arc::new(Repository::new(pool)),
        templates,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Clone PSK for the auth layer
    let psk = state.config.api_psk.clone();
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    // API routes
    let api_routes = Router::new()
        // Templates
        .route("/templates", get(api::list_templates))
        .route("/templates", post(api::create_template))
        .route("/templates/{id}", get(api::get_template))
        .route("/templates/{id}", put(api::update_template))
        .route("/templates/{id}", delete(api::delete_template))
        // Incidents
        .route("/incidents", get(api::list_incidents))
        .route("/incidents", post(api::create_incident))
        .route("/incidents/export", get(api::export_incidents))
        .route("/incidents/import", post(api::import_incidents))
        .route("/incidents/{id}", get(api::get_incident))
        .route("/incidents/{id}", put(api::update_incident))
        .route("/incidents/{id}", delete(api::delete_incident))
        // Evidence
        .route("/incidents/{id}/evidence", get(api::list_evidence))
        .route("/incidents/{id}/evidence", post(api::upload_evidence))
        .route("/evidence/{id}", put(api::update_evidence))
        .route("/evidence/{id}", delete(api::delete_evidence))
        // Timeline
        .route("/incidents/{id}/timeline", get(api::list_timeline))
        .route("/incidents/{id}/timeline", post(api::create_timeline_entry))
        .route("/timeline/{id}", put(api::update_timeline_entry))
        .route("/timeline/{id}", delete(api::delete_timeline_entry))
        // Cross-references
        .route(
            "/incidents/{id}/cross-references",
            get(api::list_cross_references),
        )
        .route(
            "/incidents/{id}/cross-references",
            post(api::create_cross_reference),
        )
        .route("/cross-references/{id}", delete(api::delete_cross_reference))
        // Formatting
        .route("/format", post(api::format_text))
        .route("/form/apply", post(api::apply_form_action))
        .route("/labels", get(api::get_labels))
        .layer(DefaultBodyLimit::max(body_limit))
        // Apply PSK auth middleware
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
