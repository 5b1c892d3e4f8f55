//! HTTP status API: axum router and request handlers.
//!
//! The server runs on the tokio runtime while the driver loop runs on a
//! plain `std::thread`. They share the running flag and the playback
//! status; nothing else crosses between them.
//!
//! ## Rust concepts
//! - `async fn` handlers with axum extractors (`State`)
//! - `Arc` for sharing state across async tasks
//! - `tower-http` middleware for tracing and CORS

use crate::player::{PlaybackState, PlaybackStatus};
use crate::request_stop;
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// ── App State ────────────────────────────────────────────────────────

/// Shared application state, passed to every handler via axum's `State` extractor.
#[derive(Clone)]
pub struct AppState {
    /// Cleared to stop the driver loop
    pub running: Arc<AtomicBool>,
    /// Playback status (driver writes, handlers read)
    pub status: Arc<Mutex<PlaybackStatus>>,
}

// ── OpenAPI Documentation ────────────────────────────────────────────

#[derive(OpenApi)]
#[openapi(
    paths(get_status, post_stop),
    components(schemas(PlaybackStatus, PlaybackState)),
    tags(
        (name = "playback", description = "Animation playback endpoints"),
        (name = "system", description = "System status endpoints"),
    ),
    info(
        title = "LED Matrix Bounce API",
        version = env!("CARGO_PKG_VERSION"),
        description = "HTTP API for watching and stopping the bouncing-ball animation"
    )
)]
pub struct ApiDoc;

// ── Router ───────────────────────────────────────────────────────────

/// Build the axum router with all API endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(
            SwaggerUi::new("/docs")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
                .config(
                    utoipa_swagger_ui::Config::new(["/api-docs/openapi.json"])
                        .validator_url("none"),
                ),
        )
        .route("/api/v1/status", get(get_status))
        .route("/api/v1/playback/stop", post(post_stop))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────

/// GET /api/v1/status — return current playback status
#[utoipa::path(
    get,
    path = "/api/v1/status",
    tag = "system",
    responses(
        (status = 200, description = "Current playback status", body = PlaybackStatus),
        (status = 500, description = "Status lock poisoned")
    )
)]
async fn get_status(
    State(state): State<AppState>,
) -> Result<Json<PlaybackStatus>, (StatusCode, String)> {
    let status = state
        .status
        .lock()
        .map_err(|_| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Driver thread panicked".to_string(),
            )
        })?
        .clone();
    Ok(Json(status))
}

/// POST /api/v1/playback/stop — stop the animation after the current frame
#[utoipa::path(
    post,
    path = "/api/v1/playback/stop",
    tag = "playback",
    responses(
        (status = 200, description = "Stop requested"),
    )
)]
async fn post_stop(State(state): State<AppState>) -> StatusCode {
    tracing::info!("Stop requested over HTTP");
    request_stop(&state.running);
    StatusCode::OK
}
