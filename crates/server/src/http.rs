//! HTTP endpoints
//!
//! REST API for the translation agent.

use axum::{
    extract::{Json, Path, State},
    http::header::{AUTHORIZATION, CONTENT_TYPE},
    http::{HeaderValue, Method, StatusCode},
    routing::{delete, get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use translate_agent_core::language::{Language, LanguagePair};

use crate::metrics::metrics_handler;
use crate::state::AppState;
use crate::turns;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.settings.server.cors_origins,
        state.settings.server.cors_enabled,
    );

    Router::new()
        // Pipeline operations
        .route("/api/v1/detect", post(turns::detect_language))
        .route("/api/v1/classify", post(turns::classify_context))
        .route("/api/v1/translate", post(turns::translate_text))
        .route("/api/v1/transcribe", post(turns::transcribe_audio))
        .route("/api/v1/speak", post(turns::speak_text))
        // Session endpoints
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/:id", get(get_session))
        .route("/api/v1/sessions/:id", delete(delete_session))
        .route("/api/v1/sessions/:id/swap", post(swap_languages))
        .route("/api/v1/sessions/:id/languages", post(set_languages))
        .route("/api/v1/sessions/:id/turns", post(turns::process_turn))
        // Health and observability
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .route("/metrics", get(metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - If cors_enabled is false, returns a permissive layer (for dev)
/// - If cors_origins is empty, defaults to localhost:3000 for safety
/// - Otherwise, uses the configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, falling back to localhost");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    // Credentials cannot ride with wildcard headers, so this branch lists
    // the headers the API actually accepts
    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .allow_credentials(true)
}

/// Request to create a session
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    /// Source language; configured default when absent
    pub source: Option<Language>,
    /// Destination language; configured default when absent
    pub target: Option<Language>,
}

/// Session language pair on the wire
#[derive(Debug, Serialize)]
pub struct PairResponse {
    pub session_id: String,
    pub source: Language,
    pub target: Language,
}

/// Create a new session
async fn create_session(
    State(state): State<AppState>,
    Json(request): Json<CreateSessionRequest>,
) -> Result<(StatusCode, Json<PairResponse>), ServerError> {
    let defaults = state.default_pair();
    let pair = LanguagePair::new(
        request.source.unwrap_or(defaults.src),
        request.target.unwrap_or(defaults.dst),
    );

    let session = state.sessions.create(pair)?;

    Ok((
        StatusCode::CREATED,
        Json(PairResponse {
            session_id: session.id.clone(),
            source: pair.src,
            target: pair.dst,
        }),
    ))
}

/// Get session info and conversation history
async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    let pair = session.pair();

    Ok(Json(serde_json::json!({
        "session_id": session.id,
        "source": pair.src,
        "target": pair.dst,
        "active": session.is_active(),
        "turn_count": session.turn_count(),
        "turns": session.turns(),
    })))
}

/// Delete session
async fn delete_session(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.sessions.remove(&id);
    StatusCode::NO_CONTENT
}

/// Swap the session's source and destination
async fn swap_languages(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PairResponse>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    session.touch();

    let pair = session.swap_pair();
    Ok(Json(PairResponse {
        session_id: session.id.clone(),
        source: pair.src,
        target: pair.dst,
    }))
}

/// Request to set the session's language pair
#[derive(Debug, Deserialize)]
pub struct SetLanguagesRequest {
    pub source: Language,
    pub target: Language,
}

/// Replace the session's language pair
async fn set_languages(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetLanguagesRequest>,
) -> Result<Json<PairResponse>, StatusCode> {
    let session = state.sessions.get(&id).ok_or(StatusCode::NOT_FOUND)?;
    session.touch();

    let pair = LanguagePair::new(request.source, request.target);
    session.set_pair(pair);

    Ok(Json(PairResponse {
        session_id: session.id.clone(),
        source: pair.src,
        target: pair.dst,
    }))
}

/// Liveness check
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "sessions": state.sessions.count(),
    }))
}

/// Readiness check with chat backend connectivity
async fn readiness_check(State(state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    let session_count = state.sessions.count();

    let mut checks = serde_json::Map::new();
    let mut ready = true;

    checks.insert(
        "sessions".to_string(),
        serde_json::json!({
            "status": "ok",
            "count": session_count
        }),
    );

    let llm_status = if state.llm.is_available().await {
        "ok"
    } else {
        ready = false;
        "unreachable"
    };

    checks.insert(
        "llm_backend".to_string(),
        serde_json::json!({
            "status": llm_status,
            "model": state.llm.model_name(),
        }),
    );

    let status = if ready { "ready" } else { "not_ready" };
    let status_code = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(serde_json::json!({
            "status": status,
            "checks": checks
        })),
    )
}
