//! HTTP Endpoints
//!
//! REST API around the dialogue controller.

use axum::{
    extract::{Json, Path, Query, State},
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::state::AppState;
use yojana_agent_core::StateStore;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(
        &state.config.server.cors_origins,
        state.config.server.cors_enabled,
    );

    Router::new()
        // Conversation endpoints
        .route("/api/start", get(start_conversation))
        .route("/api/chat", post(chat))
        .route("/api/state/:thread_id", get(get_state))
        .route("/api/state/:thread_id", delete(reset_thread))
        // Scheme catalog and applications
        .route("/api/schemes", get(list_schemes))
        .route("/api/applications/:application_id", get(application_status))
        // Health check
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
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
        tracing::info!("No CORS origins configured, defaulting to localhost:3000");
        return CorsLayer::new()
            .allow_origin("http://localhost:3000".parse::<HeaderValue>().unwrap())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any);
    }

    CorsLayer::new()
        .allow_origin(parsed_origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

#[derive(Deserialize)]
struct StartParams {
    thread_id: Option<String>,
}

/// Start a conversation: fresh thread id (or reset of the given one) plus
/// the opening message
async fn start_conversation(
    State(state): State<AppState>,
    Query(params): Query<StartParams>,
) -> Json<serde_json::Value> {
    let thread_id = match params.thread_id {
        Some(id) => {
            state.remove_thread(&id);
            id
        }
        None => Uuid::new_v4().to_string(),
    };

    Json(serde_json::json!({
        "thread_id": thread_id,
        "message": "नमस्ते! मैं सरकारी योजनाओं की जानकारी देने में आपकी मदद करूंगा। शुरू करने के लिए कृपया अपनी उम्र बताइए।",
    }))
}

#[derive(Deserialize)]
struct ChatRequest {
    thread_id: String,
    text: String,
}

/// One conversation turn
async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    if request.text.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "text must not be empty" })),
        );
    }

    // One turn at a time per thread; the controller assumes serialized turns
    let lock = state.turn_lock(&request.thread_id);
    let _guard = lock.lock().await;

    let prior = state.store.get(&request.thread_id);
    match state
        .controller
        .process_turn(&request.thread_id, &request.text, prior)
    {
        Ok(outcome) => {
            state.store.put(&request.thread_id, outcome.state.clone());
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "thread_id": request.thread_id,
                    "reply": outcome.reply,
                    "turn_count": outcome.state.turn_count,
                    "profile": outcome.state.profile,
                    "metadata": outcome.metadata,
                })),
            )
        }
        Err(err) => {
            // Corrupted checkpoint: reject the turn loudly
            tracing::error!(thread_id = %request.thread_id, error = %err, "Turn rejected");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "error": err.to_string() })),
            )
        }
    }
}

/// Current conversation state for a thread
async fn get_state(
    State(state): State<AppState>,
    Path(thread_id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let conversation = state.store.get(&thread_id).ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(serde_json::json!({
        "thread_id": thread_id,
        "turn_count": conversation.turn_count,
        "profile": conversation.profile,
        "messages": conversation.messages,
        "contradictions": conversation.contradictions,
        "applied_schemes": conversation.applied_schemes,
    })))
}

/// Drop a thread's state (conversation reset)
async fn reset_thread(State(state): State<AppState>, Path(thread_id): Path<String>) -> StatusCode {
    state.remove_thread(&thread_id);
    StatusCode::NO_CONTENT
}

/// Status of a submitted application
async fn application_status(
    State(state): State<AppState>,
    Path(application_id): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let record = state
        .controller
        .application_status(&application_id)
        .ok_or(StatusCode::NOT_FOUND)?;

    Ok(Json(serde_json::json!({
        "application_id": record.application_id,
        "scheme_id": record.scheme_id,
        "status": record.status,
        "submitted_at": record.submitted_at,
        "estimated_processing_days": record.estimated_processing_days,
    })))
}

/// The loaded scheme catalog
async fn list_schemes(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({ "schemes": state.controller.catalog() }))
}

/// Health check endpoint
async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "schemes_loaded": state.controller.catalog().len(),
        "active_threads": state.store.len(),
    }))
}
