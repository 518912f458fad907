//! HTTP API for the question-answering pipeline.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/chat` | Answer a user message |
//! | `GET`  | `/` | Liveness check |
//!
//! # Error Contract
//!
//! Error responses are JSON:
//!
//! ```json
//! { "error": { "code": "upstream_error", "message": "..." } }
//! ```
//!
//! Pipeline failures (embedding, retrieval, generation) map to `502`
//! with code `upstream_error`. Malformed request bodies are rejected by
//! axum's JSON extractor.
//!
//! # CORS
//!
//! All origins, methods, and headers are permitted so browser frontends
//! can call the API directly.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::Config;
use crate::pipeline::RagPipeline;

const LIVENESS_MESSAGE: &str =
    "RAG Chatbot API is running. Send POST requests to /api/chat.";

/// Shared application state passed to route handlers via Axum's `State`
/// extractor.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<RagPipeline>,
}

impl AppState {
    pub fn new(pipeline: Arc<RagPipeline>) -> Self {
        Self { pipeline }
    }
}

/// Builds the router with all routes and the permissive CORS layer.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_root))
        .route("/api/chat", post(handle_chat))
        .layer(cors)
        .with_state(state)
}

/// Starts the HTTP server on the configured bind address and serves until
/// the process is terminated.
pub async fn run_server(config: &Config, pipeline: Arc<RagPipeline>) -> anyhow::Result<()> {
    let bind_addr = config.server.bind.clone();
    let state = AppState::new(pipeline);

    println!("RAG server listening on http://{}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

// ============ Error response ============

/// JSON error response body.
#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

/// Inner error detail with a machine-readable code and human-readable message.
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

/// Internal error type that converts into an Axum HTTP response.
struct AppError {
    status: StatusCode,
    code: String,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code,
                message: self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}

/// Constructs a 502 error for failures in the providers behind the pipeline.
fn upstream_error(message: impl Into<String>) -> AppError {
    AppError {
        status: StatusCode::BAD_GATEWAY,
        code: "upstream_error".to_string(),
        message: message.into(),
    }
}

// ============ GET / ============

/// JSON response body for `GET /`.
#[derive(Serialize)]
struct LivenessResponse {
    message: String,
}

/// Handler for `GET /`. Static liveness message for probes and humans.
async fn handle_root() -> Json<LivenessResponse> {
    Json(LivenessResponse {
        message: LIVENESS_MESSAGE.to_string(),
    })
}

// ============ POST /api/chat ============

/// JSON request body for `POST /api/chat`.
#[derive(Deserialize)]
struct ChatRequest {
    message: String,
}

/// JSON response body for `POST /api/chat`.
#[derive(Serialize)]
struct ChatResponse {
    response: String,
}

/// Handler for `POST /api/chat`. Runs the full pipeline on the message.
async fn handle_chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let answer = state.pipeline.get_answer(&request.message).await.map_err(|e| {
        tracing::error!("Pipeline error: {:#}", e);
        upstream_error(e.to_string())
    })?;

    Ok(Json(ChatResponse { response: answer }))
}
