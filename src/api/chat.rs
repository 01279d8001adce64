//! Direct chat endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::routes::AppState;
use super::types::{error_response, ChatRequest};
use crate::chat::{ChatHistory, ChatMessage};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(get_history).post(send_message))
        .route("/probe", post(probe))
}

/// GET /api/chat - Chat history in order.
async fn get_history(State(state): State<Arc<AppState>>) -> Json<ChatHistory> {
    Json(state.session.chat_history().await)
}

/// POST /api/chat - Send one message, returns the assistant reply.
async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatMessage>, (StatusCode, String)> {
    state
        .session
        .chat(&req.message)
        .await
        .map(Json)
        .map_err(error_response)
}

/// POST /api/chat/probe - Check that the model answers.
async fn probe(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let reply = state.session.probe().await.map_err(error_response)?;
    Ok(Json(json!({
        "success": true,
        "message": format!("API Test Successful: {}", reply),
    })))
}
