//! Research pipeline endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Serialize;

use super::routes::AppState;
use super::types::{error_response, markdown_download, ResearchRequest};
use crate::research::{ResearchRun, EXAMPLE_TOPICS};

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(last_run).post(start_research))
        .route("/examples", get(example_topics))
        .route("/report", get(download_report))
}

#[derive(Debug, Serialize)]
pub struct ResearchResponse {
    #[serde(flatten)]
    pub run: ResearchRun,
    pub preview: String,
}

impl From<ResearchRun> for ResearchResponse {
    fn from(run: ResearchRun) -> Self {
        Self {
            preview: run.preview(),
            run,
        }
    }
}

/// POST /api/research - Run the full pipeline on a topic.
async fn start_research(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>, (StatusCode, String)> {
    state
        .session
        .run_research(&req.topic)
        .await
        .map(|run| Json(run.into()))
        .map_err(error_response)
}

/// GET /api/research - The last completed run, if any.
async fn last_run(State(state): State<Arc<AppState>>) -> Json<Option<ResearchResponse>> {
    Json(state.session.last_research().await.map(Into::into))
}

/// GET /api/research/examples - Suggested topics.
async fn example_topics() -> Json<Vec<&'static str>> {
    Json(EXAMPLE_TOPICS.to_vec())
}

/// GET /api/research/report - Download the last report as markdown.
async fn download_report(State(state): State<Arc<AppState>>) -> Response {
    match state.session.research_export().await {
        Some(export) => markdown_download(export),
        None => (StatusCode::NOT_FOUND, "No research report yet".to_string()).into_response(),
    }
}
