//! Task lifecycle endpoints.
//!
//! Lifecycle actions whose precondition does not hold answer `200` with
//! `"outcome": "rejected"`: they are no-ops, not errors.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};

use super::routes::AppState;
use super::types::{
    error_response, markdown_download, CreateTaskRequest, OutcomeResponse, TaskView, TemplateInfo,
};
use crate::task::{TaskId, TemplateKind};

/// Create task routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_tasks).post(create_task))
        .route("/:id", get(get_task))
        .route("/:id/plan", post(generate_plan))
        .route("/:id/approve", post(approve_task))
        .route("/:id/execute", post(execute_task))
        .route("/:id/report", get(download_report))
}

/// GET /api/templates - List agent templates.
pub async fn list_templates() -> Json<Vec<TemplateInfo>> {
    Json(
        TemplateKind::ALL
            .iter()
            .map(|&kind| TemplateInfo {
                kind,
                summary: kind.summary(),
            })
            .collect(),
    )
}

/// GET /api/tasks - List tasks in creation order.
async fn list_tasks(State(state): State<Arc<AppState>>) -> Json<Vec<TaskView>> {
    let tasks = state.session.list_tasks().await;
    Json(tasks.into_iter().map(Into::into).collect())
}

/// POST /api/tasks - Create a task.
async fn create_task(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskView>), (StatusCode, String)> {
    let task = state
        .session
        .create_task(&req.name, &req.description, req.template)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::CREATED, Json(task.into())))
}

/// GET /api/tasks/:id - Get task details.
async fn get_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<TaskView>, (StatusCode, String)> {
    state
        .session
        .get_task(&TaskId::from(id))
        .await
        .map(|t| Json(t.into()))
        .map_err(error_response)
}

/// POST /api/tasks/:id/plan - Generate the execution plan.
async fn generate_plan(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OutcomeResponse>, (StatusCode, String)> {
    state
        .session
        .generate_plan(&TaskId::from(id))
        .await
        .map(|o| Json(o.into()))
        .map_err(error_response)
}

/// POST /api/tasks/:id/approve - Approve the generated plan.
async fn approve_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OutcomeResponse>, (StatusCode, String)> {
    state
        .session
        .approve(&TaskId::from(id))
        .await
        .map(|o| Json(o.into()))
        .map_err(error_response)
}

/// POST /api/tasks/:id/execute - Execute an approved task.
async fn execute_task(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<OutcomeResponse>, (StatusCode, String)> {
    state
        .session
        .execute(&TaskId::from(id))
        .await
        .map(|o| Json(o.into()))
        .map_err(error_response)
}

/// GET /api/tasks/:id/report - Download the report of a completed task.
async fn download_report(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Response {
    let id = TaskId::from(id);
    match state.session.task_export(&id).await {
        Ok(Some(export)) => markdown_download(export),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            format!("Task {} has no report yet", id),
        )
            .into_response(),
        Err(e) => error_response(e).into_response(),
    }
}
