//! Shared API types and error mapping.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::report::Export;
use crate::session::Outcome;
use crate::task::{Task, TemplateKind, Transition};

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub provider: String,
    pub model: String,
}

/// A task as shown to the browser, with a display label for its status.
#[derive(Debug, Serialize)]
pub struct TaskView {
    #[serde(flatten)]
    pub task: Task,
    pub status_label: String,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            status_label: task.status().to_string(),
            task,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OutcomeResponse {
    pub transition: Transition,
    pub task: TaskView,
}

impl From<Outcome> for OutcomeResponse {
    fn from(outcome: Outcome) -> Self {
        Self {
            transition: outcome.transition,
            task: outcome.task.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    pub kind: TemplateKind,
    pub summary: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub template: TemplateKind,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    #[serde(default)]
    pub topic: String,
}

/// Map a session error to a status code and the user-facing message.
pub fn error_response(err: ActionError) -> (StatusCode, String) {
    let status = match &err {
        ActionError::EmptyField(_) | ActionError::EmptyInput(_) => StatusCode::BAD_REQUEST,
        ActionError::TaskNotFound(_) => StatusCode::NOT_FOUND,
        ActionError::Service { source, .. } if source.is_quota_exceeded() => {
            StatusCode::TOO_MANY_REQUESTS
        }
        ActionError::Service { .. } => StatusCode::BAD_GATEWAY,
    };
    (status, err.to_string())
}

/// Serve a report as a markdown file download.
pub fn markdown_download(export: Export) -> Response {
    (
        [
            (header::CONTENT_TYPE, export.content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.file_name),
            ),
        ],
        export.body,
    )
        .into_response()
}
