//! HTTP API for the browser front end.
//!
//! ## Endpoints
//! - `GET /` - single-page UI
//! - `GET /api/health` - health check
//! - `/api/tasks` - create, list and advance tasks through their lifecycle
//! - `/api/chat` - direct chat with the model
//! - `/api/research` - triage → research → editor pipeline

mod chat;
pub mod routes;
mod research;
mod tasks;
mod types;

pub use routes::{router, serve, AppState};
