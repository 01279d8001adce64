//! # Agentic Assist
//!
//! Task agents with user-verified autonomy: the model proposes a plan, the
//! user approves it, and only then does execution produce a report.
//!
//! This library provides:
//! - A task lifecycle (`Created → PlanGenerated → Approved → Completed`)
//! - A triage → research → editor pipeline over a single topic
//! - Direct chat with the model
//! - An HTTP API and single-page UI over one in-memory session
//!
//! ## Architecture
//!
//! ```text
//!   browser ──▶ api ──▶ Session ──▶ prompts ──▶ GenerationClient ──▶ Gemini / OpenRouter
//!                          │                          │
//!                          ▼                          ▼
//!                      TaskStore  ◀── interpret (Decoded | DefaultedTo)
//! ```
//!
//! Malformed model output never fails an action: the interpreter substitutes
//! a deterministic default. Service failures leave state untouched and are
//! reported to the user; nothing is retried.
//!
//! ## Modules
//! - `task`: task records, plans, lifecycle transitions, task store
//! - `session`: the session object every operation runs against
//! - `research`: research pipeline and fact log
//! - `llm`: generation service clients

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod interpret;
pub mod llm;
pub mod prompts;
pub mod report;
pub mod research;
pub mod session;
pub mod task;

pub use config::Config;
pub use error::ActionError;
pub use session::Session;
