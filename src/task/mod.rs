//! Task module - task records, plans, and the session's task store.
//!
//! - All lifecycle transitions go through methods on [`Task`] that check
//!   their precondition and return an explicit [`Transition`]
//! - Pure state changes are separated from calls to the generation service

mod plan;
mod store;
#[allow(clippy::module_inception)]
mod task;

pub use plan::Plan;
pub use store::{EmptyFieldError, TaskStore};
pub use task::{Rejection, Task, TaskId, TaskStatus, TemplateKind, Transition};
