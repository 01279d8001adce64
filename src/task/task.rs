//! Task records and their lifecycle.
//!
//! ```text
//! Created ──plan──▶ PlanGenerated ──approve──▶ Approved ──execute──▶ Completed
//! ```
//!
//! No transition is reversible. A transition whose precondition does not
//! hold is rejected as a no-op and leaves the task untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Plan;
use crate::interpret::Interpreted;
use crate::report::Report;

/// Opaque task identifier, unique within a store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// A fresh short identifier (8 hex characters).
    pub fn generate() -> Self {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(8);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Agent template a task runs under. Defaults to the first one offered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateKind {
    #[default]
    #[serde(rename = "Research Brief", alias = "research_brief")]
    ResearchBrief,
    #[serde(rename = "Summarization", alias = "summarization")]
    Summarization,
    #[serde(rename = "Study Plan", alias = "study_plan")]
    StudyPlan,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 3] = [Self::ResearchBrief, Self::Summarization, Self::StudyPlan];

    /// One-line description shown next to the template picker.
    pub fn summary(self) -> &'static str {
        match self {
            Self::ResearchBrief => {
                "Create a research brief on the given topic with key points, sources, and summary."
            }
            Self::Summarization => {
                "Summarize the provided text or topic into key points and main ideas."
            }
            Self::StudyPlan => {
                "Create a study plan for the given subject with timeline, resources, \
                 and milestones."
            }
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResearchBrief => write!(f, "Research Brief"),
            Self::Summarization => write!(f, "Summarization"),
            Self::StudyPlan => write!(f, "Study Plan"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Created,
    PlanGenerated,
    Approved,
    Completed,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created => write!(f, "Created"),
            Self::PlanGenerated => write!(f, "Plan Generated"),
            Self::Approved => write!(f, "Approved"),
            Self::Completed => write!(f, "Completed"),
        }
    }
}

/// Why a transition was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub status: TaskStatus,
    pub reason: &'static str,
}

/// Result of attempting a lifecycle transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Transition {
    Applied { from: TaskStatus, to: TaskStatus },
    Rejected(Rejection),
}

impl Transition {
    pub fn is_applied(&self) -> bool {
        matches!(self, Self::Applied { .. })
    }
}

/// A user-defined unit of work.
///
/// Fields are private so the lifecycle invariants hold: `plan` is only set
/// by [`Task::apply_plan`], `result` only by [`Task::complete`], and
/// `approved` only by [`Task::approve`].
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    id: TaskId,
    name: String,
    description: String,
    template: TemplateKind,
    status: TaskStatus,
    created_at: DateTime<Utc>,
    approved: bool,
    plan: Option<Plan>,
    plan_defaulted: bool,
    result: Option<String>,
    report: Option<Report>,
    report_defaulted: bool,
}

impl Task {
    pub(crate) fn new(
        id: TaskId,
        name: String,
        description: String,
        template: TemplateKind,
    ) -> Self {
        Self {
            id,
            name,
            description,
            template,
            status: TaskStatus::Created,
            created_at: Utc::now(),
            approved: false,
            plan: None,
            plan_defaulted: false,
            result: None,
            report: None,
            report_defaulted: false,
        }
    }

    pub fn id(&self) -> &TaskId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn template(&self) -> TemplateKind {
        self.template
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn approved(&self) -> bool {
        self.approved
    }

    pub fn plan(&self) -> Option<&Plan> {
        self.plan.as_ref()
    }

    pub fn plan_defaulted(&self) -> bool {
        self.plan_defaulted
    }

    pub fn result(&self) -> Option<&str> {
        self.result.as_deref()
    }

    pub fn report(&self) -> Option<&Report> {
        self.report.as_ref()
    }

    pub fn report_defaulted(&self) -> bool {
        self.report_defaulted
    }

    /// The plan to fall back to for this task.
    pub fn fallback_plan(&self) -> Plan {
        Plan::fallback(self.template, &self.description)
    }

    pub fn check_generate_plan(&self) -> Result<(), Rejection> {
        if self.status == TaskStatus::Created {
            Ok(())
        } else {
            Err(self.reject("a plan can only be generated for a newly created task"))
        }
    }

    pub fn check_approve(&self) -> Result<(), Rejection> {
        if self.status == TaskStatus::PlanGenerated && !self.approved {
            Ok(())
        } else {
            Err(self.reject("only a task with a generated, unapproved plan can be approved"))
        }
    }

    pub fn check_execute(&self) -> Result<(), Rejection> {
        if self.status == TaskStatus::Approved && self.approved {
            Ok(())
        } else {
            Err(self.reject("only an approved task can be executed"))
        }
    }

    /// `Created → PlanGenerated`, storing the interpreted plan.
    pub fn apply_plan(&mut self, plan: Interpreted<Plan>) -> Transition {
        if let Err(rejection) = self.check_generate_plan() {
            return Transition::Rejected(rejection);
        }
        self.plan_defaulted = plan.is_defaulted();
        self.plan = Some(plan.into_value());
        self.advance(TaskStatus::PlanGenerated)
    }

    /// `PlanGenerated → Approved`.
    pub fn approve(&mut self) -> Transition {
        if let Err(rejection) = self.check_approve() {
            return Transition::Rejected(rejection);
        }
        self.approved = true;
        self.advance(TaskStatus::Approved)
    }

    /// `Approved → Completed`, storing the interpreted report.
    pub fn complete(&mut self, report: Interpreted<Report>) -> Transition {
        if let Err(rejection) = self.check_execute() {
            return Transition::Rejected(rejection);
        }
        self.report_defaulted = report.is_defaulted();
        let report = report.into_value();
        self.result = Some(report.report.clone());
        self.report = Some(report);
        self.advance(TaskStatus::Completed)
    }

    fn advance(&mut self, to: TaskStatus) -> Transition {
        let from = self.status;
        self.status = to;
        tracing::info!(task = %self.id, %from, %to, "Task transitioned");
        Transition::Applied { from, to }
    }

    fn reject(&self, reason: &'static str) -> Rejection {
        Rejection {
            status: self.status,
            reason,
        }
    }
}
