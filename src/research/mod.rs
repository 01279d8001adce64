//! Research pipeline: triage → research → editor over a single topic.
//!
//! 1. The triage stage turns the topic into search queries (falls back to a
//!    single generic query when its answer does not decode)
//! 2. The research stage summarizes each query and logs a fact per summary
//! 3. The editor stage writes a report from the joined summaries (falls back
//!    to a report built around the raw summaries)
//!
//! There is no approval gate. A service failure at any stage aborts the run;
//! the caller keeps whatever run it had before.

mod facts;

pub use facts::{Fact, FactLog, FACT_SNIPPET_CHARS};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ActionError;
use crate::interpret::{interpret, Interpretable, Interpreted, Shape};
use crate::llm::GenerationClient;
use crate::prompts;
use crate::report::Report;

/// Characters of the report body shown as a preview when a run finishes.
pub const REPORT_PREVIEW_CHARS: usize = 300;

/// Suggested topics offered to the user.
pub const EXAMPLE_TOPICS: [&str; 3] = [
    "What are the best cruise lines in USA for first-time travelers \
     who have never been on a cruise?",
    "What are the best affordable espresso machines for someone upgrading from a French press?",
    "What are the best off-the-beaten-path destinations in India for a first-time solo traveler?",
];

/// Output of the triage stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResearchPlan {
    pub topic: String,
    pub search_queries: Vec<String>,
    pub focus_areas: Vec<String>,
}

impl Interpretable for ResearchPlan {
    const SHAPE: Shape = Shape::ResearchPlan;
}

impl ResearchPlan {
    pub fn fallback(topic: &str) -> Self {
        Self {
            topic: topic.to_string(),
            search_queries: vec![format!("Research {}", topic)],
            focus_areas: vec![format!("General info on {}", topic)],
        }
    }
}

/// A finished research run.
#[derive(Debug, Clone, Serialize)]
pub struct ResearchRun {
    pub topic: String,
    pub plan: Interpreted<ResearchPlan>,
    pub summaries: Vec<String>,
    pub facts: FactLog,
    pub report: Interpreted<Report>,
    pub completed_at: DateTime<Utc>,
}

impl ResearchRun {
    pub fn preview(&self) -> String {
        self.report.value().preview(REPORT_PREVIEW_CHARS)
    }
}

/// Run the full pipeline for `topic`.
pub async fn run(client: &dyn GenerationClient, topic: &str) -> Result<ResearchRun, ActionError> {
    let topic = topic.trim();
    if topic.is_empty() {
        return Err(ActionError::EmptyInput("Please enter a topic to research."));
    }

    tracing::info!(%topic, "Triage agent: planning research approach");
    let raw = client
        .generate(&prompts::triage_prompt(topic))
        .await
        .map_err(|e| ActionError::service("planning research", e))?;
    let plan = interpret(&raw, || ResearchPlan::fallback(topic));

    let source = format!("{} Research", client.name());
    let mut facts = FactLog::new();
    let mut summaries = Vec::with_capacity(plan.value().search_queries.len());
    for query in &plan.value().search_queries {
        tracing::debug!(%query, "Research agent: summarizing query");
        let summary = client
            .generate(&prompts::research_prompt(query))
            .await
            .map_err(|e| ActionError::service("researching", e))?;
        facts.record_summary(&summary, &source);
        summaries.push(summary);
    }

    tracing::info!(
        queries = summaries.len(),
        facts = facts.len(),
        "Editor agent: creating research report"
    );
    let research_data = summaries.join("\n");
    let raw = client
        .generate(&prompts::editor_prompt(topic, &research_data))
        .await
        .map_err(|e| ActionError::service("generating report", e))?;
    let report = interpret(&raw, || Report::fallback(topic, &research_data));

    tracing::info!(
        plan_defaulted = plan.is_defaulted(),
        report_defaulted = report.is_defaulted(),
        "Research complete"
    );

    Ok(ResearchRun {
        topic: topic.to_string(),
        plan,
        summaries,
        facts,
        report,
        completed_at: Utc::now(),
    })
}
