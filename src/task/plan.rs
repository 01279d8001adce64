//! Execution plans proposed before a task runs.

use serde::{Deserialize, Serialize};

use super::TemplateKind;
use crate::interpret::{Interpretable, Shape};

const FALLBACK_STEPS: [&str; 4] = [
    "Step 1: Analyze the input content and identify key themes",
    "Step 2: Extract relevant information and structure findings",
    "Step 3: Generate comprehensive output based on template requirements",
    "Step 4: Review and validate results for accuracy",
];

/// Strategy, sources and ordered steps for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Free-text description of the execution strategy.
    pub plan: String,
    pub sources: Vec<String>,
    pub steps: Vec<String>,
}

impl Interpretable for Plan {
    const SHAPE: Shape = Shape::Plan;
}

impl Plan {
    /// The canned plan substituted when the service's answer is unusable.
    /// Depends only on the task's stored template and description.
    pub fn fallback(template: TemplateKind, description: &str) -> Self {
        Self {
            plan: format!(
                "Execute {} for: {}...",
                template,
                truncate_chars(description, 100)
            ),
            sources: vec![
                format!("Primary source: {}...", truncate_chars(description, 200)),
                "General knowledge base for AI and autonomous agents".to_string(),
                "Academic papers on multi-agent systems".to_string(),
            ],
            steps: FALLBACK_STEPS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
