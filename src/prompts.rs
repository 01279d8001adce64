//! Prompt templates.
//!
//! Every builder is a pure function of its inputs. Builders whose output is
//! interpreted structurally spell out the exact JSON shape the matching type
//! decodes: [`Plan`], [`Report`], [`ResearchPlan`](crate::research::ResearchPlan).

use crate::task::{Plan, Task, TemplateKind};

/// Focus hints per template, included in the planning prompt.
fn planning_focus(template: TemplateKind) -> &'static str {
    match template {
        TemplateKind::ResearchBrief => "Key research areas, data sources, analysis methods",
        TemplateKind::Summarization => "Analysis approach, key extraction, summary structure",
        TemplateKind::StudyPlan => "Learning objectives, timeline, resources, assessment",
    }
}

const REPORT_SHAPE: &str = r#"{
    "title": "Report Title",
    "outline": ["section1", "section2"],
    "report": "full detailed report in markdown",
    "sources": ["source1", "source2"],
    "word_count": 1234
}"#;

/// Ask for an execution plan for a newly created task.
pub fn plan_prompt(task: &Task) -> String {
    format!(
        r#"You are a triage agent for {template} tasks.
Task: {description}

Create a detailed execution plan with specific steps, relevant sources, and expected outcomes.
For {template} tasks, focus on: {focus}.

Respond ONLY with a valid JSON object in this exact format:
{{
    "plan": "Detailed description of the execution strategy and approach",
    "sources": ["Source 1: brief description", "Source 2: brief description"],
    "steps": ["Step 1: detailed action", "Step 2: detailed action", "Step 3: detailed action"]
}}

Make steps actionable and specific. Sources should be relevant to the task."#,
        template = task.template(),
        description = task.description(),
        focus = planning_focus(task.template()),
    )
}

/// Ask for the final report of an approved task, following its plan.
pub fn execute_prompt(task: &Task, plan: &Plan) -> String {
    let plan_json = serde_json::to_string_pretty(plan).unwrap_or_else(|_| plan.plan.clone());
    format!(
        r#"You are an AI agent for {template}.
Task: {description}
Plan: {plan_json}

Execute the task and provide the final result.
Respond ONLY with a valid JSON object in this exact format:
{REPORT_SHAPE}"#,
        template = task.template(),
        description = task.description(),
    )
}

/// Research pipeline stage 1: turn a topic into search queries.
pub fn triage_prompt(topic: &str) -> String {
    format!(
        r#"You are the coordinator of this research operation. Your job is to:
1. Understand the user's research topic: {topic}
2. Create a research plan with the following elements:
   - topic: A clear statement of the research topic
   - search_queries: A list of 3-5 specific search queries that will help gather information
   - focus_areas: A list of 3-5 key aspects of the topic to investigate
3. Respond ONLY with a valid JSON object in this exact format:
{{
    "topic": "clear statement of the topic",
    "search_queries": ["query 1", "query 2", "query 3"],
    "focus_areas": ["aspect 1", "aspect 2", "aspect 3"]
}}"#
    )
}

/// Research pipeline stage 2: summarize one search query. Plain text output.
pub fn research_prompt(query: &str) -> String {
    format!(
        "You are a research assistant. Given a search term: {query}, produce a concise summary \
         of the results. The summary must be 2-3 paragraphs and less than 300 words. Capture the \
         main points. Write succinctly, no need to have complete sentences or good grammar. This \
         will be consumed by someone synthesizing a report, so its vital you capture the essence \
         and ignore any fluff. Do not include any additional commentary other than the summary \
         itself."
    )
}

/// Research pipeline stage 3: write the report from collected research.
pub fn editor_prompt(topic: &str, research_data: &str) -> String {
    format!(
        "You are a senior researcher tasked with writing a cohesive report for a research \
         query: {topic}.\n\
         You will be provided with initial research: {research_data}.\n\
         You should first come up with an outline for the report that describes the structure \
         and flow of the report. Then, generate the report and return that as your final \
         output.\n\
         The final output should be in markdown format, and it should be lengthy and detailed. \
         Aim for 5-10 pages of content, at least 1000 words.\n\
         Respond ONLY with a valid JSON object in this exact format:\n\
         {REPORT_SHAPE}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;
    use crate::research::ResearchPlan;
    use crate::task::TaskStore;

    /// Pull the JSON example out of a prompt (from the first `{` on its own
    /// line to the last `}`).
    fn example_json(prompt: &str) -> serde_json::Value {
        let start = prompt.find("\n{").unwrap() + 1;
        let end = prompt.rfind('}').unwrap() + 1;
        serde_json::from_str(&prompt[start..end]).unwrap()
    }

    fn sample_task(template: TemplateKind) -> TaskStore {
        let mut store = TaskStore::new();
        store.create("T1", "Quantum error correction", template).unwrap();
        store
    }

    #[test]
    fn test_plan_prompt_mentions_task() {
        let store = sample_task(TemplateKind::StudyPlan);
        let prompt = plan_prompt(&store.list()[0]);
        assert!(prompt.contains("triage agent for Study Plan tasks"));
        assert!(prompt.contains("Task: Quantum error correction"));
        assert!(prompt.contains("Learning objectives"));
    }

    #[test]
    fn test_plan_prompt_example_decodes_as_plan() {
        let store = sample_task(TemplateKind::ResearchBrief);
        let value = example_json(&plan_prompt(&store.list()[0]));
        let plan: Plan = serde_json::from_value(value).unwrap();
        assert_eq!(plan.steps.len(), 3);
    }

    #[test]
    fn test_execute_prompt_embeds_plan_and_report_shape() {
        let store = sample_task(TemplateKind::Summarization);
        let task = &store.list()[0];
        let plan = task.fallback_plan();
        let prompt = execute_prompt(task, &plan);
        assert!(prompt.contains("Step 4: Review and validate results for accuracy"));

        let shape_start = prompt.rfind("\n{").unwrap() + 1;
        let report: Report = serde_json::from_str(&prompt[shape_start..]).unwrap();
        assert_eq!(report.word_count, 1234);
    }

    #[test]
    fn test_triage_prompt_example_decodes_as_research_plan() {
        let value = example_json(&triage_prompt("espresso machines"));
        let plan: ResearchPlan = serde_json::from_value(value).unwrap();
        assert_eq!(plan.search_queries.len(), 3);
    }

    #[test]
    fn test_editor_prompt_example_decodes_as_report() {
        let prompt = editor_prompt("X", "notes");
        assert!(prompt.contains("initial research: notes."));
        let report: Report = serde_json::from_value(example_json(&prompt)).unwrap();
        assert_eq!(report.title, "Report Title");
    }

    #[test]
    fn test_research_prompt_is_plain_text() {
        let prompt = research_prompt("best cruise lines");
        assert!(prompt.contains("search term: best cruise lines,"));
        assert!(!prompt.contains('{'));
    }
}
