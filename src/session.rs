//! The single in-memory session: tasks, chat history and the last research
//! run, plus the operations that mutate them.
//!
//! No lock is held while the generation service is called. Each operation
//! snapshots what it needs, calls the service, then re-locks and applies the
//! result, re-checking the precondition so a duplicate request cannot apply
//! twice. A service failure returns before anything is written.

use serde::Serialize;
use tokio::sync::RwLock;

use crate::chat::{self, ChatHistory, ChatMessage, Role};
use crate::error::ActionError;
use crate::interpret::interpret;
use crate::llm::{self, GenerationClient, SharedClient};
use crate::prompts;
use crate::report::{Export, Report, ReportKind};
use crate::research::{self, ResearchRun};
use crate::task::{Task, TaskId, TaskStore, TemplateKind, Transition};

/// Result of a lifecycle action: what happened and the task afterwards.
#[derive(Debug, Clone, Serialize)]
pub struct Outcome {
    pub transition: Transition,
    pub task: Task,
}

pub struct Session {
    client: SharedClient,
    tasks: RwLock<TaskStore>,
    chat: RwLock<ChatHistory>,
    research: RwLock<Option<ResearchRun>>,
}

impl Session {
    pub fn new(client: SharedClient) -> Self {
        Self {
            client,
            tasks: RwLock::new(TaskStore::new()),
            chat: RwLock::new(ChatHistory::new()),
            research: RwLock::new(None),
        }
    }

    fn client(&self) -> &dyn GenerationClient {
        self.client.as_ref()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Tasks
    // ─────────────────────────────────────────────────────────────────────

    pub async fn create_task(
        &self,
        name: &str,
        description: &str,
        template: TemplateKind,
    ) -> Result<Task, ActionError> {
        let mut tasks = self.tasks.write().await;
        Ok(tasks.create(name, description, template)?.clone())
    }

    pub async fn list_tasks(&self) -> Vec<Task> {
        self.tasks.read().await.list().to_vec()
    }

    pub async fn get_task(&self, id: &TaskId) -> Result<Task, ActionError> {
        self.tasks
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| ActionError::TaskNotFound(id.clone()))
    }

    /// Ask the service for a plan and move the task to `PlanGenerated`.
    pub async fn generate_plan(&self, id: &TaskId) -> Result<Outcome, ActionError> {
        let task = self.get_task(id).await?;
        if let Err(rejection) = task.check_generate_plan() {
            return Ok(Outcome {
                transition: Transition::Rejected(rejection),
                task,
            });
        }

        let raw = self
            .client()
            .generate(&prompts::plan_prompt(&task))
            .await
            .map_err(|e| {
                tracing::warn!(task = %id, "Plan generation failed: {}", e);
                ActionError::service("generating plan", e)
            })?;
        let plan = interpret(&raw, || task.fallback_plan());

        self.apply(id, |task| task.apply_plan(plan)).await
    }

    /// Record the user's approval of the generated plan.
    pub async fn approve(&self, id: &TaskId) -> Result<Outcome, ActionError> {
        self.apply(id, Task::approve).await
    }

    /// Run an approved task and store its report.
    pub async fn execute(&self, id: &TaskId) -> Result<Outcome, ActionError> {
        let task = self.get_task(id).await?;
        if let Err(rejection) = task.check_execute() {
            return Ok(Outcome {
                transition: Transition::Rejected(rejection),
                task,
            });
        }

        let plan = task.plan().cloned().unwrap_or_else(|| task.fallback_plan());
        let raw = self
            .client()
            .generate(&prompts::execute_prompt(&task, &plan))
            .await
            .map_err(|e| {
                tracing::warn!(task = %id, "Task execution failed: {}", e);
                ActionError::service("executing task", e)
            })?;
        let report = interpret(&raw, || Report::fallback(task.name(), &raw));

        self.apply(id, |task| task.complete(report)).await
    }

    /// Markdown export of a completed task's report.
    pub async fn task_export(&self, id: &TaskId) -> Result<Option<Export>, ActionError> {
        let task = self.get_task(id).await?;
        Ok(task.report().map(|r| Export::new(ReportKind::Task, r)))
    }

    async fn apply<F>(&self, id: &TaskId, transition: F) -> Result<Outcome, ActionError>
    where
        F: FnOnce(&mut Task) -> Transition,
    {
        let mut tasks = self.tasks.write().await;
        let task = tasks
            .get_mut(id)
            .ok_or_else(|| ActionError::TaskNotFound(id.clone()))?;
        let transition = transition(task);
        if let Transition::Rejected(rejection) = &transition {
            tracing::debug!(task = %id, reason = rejection.reason, "Transition rejected");
        }
        Ok(Outcome {
            transition,
            task: task.clone(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────────────────

    pub async fn chat_history(&self) -> ChatHistory {
        self.chat.read().await.clone()
    }

    /// Send one chat turn. The history only changes when the service answers.
    pub async fn chat(&self, prompt: &str) -> Result<ChatMessage, ActionError> {
        let reply = chat::ask(self.client(), prompt).await?;
        self.chat
            .write()
            .await
            .push_turn(prompt.to_string(), reply.clone());
        Ok(ChatMessage::new(Role::Assistant, reply))
    }

    /// Check that the service answers at all.
    pub async fn probe(&self) -> Result<String, ActionError> {
        llm::probe(self.client())
            .await
            .map_err(|e| ActionError::service("testing the API", e))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Research
    // ─────────────────────────────────────────────────────────────────────

    /// Run the research pipeline. The new run (with its fresh fact log)
    /// replaces the previous one only if every stage completes.
    pub async fn run_research(&self, topic: &str) -> Result<ResearchRun, ActionError> {
        let run = research::run(self.client(), topic).await?;
        *self.research.write().await = Some(run.clone());
        Ok(run)
    }

    pub async fn last_research(&self) -> Option<ResearchRun> {
        self.research.read().await.clone()
    }

    pub async fn research_export(&self) -> Option<Export> {
        self.research
            .read()
            .await
            .as_ref()
            .map(|run| Export::new(ReportKind::Research, run.report.value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::interpret::Interpreted;
    use crate::llm::scripted::ScriptedClient;
    use crate::llm::GenerationError;
    use crate::task::{Plan, TaskStatus};

    const EXECUTE_JSON: &str = r###"{
        "title": "Brief on D1",
        "outline": ["Background", "Findings"],
        "report": "## Findings\n\nD1 matters.",
        "sources": ["Survey 2024"],
        "word_count": 4
    }"###;

    fn session(client: ScriptedClient) -> (Session, Arc<ScriptedClient>) {
        let client = Arc::new(client);
        (Session::new(client.clone()), client)
    }

    #[tokio::test]
    async fn test_plan_approve_execute_scenario() {
        let (session, _) = session(
            ScriptedClient::new()
                .reply("Here is a great plan (not JSON)")
                .reply(EXECUTE_JSON),
        );

        let task = session
            .create_task("T1", "D1", TemplateKind::ResearchBrief)
            .await
            .unwrap();
        assert_eq!(session.list_tasks().await.len(), 1);
        assert_eq!(task.status(), TaskStatus::Created);
        let id = task.id().clone();

        let outcome = session.generate_plan(&id).await.unwrap();
        assert!(outcome.transition.is_applied());
        assert_eq!(outcome.task.status(), TaskStatus::PlanGenerated);
        let plan = outcome.task.plan().unwrap();
        assert_eq!(plan, &Plan::fallback(TemplateKind::ResearchBrief, "D1"));
        assert_eq!(plan.steps.len(), 4);
        assert_eq!(plan.sources.len(), 3);
        assert!(outcome.task.plan_defaulted());

        let outcome = session.approve(&id).await.unwrap();
        assert_eq!(outcome.task.status(), TaskStatus::Approved);
        assert!(outcome.task.approved());

        let outcome = session.execute(&id).await.unwrap();
        assert_eq!(outcome.task.status(), TaskStatus::Completed);
        assert_eq!(outcome.task.result(), Some("## Findings\n\nD1 matters."));
        assert!(!outcome.task.report_defaulted());
        assert_eq!(outcome.task.report().unwrap().title, "Brief on D1");

        let export = session.task_export(&id).await.unwrap().unwrap();
        assert_eq!(export.file_name, "task_report.md");
        assert!(export.body.starts_with("# Brief on D1\n"));
    }

    #[tokio::test]
    async fn test_execute_with_malformed_output_still_sets_result() {
        let (session, _) = session(
            ScriptedClient::new()
                .reply(r#"{"plan": "p", "sources": [], "steps": ["s"]}"#)
                .reply("Plain markdown answer"),
        );
        let id = session
            .create_task("T", "D", TemplateKind::Summarization)
            .await
            .unwrap()
            .id()
            .clone();

        assert!(!session.generate_plan(&id).await.unwrap().task.plan_defaulted());
        session.approve(&id).await.unwrap();
        let outcome = session.execute(&id).await.unwrap();

        assert_eq!(outcome.task.status(), TaskStatus::Completed);
        assert_eq!(outcome.task.result(), Some("Plain markdown answer"));
        assert!(outcome.task.report_defaulted());
        assert_eq!(outcome.task.report().unwrap().title, "T");
    }

    #[tokio::test]
    async fn test_generate_plan_on_planned_task_is_noop() {
        let (session, client) = session(ScriptedClient::new().reply("nope"));
        let id = session
            .create_task("T", "D", TemplateKind::StudyPlan)
            .await
            .unwrap()
            .id()
            .clone();
        session.generate_plan(&id).await.unwrap();
        let before = serde_json::to_value(session.get_task(&id).await.unwrap()).unwrap();

        let outcome = session.generate_plan(&id).await.unwrap();
        assert!(!outcome.transition.is_applied());
        assert_eq!(serde_json::to_value(&outcome.task).unwrap(), before);
        // The rejected request never reached the service.
        assert_eq!(client.prompts().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicate_plans_apply_once() {
        let (session, client) = session(
            ScriptedClient::new()
                .reply(r#"{"plan": "p0", "sources": [], "steps": ["s0"]}"#)
                .reply(r#"{"plan": "p1", "sources": [], "steps": ["s1"]}"#),
        );
        let id = session
            .create_task("T", "D", TemplateKind::ResearchBrief)
            .await
            .unwrap()
            .id()
            .clone();

        let (a, b) = tokio::join!(session.generate_plan(&id), session.generate_plan(&id));
        let (a, b) = (a.unwrap(), b.unwrap());

        // Both passed the first check and reached the service.
        assert_eq!(client.prompts().len(), 2);
        assert!(a.transition.is_applied());
        match b.transition {
            Transition::Rejected(rejection) => {
                assert_eq!(rejection.status, TaskStatus::PlanGenerated)
            }
            other => panic!("expected a rejection, got {:?}", other),
        }

        let task = session.get_task(&id).await.unwrap();
        assert_eq!(task.status(), TaskStatus::PlanGenerated);
        assert_eq!(task.plan().unwrap().plan, "p0");
        assert_eq!(task.plan().unwrap().steps, vec!["s0".to_string()]);
    }

    #[tokio::test]
    async fn test_service_failure_leaves_task_unchanged() {
        let (session, _) = session(
            ScriptedClient::new()
                .fail(GenerationError::quota_exceeded("HTTP 429: quota"))
                .fail(GenerationError::transient("HTTP 500: boom")),
        );
        let id = session
            .create_task("T", "D", TemplateKind::ResearchBrief)
            .await
            .unwrap()
            .id()
            .clone();

        let err = session.generate_plan(&id).await.unwrap_err();
        assert!(err.is_quota_exceeded());
        let err = session.generate_plan(&id).await.unwrap_err();
        assert_eq!(err.to_string(), "Error generating plan: HTTP 500: boom");

        let task = session.get_task(&id).await.unwrap();
        assert_eq!(task.status(), TaskStatus::Created);
        assert!(task.plan().is_none());
    }

    #[tokio::test]
    async fn test_execute_failure_keeps_approved_state() {
        let (session, _) = session(
            ScriptedClient::new()
                .reply("x")
                .fail(GenerationError::transient("timeout")),
        );
        let id = session
            .create_task("T", "D", TemplateKind::ResearchBrief)
            .await
            .unwrap()
            .id()
            .clone();
        session.generate_plan(&id).await.unwrap();
        session.approve(&id).await.unwrap();

        assert!(session.execute(&id).await.is_err());
        let task = session.get_task(&id).await.unwrap();
        assert_eq!(task.status(), TaskStatus::Approved);
        assert!(task.result().is_none());
        assert!(session.task_export(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_approve_and_execute_out_of_order_are_rejected() {
        let (session, client) = session(ScriptedClient::new());
        let id = session
            .create_task("T", "D", TemplateKind::ResearchBrief)
            .await
            .unwrap()
            .id()
            .clone();

        assert!(!session.execute(&id).await.unwrap().transition.is_applied());
        assert!(!session.approve(&id).await.unwrap().transition.is_applied());
        let task = session.get_task(&id).await.unwrap();
        assert!(!task.approved());
        assert_eq!(task.status(), TaskStatus::Created);
        assert!(client.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_task() {
        let (session, _) = session(ScriptedClient::new());
        let id = TaskId::from("deadbeef".to_string());
        assert!(matches!(
            session.approve(&id).await,
            Err(ActionError::TaskNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_fields_add_nothing() {
        let (session, _) = session(ScriptedClient::new());
        let err = session
            .create_task("", "D", TemplateKind::ResearchBrief)
            .await
            .unwrap_err();
        assert!(err.is_validation());
        assert!(session.list_tasks().await.is_empty());
    }

    #[tokio::test]
    async fn test_chat_failure_leaves_history_unchanged() {
        let (session, _) = session(
            ScriptedClient::new()
                .reply("hello there")
                .fail(GenerationError::quota_exceeded("429")),
        );

        let reply = session.chat("hi").await.unwrap();
        assert_eq!(reply.content, "hello there");
        assert_eq!(session.chat_history().await.len(), 2);

        let err = session.chat("again").await.unwrap_err();
        assert!(err.is_quota_exceeded());
        assert_eq!(session.chat_history().await.len(), 2);
    }

    #[tokio::test]
    async fn test_probe_trims_reply() {
        let (session, client) = session(ScriptedClient::new().reply("  API is working\n"));
        assert_eq!(session.probe().await.unwrap(), "API is working");
        assert_eq!(client.prompts(), vec![llm::PROBE_PROMPT]);
    }

    #[tokio::test]
    async fn test_failed_research_keeps_previous_run() {
        let (session, _) = session(
            ScriptedClient::new()
                .reply("not json")
                .reply("summary one")
                .reply("not json either")
                .fail(GenerationError::transient("down")),
        );

        let first = session.run_research("X").await.unwrap();
        assert!(matches!(first.plan, Interpreted::DefaultedTo(_)));
        assert!(session.run_research("Y").await.is_err());

        let kept = session.last_research().await.unwrap();
        assert_eq!(kept.topic, "X");
        assert_eq!(kept.facts.len(), 1);
        let export = session.research_export().await.unwrap();
        assert_eq!(export.file_name, "research_report.md");
        assert!(export.body.contains("summary one"));
    }
}
