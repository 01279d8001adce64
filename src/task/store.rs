//! Ordered in-memory task store for one session.

use super::{Task, TaskId, TemplateKind};

/// Rejection of an empty required field at creation time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Please fill in task name and description.")]
pub struct EmptyFieldError;

/// Tasks in creation order. Nothing is ever removed.
#[derive(Debug, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a task. Blank name or description adds nothing.
    pub fn create(
        &mut self,
        name: &str,
        description: &str,
        template: TemplateKind,
    ) -> Result<&Task, EmptyFieldError> {
        let name = name.trim();
        let description = description.trim();
        if name.is_empty() || description.is_empty() {
            return Err(EmptyFieldError);
        }

        let id = self.unused_id();
        self.tasks.push(Task::new(
            id,
            name.to_string(),
            description.to_string(),
            template,
        ));
        let task = &self.tasks[self.tasks.len() - 1];
        tracing::info!(task = %task.id(), template = %template, "Task '{}' created", task.name());
        Ok(task)
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn get_mut(&mut self, id: &TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id() == id)
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn unused_id(&self) -> TaskId {
        loop {
            let id = TaskId::generate();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::TaskStatus;

    #[test]
    fn test_create_appends_in_order() {
        let mut store = TaskStore::new();
        let first = store
            .create("T1", "D1", TemplateKind::ResearchBrief)
            .unwrap()
            .id()
            .clone();
        store.create("T2", "D2", TemplateKind::StudyPlan).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.list()[0].id(), &first);
        assert_eq!(store.list()[1].name(), "T2");
        assert_eq!(store.get(&first).unwrap().status(), TaskStatus::Created);
        assert_ne!(store.list()[0].id(), store.list()[1].id());
    }

    #[test]
    fn test_empty_fields_change_nothing() {
        let mut store = TaskStore::new();
        store.create("T1", "D1", TemplateKind::ResearchBrief).unwrap();
        let before = serde_json::to_value(store.list()).unwrap();

        assert_eq!(
            store.create("", "D", TemplateKind::Summarization).unwrap_err(),
            EmptyFieldError
        );
        assert!(store.create("N", "   ", TemplateKind::Summarization).is_err());

        assert_eq!(store.len(), 1);
        assert_eq!(serde_json::to_value(store.list()).unwrap(), before);
    }

    #[test]
    fn test_unknown_id() {
        let store = TaskStore::new();
        assert!(store.get(&TaskId::from("missing".to_string())).is_none());
        assert!(store.is_empty());
    }
}
