//! Task: the per-user resource tracked by the system.

use serde::{Deserialize, Serialize};

use crate::{DomainError, Entity, TaskId};

/// A unit of work owned by exactly one user.
///
/// Ownership is not a field: it lives in the owner component of the task's
/// storage key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub is_completed: bool,
}

impl Task {
    /// Create a new, not-yet-completed task with a freshly generated id.
    pub fn new(name: impl Into<String>, description: Option<String>) -> Result<Self, DomainError> {
        Self::with_id(TaskId::new(), name, description, false)
    }

    pub fn with_id(
        id: TaskId,
        name: impl Into<String>,
        description: Option<String>,
        is_completed: bool,
    ) -> Result<Self, DomainError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("task name must not be empty"));
        }
        Ok(Self {
            id,
            name,
            description,
            is_completed,
        })
    }
}

impl Entity for Task {
    type Id = TaskId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_task_starts_incomplete() {
        let task = Task::new("buy milk", None).unwrap();
        assert!(!task.is_completed);
        assert_eq!(task.name, "buy milk");
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(matches!(Task::new("  ", None), Err(DomainError::Validation(_))));
    }

    #[test]
    fn persisted_form_uses_camel_case_and_omits_missing_description() {
        let task = Task::new("buy milk", None).unwrap();
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], task.id.to_string());
        assert_eq!(json["isCompleted"], false);
        assert!(json.get("description").is_none());
    }

    #[test]
    fn empty_description_is_kept_as_given() {
        let task = Task::with_id(TaskId::new(), "buy milk", Some(String::new()), true).unwrap();
        assert_eq!(task.description.as_deref(), Some(""));

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["description"], "");
    }

    #[test]
    fn missing_completion_flag_defaults_to_false() {
        let id = TaskId::new();
        let task: Task =
            serde_json::from_value(serde_json::json!({ "id": id.to_string(), "name": "x" })).unwrap();
        assert_eq!(task.id, id);
        assert!(!task.is_completed);
    }
}
