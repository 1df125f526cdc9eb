//! Task record.
//!
//! # Invariants
//! - `id` is stable for the task lifetime and never reassigned.
//! - A task is only mutated through `completed` flips; everything else is
//!   fixed at creation.

use serde::{Deserialize, Serialize};

/// Stable identifier of a task record.
pub type TaskId = String;

/// One to-do item as shown on the home and task screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub completed: bool,
    /// Unix epoch milliseconds at creation time.
    pub created_at: i64,
}

impl Task {
    /// Creates an open task with a generated id.
    pub fn new(title: impl Into<String>, created_at: i64) -> Self {
        Self::with_id(super::new_record_id(), title, created_at)
    }

    /// Creates an open task with a caller-provided id.
    ///
    /// Used by hydration and tests where identity already exists.
    pub fn with_id(id: impl Into<TaskId>, title: impl Into<String>, created_at: i64) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
            created_at,
        }
    }

    /// Flips completion state.
    pub fn toggle(&mut self) {
        self.completed = !self.completed;
    }
}

#[cfg(test)]
mod tests {
    use super::Task;

    #[test]
    fn serializes_with_camel_case_created_at() {
        let task = Task::with_id("t-1", "Buy milk", 1_700_000_000_000);
        let json = serde_json::to_value(&task).unwrap();

        assert_eq!(json["id"], "t-1");
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["completed"], false);
        assert_eq!(json["createdAt"], 1_700_000_000_000_i64);
        assert!(json.get("created_at").is_none());
    }

    #[test]
    fn accepts_foreign_id_format() {
        let value = serde_json::json!({
            "id": "V1StGXR8_Z5jdHi6B-myT",
            "title": "legacy",
            "completed": true,
            "createdAt": 1
        });

        let task: Task = serde_json::from_value(value).unwrap();
        assert_eq!(task.id, "V1StGXR8_Z5jdHi6B-myT");
        assert!(task.completed);
    }

    #[test]
    fn toggle_flips_back_and_forth() {
        let mut task = Task::new("flip", 0);
        task.toggle();
        assert!(task.completed);
        task.toggle();
        assert!(!task.completed);
    }
}
