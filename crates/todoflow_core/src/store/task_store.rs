//! Ordered task collection.

use crate::calendar::local_date;
use crate::model::task::{Task, TaskId};
use crate::model::now_epoch_ms;
use chrono::{NaiveDate, TimeZone};

/// Most-recent-first list of tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskStore {
    items: Vec<Task>,
}

impl TaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites the whole collection. Used for hydration.
    pub fn replace_all(&mut self, tasks: Vec<Task>) -> bool {
        if self.items == tasks {
            return false;
        }
        self.items = tasks;
        true
    }

    /// Adds an open task stamped with the current wall-clock time.
    pub fn add(&mut self, title: &str) -> Option<TaskId> {
        self.add_at(title, now_epoch_ms())
    }

    /// Adds an open task stamped with `created_at`.
    ///
    /// # Contract
    /// - Titles that are empty after trimming are ignored (`None`).
    /// - The title is stored as given; trimming is the caller's job.
    /// - The new task is prepended and its generated id returned.
    pub fn add_at(&mut self, title: &str, created_at: i64) -> Option<TaskId> {
        if title.trim().is_empty() {
            return None;
        }
        let task = Task::new(title, created_at);
        let id = task.id.clone();
        self.items.insert(0, task);
        Some(id)
    }

    /// Flips `completed` on the task with `id`. Unknown ids are ignored.
    pub fn toggle(&mut self, id: &str) -> bool {
        match self.items.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.toggle();
                true
            }
            None => false,
        }
    }

    /// Removes the task with `id`. Unknown ids are ignored.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|task| task.id != id);
        self.items.len() != before
    }

    pub fn items(&self) -> &[Task] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.items.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Tasks still open, in store order.
    pub fn pending(&self) -> impl Iterator<Item = &Task> {
        self.items.iter().filter(|task| !task.completed)
    }

    /// Completed tasks, in store order.
    pub fn completed(&self) -> impl Iterator<Item = &Task> {
        self.items.iter().filter(|task| task.completed)
    }

    /// Tasks whose creation time falls on `date` in `tz`.
    pub fn created_on<'a, Tz: TimeZone + 'a>(
        &'a self,
        date: NaiveDate,
        tz: Tz,
    ) -> impl Iterator<Item = &'a Task> + 'a {
        self.items
            .iter()
            .filter(move |task| local_date(task.created_at, &tz) == Some(date))
    }
}
