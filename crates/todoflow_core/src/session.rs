//! Application session: owned stores, derivations and persistence.
//!
//! # Responsibility
//! - Own the task and notification stores for one app session.
//! - Hydrate both stores once at startup.
//! - After every store change, re-run reminder rules and persist each
//!   changed store with a detached save.
//!
//! # Invariants
//! - Stores are only mutated through session methods, so every change is
//!   observed by the rules and the save path.
//! - Hydration failures leave the affected store at its in-memory state
//!   (empty on first launch).
//! - Saves are fire-and-forget; `flush` is the only point that waits.

use crate::calendar::{month_grid, CalendarCell};
use crate::clock::Clock;
use crate::model::notification::{Notification, NotificationId};
use crate::model::task::{Task, TaskId};
use crate::persistence::{
    Persistence, SaveHandle, NOTIFICATIONS_STORAGE_KEY, TASKS_STORAGE_KEY,
};
use crate::rules::reminders::apply_reminder_rules;
use crate::rules::stats::{profile_stats, progress, ProfileStats, Progress};
use crate::storage::KvStorage;
use crate::store::notification_store::NotificationStore;
use crate::store::task_store::TaskStore;
use chrono::NaiveDate;
use log::{info, warn};
use std::sync::Arc;

#[derive(Debug, Clone, Copy)]
struct Changes {
    tasks: bool,
    notifications: bool,
}

impl Changes {
    fn tasks(changed: bool) -> Self {
        Self {
            tasks: changed,
            notifications: false,
        }
    }

    fn notifications(changed: bool) -> Self {
        Self {
            tasks: false,
            notifications: changed,
        }
    }

    fn any(self) -> bool {
        self.tasks || self.notifications
    }
}

/// Session-lifetime owner of all to-do state.
pub struct AppSession<C: Clock> {
    tasks: TaskStore,
    notifications: NotificationStore,
    persistence: Persistence,
    clock: C,
    pending_saves: Vec<SaveHandle>,
}

impl<C: Clock> AppSession<C> {
    /// Opens a session over `storage`, hydrating persisted state.
    ///
    /// # Side effects
    /// - Reads both store keys once.
    /// - Runs reminder rules and persists any reminders they insert.
    pub fn open(storage: Arc<dyn KvStorage>, clock: C) -> Self {
        let persistence = Persistence::new(storage);
        let mut session = Self {
            tasks: TaskStore::new(),
            notifications: NotificationStore::new(),
            persistence,
            clock,
            pending_saves: Vec::new(),
        };
        session.hydrate();
        session
    }

    fn hydrate(&mut self) {
        let tasks = self.persistence.load_items::<Task>(TASKS_STORAGE_KEY);
        let notifications = self
            .persistence
            .load_items::<Notification>(NOTIFICATIONS_STORAGE_KEY);

        if let Some(items) = tasks.into_value() {
            self.tasks.replace_all(items);
        }
        if let Some(items) = notifications.into_value() {
            self.notifications.replace_all(items);
        }
        info!(
            "event=session_hydrate module=session status=ok tasks={} notifications={}",
            self.tasks.len(),
            self.notifications.len()
        );

        // Freshly hydrated stores already match storage; only rule inserts
        // need to be written back.
        if self.run_rules() {
            self.persist(Changes::notifications(true));
        }
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn notifications(&self) -> &NotificationStore {
        &self.notifications
    }

    pub fn persistence(&self) -> &Persistence {
        &self.persistence
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    /// Local date of "now" according to the session clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }

    /// Adds a task; empty-after-trim titles are ignored.
    pub fn add_task(&mut self, title: &str) -> Option<TaskId> {
        let now_ms = self.clock.now().timestamp_millis();
        let id = self.tasks.add_at(title, now_ms);
        self.after_change(Changes::tasks(id.is_some()));
        id
    }

    pub fn toggle_task(&mut self, id: &str) {
        let changed = self.tasks.toggle(id);
        self.after_change(Changes::tasks(changed));
    }

    pub fn remove_task(&mut self, id: &str) {
        let changed = self.tasks.remove(id);
        self.after_change(Changes::tasks(changed));
    }

    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        let changed = self.tasks.replace_all(tasks);
        self.after_change(Changes::tasks(changed));
    }

    /// Adds a notification without any tag check.
    pub fn add_notification(
        &mut self,
        title: impl Into<String>,
        body: Option<String>,
        tag: Option<String>,
    ) -> NotificationId {
        let now_ms = self.clock.now().timestamp_millis();
        let id = self.notifications.add_at(title, body, tag, now_ms);
        self.after_change(Changes::notifications(true));
        id
    }

    pub fn mark_read(&mut self, id: &str) {
        let changed = self.notifications.mark_read(id);
        self.after_change(Changes::notifications(changed));
    }

    pub fn mark_all_read(&mut self) {
        let changed = self.notifications.mark_all_read();
        self.after_change(Changes::notifications(changed));
    }

    /// Clears all notifications.
    ///
    /// Reminder rules run afterwards like after any change, so today's daily
    /// reminder reappears immediately.
    pub fn clear_notifications(&mut self) {
        let changed = self.notifications.clear();
        self.after_change(Changes::notifications(changed));
    }

    /// Re-runs reminder rules without a store change (day rollover).
    pub fn refresh(&mut self) {
        if self.run_rules() {
            self.persist(Changes::notifications(true));
        }
    }

    pub fn progress(&self) -> Progress {
        progress(&self.tasks)
    }

    pub fn profile_stats(&self) -> ProfileStats {
        let now = self.clock.now();
        profile_stats(&self.tasks, now.date_naive(), &now.timezone())
    }

    /// Tasks created on `date` in the session timezone.
    pub fn tasks_on(&self, date: NaiveDate) -> Vec<&Task> {
        let tz = self.clock.now().timezone();
        self.tasks.created_on(date, tz).collect()
    }

    /// Month grid with today's date taken from the session clock.
    pub fn month_view(
        &self,
        year: i32,
        month: u32,
        selected: NaiveDate,
    ) -> Option<Vec<CalendarCell>> {
        month_grid(year, month, self.today(), selected)
    }

    /// Waits for every outstanding save.
    ///
    /// Returns how many of the awaited saves failed. Saves that finished
    /// before the last mutation were already logged and are not counted.
    pub fn flush(&mut self) -> usize {
        self.pending_saves
            .drain(..)
            .map(SaveHandle::join)
            .filter(|outcome| !outcome.is_ok())
            .count()
    }

    fn after_change(&mut self, mut changes: Changes) {
        if !changes.any() {
            return;
        }
        if self.run_rules() {
            changes.notifications = true;
        }
        self.persist(changes);
    }

    fn run_rules(&mut self) -> bool {
        let now = self.clock.now();
        apply_reminder_rules(&self.tasks, &mut self.notifications, &now) > 0
    }

    fn persist(&mut self, changes: Changes) {
        self.pending_saves.retain(|handle| !handle.is_finished());
        if changes.tasks {
            let handle = self
                .persistence
                .spawn_save(TASKS_STORAGE_KEY, self.tasks.items());
            self.pending_saves.push(handle);
        }
        if changes.notifications {
            let handle = self
                .persistence
                .spawn_save(NOTIFICATIONS_STORAGE_KEY, self.notifications.items());
            self.pending_saves.push(handle);
        }
    }
}

impl<C: Clock> Drop for AppSession<C> {
    fn drop(&mut self) {
        let failed = self.flush();
        if failed > 0 {
            warn!("event=session_close module=session status=error failed_saves={failed}");
        }
    }
}
