//! Core domain logic for the todoflow app.
//! This crate is the single source of truth for task, reminder and
//! persistence rules; UI shells only call into it.

pub mod calendar;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod rules;
pub mod session;
pub mod storage;
pub mod store;

pub use calendar::{day_key, local_date, month_grid, shift_month, CalendarCell};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::AppConfig;
pub use logging::{default_log_level, init_from_config, init_logging, logging_status, LoggingError};
pub use model::notification::{Notification, NotificationId};
pub use model::task::{Task, TaskId};
pub use persistence::{
    BestEffort, PersistError, Persistence, SaveHandle, NOTIFICATIONS_STORAGE_KEY,
    ONBOARDING_STORAGE_KEY, TASKS_STORAGE_KEY,
};
pub use rules::reminders::{apply_reminder_rules, daily_tag, incomplete_tag};
pub use rules::stats::{profile_stats, progress, ProfileStats, Progress};
pub use rules::streak::current_streak;
pub use session::AppSession;
pub use storage::{KvStorage, SqliteKvStorage, StorageError, StorageResult};
pub use store::notification_store::NotificationStore;
pub use store::task_store::TaskStore;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
