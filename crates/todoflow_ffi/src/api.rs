//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose task, notification, profile, onboarding and calendar use-cases
//!   to Dart via FRB.
//! - Own the one process-lifetime `AppSession` the UI talks to.
//!
//! # Invariants
//! - Exported functions must not panic across FFI boundary.
//! - Store-level not-found ids stay silent; only session/storage setup
//!   failures produce `ok=false` envelopes.

use chrono::{Datelike, NaiveDate};
use log::error;
use std::sync::{Arc, Mutex, MutexGuard, OnceLock};
use todoflow_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner, AppConfig, AppSession, CalendarCell, Notification, Persistence,
    SqliteKvStorage, SystemClock, Task,
};

type Session = AppSession<SystemClock>;

static SESSION: OnceLock<Result<Mutex<Session>, String>> = OnceLock::new();

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Safe to call repeatedly with the same `level + log_dir` (idempotent).
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Task row for home/task screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub id: String,
    pub title: String,
    pub completed: bool,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// Notification row for the notifications screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationItem {
    pub id: String,
    pub title: String,
    pub body: Option<String>,
    pub created_at: i64,
    pub read: bool,
    /// Reminder dedupe key; `None` for manual notifications.
    pub tag: Option<String>,
}

/// Notification list envelope with badge count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationsResponse {
    pub items: Vec<NotificationItem>,
    pub unread_count: u32,
    /// Empty on success, diagnostic text otherwise.
    pub message: String,
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    /// Whether the call reached the session.
    pub ok: bool,
    /// Created record id, when the action creates one.
    pub id: Option<String>,
    /// Human-readable response message for diagnostics/UI.
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, id: Option<String>) -> Self {
        Self {
            ok: true,
            id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            id: None,
            message: message.into(),
        }
    }
}

/// Profile screen statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileStatsResponse {
    pub tasks_completed: u32,
    pub total_tasks: u32,
    pub current_streak: u32,
    pub productivity_pct: u32,
}

/// Home screen progress card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProgressResponse {
    pub completed: u32,
    pub total: u32,
    pub percent: u32,
}

/// One calendar grid cell; `day == 0` marks leading padding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDayItem {
    pub day: u32,
    pub is_today: bool,
    pub is_selected: bool,
}

/// Calendar month envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarMonthResponse {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<CalendarDayItem>,
    /// Empty on success, diagnostic text otherwise.
    pub message: String,
}

/// Lists tasks most-recent-first.
///
/// # FFI contract
/// - Sync call; opens the session on first use.
/// - Never panics; returns an empty list when the session is unavailable.
#[flutter_rust_bridge::frb(sync)]
pub fn tasks_list() -> Vec<TaskItem> {
    read_session(|session| {
        session
            .tasks()
            .items()
            .iter()
            .map(to_task_item)
            .collect::<Vec<_>>()
    })
    .unwrap_or_default()
}

/// Adds a task from the task screen input.
///
/// Input is trimmed; blank titles succeed with `id = None` and no change.
#[flutter_rust_bridge::frb(sync)]
pub fn task_add(title: String) -> ActionResponse {
    let title = title.trim().to_string();
    match with_session(|session| session.add_task(&title)) {
        Ok(Some(id)) => ActionResponse::success("Task created.", Some(id)),
        Ok(None) => ActionResponse::success("Empty title ignored.", None),
        Err(err) => ActionResponse::failure(format!("task_add failed: {err}")),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_toggle(id: String) -> ActionResponse {
    action("task_toggle", |session| session.toggle_task(&id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn task_remove(id: String) -> ActionResponse {
    action("task_remove", |session| session.remove_task(&id))
}

/// Lists notifications most-recent-first with the unread badge count.
#[flutter_rust_bridge::frb(sync)]
pub fn notifications_list() -> NotificationsResponse {
    let listed = read_session(|session| {
        let store = session.notifications();
        (
            store
                .items()
                .iter()
                .map(to_notification_item)
                .collect::<Vec<_>>(),
            saturating_u32(store.unread_count()),
        )
    });
    match listed {
        Ok((items, unread_count)) => NotificationsResponse {
            items,
            unread_count,
            message: String::new(),
        },
        Err(err) => NotificationsResponse {
            items: Vec::new(),
            unread_count: 0,
            message: format!("notifications_list failed: {err}"),
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn notification_mark_read(id: String) -> ActionResponse {
    action("notification_mark_read", |session| session.mark_read(&id))
}

#[flutter_rust_bridge::frb(sync)]
pub fn notifications_mark_all_read() -> ActionResponse {
    action("notifications_mark_all_read", Session::mark_all_read)
}

#[flutter_rust_bridge::frb(sync)]
pub fn notifications_clear() -> ActionResponse {
    action("notifications_clear", Session::clear_notifications)
}

/// Re-runs reminder rules, for app resume after midnight.
#[flutter_rust_bridge::frb(sync)]
pub fn reminders_refresh() -> ActionResponse {
    action("reminders_refresh", Session::refresh)
}

#[flutter_rust_bridge::frb(sync)]
pub fn profile_stats() -> ProfileStatsResponse {
    read_session(|session| {
        let stats = session.profile_stats();
        ProfileStatsResponse {
            tasks_completed: saturating_u32(stats.tasks_completed),
            total_tasks: saturating_u32(stats.total_tasks),
            current_streak: stats.current_streak,
            productivity_pct: stats.productivity_pct,
        }
    })
    .unwrap_or_default()
}

#[flutter_rust_bridge::frb(sync)]
pub fn home_progress() -> ProgressResponse {
    read_session(|session| {
        let progress = session.progress();
        ProgressResponse {
            completed: saturating_u32(progress.completed),
            total: saturating_u32(progress.total),
            percent: progress.percent,
        }
    })
    .unwrap_or_default()
}

/// Returns whether onboarding was completed.
///
/// Reads storage directly so it works before the session is opened.
#[flutter_rust_bridge::frb(sync)]
pub fn onboarding_status() -> bool {
    match onboarding_persistence() {
        Ok(persistence) => persistence.onboarding_completed().value,
        Err(err) => {
            error!("event=onboarding_status module=ffi status=error error={err}");
            false
        }
    }
}

/// Records onboarding completion.
///
/// Write failures are reported in the envelope; the UI proceeds either way.
#[flutter_rust_bridge::frb(sync)]
pub fn onboarding_complete() -> ActionResponse {
    let persistence = match onboarding_persistence() {
        Ok(persistence) => persistence,
        Err(err) => return ActionResponse::failure(format!("onboarding_complete failed: {err}")),
    };
    match persistence.complete_onboarding().failure {
        None => ActionResponse::success("Onboarding completed.", None),
        Some(err) => ActionResponse::failure(format!("onboarding_complete failed: {err}")),
    }
}

/// Builds the month grid for `year`/`month` with `selected_day` highlighted.
///
/// Today comes from the session clock. `selected_day` outside the month
/// falls back to today.
#[flutter_rust_bridge::frb(sync)]
pub fn calendar_month(year: i32, month: u32, selected_day: u32) -> CalendarMonthResponse {
    let grid = read_session(|session| {
        let selected =
            NaiveDate::from_ymd_opt(year, month, selected_day).unwrap_or_else(|| session.today());
        session.month_view(year, month, selected)
    });
    let (cells, message) = match grid {
        Ok(Some(cells)) => (
            cells.iter().map(to_calendar_day_item).collect::<Vec<_>>(),
            String::new(),
        ),
        Ok(None) => (
            Vec::new(),
            format!("calendar_month failed: invalid month {year}-{month}"),
        ),
        Err(err) => (Vec::new(), format!("calendar_month failed: {err}")),
    };
    CalendarMonthResponse {
        year,
        month,
        cells,
        message,
    }
}

fn session() -> Result<&'static Mutex<Session>, String> {
    SESSION
        .get_or_init(|| {
            let config = AppConfig::from_env();
            SqliteKvStorage::open(&config.db_path)
                .map(|storage| Mutex::new(AppSession::open(Arc::new(storage), SystemClock)))
                .map_err(|err| {
                    error!("event=session_open module=ffi status=error error={err}");
                    format!("session storage open failed: {err}")
                })
        })
        .as_ref()
        .map_err(|err| err.clone())
}

fn lock_session() -> Result<MutexGuard<'static, Session>, String> {
    session()?
        .lock()
        .map_err(|_| "session lock poisoned".to_string())
}

fn with_session<T>(f: impl FnOnce(&mut Session) -> T) -> Result<T, String> {
    let mut guard = lock_session()?;
    Ok(f(&mut guard))
}

fn read_session<T>(f: impl FnOnce(&Session) -> T) -> Result<T, String> {
    let guard = lock_session()?;
    Ok(f(&guard))
}

fn action(name: &str, f: impl FnOnce(&mut Session)) -> ActionResponse {
    match with_session(f) {
        Ok(()) => ActionResponse::success("Done.", None),
        Err(err) => ActionResponse::failure(format!("{name} failed: {err}")),
    }
}

fn onboarding_persistence() -> Result<Persistence, String> {
    if let Ok(guard) = lock_session() {
        return Ok(guard.persistence().clone());
    }
    let config = AppConfig::from_env();
    let storage = SqliteKvStorage::open(&config.db_path)
        .map_err(|err| format!("storage open failed: {err}"))?;
    Ok(Persistence::new(Arc::new(storage)))
}

fn to_task_item(task: &Task) -> TaskItem {
    TaskItem {
        id: task.id.clone(),
        title: task.title.clone(),
        completed: task.completed,
        created_at: task.created_at,
    }
}

fn to_notification_item(notification: &Notification) -> NotificationItem {
    NotificationItem {
        id: notification.id.clone(),
        title: notification.title.clone(),
        body: notification.body.clone(),
        created_at: notification.created_at,
        read: notification.read,
        tag: notification.tag.clone(),
    }
}

fn to_calendar_day_item(cell: &CalendarCell) -> CalendarDayItem {
    match *cell {
        CalendarCell::Empty => CalendarDayItem {
            day: 0,
            is_today: false,
            is_selected: false,
        },
        CalendarCell::Day {
            date,
            is_today,
            is_selected,
        } => CalendarDayItem {
            day: date.day(),
            is_today,
            is_selected,
        },
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::{
        calendar_month, core_version, init_logging, notifications_list, ping, task_add,
        task_remove, task_toggle, tasks_list,
    };
    use chrono::Datelike;
    use std::sync::OnceLock;

    static TEST_DB_DIR: OnceLock<tempfile::TempDir> = OnceLock::new();

    // Points the process session at a throwaway database before first use.
    fn use_test_db() {
        TEST_DB_DIR.get_or_init(|| {
            let dir = tempfile::tempdir().unwrap();
            std::env::set_var("TODOFLOW_DB_PATH", dir.path().join("todoflow.sqlite3"));
            dir
        });
    }

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }

    #[test]
    fn init_logging_rejects_empty_log_dir() {
        let error = init_logging("info".to_string(), String::new());
        assert!(!error.is_empty());
    }

    #[test]
    fn init_logging_rejects_unsupported_level() {
        let error = init_logging("verbose".to_string(), "/tmp/logs".to_string());
        assert!(error.contains("unsupported log level"));
    }

    #[test]
    fn task_add_toggle_remove_flow() {
        use_test_db();
        let created = task_add("  ffi flow task  ".to_string());
        assert!(created.ok, "{}", created.message);
        let id = created.id.expect("task add should return id");

        let listed = tasks_list();
        let item = listed.iter().find(|item| item.id == id).unwrap();
        assert_eq!(item.title, "ffi flow task");
        assert!(!item.completed);

        assert!(task_toggle(id.clone()).ok);
        assert!(tasks_list().iter().any(|item| item.id == id && item.completed));

        assert!(task_remove(id.clone()).ok);
        assert!(tasks_list().iter().all(|item| item.id != id));
    }

    #[test]
    fn blank_task_title_is_ignored() {
        use_test_db();
        let response = task_add("   ".to_string());
        assert!(response.ok);
        assert_eq!(response.id, None);
    }

    #[test]
    fn notifications_list_includes_daily_reminder() {
        use_test_db();
        let response = notifications_list();
        assert!(response.message.is_empty(), "{}", response.message);
        let reminder = response
            .items
            .iter()
            .find(|item| item.title == "Daily Reminder")
            .expect("daily reminder should be listed");
        assert!(reminder
            .tag
            .as_deref()
            .is_some_and(|tag| tag.starts_with("daily:")));
    }

    #[test]
    fn calendar_month_pads_and_selects() {
        use_test_db();
        let response = calendar_month(2026, 10, 20);
        assert!(response.message.is_empty());
        assert_eq!(response.cells.len(), 4 + 31);
        assert_eq!(response.cells[0].day, 0);
        assert!(response.cells[4 + 19].is_selected);

        let invalid = calendar_month(2026, 13, 1);
        assert!(invalid.cells.is_empty());
        assert!(!invalid.message.is_empty());
    }

    #[test]
    fn calendar_month_marks_today_from_session_clock() {
        use_test_db();
        let today = chrono::Local::now().date_naive();

        let response = calendar_month(today.year(), today.month(), 0);
        assert!(response.message.is_empty(), "{}", response.message);
        let today_cells = response
            .cells
            .iter()
            .filter(|cell| cell.is_today)
            .collect::<Vec<_>>();
        assert_eq!(today_cells.len(), 1);
        assert_eq!(today_cells[0].day, today.day());
        // Day 0 is not a date, so the selection falls back to today.
        assert!(today_cells[0].is_selected);
    }
}
