//! Reminder notification rules.
//!
//! # Invariants
//! - Rules run in a fixed order: daily reminder, then incomplete-yesterday.
//! - Each rule is check-then-insert on its tag; it never inserts a second
//!   record for a tag that already exists.

use crate::calendar::day_key;
use crate::store::notification_store::NotificationStore;
use crate::store::task_store::TaskStore;
use chrono::{DateTime, NaiveDate, TimeZone};
use log::debug;

pub const DAILY_REMINDER_TITLE: &str = "Daily Reminder";
pub const DAILY_REMINDER_BODY: &str = "Create your tasks for today to stay on track";
pub const INCOMPLETE_REMINDER_TITLE: &str = "Unfinished tasks";
pub const INCOMPLETE_REMINDER_BODY: &str =
    "You didn't finish all tasks yesterday. Review and complete them.";

const DAILY_TAG_PREFIX: &str = "daily:";
const INCOMPLETE_TAG_PREFIX: &str = "incomplete:";

/// Tag of the daily reminder for `date`.
pub fn daily_tag(date: NaiveDate) -> String {
    format!("{DAILY_TAG_PREFIX}{}", day_key(date))
}

/// Tag of the unfinished-tasks warning about `date`.
pub fn incomplete_tag(date: NaiveDate) -> String {
    format!("{INCOMPLETE_TAG_PREFIX}{}", day_key(date))
}

/// Inserts today's daily reminder unless one with the same tag exists.
///
/// Returns whether a notification was inserted.
pub fn ensure_daily_reminder(
    notifications: &mut NotificationStore,
    today: NaiveDate,
    now_ms: i64,
) -> bool {
    let tag = daily_tag(today);
    if notifications.has_tag(&tag) {
        return false;
    }
    notifications.add_at(
        DAILY_REMINDER_TITLE,
        Some(DAILY_REMINDER_BODY.to_string()),
        Some(tag),
        now_ms,
    );
    true
}

/// Inserts a warning when tasks created yesterday are not all completed.
///
/// # Contract
/// - "Yesterday" is the day before `today`; task days use `tz`.
/// - No tasks created yesterday, or all of them completed: nothing happens.
/// - Otherwise inserts once per `incomplete:<yesterday>` tag.
///
/// Returns whether a notification was inserted.
pub fn ensure_incomplete_yesterday_reminder<Tz: TimeZone>(
    tasks: &TaskStore,
    notifications: &mut NotificationStore,
    today: NaiveDate,
    tz: &Tz,
    now_ms: i64,
) -> bool {
    let Some(yesterday) = today.pred_opt() else {
        return false;
    };

    let mut any = false;
    let mut all_done = true;
    for task in tasks.created_on(yesterday, tz.clone()) {
        any = true;
        all_done &= task.completed;
    }
    if !any || all_done {
        return false;
    }

    let tag = incomplete_tag(yesterday);
    if notifications.has_tag(&tag) {
        return false;
    }
    notifications.add_at(
        INCOMPLETE_REMINDER_TITLE,
        Some(INCOMPLETE_REMINDER_BODY.to_string()),
        Some(tag),
        now_ms,
    );
    true
}

/// Runs every reminder rule in order for the instant `now`.
///
/// Returns the number of notifications inserted.
pub fn apply_reminder_rules<Tz: TimeZone>(
    tasks: &TaskStore,
    notifications: &mut NotificationStore,
    now: &DateTime<Tz>,
) -> usize {
    let today = now.date_naive();
    let now_ms = now.timestamp_millis();
    let tz = now.timezone();

    let mut inserted = 0;
    if ensure_daily_reminder(notifications, today, now_ms) {
        inserted += 1;
    }
    if ensure_incomplete_yesterday_reminder(tasks, notifications, today, &tz, now_ms) {
        inserted += 1;
    }

    if inserted > 0 {
        debug!("event=reminders_apply module=rules status=ok inserted={inserted}");
    }
    inserted
}
