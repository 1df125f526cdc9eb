use chrono::{NaiveDate, TimeZone, Utc};
use todoflow_core::{current_streak, profile_stats, Task, TaskStore};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
}

/// Task created `days_ago` days before `today()` at `hour` UTC.
fn task(days_ago: i64, hour: u32, completed: bool) -> Task {
    let day = today() - chrono::Duration::days(days_ago);
    let created_at = Utc
        .from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
        .timestamp_millis();
    let mut task = Task::with_id(format!("d{days_ago}-h{hour}"), "t", created_at);
    task.completed = completed;
    task
}

fn store_of(tasks: Vec<Task>) -> TaskStore {
    let mut store = TaskStore::new();
    store.replace_all(tasks);
    store
}

#[test]
fn missing_completion_today_yields_zero() {
    let tasks = store_of(vec![task(2, 9, true), task(1, 9, true)]);
    assert_eq!(current_streak(&tasks, today(), &Utc), 0);
}

#[test]
fn consecutive_days_ending_today_are_counted() {
    let tasks = store_of(vec![
        task(0, 9, true),
        task(1, 9, true),
        task(2, 9, true),
        task(4, 9, true),
    ]);
    assert_eq!(current_streak(&tasks, today(), &Utc), 3);
}

#[test]
fn open_tasks_do_not_count_as_completions() {
    let tasks = store_of(vec![task(0, 9, true), task(1, 9, false)]);
    assert_eq!(current_streak(&tasks, today(), &Utc), 1);
}

#[test]
fn one_completion_among_open_tasks_keeps_the_day() {
    let tasks = store_of(vec![
        task(0, 8, false),
        task(0, 20, true),
        task(1, 8, true),
        task(1, 20, false),
    ]);
    assert_eq!(current_streak(&tasks, today(), &Utc), 2);
}

#[test]
fn empty_store_has_zero_streak() {
    assert_eq!(current_streak(&TaskStore::new(), today(), &Utc), 0);
}

#[test]
fn profile_stats_combine_counts_and_streak() {
    let tasks = store_of(vec![task(0, 9, true), task(1, 9, true), task(1, 10, false)]);
    let stats = profile_stats(&tasks, today(), &Utc);

    assert_eq!(stats.tasks_completed, 2);
    assert_eq!(stats.total_tasks, 3);
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.productivity_pct, 67);
}
