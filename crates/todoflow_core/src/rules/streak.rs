//! Current completion streak.

use crate::calendar::local_date;
use crate::store::task_store::TaskStore;
use chrono::{NaiveDate, TimeZone};
use std::collections::HashSet;

/// Counts consecutive days ending `today` that have a completed task.
///
/// A day "has a completion" when at least one completed task was created on
/// it. The scan starts at `today` and stops at the first day without one, so
/// a today without completions yields `0` regardless of earlier days.
pub fn current_streak<Tz: TimeZone>(tasks: &TaskStore, today: NaiveDate, tz: &Tz) -> u32 {
    let completed_days: HashSet<NaiveDate> = tasks
        .completed()
        .filter_map(|task| local_date(task.created_at, tz))
        .collect();

    let mut streak = 0;
    let mut day = Some(today);
    while let Some(current) = day {
        if !completed_days.contains(&current) {
            break;
        }
        streak += 1;
        day = current.pred_opt();
    }
    streak
}
