//! Completion ratios for the home progress card and profile screen.

use super::streak::current_streak;
use crate::store::task_store::TaskStore;
use chrono::{NaiveDate, TimeZone};

/// Completed-vs-total counts over the whole task store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    /// `completed / total` as a percentage rounded half-up; `0` when empty.
    pub percent: u32,
}

/// Statistics shown on the profile screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileStats {
    pub tasks_completed: usize,
    pub total_tasks: usize,
    pub current_streak: u32,
    pub productivity_pct: u32,
}

pub fn progress(tasks: &TaskStore) -> Progress {
    let completed = tasks.completed().count();
    let total = tasks.len();
    Progress {
        completed,
        total,
        percent: rounded_percent(completed, total),
    }
}

pub fn profile_stats<Tz: TimeZone>(tasks: &TaskStore, today: NaiveDate, tz: &Tz) -> ProfileStats {
    let progress = progress(tasks);
    ProfileStats {
        tasks_completed: progress.completed,
        total_tasks: progress.total,
        current_streak: current_streak(tasks, today, tz),
        productivity_pct: progress.percent,
    }
}

fn rounded_percent(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    let part = part as u128;
    let whole = whole as u128;
    // floor(part * 100 / whole + 1/2)
    let percent = (200 * part + whole) / (2 * whole);
    u32::try_from(percent).unwrap_or(u32::MAX)
}
