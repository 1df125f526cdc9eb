//! Calendar date identity and month-grid math.
//!
//! # Responsibility
//! - Map epoch-millisecond timestamps to local calendar dates.
//! - Render stable day keys used inside reminder tags.
//! - Build the month grid shown by the calendar screen.
//!
//! # Invariants
//! - Two timestamps belong to the same day iff their local year, month and
//!   day match; time-of-day never matters.
//! - Grid weeks start on Sunday.

use chrono::{Datelike, NaiveDate, TimeZone};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Returns the local calendar date of `epoch_ms` in `tz`.
///
/// Returns `None` only for timestamps outside chrono's representable range.
pub fn local_date<Tz: TimeZone>(epoch_ms: i64, tz: &Tz) -> Option<NaiveDate> {
    tz.timestamp_millis_opt(epoch_ms)
        .single()
        .map(|moment| moment.date_naive())
}

/// Renders the locale-independent day key used in reminder tags.
///
/// Format is `Www Mmm DD YYYY` (for example `Wed Oct 14 2026`), which keeps
/// tags written by earlier app builds matching.
pub fn day_key(date: NaiveDate) -> String {
    date.format("%a %b %d %Y").to_string()
}

/// English month name for `month` in `1..=12`.
pub fn month_name(month: u32) -> Option<&'static str> {
    let index = usize::try_from(month.checked_sub(1)?).ok()?;
    MONTH_NAMES.get(index).copied()
}

/// Number of days in `month` of `year`.
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let (next_year, next_month) = shift_month(year, month, 1);
    let next_first = NaiveDate::from_ymd_opt(next_year, next_month, 1)?;
    let days = next_first.signed_duration_since(first).num_days();
    u32::try_from(days).ok()
}

/// Blank cells before day 1 in a Sunday-first week grid.
pub fn leading_blanks(year: i32, month: u32) -> Option<u32> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|first| first.weekday().num_days_from_sunday())
}

/// Moves `(year, month)` by `delta` months, carrying across year boundaries.
///
/// `month` outside `1..=12` is clamped into range first.
pub fn shift_month(year: i32, month: u32, delta: i32) -> (i32, u32) {
    let month_index = i64::from(month.clamp(1, 12)) - 1;
    let total = i64::from(year) * 12 + month_index + i64::from(delta);
    let shifted_year = total.div_euclid(12);
    let shifted_month = total.rem_euclid(12) + 1;
    (
        i32::try_from(shifted_year).unwrap_or(year),
        u32::try_from(shifted_month).unwrap_or(1),
    )
}

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    /// Padding before the first day of the month.
    Empty,
    Day {
        date: NaiveDate,
        is_today: bool,
        is_selected: bool,
    },
}

impl CalendarCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            Self::Empty => None,
            Self::Day { date, .. } => Some(*date),
        }
    }
}

/// Builds the grid for `month` of `year`.
///
/// Returns leading `Empty` cells followed by one `Day` per date, or `None`
/// when `month` is not a valid month.
pub fn month_grid(
    year: i32,
    month: u32,
    today: NaiveDate,
    selected: NaiveDate,
) -> Option<Vec<CalendarCell>> {
    let blanks = leading_blanks(year, month)?;
    let total_days = days_in_month(year, month)?;

    let mut cells = Vec::with_capacity((blanks + total_days) as usize);
    cells.extend((0..blanks).map(|_| CalendarCell::Empty));
    for day in 1..=total_days {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        cells.push(CalendarCell::Day {
            date,
            is_today: date == today,
            is_selected: date == selected,
        });
    }
    Some(cells)
}
