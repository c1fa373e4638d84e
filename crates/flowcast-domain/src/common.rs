//! Calendar primitives for schedule computations.
//!
//! Every recurring-date calculation in the workspace (salary days, card
//! payment days, loan due dates) goes through [`safe_date`] and
//! [`add_months`] so end-of-month behaviour is identical everywhere.

use chrono::{Datelike, NaiveDate};

/// Returns the number of days in `month` (1-12) of `year`.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}

/// Builds a date from a year, a 1-based month and a day, clamping the day to
/// the last valid day of that month.
///
/// `month` may run past 12 (or below 1); it rolls into the following (or
/// previous) years, so `safe_date(2025, 14, 31)` is 2026-02-28. Dates beyond
/// chrono's representable range saturate to [`NaiveDate::MAX`].
pub fn safe_date(year: i32, month: i32, day: u32) -> NaiveDate {
    clamped_date(year, i64::from(month), day)
}

/// Advances `date` by `months` calendar months, clamping to the target
/// month's last day when the original day does not exist there.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    clamped_date(
        date.year(),
        i64::from(date.month()) + i64::from(months),
        date.day(),
    )
}

/// First day of the month containing `date`.
pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    safe_date(date.year(), date.month() as i32, 1)
}

/// Last day of the month containing `date`.
pub fn last_of_month(date: NaiveDate) -> NaiveDate {
    safe_date(date.year(), date.month() as i32, 31)
}

/// Nearest occurrence of `day` (clamped) on or after `date`, moving to the
/// next month when this month's occurrence has already passed.
pub fn next_day_of_month_on_or_after(date: NaiveDate, day: u32) -> NaiveDate {
    let candidate = safe_date(date.year(), date.month() as i32, day);
    if candidate >= date {
        candidate
    } else {
        safe_date(date.year(), date.month() as i32 + 1, day)
    }
}

/// The `index`-th occurrence of `day`, stepping `step_months` at a time from
/// the month containing `anchor`.
///
/// Each occurrence is clamped independently, so a February clamp to the 28th
/// does not carry into March.
pub fn monthly_occurrence(anchor: NaiveDate, step_months: u32, index: u32, day: u32) -> NaiveDate {
    let offset = i64::from(step_months) * i64::from(index);
    clamped_date(anchor.year(), i64::from(anchor.month()) + offset, day)
}

/// Whole calendar months from the month of `from` to the month of `to`.
pub fn months_between(from: NaiveDate, to: NaiveDate) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}

fn clamped_date(year: i32, month: i64, day: u32) -> NaiveDate {
    let index = i64::from(year) * 12 + (month - 1);
    let Ok(year) = i32::try_from(index.div_euclid(12)) else {
        return NaiveDate::MAX;
    };
    let month = index.rem_euclid(12) as u32 + 1;
    let day = day.clamp(1, days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MAX)
}
