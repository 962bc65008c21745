//! Month grid construction.
//!
//! # Responsibility
//! - Derive the ordered cell layout of a month from a reference date.
//!
//! # Invariants
//! - Output is exactly `first_weekday` padding cells followed by one day
//!   cell per calendar day, numbered 1..=days_in_month, each with an empty
//!   task list.
//! - Weekday columns start on Sunday (index 0).
//! - Pure: no persistence access; deterministic apart from fresh cell ids.

use crate::model::calendar::{CalendarState, CellId, DayCell};
use chrono::{Datelike, NaiveDate};
use uuid::Uuid;

/// Builds the month grid for the reference date's month and year.
///
/// Every valid date produces a valid grid; the day component of the
/// reference is ignored.
pub fn build_month(reference: NaiveDate) -> CalendarState {
    build_month_with(reference, Uuid::new_v4)
}

/// Same as [`build_month`], with cell ids drawn from the provided source.
///
/// Lets tests build grids with deterministic ids.
pub fn build_month_with(reference: NaiveDate, mut next_id: impl FnMut() -> CellId) -> CalendarState {
    let first_of_month = NaiveDate::from_ymd_opt(reference.year(), reference.month(), 1)
        .expect("the first of an existing month is a valid date");
    let first_weekday = first_of_month.weekday().num_days_from_sunday() as usize;
    let days = days_in_month(reference);

    let mut cells = Vec::with_capacity(first_weekday + usize::from(days));
    for _ in 0..first_weekday {
        cells.push(DayCell::blank_with_id(next_id()));
    }
    for day in 1..=days {
        cells.push(DayCell::day_with_id(next_id(), day));
    }

    CalendarState::new(cells)
}

/// Number of days in the reference date's month.
///
/// Computed as the day before the first of the following month, which
/// covers 28/29/30/31 and leap years without a lookup table.
fn days_in_month(reference: NaiveDate) -> u8 {
    let (next_year, next_month) = if reference.month() == 12 {
        (reference.year() + 1, 1)
    } else {
        (reference.year(), reference.month() + 1)
    };
    let last_of_month = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .expect("the first of the following month is a valid date")
        .pred_opt()
        .expect("the day before the first of a month is a valid date");
    last_of_month.day() as u8
}

#[cfg(test)]
mod tests {
    use super::days_in_month;
    use chrono::NaiveDate;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn month_lengths_cover_all_variants() {
        assert_eq!(days_in_month(date(2024, 1, 15)), 31);
        assert_eq!(days_in_month(date(2024, 4, 1)), 30);
        assert_eq!(days_in_month(date(2024, 2, 10)), 29);
        assert_eq!(days_in_month(date(2023, 2, 10)), 28);
        assert_eq!(days_in_month(date(1900, 2, 1)), 28);
        assert_eq!(days_in_month(date(2000, 2, 1)), 29);
    }

    #[test]
    fn december_rolls_over_to_next_year() {
        assert_eq!(days_in_month(date(2025, 12, 31)), 31);
    }
}
