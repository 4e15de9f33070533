//! Weekly adherence scoring.
//!
//! The window is the calendar week, Monday through Sunday, containing the
//! reference date. A week with nothing scheduled scores 100.

use crate::errors::ScheduleError;
use crate::models::{AdherenceReport, AppData, DayAdherence, Feedback};
use crate::occurrences::occurrences_for;
use chrono::{Datelike, Days, NaiveDate};

pub const EXCELLENT_THRESHOLD: u8 = 90;
pub const GOOD_THRESHOLD: u8 = 70;

/// Fails only when the week around `reference` runs past chrono's date range.
pub fn weekly_adherence_at(reference: NaiveDate, data: &AppData) -> Result<AdherenceReport, ScheduleError> {
    let start = week_start(reference).ok_or(ScheduleError::DateOutOfRange(reference))?;
    let end = start
        .checked_add_days(Days::new(6))
        .ok_or(ScheduleError::DateOutOfRange(reference))?;

    let mut days = Vec::with_capacity(7);
    let mut taken_sum = 0u32;
    let mut expected_sum = 0u32;

    for date in start.iter_days().take(7) {
        let occurrences = occurrences_for(date, &data.schedules);
        let expected = occurrences.len() as u32;
        let taken = occurrences
            .iter()
            .filter(|occurrence| data.taken.contains(&occurrence.key()))
            .count() as u32;

        expected_sum = expected_sum.saturating_add(expected);
        taken_sum = taken_sum.saturating_add(taken);
        days.push(DayAdherence { date, expected, taken });
    }

    let percentage = percentage(taken_sum, expected_sum);
    let feedback = feedback(percentage);

    Ok(AdherenceReport {
        week: week_label(start),
        week_start: start,
        week_end: end,
        taken: taken_sum,
        expected: expected_sum,
        percentage,
        feedback,
        celebrate: feedback == Feedback::Excellent,
        days,
    })
}

/// `round(100 * taken / expected)` with halves rounded up, or 100 when
/// nothing was expected.
pub fn percentage(taken: u32, expected: u32) -> u8 {
    if expected == 0 {
        return 100;
    }
    let taken = u64::from(taken.min(expected));
    let expected = u64::from(expected);
    ((200 * taken + expected) / (2 * expected)) as u8
}

pub fn feedback(percentage: u8) -> Feedback {
    if percentage >= EXCELLENT_THRESHOLD {
        Feedback::Excellent
    } else if percentage >= GOOD_THRESHOLD {
        Feedback::Good
    } else {
        Feedback::NeedsAttention
    }
}

pub fn week_start(date: NaiveDate) -> Option<NaiveDate> {
    date.checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
}

fn week_label(date: NaiveDate) -> String {
    let iso = date.iso_week();
    format!("{}-W{:02}", iso.year(), iso.week())
}
