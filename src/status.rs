use crate::models::{AppData, DayView, DoseStatus, DoseView, Weekday};
use crate::occurrences::occurrences_for;
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReport {
    pub status: DoseStatus,
    /// Whole minutes until the dose, rounded up. Only set for due and upcoming.
    pub minutes_until: Option<i64>,
}

/// Classifies one dose relative to `now`.
///
/// Taken wins over everything. A dose whose instant has been reached is
/// missed, so `now == dose_at` is missed rather than due. Inside the reminder
/// window (inclusive of its far edge) the dose is due, otherwise upcoming.
pub fn classify(dose_at: NaiveDateTime, now: NaiveDateTime, reminder_minutes: u32, taken: bool) -> StatusReport {
    if taken {
        return StatusReport {
            status: DoseStatus::Taken,
            minutes_until: None,
        };
    }

    if now >= dose_at {
        return StatusReport {
            status: DoseStatus::Missed,
            minutes_until: None,
        };
    }

    let until = dose_at - now;
    let whole_minutes = until.num_minutes();
    let minutes_until = if until > TimeDelta::minutes(whole_minutes) {
        whole_minutes + 1
    } else {
        whole_minutes
    };
    let status = if until <= TimeDelta::minutes(i64::from(reminder_minutes)) {
        DoseStatus::Due
    } else {
        DoseStatus::Upcoming
    };

    StatusReport {
        status,
        minutes_until: Some(minutes_until),
    }
}

/// Builds the checklist for `date` as seen at `now`.
pub fn day_view(date: NaiveDate, now: NaiveDateTime, data: &AppData) -> DayView {
    let doses: Vec<DoseView> = occurrences_for(date, &data.schedules)
        .into_iter()
        .map(|occurrence| {
            let taken = data.taken.contains(&occurrence.key());
            let report = classify(occurrence.at(), now, data.reminder_minutes, taken);
            DoseView {
                name: occurrence.name,
                time: occurrence.time,
                status: report.status,
                minutes_until: report.minutes_until,
            }
        })
        .collect();

    DayView {
        date,
        weekday: Weekday::of(date),
        reminder_minutes: data.reminder_minutes,
        alert: doses.iter().any(|dose| dose.status == DoseStatus::Due),
        doses,
    }
}
