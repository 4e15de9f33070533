use crate::models::{Occurrence, Schedule, Weekday};
use chrono::NaiveDate;

/// Expands the schedules into the doses expected on `date`, ordered by time
/// then medicine name. Two schedules yielding the same (name, time) on the
/// same date count as one dose.
pub fn occurrences_for(date: NaiveDate, schedules: &[Schedule]) -> Vec<Occurrence> {
    let weekday = Weekday::of(date);

    let mut occurrences: Vec<Occurrence> = schedules
        .iter()
        .filter(|schedule| date >= schedule.start_date && schedule.days.contains(&weekday))
        .flat_map(|schedule| {
            schedule.times.iter().map(move |time| Occurrence {
                date,
                name: schedule.name.clone(),
                time: *time,
            })
        })
        .collect();

    occurrences.sort_by(|a, b| a.time.cmp(&b.time).then_with(|| a.name.cmp(&b.name)));
    occurrences.dedup();
    occurrences
}
