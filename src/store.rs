use crate::errors::ScheduleError;
use crate::models::{
    AppData, MAX_DOSES_PER_DAY, MAX_REMINDER_MINUTES, MIN_REMINDER_MINUTES, Schedule, ScheduleInput,
    TakenKey, Weekday, hhmm,
};
use crate::occurrences::occurrences_for;
use chrono::{NaiveDate, NaiveTime};
use std::collections::BTreeSet;

/// A schedule that passed validation but has no id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ValidSchedule {
    name: String,
    days: BTreeSet<Weekday>,
    times: Vec<NaiveTime>,
    start_date: NaiveDate,
}

impl ScheduleInput {
    /// Normalizes the form: trims the name, maps day labels onto `Weekday`,
    /// and sorts and dedups the dose times.
    fn validate(&self, today: NaiveDate) -> Result<ValidSchedule, ScheduleError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(ScheduleError::EmptyName);
        }

        let days = self
            .days
            .iter()
            .map(|label| label.parse::<Weekday>())
            .collect::<Result<BTreeSet<_>, _>>()?;
        if days.is_empty() {
            return Err(ScheduleError::NoDays);
        }

        let mut times = self
            .times
            .iter()
            .map(|raw| hhmm::parse(raw).ok_or_else(|| ScheduleError::InvalidTime(raw.clone())))
            .collect::<Result<Vec<_>, _>>()?;
        times.sort();
        times.dedup();
        if times.is_empty() {
            return Err(ScheduleError::NoTimes);
        }
        if times.len() > MAX_DOSES_PER_DAY {
            return Err(ScheduleError::TooManyTimes {
                max: MAX_DOSES_PER_DAY,
            });
        }

        Ok(ValidSchedule {
            name: name.to_string(),
            days,
            times,
            start_date: self.start_date.unwrap_or(today),
        })
    }
}

impl AppData {
    pub fn schedule(&self, id: u64) -> Option<&Schedule> {
        self.schedules.iter().find(|schedule| schedule.id == id)
    }

    pub fn add_schedule(&mut self, input: &ScheduleInput, today: NaiveDate) -> Result<Schedule, ScheduleError> {
        let valid = input.validate(today)?;
        let id = self.next_id.max(self.max_id() + 1);
        self.next_id = id + 1;

        let schedule = Schedule {
            id,
            name: valid.name,
            days: valid.days,
            times: valid.times,
            start_date: valid.start_date,
        };
        self.schedules.push(schedule.clone());
        Ok(schedule)
    }

    /// Replaces a schedule in place. Taken markers recorded under the old
    /// name or times are left alone.
    pub fn update_schedule(
        &mut self,
        id: u64,
        input: &ScheduleInput,
        today: NaiveDate,
    ) -> Result<Schedule, ScheduleError> {
        let valid = input.validate(today)?;
        let schedule = self
            .schedules
            .iter_mut()
            .find(|schedule| schedule.id == id)
            .ok_or(ScheduleError::NotFound(id))?;

        schedule.name = valid.name;
        schedule.days = valid.days;
        schedule.times = valid.times;
        schedule.start_date = valid.start_date;
        Ok(schedule.clone())
    }

    pub fn remove_schedule(&mut self, id: u64) -> Result<Schedule, ScheduleError> {
        let index = self
            .schedules
            .iter()
            .position(|schedule| schedule.id == id)
            .ok_or(ScheduleError::NotFound(id))?;
        Ok(self.schedules.remove(index))
    }

    pub fn is_taken(&self, key: &TakenKey) -> bool {
        self.taken.contains(key)
    }

    /// Records a dose as taken. The key must name a dose the current
    /// schedules expect on that date. Returns `false` if it was already marked.
    pub fn mark_taken(&mut self, key: TakenKey) -> Result<bool, ScheduleError> {
        let scheduled = occurrences_for(key.date, &self.schedules)
            .iter()
            .any(|occurrence| occurrence.name == key.name && occurrence.time == key.time);
        if !scheduled {
            return Err(ScheduleError::NotScheduled {
                date: key.date,
                time: key.time.format(hhmm::FORMAT).to_string(),
                name: key.name,
            });
        }
        Ok(self.taken.insert(key))
    }

    /// Returns `false` if the key was not marked.
    pub fn unmark_taken(&mut self, key: &TakenKey) -> bool {
        self.taken.remove(key)
    }

    pub fn clear_taken(&mut self) -> usize {
        let cleared = self.taken.len();
        self.taken.clear();
        cleared
    }

    pub fn set_reminder_minutes(&mut self, minutes: u32) -> Result<(), ScheduleError> {
        if !(MIN_REMINDER_MINUTES..=MAX_REMINDER_MINUTES).contains(&minutes) {
            return Err(ScheduleError::ReminderOutOfRange {
                value: minutes,
                min: MIN_REMINDER_MINUTES,
                max: MAX_REMINDER_MINUTES,
            });
        }
        self.reminder_minutes = minutes;
        Ok(())
    }

    /// Brings a store read from disk back within the rules enforced on
    /// input: reminder window clamped to its range, times sorted and
    /// deduplicated, schedules that could never have been created dropped.
    /// Returns `true` if anything changed.
    pub fn repair(&mut self) -> bool {
        let mut changed = false;

        let clamped = self.reminder_minutes.clamp(MIN_REMINDER_MINUTES, MAX_REMINDER_MINUTES);
        if clamped != self.reminder_minutes {
            self.reminder_minutes = clamped;
            changed = true;
        }

        let before = self.schedules.len();
        self.schedules.retain_mut(|schedule| {
            let name = schedule.name.trim();
            if name.len() != schedule.name.len() {
                schedule.name = name.to_string();
                changed = true;
            }
            let mut times = schedule.times.clone();
            times.sort();
            times.dedup();
            if times != schedule.times {
                schedule.times = times;
                changed = true;
            }
            !schedule.name.is_empty()
                && !schedule.days.is_empty()
                && !schedule.times.is_empty()
                && schedule.times.len() <= MAX_DOSES_PER_DAY
        });
        changed |= self.schedules.len() != before;

        let next = self.next_id.max(self.max_id() + 1);
        if next != self.next_id {
            self.next_id = next;
            changed = true;
        }

        changed
    }

    fn max_id(&self) -> u64 {
        self.schedules.iter().map(|schedule| schedule.id).max().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn input(name: &str, days: &[&str], times: &[&str]) -> ScheduleInput {
        ScheduleInput {
            name: name.to_string(),
            days: days.iter().map(|d| d.to_string()).collect(),
            times: times.iter().map(|t| t.to_string()).collect(),
            start_date: Some(monday()),
        }
    }

    #[test]
    fn add_normalizes_input() {
        let mut data = AppData::default();
        let schedule = data
            .add_schedule(&input("  Metformin ", &["mon", "Wednesday", "MON"], &["20:00", "08:00", "08:00"]), monday())
            .unwrap();

        assert_eq!(schedule.id, 1);
        assert_eq!(schedule.name, "Metformin");
        assert_eq!(
            schedule.days,
            [Weekday::Monday, Weekday::Wednesday].into_iter().collect::<BTreeSet<_>>()
        );
        assert_eq!(schedule.times, vec![time(8, 0), time(20, 0)]);
        assert_eq!(data.schedules.len(), 1);
    }

    #[test]
    fn start_date_defaults_to_today() {
        let mut data = AppData::default();
        let today = monday() + Duration::days(3);
        let mut form = input("Aspirin", &["Monday"], &["09:00"]);
        form.start_date = None;

        let schedule = data.add_schedule(&form, today).unwrap();
        assert_eq!(schedule.start_date, today);
    }

    #[test]
    fn invalid_input_leaves_store_untouched() {
        let mut data = AppData::default();
        data.add_schedule(&input("Aspirin", &["Monday"], &["09:00"]), monday())
            .unwrap();
        let before = data.clone();

        let cases = [
            (input("   ", &["Monday"], &["09:00"]), ScheduleError::EmptyName),
            (input("Aspirin", &[], &["09:00"]), ScheduleError::NoDays),
            (input("Aspirin", &["Monday"], &[]), ScheduleError::NoTimes),
            (
                input("Aspirin", &["Someday"], &["09:00"]),
                ScheduleError::UnknownWeekday("Someday".to_string()),
            ),
            (
                input("Aspirin", &["Monday"], &["9am"]),
                ScheduleError::InvalidTime("9am".to_string()),
            ),
            (
                input(
                    "Aspirin",
                    &["Monday"],
                    &["01:00", "02:00", "03:00", "04:00", "05:00", "06:00", "07:00"],
                ),
                ScheduleError::TooManyTimes { max: 6 },
            ),
        ];

        for (form, expected) in cases {
            assert_eq!(data.add_schedule(&form, monday()), Err(expected.clone()));
            assert_eq!(data.update_schedule(1, &form, monday()), Err(expected));
        }
        assert_eq!(data.schedules, before.schedules);
        assert_eq!(data.next_id, before.next_id);
    }

    #[test]
    fn update_and_remove_by_id() {
        let mut data = AppData::default();
        let first = data
            .add_schedule(&input("Aspirin", &["Monday"], &["09:00"]), monday())
            .unwrap();
        let second = data
            .add_schedule(&input("Insulin", &["Tuesday"], &["07:00"]), monday())
            .unwrap();
        assert_eq!(second.id, first.id + 1);

        let updated = data
            .update_schedule(first.id, &input("Aspirin 81mg", &["Friday"], &["10:30"]), monday())
            .unwrap();
        assert_eq!(updated.id, first.id);
        assert_eq!(data.schedule(first.id).unwrap().name, "Aspirin 81mg");

        data.remove_schedule(first.id).unwrap();
        assert!(data.schedule(first.id).is_none());
        assert_eq!(data.remove_schedule(first.id), Err(ScheduleError::NotFound(first.id)));
        assert_eq!(
            data.update_schedule(99, &input("X", &["Monday"], &["09:00"]), monday()),
            Err(ScheduleError::NotFound(99))
        );
    }

    #[test]
    fn ids_are_not_reused_after_removal() {
        let mut data = AppData::default();
        let first = data
            .add_schedule(&input("Aspirin", &["Monday"], &["09:00"]), monday())
            .unwrap();
        data.remove_schedule(first.id).unwrap();
        let next = data
            .add_schedule(&input("Aspirin", &["Monday"], &["09:00"]), monday())
            .unwrap();
        assert_ne!(next.id, first.id);
    }

    #[test]
    fn mark_then_unmark_restores_markers() {
        let mut data = AppData::default();
        data.add_schedule(&input("Metformin", &["Monday"], &["08:00"]), monday())
            .unwrap();
        data.taken.insert(TakenKey::new(monday() - Duration::days(7), "Old", time(8, 0)));
        let before = data.taken.clone();

        let key = TakenKey::new(monday(), "Metformin", time(8, 0));
        assert_eq!(data.mark_taken(key.clone()), Ok(true));
        assert!(data.is_taken(&key));
        assert_eq!(data.mark_taken(key.clone()), Ok(false));
        assert!(data.unmark_taken(&key));
        assert!(!data.unmark_taken(&key));
        assert_eq!(data.taken, before);
    }

    #[test]
    fn mark_requires_a_scheduled_dose() {
        let mut data = AppData::default();
        data.add_schedule(&input("Metformin", &["Monday"], &["08:00"]), monday())
            .unwrap();

        let wrong_time = TakenKey::new(monday(), "Metformin", time(8, 1));
        let wrong_day = TakenKey::new(monday() + Duration::days(1), "Metformin", time(8, 0));
        let before_start = TakenKey::new(monday() - Duration::days(7), "Metformin", time(8, 0));
        for key in [wrong_time, wrong_day, before_start] {
            assert!(matches!(data.mark_taken(key), Err(ScheduleError::NotScheduled { .. })));
        }
        assert!(data.taken.is_empty());
    }

    #[test]
    fn removing_a_schedule_keeps_its_markers() {
        let mut data = AppData::default();
        let schedule = data
            .add_schedule(&input("Metformin", &["Monday"], &["08:00"]), monday())
            .unwrap();
        let key = TakenKey::new(monday(), "Metformin", time(8, 0));
        data.mark_taken(key.clone()).unwrap();

        data.remove_schedule(schedule.id).unwrap();
        assert!(data.is_taken(&key));
        assert!(data.unmark_taken(&key));
    }

    #[test]
    fn clear_removes_everything() {
        let mut data = AppData::default();
        data.taken.insert(TakenKey::new(monday(), "A", time(8, 0)));
        data.taken.insert(TakenKey::new(monday(), "B", time(9, 0)));
        assert_eq!(data.clear_taken(), 2);
        assert!(data.taken.is_empty());
        assert_eq!(data.clear_taken(), 0);
    }

    #[test]
    fn repair_restores_store_rules() {
        let mut data = AppData {
            reminder_minutes: 5000,
            next_id: 0,
            ..AppData::default()
        };
        data.schedules.push(Schedule {
            id: 4,
            name: " Aspirin ".to_string(),
            days: [Weekday::Monday].into_iter().collect(),
            times: vec![time(20, 0), time(8, 0), time(8, 0)],
            start_date: monday(),
        });
        data.schedules.push(Schedule {
            id: 7,
            name: "Nothing".to_string(),
            days: BTreeSet::new(),
            times: vec![time(8, 0)],
            start_date: monday(),
        });

        assert!(data.repair());
        assert_eq!(data.reminder_minutes, MAX_REMINDER_MINUTES);
        assert_eq!(data.schedules.len(), 1);
        assert_eq!(data.schedules[0].name, "Aspirin");
        assert_eq!(data.schedules[0].times, vec![time(8, 0), time(20, 0)]);
        assert_eq!(data.next_id, 5);
        assert!(!data.repair());

        data.reminder_minutes = 0;
        assert!(data.repair());
        assert_eq!(data.reminder_minutes, MIN_REMINDER_MINUTES);
    }

    #[test]
    fn reminder_window_bounds() {
        let mut data = AppData::default();
        assert!(data.set_reminder_minutes(1).is_ok());
        assert!(data.set_reminder_minutes(60).is_ok());
        assert_eq!(data.reminder_minutes, 60);
        assert!(data.set_reminder_minutes(0).is_err());
        assert!(data.set_reminder_minutes(61).is_err());
        assert_eq!(data.reminder_minutes, 60);
    }
}
