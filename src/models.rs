use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_REMINDER_MINUTES: u32 = 15;
pub const MIN_REMINDER_MINUTES: u32 = 1;
pub const MAX_REMINDER_MINUTES: u32 = 60;
pub const MAX_DOSES_PER_DAY: usize = 6;

/// Canonical day of week. Schedules only ever hold these seven values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    pub fn of(date: NaiveDate) -> Self {
        Self::from(date.weekday())
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Monday => "Monday",
            Self::Tuesday => "Tuesday",
            Self::Wednesday => "Wednesday",
            Self::Thursday => "Thursday",
            Self::Friday => "Friday",
            Self::Saturday => "Saturday",
            Self::Sunday => "Sunday",
        }
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Self::ALL[day.num_days_from_monday() as usize]
    }
}

/// Accepts full names and three-letter abbreviations, any case.
impl FromStr for Weekday {
    type Err = crate::errors::ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|day| {
                let full = day.name().to_ascii_lowercase();
                label == full || label == full[..3]
            })
            .ok_or_else(|| crate::errors::ScheduleError::UnknownWeekday(s.to_string()))
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `NaiveTime` as `HH:MM`, the only precision a dose time carries.
pub mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%H:%M";

    pub fn parse(value: &str) -> Option<NaiveTime> {
        NaiveTime::parse_from_str(value.trim(), FORMAT).ok()
    }

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid time '{raw}', expected HH:MM")))
    }

    pub mod list {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer, ser::SerializeSeq};

        pub fn serialize<S: Serializer>(times: &[NaiveTime], serializer: S) -> Result<S::Ok, S::Error> {
            let mut seq = serializer.serialize_seq(Some(times.len()))?;
            for time in times {
                seq.serialize_element(&time.format(super::FORMAT).to_string())?;
            }
            seq.end()
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<NaiveTime>, D::Error> {
            Vec::<String>::deserialize(deserializer)?
                .iter()
                .map(|raw| {
                    super::parse(raw).ok_or_else(|| {
                        serde::de::Error::custom(format!("invalid time '{raw}', expected HH:MM"))
                    })
                })
                .collect()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: u64,
    pub name: String,
    pub days: BTreeSet<Weekday>,
    #[serde(with = "hhmm::list")]
    pub times: Vec<NaiveTime>,
    pub start_date: NaiveDate,
}

/// Identity of one expected dose and of its taken marker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TakenKey {
    pub date: NaiveDate,
    pub name: String,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

impl TakenKey {
    pub fn new(date: NaiveDate, name: impl Into<String>, time: NaiveTime) -> Self {
        Self {
            date,
            name: name.into(),
            time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occurrence {
    pub date: NaiveDate,
    pub name: String,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

impl Occurrence {
    pub fn key(&self) -> TakenKey {
        TakenKey::new(self.date, self.name.clone(), self.time)
    }

    pub fn at(&self) -> chrono::NaiveDateTime {
        self.date.and_time(self.time)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppData {
    pub schedules: Vec<Schedule>,
    pub taken: BTreeSet<TakenKey>,
    pub reminder_minutes: u32,
    pub next_id: u64,
}

impl Default for AppData {
    fn default() -> Self {
        Self {
            schedules: Vec::new(),
            taken: BTreeSet::new(),
            reminder_minutes: DEFAULT_REMINDER_MINUTES,
            next_id: 1,
        }
    }
}

/// Raw schedule form as submitted; validated into a `Schedule` by the store.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScheduleInput {
    pub name: String,
    #[serde(default)]
    pub days: Vec<String>,
    #[serde(default)]
    pub times: Vec<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseStatus {
    Taken,
    Missed,
    Due,
    Upcoming,
}

#[derive(Debug, Serialize)]
pub struct DoseView {
    pub name: String,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub status: DoseStatus,
    pub minutes_until: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub reminder_minutes: u32,
    pub alert: bool,
    pub doses: Vec<DoseView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    Excellent,
    Good,
    NeedsAttention,
}

#[derive(Debug, Serialize)]
pub struct DayAdherence {
    pub date: NaiveDate,
    pub expected: u32,
    pub taken: u32,
}

#[derive(Debug, Serialize)]
pub struct AdherenceReport {
    pub week: String,
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub taken: u32,
    pub expected: u32,
    pub percentage: u8,
    pub feedback: Feedback,
    pub celebrate: bool,
    pub days: Vec<DayAdherence>,
}

#[derive(Debug, Deserialize)]
pub struct AdherenceQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Settings {
    pub reminder_minutes: u32,
}

#[derive(Debug, Serialize)]
pub struct ClearResponse {
    pub cleared: usize,
}
