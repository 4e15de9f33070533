use axum::http::StatusCode;
use chrono::NaiveDate;
use thiserror::Error;

/// Input or lookup failures raised by the schedule store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("medicine name must not be empty")]
    EmptyName,

    #[error("select at least one day of the week")]
    NoDays,

    #[error("add at least one dose time")]
    NoTimes,

    #[error("at most {max} dose times per day are supported")]
    TooManyTimes { max: usize },

    #[error("unknown day of week '{0}'")]
    UnknownWeekday(String),

    #[error("invalid dose time '{0}', expected HH:MM")]
    InvalidTime(String),

    #[error("schedule {0} not found")]
    NotFound(u64),

    #[error("no dose of '{name}' at {time} is scheduled on {date}")]
    NotScheduled {
        date: NaiveDate,
        name: String,
        time: String,
    },

    #[error("the week around {0} is outside the supported calendar")]
    DateOutOfRange(NaiveDate),

    #[error("reminder window must be between {min} and {max} minutes, got {value}")]
    ReminderOutOfRange { value: u32, min: u32, max: u32 },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    pub fn internal(err: impl std::error::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::internal(err)
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        match err {
            ScheduleError::NotFound(_) => Self::not_found(err.to_string()),
            _ => Self::bad_request(err.to_string()),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
