use crate::models::{DEFAULT_REMINDER_MINUTES, MAX_REMINDER_MINUTES, MIN_REMINDER_MINUTES};
use crate::storage::resolve_data_path;
use std::{env, net::SocketAddr, path::PathBuf};

/// Runtime settings read once from the environment at start-up.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
    /// Reminder window for a store that has no data file yet.
    pub reminder_minutes: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, std::io::Error> {
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(8080);

        let reminder_minutes = env::var("MEDTIMER_REMINDER_MINUTES")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .map(|minutes| minutes.clamp(MIN_REMINDER_MINUTES, MAX_REMINDER_MINUTES))
            .unwrap_or(DEFAULT_REMINDER_MINUTES);

        Ok(Self {
            port,
            data_path: resolve_data_path()?,
            reminder_minutes,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}
