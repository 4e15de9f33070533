use crate::errors::AppError;
use crate::models::AppData;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data/state.json"))
}

/// Reads the store from disk. A missing file is a fresh store; a broken one
/// is logged and replaced by a fresh store rather than aborting start-up.
pub async fn load_data(path: &Path) -> Option<AppData> {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<AppData>(&bytes) {
            Ok(mut data) => {
                if data.repair() {
                    warn!(path = %path.display(), "data file had out-of-range values, repaired");
                }
                info!(
                    path = %path.display(),
                    schedules = data.schedules.len(),
                    taken = data.taken.len(),
                    "loaded data file"
                );
                Some(data)
            }
            Err(err) => {
                error!("failed to parse data file: {err}");
                None
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
        Err(err) => {
            error!("failed to read data file: {err}");
            None
        }
    }
}

pub async fn persist_data(path: &Path, data: &AppData) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(data).map_err(AppError::internal)?;
    fs::write(path, payload).await.map_err(|err| {
        error!(path = %path.display(), "failed to write data file: {err}");
        AppError::internal(err)
    })?;
    Ok(())
}
