pub mod adherence;
pub mod alert;
pub mod app;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod occurrences;
pub mod state;
pub mod status;
pub mod storage;
pub mod store;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{load_data, resolve_data_path};
