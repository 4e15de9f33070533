use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/alert.wav", get(handlers::alert_sound))
        .route("/taken/clear", post(handlers::clear_taken_form))
        .route("/api/today", get(handlers::get_today))
        .route("/api/day/:date", get(handlers::get_day))
        .route("/api/adherence", get(handlers::get_adherence))
        .route(
            "/api/schedules",
            get(handlers::list_schedules).post(handlers::create_schedule),
        )
        .route(
            "/api/schedules/:id",
            put(handlers::update_schedule).delete(handlers::delete_schedule),
        )
        .route("/api/taken", post(handlers::mark_taken))
        .route("/api/taken/remove", post(handlers::unmark_taken))
        .route("/api/taken/clear", post(handlers::clear_taken))
        .route(
            "/api/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .with_state(state)
}
