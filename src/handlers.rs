use crate::adherence::weekly_adherence_at;
use crate::alert::beep_wav;
use crate::errors::AppError;
use crate::models::{
    AdherenceQuery, AdherenceReport, AppData, ClearResponse, DayView, Schedule, ScheduleInput, Settings, TakenKey,
};
use crate::state::AppState;
use crate::status::day_view;
use crate::storage::persist_data;
use crate::ui::render_index;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Redirect},
};
use chrono::{Local, NaiveDate, NaiveDateTime};
use tracing::{info, warn};

pub async fn index(State(state): State<AppState>) -> Result<Html<String>, AppError> {
    let data = state.data.lock().await;
    Ok(Html(dashboard_at(now(), &data)?))
}

/// Checklist and weekly gauge both derive from the single `now` sample.
fn dashboard_at(now: NaiveDateTime, data: &AppData) -> Result<String, AppError> {
    let today = day_view(now.date(), now, data);
    let adherence = weekly_adherence_at(now.date(), data)?;
    Ok(render_index(&today, &adherence, &data.schedules))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<DayView>, AppError> {
    let now = now();
    let data = state.data.lock().await;
    Ok(Json(day_view(now.date(), now, &data)))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<NaiveDate>,
) -> Result<Json<DayView>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(day_view(date, now(), &data)))
}

pub async fn get_adherence(
    State(state): State<AppState>,
    Query(query): Query<AdherenceQuery>,
) -> Result<Json<AdherenceReport>, AppError> {
    let data = state.data.lock().await;
    let date = query.date.unwrap_or_else(today);
    Ok(Json(weekly_adherence_at(date, &data)?))
}

pub async fn list_schedules(State(state): State<AppState>) -> Result<Json<Vec<Schedule>>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(data.schedules.clone()))
}

pub async fn create_schedule(
    State(state): State<AppState>,
    Json(input): Json<ScheduleInput>,
) -> Result<(StatusCode, Json<Schedule>), AppError> {
    let mut data = state.data.lock().await;
    let schedule = data.add_schedule(&input, today()).inspect_err(|err| {
        warn!("rejected schedule: {err}");
    })?;

    persist_data(&state.data_path, &data).await?;
    info!(id = schedule.id, name = %schedule.name, "schedule added");
    Ok((StatusCode::CREATED, Json(schedule)))
}

pub async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<ScheduleInput>,
) -> Result<Json<Schedule>, AppError> {
    let mut data = state.data.lock().await;
    let schedule = data.update_schedule(id, &input, today()).inspect_err(|err| {
        warn!(id, "rejected schedule edit: {err}");
    })?;

    persist_data(&state.data_path, &data).await?;
    info!(id, name = %schedule.name, "schedule updated");
    Ok(Json(schedule))
}

pub async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    let mut data = state.data.lock().await;
    let removed = data.remove_schedule(id)?;

    persist_data(&state.data_path, &data).await?;
    info!(id, name = %removed.name, "schedule removed");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn mark_taken(
    State(state): State<AppState>,
    Json(key): Json<TakenKey>,
) -> Result<Json<DayView>, AppError> {
    let date = key.date;
    let mut data = state.data.lock().await;
    let name = key.name.clone();
    if data.mark_taken(key)? {
        persist_data(&state.data_path, &data).await?;
        info!(%date, name = %name, "dose marked taken");
    }
    Ok(Json(day_view(date, now(), &data)))
}

pub async fn unmark_taken(
    State(state): State<AppState>,
    Json(key): Json<TakenKey>,
) -> Result<Json<DayView>, AppError> {
    let mut data = state.data.lock().await;
    if data.unmark_taken(&key) {
        persist_data(&state.data_path, &data).await?;
        info!(date = %key.date, name = %key.name, "dose unmarked");
    }
    Ok(Json(day_view(key.date, now(), &data)))
}

pub async fn clear_taken(State(state): State<AppState>) -> Result<Json<ClearResponse>, AppError> {
    let cleared = apply_clear(&state).await?;
    Ok(Json(ClearResponse { cleared }))
}

pub async fn clear_taken_form(State(state): State<AppState>) -> Result<Redirect, AppError> {
    apply_clear(&state).await?;
    Ok(Redirect::to("/"))
}

async fn apply_clear(state: &AppState) -> Result<usize, AppError> {
    let mut data = state.data.lock().await;
    let cleared = data.clear_taken();
    persist_data(&state.data_path, &data).await?;
    info!(cleared, "taken markers cleared");
    Ok(cleared)
}

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<Settings>, AppError> {
    let data = state.data.lock().await;
    Ok(Json(Settings {
        reminder_minutes: data.reminder_minutes,
    }))
}

pub async fn update_settings(
    State(state): State<AppState>,
    Json(settings): Json<Settings>,
) -> Result<Json<Settings>, AppError> {
    let mut data = state.data.lock().await;
    data.set_reminder_minutes(settings.reminder_minutes)?;
    persist_data(&state.data_path, &data).await?;
    info!(reminder_minutes = data.reminder_minutes, "settings updated");
    Ok(Json(Settings {
        reminder_minutes: data.reminder_minutes,
    }))
}

pub async fn alert_sound() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "audio/wav")], beep_wav())
}

fn now() -> NaiveDateTime {
    Local::now().naive_local()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashboard_uses_one_clock_sample() {
        let sunday = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        let late = sunday.and_hms_milli_opt(23, 59, 59, 999).unwrap();

        let html = dashboard_at(late, &AppData::default()).unwrap();
        assert!(html.contains("Sunday 2024-01-07"));
        assert!(html.contains("2024-W01"));
    }
}
