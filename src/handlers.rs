use crate::calendar::{build_month_view, MonthRef, MonthView};
use crate::errors::AppError;
use crate::models::{
    date_key, parse_date_key, DayResponse, MilestoneView, MonthForm, MonthQuery,
    MutationResponse, NoteForm, NoteRequest, StatusKind, StreakResponse, TodayResponse,
    ToggleRequest,
};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::streak::streak_at;
use crate::ui::render_index;
use axum::{
    extract::{Path, Query, State},
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    #[serde(flatten)]
    pub view: MonthView,
    pub today: String,
    pub streak: u32,
    pub milestone: MilestoneView,
}

pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Html<String>, AppError> {
    let calendar = load_calendar(&state, query.month.as_deref()).await?;
    Ok(Html(render_index(
        &calendar.view,
        calendar.streak,
        &calendar.milestone,
    )))
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CalendarResponse>, AppError> {
    Ok(Json(load_calendar(&state, query.month.as_deref()).await?))
}

pub async fn get_today(State(state): State<AppState>) -> Result<Json<TodayResponse>, AppError> {
    let today = today();
    let store = state.store.lock().await;
    let record = store.record(today);
    let streak = streak_at(&store, today);
    drop(store);
    observe_streak(&state, streak).await;

    Ok(Json(TodayResponse {
        date: date_key(today),
        day: DayResponse::new(today, &record),
        streak,
    }))
}

pub async fn get_streak(State(state): State<AppState>) -> Result<Json<StreakResponse>, AppError> {
    let today = today();
    let streak = {
        let store = state.store.lock().await;
        streak_at(&store, today)
    };
    let milestone = observe_streak(&state, streak).await;

    Ok(Json(StreakResponse {
        date: date_key(today),
        streak,
        milestone,
    }))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<DayResponse>, AppError> {
    let date = parse_date(&date)?;
    let store = state.store.lock().await;
    Ok(Json(DayResponse::new(date, &store.record(date))))
}

pub async fn toggle(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<ToggleRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let date = parse_date(&date)?;
    let kind = parse_kind(&payload.kind)?;
    Ok(Json(apply_toggle(&state, date, kind).await?))
}

pub async fn set_note(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<NoteRequest>,
) -> Result<Json<MutationResponse>, AppError> {
    let date = parse_date(&date)?;
    Ok(Json(apply_note(&state, date, payload.note).await?))
}

pub async fn dismiss(State(state): State<AppState>) -> Json<MilestoneView> {
    Json(dismiss_milestone(&state).await)
}

pub async fn toggle_form(
    State(state): State<AppState>,
    Path((date, kind)): Path<(String, String)>,
    Form(form): Form<MonthForm>,
) -> Result<Redirect, AppError> {
    let date = parse_date(&date)?;
    let kind = parse_kind(&kind)?;
    apply_toggle(&state, date, kind).await?;
    Ok(redirect_to_month(form.month.as_deref(), date))
}

pub async fn note_form(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Form(form): Form<NoteForm>,
) -> Result<Redirect, AppError> {
    let date = parse_date(&date)?;
    apply_note(&state, date, form.note).await?;
    Ok(redirect_to_month(form.month.as_deref(), date))
}

pub async fn dismiss_form(
    State(state): State<AppState>,
    Form(form): Form<MonthForm>,
) -> Redirect {
    dismiss_milestone(&state).await;
    match form.month.as_deref().and_then(|month| month.parse::<MonthRef>().ok()) {
        Some(month) => Redirect::to(&format!("/?month={month}")),
        None => Redirect::to("/"),
    }
}

async fn load_calendar(state: &AppState, month: Option<&str>) -> Result<CalendarResponse, AppError> {
    let today = today();
    let month = resolve_month(month, today)?;
    let (view, streak) = {
        let store = state.store.lock().await;
        (build_month_view(&store, month, today), streak_at(&store, today))
    };
    let milestone = observe_streak(state, streak).await;

    Ok(CalendarResponse {
        view,
        today: date_key(today),
        streak,
        milestone,
    })
}

async fn apply_toggle(
    state: &AppState,
    date: NaiveDate,
    kind: StatusKind,
) -> Result<MutationResponse, AppError> {
    let mut store = state.store.lock().await;
    let record = store.toggle_status(date, kind);
    persist_data(&state.data_path, &store).await?;
    info!(date = %date_key(date), %kind, status = ?record.status, "toggled day");

    let streak = streak_at(&store, today());
    let milestone = observe_streak(state, streak).await;
    Ok(MutationResponse {
        day: DayResponse::new(date, &record),
        streak,
        milestone,
    })
}

async fn apply_note(
    state: &AppState,
    date: NaiveDate,
    note: String,
) -> Result<MutationResponse, AppError> {
    let mut store = state.store.lock().await;
    let record = store.set_note(date, note);
    persist_data(&state.data_path, &store).await?;
    info!(date = %date_key(date), len = record.note.len(), "updated note");

    let streak = streak_at(&store, today());
    let milestone = observe_streak(state, streak).await;
    Ok(MutationResponse {
        day: DayResponse::new(date, &record),
        streak,
        milestone,
    })
}

async fn observe_streak(state: &AppState, streak: u32) -> MilestoneView {
    let mut milestones = state.milestones.lock().await;
    if milestones.observe(streak) {
        info!(streak, "streak milestone reached");
    }
    milestones.view()
}

async fn dismiss_milestone(state: &AppState) -> MilestoneView {
    let mut milestones = state.milestones.lock().await;
    milestones.dismiss();
    milestones.view()
}

fn resolve_month(month: Option<&str>, today: NaiveDate) -> Result<MonthRef, AppError> {
    match month.map(str::trim).filter(|month| !month.is_empty()) {
        Some(month) => month.parse().map_err(AppError::bad_request),
        None => Ok(MonthRef::containing(today)),
    }
}

fn redirect_to_month(month: Option<&str>, date: NaiveDate) -> Redirect {
    let month = month
        .and_then(|month| month.parse::<MonthRef>().ok())
        .unwrap_or_else(|| MonthRef::containing(date));
    Redirect::to(&format!("/?month={month}"))
}

fn parse_date(value: &str) -> Result<NaiveDate, AppError> {
    parse_date_key(value).ok_or_else(|| AppError::malformed("date", "YYYY-MM-DD", value))
}

fn parse_kind(value: &str) -> Result<StatusKind, AppError> {
    value.parse().map_err(AppError::bad_request)
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_month_query_falls_back_to_today() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(resolve_month(None, today).unwrap().key(), "2026-10");
        assert_eq!(resolve_month(Some("  "), today).unwrap().key(), "2026-10");
        assert_eq!(resolve_month(Some("2025-02"), today).unwrap().key(), "2025-02");
    }

    #[test]
    fn bad_inputs_are_client_errors() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        assert_eq!(
            resolve_month(Some("2025/02"), today).unwrap_err().status,
            axum::http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            parse_date("17-10-2026").unwrap_err().status,
            axum::http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            parse_kind("skipped").unwrap_err().status,
            axum::http::StatusCode::BAD_REQUEST
        );
    }
}
