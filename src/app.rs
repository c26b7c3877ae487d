use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/day/:date/toggle/:kind", post(handlers::toggle_form))
        .route("/day/:date/note", post(handlers::note_form))
        .route("/milestone/dismiss", post(handlers::dismiss_form))
        .route("/api/today", get(handlers::get_today))
        .route("/api/calendar", get(handlers::get_calendar))
        .route("/api/streak", get(handlers::get_streak))
        .route("/api/days/:date", get(handlers::get_day))
        .route("/api/days/:date/toggle", post(handlers::toggle))
        .route("/api/days/:date/note", put(handlers::set_note))
        .route("/api/milestone/dismiss", post(handlers::dismiss))
        .with_state(state)
}
