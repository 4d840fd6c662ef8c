use crate::handlers;
use crate::state::AppState;
use axum::{routing::{get, post}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/week", post(handlers::select_week_form))
        .route("/health", get(handlers::health))
        .route("/api/rack", get(handlers::get_rack))
        .route("/api/rack/week", post(handlers::select_week))
        .route("/api/rack/availability", get(handlers::get_availability))
        .with_state(state)
}
