use crate::blocks::TimeBlock;
use crate::errors::{AppError, RackError};
use crate::models::{AvailabilityQuery, AvailabilityResponse, HealthResponse, SelectWeekRequest};
use crate::rack::RackSnapshot;
use crate::state::AppState;
use crate::ui::render_index;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{Local, NaiveDate};
use tracing::error;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.rack.snapshot().await;
    let selected = snapshot
        .week
        .map(|window| window.start())
        .unwrap_or_else(today);
    Html(render_index(&snapshot, &selected.to_string()))
}

pub async fn get_rack(State(state): State<AppState>) -> Json<RackSnapshot> {
    Json(state.rack.snapshot().await)
}

pub async fn select_week(
    State(state): State<AppState>,
    Json(payload): Json<SelectWeekRequest>,
) -> Result<(StatusCode, Json<RackSnapshot>), AppError> {
    let reference = parse_date(&payload.date)?;
    spawn_selection(&state, reference).await;
    Ok((StatusCode::ACCEPTED, Json(state.rack.snapshot().await)))
}

pub async fn select_week_form(
    State(state): State<AppState>,
    Form(payload): Form<SelectWeekRequest>,
) -> Result<Redirect, AppError> {
    let reference = parse_date(&payload.date)?;
    spawn_selection(&state, reference).await;
    Ok(Redirect::to("/"))
}

pub async fn get_availability(
    State(state): State<AppState>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let date = parse_date(&query.date)?;
    let block = TimeBlock::parse(&query.block)?;
    let response = state.rack.availability(date, &block, query.people).await?;
    Ok(Json(response))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        service: "karting-rack",
    })
}

/// Moves the rack to `Loading` before returning, then fetches in the background.
pub async fn spawn_selection(state: &AppState, reference: NaiveDate) {
    let ticket = state.rack.begin_selection(reference).await;
    let rack = state.rack.clone();
    tokio::spawn(async move {
        let load = tokio::spawn({
            let rack = rack.clone();
            async move { rack.load(ticket).await }
        });
        // A panicking load must not leave the rack stuck in Loading.
        if let Err(err) = load.await {
            error!("load for week {} aborted: {err}", ticket.window().start());
            rack.complete(ticket, Err(RackError::Fetch(format!("load task failed: {err}"))))
                .await;
        }
    });
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::bad_request("date must be formatted YYYY-MM-DD"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
