use crate::availability::check_availability;
use crate::blocks::TimeBlock;
use crate::config::RackSettings;
use crate::errors::RackError;
use crate::grid::{empty_grid, normalize, DayCount, Grid};
use crate::models::AvailabilityResponse;
use crate::source::{ReservationSource, StatisticsSource};
use crate::stats::{compute_statistics, OccupancyStatistics, StatisticsMode};
use crate::week::{compute_week, WeekWindow};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Handle for one week selection. Completing a ticket whose generation has
/// been superseded is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    window: WeekWindow,
}

impl Ticket {
    pub fn window(&self) -> &WeekWindow {
        &self.window
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RackSnapshot {
    pub state: LoadState,
    pub error: Option<String>,
    pub week: Option<WeekWindow>,
    pub grid: Option<Grid>,
    pub statistics: Option<OccupancyStatistics>,
    pub reservations_per_day: Vec<DayCount>,
}

#[derive(Debug)]
struct RackInner {
    generation: u64,
    state: LoadState,
    window: Option<WeekWindow>,
    grid: Option<Grid>,
    statistics: Option<OccupancyStatistics>,
    error: Option<String>,
}

pub struct WeeklyRack {
    settings: RackSettings,
    reservations: Arc<dyn ReservationSource>,
    statistics: Option<Arc<dyn StatisticsSource>>,
    inner: Mutex<RackInner>,
}

impl WeeklyRack {
    pub fn new(
        settings: RackSettings,
        reservations: Arc<dyn ReservationSource>,
        statistics: Option<Arc<dyn StatisticsSource>>,
    ) -> Self {
        Self {
            settings,
            reservations,
            statistics,
            inner: Mutex::new(RackInner {
                generation: 0,
                state: LoadState::Idle,
                window: None,
                grid: None,
                statistics: None,
                error: None,
            }),
        }
    }

    pub fn settings(&self) -> &RackSettings {
        &self.settings
    }

    /// Selects the week of `reference` and loads it to completion.
    ///
    /// Returns whether the result was applied; `false` means a later
    /// selection superseded this one while it was in flight.
    pub async fn select_week(&self, reference: NaiveDate) -> bool {
        let ticket = self.begin_selection(reference).await;
        self.load(ticket).await
    }

    pub async fn begin_selection(&self, reference: NaiveDate) -> Ticket {
        let window = compute_week(reference);
        let mut inner = self.inner.lock().await;
        inner.generation += 1;
        inner.state = LoadState::Loading;
        inner.window = Some(window);
        inner.grid = None;
        inner.statistics = None;
        inner.error = None;
        info!(
            "selected week {}..{} (generation {})",
            window.start(),
            window.end(),
            inner.generation
        );
        Ticket {
            generation: inner.generation,
            window,
        }
    }

    pub async fn load(&self, ticket: Ticket) -> bool {
        let outcome = self.fetch_and_build(&ticket.window).await;
        self.complete(ticket, outcome).await
    }

    async fn fetch_and_build(
        &self,
        window: &WeekWindow,
    ) -> Result<(Grid, OccupancyStatistics), RackError> {
        let fetched = self
            .reservations
            .fetch_window(window.start(), window.end())
            .await?;
        let grid = normalize(window, &fetched.payload, &self.settings.default_blocks)?;

        // A dedicated statistics source takes precedence over totals embedded
        // in the rack response.
        let server = match (self.settings.statistics_mode, &self.statistics) {
            (StatisticsMode::Local, _) => None,
            (StatisticsMode::Server, Some(source)) => {
                Some(source.fetch_window(window.start(), window.end()).await?)
            }
            (StatisticsMode::Server, None) => Some(fetched.statistics.ok_or_else(|| {
                RackError::Fetch(
                    "no statistics source configured and the response carries no totals".into(),
                )
            })?),
        };
        let statistics = compute_statistics(&grid, self.settings.statistics_mode, server)?;
        Ok((grid, statistics))
    }

    pub async fn complete(
        &self,
        ticket: Ticket,
        outcome: Result<(Grid, OccupancyStatistics), RackError>,
    ) -> bool {
        let mut inner = self.inner.lock().await;
        if ticket.generation != inner.generation {
            debug!(
                "discarding result for {} (generation {}, current {})",
                ticket.window.start(),
                ticket.generation,
                inner.generation
            );
            return false;
        }

        match outcome {
            Ok((grid, statistics)) => {
                info!(
                    "week {} ready: {} reservations, {}% utilization",
                    ticket.window.start(),
                    statistics.total_reservations,
                    statistics.utilization_percent
                );
                inner.state = LoadState::Ready;
                inner.grid = Some(grid);
                inner.statistics = Some(statistics);
                inner.error = None;
            }
            Err(err) => {
                warn!("week {} failed: {err}", ticket.window.start());
                inner.state = LoadState::Failed;
                inner.grid = Some(empty_grid(&ticket.window, &self.settings.default_blocks));
                inner.statistics = None;
                inner.error = Some(err.to_string());
            }
        }
        true
    }

    pub async fn state(&self) -> LoadState {
        self.inner.lock().await.state
    }

    pub async fn snapshot(&self) -> RackSnapshot {
        let inner = self.inner.lock().await;
        let reservations_per_day = inner
            .grid
            .as_ref()
            .map(Grid::reservations_per_day)
            .unwrap_or_default();
        RackSnapshot {
            state: inner.state,
            error: inner.error.clone(),
            week: inner.window,
            grid: inner.grid.clone(),
            statistics: inner.statistics.clone(),
            reservations_per_day,
        }
    }

    pub async fn availability(
        &self,
        date: NaiveDate,
        block: &TimeBlock,
        people: u32,
    ) -> Result<AvailabilityResponse, RackError> {
        let reservations = self
            .reservations
            .fetch_window(date, date)
            .await?
            .payload
            .into_reservations();
        Ok(check_availability(
            &reservations,
            date,
            block,
            people,
            self.settings.block_capacity,
        ))
    }
}
