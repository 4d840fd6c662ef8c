use crate::errors::RackError;
use crate::models::{FetchedWindow, RawWindowPayload, ServerStatistics};
use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use tracing::debug;

#[async_trait]
pub trait ReservationSource: Send + Sync {
    async fn fetch_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchedWindow, RackError>;
}

/// Supplies precomputed week totals; only consulted in server statistics mode.
#[async_trait]
pub trait StatisticsSource: Send + Sync {
    async fn fetch_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ServerStatistics, RackError>;
}

fn range_query(start: NaiveDate, end: NaiveDate) -> [(&'static str, String); 2] {
    [
        ("fechaInicio", start.format("%Y-%m-%d").to_string()),
        ("fechaFin", end.format("%Y-%m-%d").to_string()),
    ]
}

pub struct HttpReservationSource {
    client: Client,
    url: String,
}

impl HttpReservationSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ReservationSource for HttpReservationSource {
    async fn fetch_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchedWindow, RackError> {
        debug!("fetching reservations {start}..{end} from {}", self.url);
        let raw: RawWindowPayload = self
            .client
            .get(&self.url)
            .query(&range_query(start, end))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(raw.into())
    }
}

pub struct HttpStatisticsSource {
    client: Client,
    url: String,
}

impl HttpStatisticsSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl StatisticsSource for HttpStatisticsSource {
    async fn fetch_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ServerStatistics, RackError> {
        debug!("fetching statistics {start}..{end} from {}", self.url);
        let stats = self
            .client
            .get(&self.url)
            .query(&range_query(start, end))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(stats)
    }
}
