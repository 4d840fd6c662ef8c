use crate::errors::RackError;
use crate::models::{FetchedWindow, RawWindowPayload, WindowPayload};
use crate::source::ReservationSource;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::warn;

pub struct FileReservationSource {
    path: PathBuf,
}

impl FileReservationSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

pub async fn load_payload(path: &Path) -> Result<FetchedWindow, RackError> {
    match fs::read(path).await {
        Ok(bytes) => serde_json::from_slice::<RawWindowPayload>(&bytes)
            .map(FetchedWindow::from)
            .map_err(|err| RackError::Fetch(format!("failed to parse {}: {err}", path.display()))),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            warn!("reservation file {} not found, treating as empty", path.display());
            Ok(WindowPayload::Flat(Vec::new()).into())
        }
        Err(err) => Err(RackError::Fetch(format!(
            "failed to read {}: {err}",
            path.display()
        ))),
    }
}

#[async_trait]
impl ReservationSource for FileReservationSource {
    async fn fetch_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<FetchedWindow, RackError> {
        let mut fetched = load_payload(&self.path).await?;
        fetched.payload = match fetched.payload {
            WindowPayload::Flat(reservations) => WindowPayload::Flat(
                reservations
                    .into_iter()
                    .filter(|reservation| {
                        reservation
                            .date()
                            .is_some_and(|date| date >= start && date <= end)
                    })
                    .collect(),
            ),
            bucketed => bucketed,
        };
        Ok(fetched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("karting_rack_{name}_{}_{nanos}.json", std::process::id()))
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn flat_file_is_filtered_to_range() {
        let path = temp_path("flat");
        let body = serde_json::json!([
            { "id": 1, "fechaHora": "2024-06-10T09:00:00", "duracionMinutos": 30 },
            { "id": 2, "fechaHora": "2024-06-20T09:00:00", "duracionMinutos": 30 }
        ]);
        fs::write(&path, body.to_string()).await.unwrap();

        let source = FileReservationSource::new(&path);
        let fetched = source.fetch_window(date(10), date(16)).await.unwrap();
        let ids: Vec<u64> = fetched.payload.into_reservations().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1]);

        let _ = fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn missing_file_is_empty() {
        let source = FileReservationSource::new(temp_path("missing"));
        let fetched = source.fetch_window(date(10), date(16)).await.unwrap();
        assert_eq!(fetched.payload, WindowPayload::Flat(Vec::new()));
        assert_eq!(fetched.statistics, None);
    }

    #[tokio::test]
    async fn garbage_file_is_a_fetch_error() {
        let path = temp_path("garbage");
        fs::write(&path, b"not json").await.unwrap();
        let source = FileReservationSource::new(&path);
        let result = source.fetch_window(date(10), date(16)).await;
        assert!(matches!(result, Err(RackError::Fetch(_))));
        let _ = fs::remove_file(&path).await;
    }
}
