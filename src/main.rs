use chrono::Local;
use karting_rack::handlers::spawn_selection;
use karting_rack::source::{HttpReservationSource, HttpStatisticsSource, ReservationSource, StatisticsSource};
use karting_rack::stats::StatisticsMode;
use karting_rack::storage::FileReservationSource;
use karting_rack::{router, AppState, Config, SourceConfig, WeeklyRack};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env()?;
    let client = reqwest::Client::new();

    let reservations: Arc<dyn ReservationSource> = match &config.source {
        SourceConfig::File(path) => {
            info!("reading reservations from {}", path.display());
            Arc::new(FileReservationSource::new(path))
        }
        SourceConfig::Http(url) => {
            info!("fetching reservations from {url}");
            Arc::new(HttpReservationSource::new(client.clone(), url))
        }
    };
    let statistics = config.statistics_url.as_ref().map(|url| {
        Arc::new(HttpStatisticsSource::new(client.clone(), url)) as Arc<dyn StatisticsSource>
    });
    if config.rack.statistics_mode == StatisticsMode::Server && statistics.is_none() {
        info!("server statistics mode: using totals from the rack response");
    }

    let state = AppState::new(WeeklyRack::new(config.rack.clone(), reservations, statistics));
    spawn_selection(&state, Local::now().date_naive()).await;

    let app = router(state);
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));

    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
