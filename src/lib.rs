pub mod app;
pub mod availability;
pub mod blocks;
pub mod config;
pub mod errors;
pub mod grid;
pub mod handlers;
pub mod models;
pub mod rack;
pub mod source;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod week;

pub use app::router;
pub use config::{Config, RackSettings, SourceConfig};
pub use errors::RackError;
pub use grid::{build_grid, Grid, OccupancyCell};
pub use rack::{LoadState, RackSnapshot, WeeklyRack};
pub use state::AppState;
pub use stats::{compute_statistics, OccupancyStatistics, StatisticsMode};
pub use week::{compute_week, WeekWindow};
