use crate::errors::RackError;
use crate::grid::Grid;
use crate::models::ServerStatistics;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatisticsMode {
    #[default]
    Local,
    Server,
}

impl FromStr for StatisticsMode {
    type Err = RackError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "server" => Ok(Self::Server),
            other => Err(RackError::Config(format!(
                "statistics mode must be 'local' or 'server', got {other:?}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyStatistics {
    pub total_reservations: u64,
    pub utilization_percent: f64,
    pub mode: StatisticsMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupied_cells: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cells: Option<usize>,
}

pub fn compute_statistics(
    grid: &Grid,
    mode: StatisticsMode,
    server: Option<ServerStatistics>,
) -> Result<OccupancyStatistics, RackError> {
    grid.window().validate()?;

    match mode {
        StatisticsMode::Local => Ok(local_statistics(grid)),
        StatisticsMode::Server => {
            let server = server.ok_or_else(|| {
                RackError::Fetch("server statistics mode without server totals".into())
            })?;
            Ok(OccupancyStatistics {
                total_reservations: server.total_reservations,
                utilization_percent: server.utilization_percent,
                mode,
                occupied_cells: None,
                total_cells: None,
            })
        }
    }
}

fn local_statistics(grid: &Grid) -> OccupancyStatistics {
    let distinct: HashSet<u64> = grid
        .cells()
        .flat_map(|cell| cell.reservations.iter().map(|reservation| reservation.id))
        .collect();
    let total_cells = grid.cells().count();
    let occupied_cells = grid.cells().filter(|cell| cell.is_occupied()).count();

    let utilization = if total_cells == 0 {
        0.0
    } else {
        occupied_cells as f64 / total_cells as f64 * 100.0
    };

    OccupancyStatistics {
        total_reservations: distinct.len() as u64,
        utilization_percent: round_one_decimal(utilization),
        mode: StatisticsMode::Local,
        occupied_cells: Some(occupied_cells),
        total_cells: Some(total_cells),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::parse_block_list;
    use crate::grid::{build_grid, empty_grid};
    use crate::models::{Reservation, ReservationStatus};
    use crate::week::{compute_week, WeekWindow};
    use chrono::{Duration, NaiveDate};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn reservation(id: u64, day: i64, h: u32, m: u32, minutes: u32) -> Reservation {
        Reservation {
            id,
            start: (monday() + Duration::days(day)).and_hms_opt(h, m, 0),
            duration_minutes: Some(minutes),
            occupants: 4,
            kart_ids: vec![1, 2, 3, 4],
            customer_ids: Vec::new(),
            total: 50000.0,
            status: ReservationStatus::Pending,
            notes: None,
        }
    }

    #[test]
    fn empty_week_reports_zero() {
        let window = compute_week(monday());
        let blocks = parse_block_list("09:00-10:00,10:00-11:00").unwrap();
        let grid = build_grid(&window, &[], &blocks).unwrap();
        let stats = compute_statistics(&grid, StatisticsMode::Local, None).unwrap();
        assert_eq!(stats.total_reservations, 0);
        assert_eq!(stats.utilization_percent, 0.0);
        assert_eq!(stats.total_cells, Some(14));
    }

    #[test]
    fn spanning_reservation_is_counted_once() {
        let window = compute_week(monday());
        let blocks = parse_block_list("09:00-10:00,10:00-11:00").unwrap();
        let grid = build_grid(&window, &[reservation(1, 0, 9, 30, 60)], &blocks).unwrap();
        let stats = compute_statistics(&grid, StatisticsMode::Local, None).unwrap();
        assert_eq!(stats.total_reservations, 1);
        assert_eq!(stats.occupied_cells, Some(2));
        // 2 of 14 cells
        assert_eq!(stats.utilization_percent, 14.3);
    }

    #[test]
    fn no_blocks_means_zero_utilization() {
        let grid = empty_grid(&compute_week(monday()), &[]);
        let stats = compute_statistics(&grid, StatisticsMode::Local, None).unwrap();
        assert_eq!(stats.utilization_percent, 0.0);
    }

    #[test]
    fn server_mode_uses_server_values_verbatim() {
        let window = compute_week(monday());
        let blocks = parse_block_list("09:00-10:00").unwrap();
        let grid = build_grid(&window, &[reservation(1, 0, 9, 0, 30)], &blocks).unwrap();
        let server = ServerStatistics {
            total_reservations: 40,
            utilization_percent: 62.5,
        };
        let stats = compute_statistics(&grid, StatisticsMode::Server, Some(server)).unwrap();
        assert_eq!(stats.total_reservations, 40);
        assert_eq!(stats.utilization_percent, 62.5);
        assert_eq!(stats.occupied_cells, None);
    }

    #[test]
    fn server_mode_without_totals_fails() {
        let grid = empty_grid(&compute_week(monday()), &[]);
        assert!(matches!(
            compute_statistics(&grid, StatisticsMode::Server, None),
            Err(RackError::Fetch(_))
        ));
    }

    #[test]
    fn malformed_grid_window_propagates() {
        let dates = compute_week(monday()).dates().map(|day| day + Duration::days(2));
        let grid = empty_grid(&WeekWindow::from_dates(dates), &[]);
        assert!(matches!(
            compute_statistics(&grid, StatisticsMode::Local, None),
            Err(RackError::InvalidWindow(_))
        ));
    }

    #[test]
    fn mode_parses_from_config_strings() {
        assert_eq!("Server".parse::<StatisticsMode>().unwrap(), StatisticsMode::Server);
        assert_eq!("local".parse::<StatisticsMode>().unwrap(), StatisticsMode::Local);
        assert!("blended".parse::<StatisticsMode>().is_err());
    }
}
