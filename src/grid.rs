use crate::blocks::{end_of_day_clamped, normalize_blocks, TimeBlock};
use crate::errors::RackError;
use crate::models::{DayBuckets, Reservation, WindowPayload};
use crate::week::{day_label, parse_day_key, weekday_name, WeekWindow};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayColumn {
    pub name: &'static str,
    pub date: NaiveDate,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OccupancyCell {
    pub date: NaiveDate,
    pub block: TimeBlock,
    pub reservations: Vec<Reservation>,
}

impl OccupancyCell {
    pub fn is_occupied(&self) -> bool {
        !self.reservations.is_empty()
    }
}

// rows[block][day], days Monday..Sunday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Grid {
    window: WeekWindow,
    days: Vec<DayColumn>,
    blocks: Vec<TimeBlock>,
    rows: Vec<Vec<OccupancyCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCount {
    pub day: &'static str,
    pub date: NaiveDate,
    pub reservations: usize,
}

impl Grid {
    pub fn window(&self) -> &WeekWindow {
        &self.window
    }

    pub fn days(&self) -> &[DayColumn] {
        &self.days
    }

    pub fn blocks(&self) -> &[TimeBlock] {
        &self.blocks
    }

    pub fn rows(&self) -> &[Vec<OccupancyCell>] {
        &self.rows
    }

    pub fn cell(&self, block: usize, day: usize) -> Option<&OccupancyCell> {
        self.rows.get(block).and_then(|row| row.get(day))
    }

    pub fn cell_by_label(&self, label: &str, day: usize) -> Option<&OccupancyCell> {
        let block = self.blocks.iter().position(|block| block.label() == label)?;
        self.cell(block, day)
    }

    pub fn cells(&self) -> impl Iterator<Item = &OccupancyCell> {
        self.rows.iter().flatten()
    }

    /// Distinct reservations per day; a reservation spanning blocks counts once.
    pub fn reservations_per_day(&self) -> Vec<DayCount> {
        self.days
            .iter()
            .enumerate()
            .map(|(index, column)| {
                let ids: HashSet<u64> = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(index))
                    .flat_map(|cell| cell.reservations.iter().map(|r| r.id))
                    .collect();
                DayCount {
                    day: column.name,
                    date: column.date,
                    reservations: ids.len(),
                }
            })
            .collect()
    }
}

pub fn empty_grid(window: &WeekWindow, blocks: &[TimeBlock]) -> Grid {
    let days = window
        .dates()
        .iter()
        .enumerate()
        .map(|(index, date)| DayColumn {
            name: weekday_name(index),
            date: *date,
            label: day_label(*date),
        })
        .collect();
    let rows = blocks
        .iter()
        .map(|block| {
            window
                .dates()
                .iter()
                .map(|date| OccupancyCell {
                    date: *date,
                    block: *block,
                    reservations: Vec::new(),
                })
                .collect()
        })
        .collect();

    Grid {
        window: *window,
        days,
        blocks: blocks.to_vec(),
        rows,
    }
}

pub fn build_grid(
    window: &WeekWindow,
    reservations: &[Reservation],
    default_blocks: &[TimeBlock],
) -> Result<Grid, RackError> {
    window.validate()?;
    let blocks = normalize_blocks(default_blocks.to_vec());
    let mut grid = empty_grid(window, &blocks);

    for reservation in reservations {
        let (Some(start), Some(duration)) = (reservation.start, reservation.duration_minutes)
        else {
            warn!("reservation {} has no start or duration, skipping", reservation.id);
            continue;
        };
        let Some(day) = window.day_index(start.date()) else {
            debug!("reservation {} on {} is outside the window", reservation.id, start.date());
            continue;
        };

        let begin = start.time();
        let end = end_of_day_clamped(begin, duration);
        for (index, block) in blocks.iter().enumerate() {
            if block.overlaps(begin, end) {
                grid.rows[index][day].reservations.push(reservation.clone());
            }
        }
    }

    Ok(grid)
}

pub fn build_from_buckets(
    window: &WeekWindow,
    buckets: &DayBuckets,
    default_blocks: &[TimeBlock],
) -> Result<Grid, RackError> {
    window.validate()?;

    let mut placed = Vec::new();
    for (day_key, day_blocks) in buckets {
        let Some(day) = parse_day_key(day_key) else {
            warn!("unknown day key {day_key:?} in bucketed payload");
            continue;
        };
        for (label, reservations) in day_blocks {
            match TimeBlock::parse(label) {
                Ok(block) => placed.push((day, block, reservations)),
                Err(err) => warn!("skipping bucket {label:?}: {err}"),
            }
        }
    }

    let mut blocks = normalize_blocks(placed.iter().map(|(_, block, _)| *block).collect());
    if blocks.is_empty() {
        blocks = normalize_blocks(default_blocks.to_vec());
    }
    let mut grid = empty_grid(window, &blocks);

    for (day, block, reservations) in placed {
        let Some(row) = blocks.iter().position(|candidate| *candidate == block) else {
            continue;
        };
        for reservation in reservations {
            if let Some(date) = reservation.date() {
                if !window.contains(date) {
                    debug!("reservation {} on {date} is outside the window", reservation.id);
                    continue;
                }
            }
            grid.rows[row][day].reservations.push(reservation.clone());
        }
    }

    Ok(grid)
}

pub fn normalize(
    window: &WeekWindow,
    payload: &WindowPayload,
    default_blocks: &[TimeBlock],
) -> Result<Grid, RackError> {
    match payload {
        WindowPayload::Flat(reservations) => build_grid(window, reservations, default_blocks),
        WindowPayload::Bucketed(buckets) => build_from_buckets(window, buckets, default_blocks),
    }
}
