use crate::errors::RackError;
use chrono::{NaiveTime, Timelike};
use serde::{Serialize, Serializer};
use std::fmt;

pub const DEFAULT_BLOCKS: [&str; 10] = [
    "09:00-10:00",
    "10:00-11:00",
    "11:00-12:00",
    "12:00-13:00",
    "14:00-15:00",
    "15:00-16:00",
    "16:00-17:00",
    "17:00-18:00",
    "18:00-19:00",
    "19:00-20:00",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeBlock {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl TimeBlock {
    pub fn new(start: NaiveTime, end: NaiveTime) -> Result<Self, RackError> {
        if end <= start {
            return Err(RackError::InvalidBlock(format!(
                "block end {} is not after start {}",
                end.format("%H:%M"),
                start.format("%H:%M")
            )));
        }
        Ok(Self { start, end })
    }

    /// Parses `HH:MM-HH:MM`; an en dash is accepted as the separator.
    pub fn parse(label: &str) -> Result<Self, RackError> {
        let normalized = label.trim().replace('–', "-");
        let (start, end) = normalized
            .split_once('-')
            .ok_or_else(|| RackError::InvalidBlock(format!("missing '-' in {label:?}")))?;
        let start = parse_time(start, label)?;
        let end = parse_time(end, label)?;
        Self::new(start, end)
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }

    /// Strict overlap; an interval ending exactly at `self.start` does not count.
    pub fn overlaps(&self, start: NaiveTime, end: NaiveTime) -> bool {
        start < self.end && end > self.start
    }
}

impl fmt::Display for TimeBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for TimeBlock {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

fn parse_time(raw: &str, label: &str) -> Result<NaiveTime, RackError> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|err| RackError::InvalidBlock(format!("{label:?}: {err}")))
}

pub fn normalize_blocks(mut blocks: Vec<TimeBlock>) -> Vec<TimeBlock> {
    blocks.sort_by_key(|block| (block.start, block.end));
    blocks.dedup();
    blocks
}

pub fn parse_block_list(raw: &str) -> Result<Vec<TimeBlock>, RackError> {
    let blocks = raw
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(TimeBlock::parse)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(normalize_blocks(blocks))
}

pub fn default_blocks() -> Vec<TimeBlock> {
    DEFAULT_BLOCKS
        .iter()
        .filter_map(|label| TimeBlock::parse(label).ok())
        .collect()
}

/// End of a reservation that starts at `start`; clamps at midnight.
pub fn end_of_day_clamped(start: NaiveTime, duration_minutes: u32) -> NaiveTime {
    let start_minutes = start.num_seconds_from_midnight() / 60;
    let end_minutes = start_minutes.saturating_add(duration_minutes);
    if end_minutes >= 24 * 60 {
        NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(start)
    } else {
        NaiveTime::from_hms_opt(end_minutes / 60, end_minutes % 60, 0).unwrap_or(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn parses_hyphen_and_en_dash_labels() {
        let hyphen = TimeBlock::parse("09:00-10:00").unwrap();
        let dash = TimeBlock::parse("09:00–10:00").unwrap();
        assert_eq!(hyphen, dash);
        assert_eq!(hyphen.label(), "09:00-10:00");
    }

    #[test]
    fn rejects_malformed_and_inverted_blocks() {
        assert!(TimeBlock::parse("0900").is_err());
        assert!(TimeBlock::parse("10:00-09:00").is_err());
        assert!(TimeBlock::parse("aa:00-10:00").is_err());
    }

    #[test]
    fn touching_intervals_do_not_overlap() {
        let block = TimeBlock::parse("10:00-11:00").unwrap();
        assert!(!block.overlaps(time(9, 0), time(10, 0)));
        assert!(!block.overlaps(time(11, 0), time(12, 0)));
        assert!(block.overlaps(time(9, 30), time(10, 1)));
        assert!(block.overlaps(time(10, 15), time(10, 45)));
    }

    #[test]
    fn block_list_is_sorted_by_start() {
        let blocks = parse_block_list("14:00-15:00, 09:00-10:00,10:00-11:00,09:00-10:00").unwrap();
        let labels: Vec<_> = blocks.iter().map(TimeBlock::label).collect();
        assert_eq!(labels, ["09:00-10:00", "10:00-11:00", "14:00-15:00"]);
    }

    #[test]
    fn default_blocks_skip_lunch_hour() {
        let blocks = default_blocks();
        assert_eq!(blocks.len(), 10);
        assert!(blocks.iter().all(|block| block.label() != "13:00-14:00"));
    }

    #[test]
    fn late_reservations_clamp_at_midnight() {
        assert_eq!(end_of_day_clamped(time(9, 15), 45), time(10, 0));
        assert_eq!(
            end_of_day_clamped(time(23, 30), 90),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
    }

    #[test]
    fn huge_duration_clamps_instead_of_overflowing() {
        assert_eq!(
            end_of_day_clamped(time(9, 0), u32::MAX),
            NaiveTime::from_hms_opt(23, 59, 59).unwrap()
        );
        let block = TimeBlock::parse("19:00-20:00").unwrap();
        assert!(block.overlaps(time(9, 0), end_of_day_clamped(time(9, 0), u32::MAX)));
    }
}
