use crate::errors::RackError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::Serialize;

pub const WEEKDAY_NAMES: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

// `from_dates` does not check its input; `validate` does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeekWindow {
    dates: [NaiveDate; 7],
}

impl WeekWindow {
    pub fn from_dates(dates: [NaiveDate; 7]) -> Self {
        Self { dates }
    }

    pub fn dates(&self) -> &[NaiveDate; 7] {
        &self.dates
    }

    pub fn start(&self) -> NaiveDate {
        self.dates[0]
    }

    pub fn end(&self) -> NaiveDate {
        self.dates[6]
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start() && date <= self.end()
    }

    pub fn day_index(&self, date: NaiveDate) -> Option<usize> {
        self.dates.iter().position(|day| *day == date)
    }

    pub fn validate(&self) -> Result<(), RackError> {
        if self.start().weekday() != Weekday::Mon {
            return Err(RackError::InvalidWindow(format!(
                "window starts on {} instead of a Monday",
                self.start()
            )));
        }
        for pair in self.dates.windows(2) {
            if pair[1] - pair[0] != Duration::days(1) {
                return Err(RackError::InvalidWindow(format!(
                    "{} does not follow {} by one day",
                    pair[1], pair[0]
                )));
            }
        }
        Ok(())
    }
}

pub fn compute_week(reference: NaiveDate) -> WeekWindow {
    let monday = week_start(reference);
    let mut dates = [monday; 7];
    for (offset, slot) in dates.iter_mut().enumerate() {
        *slot = monday + Duration::days(offset as i64);
    }
    WeekWindow { dates }
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

pub fn weekday_name(index: usize) -> &'static str {
    WEEKDAY_NAMES[index % 7]
}

pub fn day_label(date: NaiveDate) -> String {
    let index = date.weekday().num_days_from_monday() as usize;
    format!("{} {}", weekday_name(index), date.format("%d/%m"))
}

// The rack service keys its buckets by Spanish weekday names.
pub fn parse_day_key(key: &str) -> Option<usize> {
    let key = key.trim().to_lowercase();
    let index = match key.as_str() {
        "monday" | "lunes" => 0,
        "tuesday" | "martes" => 1,
        "wednesday" | "miércoles" | "miercoles" => 2,
        "thursday" | "jueves" => 3,
        "friday" | "viernes" => 4,
        "saturday" | "sábado" | "sabado" => 5,
        "sunday" | "domingo" => 6,
        _ => return None,
    };
    Some(index)
}
