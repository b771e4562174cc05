use chrono::{Days, NaiveDate};
use thiserror::Error;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Inclusive calendar date range, `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DateRangeError {
    #[error("'{0}' is not a YYYY-MM-DD date")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    StartAfterEnd { start: NaiveDate, end: NaiveDate },
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DateRangeError> {
        if start > end {
            return Err(DateRangeError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn parse(start: &str, end: &str) -> Result<Self, DateRangeError> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    /// Range of `days` calendar days back from `end`, both ends included.
    pub fn last_days(end: NaiveDate, days: u64) -> Self {
        let start = end.checked_sub_days(Days::new(days)).unwrap_or(end);
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

fn parse_date(input: &str) -> Result<NaiveDate, DateRangeError> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, DATE_FORMAT)
        .map_err(|_| DateRangeError::InvalidDate(input.to_string()))
}
