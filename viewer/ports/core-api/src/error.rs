use chrono::NaiveDate;
use thiserror::Error;

use domain_model::DateRangeError;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChartError {
    #[error("Invalid date: '{0}'")]
    InvalidDate(String),

    #[error("Start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("No price data in requested range")]
    NoData,

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),
}

impl ChartError {
    pub const INVALID_DATE_MESSAGE: &'static str = "Dates must use the YYYY-MM-DD format.";
    pub const INVALID_RANGE_MESSAGE: &'static str =
        "The start date cannot be later than the end date.";
    pub const NO_DATA_MESSAGE: &'static str = "No price data was found for the selected dates. \
        The data provider may also be rate limiting requests; please try again later.";
    pub const UPSTREAM_FAILURE_MESSAGE: &'static str =
        "Something went wrong while preparing the chart. Please try again later.";

    /// Text shown to the user. Never contains the error details.
    pub fn user_message(&self) -> &'static str {
        match self {
            ChartError::InvalidDate(_) => Self::INVALID_DATE_MESSAGE,
            ChartError::InvalidRange { .. } => Self::INVALID_RANGE_MESSAGE,
            ChartError::NoData => Self::NO_DATA_MESSAGE,
            ChartError::UpstreamFailure(_) => Self::UPSTREAM_FAILURE_MESSAGE,
        }
    }
}

impl From<DateRangeError> for ChartError {
    fn from(value: DateRangeError) -> Self {
        match value {
            DateRangeError::InvalidDate(input) => ChartError::InvalidDate(input),
            DateRangeError::StartAfterEnd { start, end } => ChartError::InvalidRange { start, end },
        }
    }
}
