use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use domain_model::{PricePoint, PriceSeries};

#[async_trait]
pub trait ChartBuilderApi: Send + Sync + 'static {
    /// Renders the chart as PNG bytes.
    async fn build(&self, chart: LineChart) -> Result<Vec<u8>>;
}

pub struct LineChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Series,
}

pub struct Series {
    pub label: String,
    pub data: Vec<Coord>,
}

impl Series {
    pub fn new(label: &str, data: Vec<Coord>) -> Self {
        Self {
            label: label.to_string(),
            data,
        }
    }
}

impl From<&PriceSeries> for Series {
    fn from(value: &PriceSeries) -> Self {
        let data = value.points().iter().copied().map(Coord::from).collect();
        Self::new(value.field.label(), data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
    pub x: NaiveDate,
    pub y: f64,
}

impl From<(NaiveDate, f64)> for Coord {
    fn from(value: (NaiveDate, f64)) -> Self {
        Self {
            x: value.0,
            y: value.1,
        }
    }
}

impl From<PricePoint> for Coord {
    fn from(value: PricePoint) -> Self {
        Self {
            x: value.date,
            y: value.price,
        }
    }
}
