use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::PriceField;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

impl From<(NaiveDate, f64)> for PricePoint {
    fn from(value: (NaiveDate, f64)) -> Self {
        Self {
            date: value.0,
            price: value.1,
        }
    }
}

/// Daily prices of one symbol, one point per trading day in ascending date order.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PriceSeries {
    pub symbol: String,
    pub field: PriceField,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Sorts the points by date; for repeated dates the last one wins.
    pub fn new(symbol: &str, field: PriceField, points: impl IntoIterator<Item = PricePoint>) -> Self {
        let points = points
            .into_iter()
            .map(|point| (point.date, point.price))
            .collect::<BTreeMap<_, _>>()
            .into_iter()
            .map(PricePoint::from)
            .collect();
        Self {
            symbol: symbol.to_string(),
            field,
            points,
        }
    }

    pub fn empty(symbol: &str, field: PriceField) -> Self {
        Self {
            symbol: symbol.to_string(),
            field,
            points: Vec::new(),
        }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
