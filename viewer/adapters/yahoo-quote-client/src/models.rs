use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use domain_model::{DateRange, PriceField, PricePoint, PriceSeries};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartQuery {
    pub period1: i64,
    pub period2: i64,
    pub interval: &'static str,
    pub events: &'static str,
    pub include_adjusted_close: bool,
}

impl ChartQuery {
    /// Daily bars from `start` 00:00 UTC up to, but excluding, the day after `end`.
    pub fn daily(range: &DateRange) -> Self {
        Self {
            period1: midnight_timestamp(range.start()),
            period2: midnight_timestamp(range.end()) + SECONDS_PER_DAY,
            interval: "1d",
            events: "div|split",
            include_adjusted_close: true,
        }
    }
}

const SECONDS_PER_DAY: i64 = 86_400;

fn midnight_timestamp(date: NaiveDate) -> i64 {
    date.and_hms_opt(0, 0, 0)
        .map(|datetime| datetime.and_utc().timestamp())
        .unwrap_or_default()
}

#[derive(Debug, Deserialize)]
pub struct ChartEnvelope {
    pub chart: ChartBody,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct ChartErrorBody {
    pub code: String,
    pub description: String,
}

impl ChartErrorBody {
    pub fn is_missing_data(&self) -> bool {
        self.description.starts_with("Data doesn't exist")
    }
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: Meta,
    #[serde(default)]
    pub timestamp: Vec<i64>,
    pub indicators: Indicators,
}

#[derive(Debug, Deserialize)]
pub struct Meta {
    #[serde(default)]
    pub gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    #[serde(default)]
    pub quote: Vec<QuoteIndicator>,
    #[serde(default)]
    pub adjclose: Vec<AdjCloseIndicator>,
}

#[derive(Debug, Deserialize)]
pub struct QuoteIndicator {
    #[serde(default)]
    pub close: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
pub struct AdjCloseIndicator {
    #[serde(default)]
    pub adjclose: Vec<Option<f64>>,
}

impl ChartResult {
    pub fn into_price_series(self, symbol: &str, range: &DateRange, field: PriceField) -> PriceSeries {
        let offset = self.meta.gmtoffset;
        let closes = self.indicators.quote.into_iter().next().map(|quote| quote.close);
        let adj_closes = self.indicators.adjclose.into_iter().next().map(|adj| adj.adjclose);
        let prices = match field {
            PriceField::Close => closes,
            PriceField::AdjClose => adj_closes.or_else(|| {
                warn!("No adjusted close for '{symbol}', falling back to close");
                closes
            }),
        }
        .unwrap_or_default();

        let points = self
            .timestamp
            .iter()
            .zip(prices)
            .filter_map(|(timestamp, price)| {
                let date = trading_date(*timestamp, offset)?;
                Some(PricePoint { date, price: price? })
            })
            .filter(|point| range.contains(point.date) && point.price.is_finite());
        PriceSeries::new(symbol, field, points)
    }
}

/// Bar timestamps are UTC; the exchange offset turns them into the local trading date.
fn trading_date(timestamp: i64, gmtoffset: i64) -> Option<NaiveDate> {
    Utc.timestamp_opt(timestamp + gmtoffset, 0)
        .single()
        .map(|datetime| datetime.date_naive())
}
