use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde_json::from_str;
use serde_urlencoded::to_string;
use tracing::{debug, error, trace, warn};

use domain_model::{DateRange, PriceField, PriceSeries};
use viewer_quote_api::{QuoteApi, QuoteError};

use crate::models::{ChartEnvelope, ChartQuery};

const CHART_ENDPOINT: &str = "/v8/finance/chart/";

/// Daily prices from the Yahoo Finance chart API.
pub struct YahooQuoteClient {
    url: String,
    client: Client,
    price_field: PriceField,
}

impl YahooQuoteClient {
    pub fn new(url: &str, price_field: PriceField, user_agent: &str, timeout: Duration) -> Result<Self> {
        let mut url = String::from(url.trim_end_matches('/'));
        if !url.starts_with("http") {
            url = format!("https://{url}");
        }
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            url,
            client,
            price_field,
        })
    }

    fn chart_url(&self, symbol: &str, range: &DateRange) -> Result<Url> {
        let endpoint = format!("{}{}{}", self.url, CHART_ENDPOINT, symbol);
        let mut url = Url::parse(&endpoint)?;
        url.set_query(Some(&to_string(ChartQuery::daily(range))?));
        Ok(url)
    }
}

#[async_trait]
impl QuoteApi for YahooQuoteClient {
    async fn get_price_series(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries> {
        let url = self.chart_url(symbol, range)?;
        trace!("Request url: {url:?}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let payload = response.text().await?;
        trace!("Response: {status}, {payload}");
        let series = parse_response(status, payload, symbol, range, self.price_field)?;
        debug!("Received {} daily prices for '{symbol}'", series.len());
        Ok(series)
    }
}

fn parse_response(
    status: StatusCode,
    payload: String,
    symbol: &str,
    range: &DateRange,
    price_field: PriceField,
) -> Result<PriceSeries> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        warn!("Quote provider rate limit hit for '{symbol}'");
        bail!(QuoteError::RateLimited);
    }
    let envelope = match from_str::<ChartEnvelope>(&payload) {
        Ok(envelope) => envelope,
        Err(err) => {
            error!("Cannot deserialize response from {payload}: {err}");
            bail!(QuoteError::CannotDeserializeResponse(payload))
        }
    };
    if let Some(err) = envelope.chart.error {
        if err.is_missing_data() {
            debug!("No data for '{symbol}' in {range:?}: {}", err.description);
            return Ok(PriceSeries::empty(symbol, price_field));
        }
        bail!(QuoteError::Provider {
            code: err.code,
            description: err.description,
        });
    }
    Ok(envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .map(|result| result.into_price_series(symbol, range, price_field))
        .unwrap_or_else(|| PriceSeries::empty(symbol, price_field)))
}
