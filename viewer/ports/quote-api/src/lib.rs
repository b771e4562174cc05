use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use domain_model::{DateRange, PriceSeries};

#[async_trait]
pub trait QuoteApi: Send + Sync + 'static {
    /// Daily prices of `symbol` for every trading day inside `range`.
    /// A range without trading days yields an empty series, not an error.
    async fn get_price_series(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries>;
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("Rate limited by quote provider")]
    RateLimited,

    #[error("Quote provider error '{code}': {description}")]
    Provider { code: String, description: String },

    #[error("Cannot deserialize response from {0}")]
    CannotDeserializeResponse(String),
}
