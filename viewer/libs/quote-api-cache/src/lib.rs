use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use moka::future::Cache;
use tracing::debug;

use domain_model::{DateRange, PriceSeries};
use viewer_quote_api::QuoteApi;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl SeriesKey {
    pub fn new(symbol: &str, range: &DateRange) -> Self {
        Self {
            symbol: symbol.to_string(),
            start: range.start(),
            end: range.end(),
        }
    }
}

/// Bounded in-memory cache in front of a [`QuoteApi`].
///
/// Only successful, non-empty series are stored. Concurrent misses for the same key
/// are not coalesced, each of them reaches the wrapped client and the last insert wins.
pub struct QuoteApiCache<Q: QuoteApi> {
    client: Arc<Q>,
    series_cache: Cache<SeriesKey, PriceSeries>,
}

impl<Q: QuoteApi> QuoteApiCache<Q> {
    /// `time_to_idle` of zero keeps entries until they are evicted by capacity.
    pub fn new(client: Arc<Q>, capacity: u64, time_to_idle: Duration) -> Self {
        let mut builder = Cache::builder().max_capacity(capacity);
        if !time_to_idle.is_zero() {
            builder = builder.time_to_idle(time_to_idle);
        }
        Self {
            client,
            series_cache: builder.build(),
        }
    }

    pub fn entry_count(&self) -> u64 {
        self.series_cache.entry_count()
    }
}

#[async_trait]
impl<Q: QuoteApi> QuoteApi for QuoteApiCache<Q> {
    async fn get_price_series(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries> {
        let key = SeriesKey::new(symbol, range);
        if let Some(value) = self.series_cache.get(&key).await {
            debug!("Price series cache hit for: '{key:?}'");
            Ok(value)
        } else {
            debug!("Price series cache miss for: '{key:?}'");
            let result = self.client.get_price_series(symbol, range).await;
            if let Ok(series) = &result {
                if !series.is_empty() {
                    self.series_cache.insert(key, series.clone()).await;
                }
            }
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use anyhow::bail;
    use chrono::Days;

    use domain_model::{PriceField, PricePoint};

    use super::*;

    const SYMBOL: &str = "2330.TW";

    enum Reply {
        Points,
        Empty,
        Failure,
    }

    struct CountingQuoteApi {
        calls: AtomicUsize,
        reply: Reply,
    }

    impl CountingQuoteApi {
        fn new(reply: Reply) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                reply,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl QuoteApi for CountingQuoteApi {
        async fn get_price_series(&self, symbol: &str, range: &DateRange) -> Result<PriceSeries> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Points => {
                    let points = (0..3).map(|offset| PricePoint {
                        date: range.start() + Days::new(offset),
                        price: 580.0 + offset as f64,
                    });
                    Ok(PriceSeries::new(symbol, PriceField::AdjClose, points))
                }
                Reply::Empty => Ok(PriceSeries::empty(symbol, PriceField::AdjClose)),
                Reply::Failure => bail!("connection reset"),
            }
        }
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::parse(start, end).unwrap()
    }

    #[tokio::test]
    async fn test_repeated_query_is_served_from_cache() {
        let client = CountingQuoteApi::new(Reply::Points);
        let cache = QuoteApiCache::new(Arc::clone(&client), 16, Duration::ZERO);
        let range = range("2024-01-01", "2024-01-31");

        let first = cache.get_price_series(SYMBOL, &range).await.unwrap();
        let second = cache.get_price_series(SYMBOL, &range).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.len(), 3);
        assert_eq!(client.calls(), 1);
    }

    #[tokio::test]
    async fn test_different_ranges_use_different_keys() {
        let client = CountingQuoteApi::new(Reply::Points);
        let cache = QuoteApiCache::new(Arc::clone(&client), 16, Duration::ZERO);

        cache.get_price_series(SYMBOL, &range("2024-01-01", "2024-01-31")).await.unwrap();
        cache.get_price_series(SYMBOL, &range("2024-01-01", "2024-02-01")).await.unwrap();
        cache.get_price_series("2303.TW", &range("2024-01-01", "2024-01-31")).await.unwrap();

        assert_eq!(client.calls(), 3);
    }

    #[tokio::test]
    async fn test_empty_series_is_not_cached() {
        let client = CountingQuoteApi::new(Reply::Empty);
        let cache = QuoteApiCache::new(Arc::clone(&client), 16, Duration::ZERO);
        let range = range("2024-01-06", "2024-01-07");

        assert!(cache.get_price_series(SYMBOL, &range).await.unwrap().is_empty());
        assert!(cache.get_price_series(SYMBOL, &range).await.unwrap().is_empty());
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_failure_is_not_cached() {
        let client = CountingQuoteApi::new(Reply::Failure);
        let cache = QuoteApiCache::new(Arc::clone(&client), 16, Duration::ZERO);
        let range = range("2024-01-01", "2024-01-31");

        assert!(cache.get_price_series(SYMBOL, &range).await.is_err());
        assert!(cache.get_price_series(SYMBOL, &range).await.is_err());
        assert_eq!(client.calls(), 2);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let client = CountingQuoteApi::new(Reply::Points);
        let cache = QuoteApiCache::new(Arc::clone(&client), 4, Duration::from_secs(3600));
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        for offset in 0..32 {
            let end = start + Days::new(offset);
            let range = DateRange::new(start, end).unwrap();
            cache.get_price_series(SYMBOL, &range).await.unwrap();
        }
        cache.series_cache.run_pending_tasks().await;

        assert_eq!(client.calls(), 32);
        assert!(cache.entry_count() <= 4);
    }
}
