use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;

use domain_model::Instrument;
use viewer_config::CONFIG;
use viewer_core::{Viewer, ViewerSettings};
use viewer_plotters_builder::PlottersBuilder;
use viewer_quote_api_cache::QuoteApiCache;
use viewer_yahoo_quote_client::YahooQuoteClient;

pub async fn run() -> Result<()> {
    info!("▶ {} running...", CONFIG.application.name);
    let quote = &CONFIG.quote;
    let quote_client = YahooQuoteClient::new(
        &quote.url,
        quote.price_field,
        &quote.user_agent,
        Duration::from_secs(quote.timeout_secs),
    )?;
    let quote_client = QuoteApiCache::new(
        Arc::new(quote_client),
        CONFIG.cache.capacity,
        Duration::from_secs(CONFIG.cache.time_to_idle_secs),
    );
    let chart_builder = PlottersBuilder::new(CONFIG.chart.width, CONFIG.chart.height);
    let viewer = Viewer::new(settings(), quote_client, chart_builder);
    viewer_rest_api_server::run(CONFIG.application.port, viewer).await
}

fn settings() -> ViewerSettings {
    let quote = &CONFIG.quote;
    ViewerSettings {
        instrument: Instrument::new(&quote.symbol, &quote.name, &quote.currency),
        data_source: quote.source.clone(),
        default_range_days: quote.default_range_days,
    }
}
