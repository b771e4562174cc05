use anyhow::Error;
use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, error, info, warn};

use domain_model::{DateRange, Instrument, DATE_FORMAT};
use viewer_chart_builder_api::{ChartBuilderApi, LineChart, Series};
use viewer_core_api::{ChartError, ChartImage, ChartPage, PageState, ViewerApi};
use viewer_quote_api::{QuoteApi, QuoteError};

pub struct ViewerSettings {
    pub instrument: Instrument,
    pub data_source: String,
    pub default_range_days: u64,
}

pub struct Viewer<Q: QuoteApi, C: ChartBuilderApi> {
    settings: ViewerSettings,
    quote_client: Q,
    chart_builder: C,
}

impl<Q: QuoteApi, C: ChartBuilderApi> Viewer<Q, C> {
    pub fn new(settings: ViewerSettings, quote_client: Q, chart_builder: C) -> Self {
        Self {
            settings,
            quote_client,
            chart_builder,
        }
    }

    fn page(&self, start_date: &str, end_date: &str, state: PageState) -> ChartPage {
        ChartPage {
            instrument: self.settings.instrument.clone(),
            data_source: self.settings.data_source.clone(),
            start_date: start_date.to_string(),
            end_date: end_date.to_string(),
            state,
        }
    }

    async fn build_chart(&self, start_date: &str, end_date: &str) -> Result<ChartImage, ChartError> {
        let range = DateRange::parse(start_date, end_date)?;
        let instrument = &self.settings.instrument;
        let series = self
            .quote_client
            .get_price_series(&instrument.symbol, &range)
            .await
            .map_err(classify_quote_error)?;
        if series.is_empty() {
            return Err(ChartError::NoData);
        }
        debug!("Building chart for '{}' with {} points", instrument.symbol, series.len());

        let chart = LineChart {
            title: format!("{instrument} price ({} to {})", range.start(), range.end()),
            x_label: "Date".to_string(),
            y_label: format!("Price ({})", instrument.currency),
            series: Series::from(&series),
        };
        let png = self
            .chart_builder
            .build(chart)
            .await
            .map_err(|err| ChartError::UpstreamFailure(format!("{err:#}")))?;
        Ok(ChartImage::new(png))
    }
}

#[async_trait]
impl<Q: QuoteApi, C: ChartBuilderApi> ViewerApi for Viewer<Q, C> {
    fn form_page(&self) -> ChartPage {
        let today = Utc::now().date_naive();
        let range = DateRange::last_days(today, self.settings.default_range_days);
        self.page(
            &range.start().format(DATE_FORMAT).to_string(),
            &range.end().format(DATE_FORMAT).to_string(),
            PageState::AwaitingInput,
        )
    }

    async fn chart_page(&self, start_date: &str, end_date: &str) -> ChartPage {
        debug!("Chart requested for dates: '{start_date}' - '{end_date}'");
        let state = match self.build_chart(start_date, end_date).await {
            Ok(image) => {
                info!("Chart rendered for '{start_date}' - '{end_date}', {} bytes", image.png().len());
                PageState::Rendered(image)
            }
            Err(err) => {
                match &err {
                    ChartError::UpstreamFailure(_) => error!("Error during chart building: '{err}'"),
                    _ => warn!("Chart not built: '{err}'"),
                }
                PageState::Error(err)
            }
        };
        self.page(start_date, end_date, state)
    }
}

fn classify_quote_error(err: Error) -> ChartError {
    match err.downcast_ref::<QuoteError>() {
        Some(QuoteError::RateLimited) => ChartError::NoData,
        _ => ChartError::UpstreamFailure(format!("{err:#}")),
    }
}
