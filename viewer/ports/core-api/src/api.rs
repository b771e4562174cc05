use async_trait::async_trait;

use crate::ChartPage;

#[async_trait]
pub trait ViewerApi: Send + Sync + 'static {
    /// Empty form prefilled with the default date range.
    fn form_page(&self) -> ChartPage;

    /// Chart for the submitted dates, or the error explaining why there is none.
    async fn chart_page(&self, start_date: &str, end_date: &str) -> ChartPage;
}
