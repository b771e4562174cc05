use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use axum::{Form, Router};
use tracing::{debug, info};

use viewer_core_api::ViewerApi;
use viewer_rest_api::endpoints::INDEX;
use viewer_rest_api::forms::DateRangeForm;

use crate::page;

pub async fn run(port: u16, viewer: impl ViewerApi) -> Result<()> {
    let address = SocketAddr::new(IpAddr::from([0, 0, 0, 0]), port);
    info!("Listening on: '{address}'");
    axum::Server::bind(&address)
        .serve(router(viewer).into_make_service())
        .await?;
    Ok(())
}

pub fn router(viewer: impl ViewerApi) -> Router {
    let viewer: Arc<dyn ViewerApi> = Arc::new(viewer);
    Router::new()
        .route(INDEX, get(get_chart_form).post(post_chart_form))
        .with_state(viewer)
}

async fn get_chart_form(State(viewer): State<Arc<dyn ViewerApi>>) -> Html<String> {
    Html(page::render(&viewer.form_page()))
}

async fn post_chart_form(
    State(viewer): State<Arc<dyn ViewerApi>>,
    Form(form): Form<DateRangeForm>,
) -> Html<String> {
    let chart_page = match form.dates() {
        Some((start_date, end_date)) => viewer.chart_page(start_date, end_date).await,
        None => {
            debug!("Incomplete form submitted: {form:?}");
            viewer.form_page()
        }
    };
    Html(page::render(&chart_page))
}
