use std::fs;
use std::ops::Range;
use std::path::Path;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use plotters::prelude::*;
use tracing::trace;

use viewer_chart_builder_api::{ChartBuilderApi, Coord, LineChart};

/// Renders line charts to PNG with the plotters bitmap backend.
pub struct PlottersBuilder {
    width: u32,
    height: u32,
}

impl PlottersBuilder {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[async_trait]
impl ChartBuilderApi for PlottersBuilder {
    async fn build(&self, chart: LineChart) -> Result<Vec<u8>> {
        let size = (self.width, self.height);
        tokio::task::spawn_blocking(move || render_png(&chart, size)).await?
    }
}

fn render_png(chart: &LineChart, size: (u32, u32)) -> Result<Vec<u8>> {
    if chart.series.data.is_empty() {
        bail!("Nothing to draw, series '{}' is empty", chart.series.label);
    }
    let file = tempfile::Builder::new()
        .prefix("viewer-chart-")
        .suffix(".png")
        .tempfile()?;
    draw(chart, file.path(), size)?;
    let image = fs::read(file.path())?;
    trace!("Chart '{}' rendered, {} bytes", chart.title, image.len());
    Ok(image)
}

fn draw(chart: &LineChart, path: &Path, size: (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| anyhow!("Failed to fill canvas: {e}"))?;

    let data = &chart.series.data;
    let mut context = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 28).into_font())
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(time_bounds(data), price_bounds(data))
        .map_err(|e| anyhow!("Failed to build chart: {e}"))?;

    context
        .configure_mesh()
        .x_desc(chart.x_label.as_str())
        .y_desc(chart.y_label.as_str())
        .x_labels(8)
        .x_label_formatter(&|x: &DateTime<Utc>| x.format("%Y-%m-%d").to_string())
        .y_label_formatter(&|y: &f64| format!("{y:.2}"))
        .draw()
        .map_err(|e| anyhow!("Failed to draw mesh: {e}"))?;

    context
        .draw_series(LineSeries::new(
            data.iter().map(|coord| (at_midnight(coord.x), coord.y)),
            BLUE.stroke_width(2),
        ))
        .map_err(|e| anyhow!("Failed to draw series: {e}"))?
        .label(chart.series.label.as_str())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE.stroke_width(2)));

    context
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| anyhow!("Failed to draw legend: {e}"))?;

    root.present()
        .map_err(|e| anyhow!("Failed to render chart: {e}"))?;
    Ok(())
}

fn at_midnight(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
}

/// X range of the data, widened by half a day on each side so single points stay visible.
fn time_bounds(data: &[Coord]) -> Range<DateTime<Utc>> {
    let first = data.iter().map(|coord| coord.x).min().unwrap_or_default();
    let last = data.iter().map(|coord| coord.x).max().unwrap_or_default();
    let padding = Duration::hours(12);
    at_midnight(first) - padding..at_midnight(last) + padding
}

/// Y range of the data with 10% padding, never below zero.
fn price_bounds(data: &[Coord]) -> Range<f64> {
    let min = data.iter().map(|coord| coord.y).fold(f64::INFINITY, f64::min);
    let max = data.iter().map(|coord| coord.y).fold(f64::NEG_INFINITY, f64::max);
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    let padding = (max - min).max(max.abs() * 0.01).max(1e-8) * 0.1;
    (min - padding).max(0.0)..max + padding
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(day: u32, price: f64) -> Coord {
        Coord::from((NaiveDate::from_ymd_opt(2024, 1, day).unwrap(), price))
    }

    #[test]
    fn test_price_bounds_are_padded() {
        let range = price_bounds(&[coord(2, 500.0), coord(3, 600.0)]);
        assert_eq!(range, 490.0..610.0);
    }

    #[test]
    fn test_flat_price_bounds_are_not_empty() {
        let range = price_bounds(&[coord(2, 580.0), coord(3, 580.0)]);
        assert!(range.start < 580.0);
        assert!(range.end > 580.0);
    }

    #[test]
    fn test_price_bounds_never_negative() {
        let range = price_bounds(&[coord(2, 0.5), coord(3, 10.0)]);
        assert_eq!(range.start, 0.0);
    }

    #[test]
    fn test_single_point_time_bounds() {
        let range = time_bounds(&[coord(5, 580.0)]);
        assert_eq!(range.end - range.start, Duration::hours(24));
        assert!(range.start < at_midnight(coord(5, 0.0).x));
    }

    #[test]
    fn test_time_bounds_follow_first_and_last_date() {
        let range = time_bounds(&[coord(9, 1.0), coord(2, 2.0), coord(5, 3.0)]);
        assert_eq!(range.start, at_midnight(coord(2, 0.0).x) - Duration::hours(12));
        assert_eq!(range.end, at_midnight(coord(9, 0.0).x) + Duration::hours(12));
    }

    #[tokio::test]
    async fn test_empty_series_is_rejected() {
        let chart = LineChart {
            title: "empty".to_string(),
            x_label: "Date".to_string(),
            y_label: "Price".to_string(),
            series: viewer_chart_builder_api::Series::new("Close", Vec::new()),
        };
        assert!(PlottersBuilder::new(200, 100).build(chart).await.is_err());
    }

    const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";

    fn chart(data: Vec<Coord>) -> LineChart {
        LineChart {
            title: "TSMC (2330.TW) price (2024-01-01 to 2024-01-31)".to_string(),
            x_label: "Date".to_string(),
            y_label: "Price (TWD)".to_string(),
            series: viewer_chart_builder_api::Series::new("Adjusted close", data),
        }
    }

    #[tokio::test]
    async fn test_chart_is_rendered_as_png() {
        let data = (2..22).map(|day| coord(day, 560.0 + f64::from(day))).collect();
        let image = PlottersBuilder::new(1200, 600).build(chart(data)).await.unwrap();
        assert!(image.starts_with(PNG_SIGNATURE));
    }

    #[tokio::test]
    async fn test_single_point_is_rendered() {
        let image = PlottersBuilder::new(400, 200).build(chart(vec![coord(5, 580.0)])).await.unwrap();
        assert!(image.starts_with(PNG_SIGNATURE));
    }
}
