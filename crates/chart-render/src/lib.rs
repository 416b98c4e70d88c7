//! Rasterize a report view from normalized chart series.
//!
//! Renders each available chart (historical trends, cash flow, market
//! share, forecast) into a fixed-width panel and stacks the panels into
//! one tall RGB image, the raster the snapshot export composes into a
//! paginated document. Panels draw no text, so rendering never depends on
//! system font lookup.

use anyhow::Result;
use plotters::prelude::*;

use digest_core::FinancialDigest;
use report_export::{CapturedImage, ViewCapture};
use report_view::{
    cash_flow_series, forecast_series, market_share_series, net_income_trend, revenue_trend,
    ForecastPoint, ReportConfig, SharePoint, TrendPoint,
};

const REPORT_WIDTH: u32 = 1240;
const PANEL_HEIGHT: u32 = 360;
const PANEL_GAP: u32 = 16;

// Series palette, matching the report theme.
const REVENUE_BLUE: RGBColor = RGBColor(59, 130, 246);
const INCOME_GREEN: RGBColor = RGBColor(16, 185, 129);
const OPERATING_GOLD: RGBColor = RGBColor(250, 204, 21);
const FINANCING_INDIGO: RGBColor = RGBColor(99, 102, 241);
const SHARE_PURPLE: RGBColor = RGBColor(168, 85, 247);

/// The currently rendered report view. Implements the capture capability
/// consumed by the snapshot export; a render failure degrades to "no view"
/// rather than aborting the export flow.
pub struct RenderedView<'a> {
    digest: &'a FinancialDigest,
    cfg: ReportConfig,
}

impl<'a> RenderedView<'a> {
    pub fn new(digest: &'a FinancialDigest, cfg: ReportConfig) -> Self {
        Self { digest, cfg }
    }
}

impl ViewCapture for RenderedView<'_> {
    fn capture(&self) -> Option<CapturedImage> {
        match render_report(self.digest, &self.cfg) {
            Ok(image) => Some(image),
            Err(e) => {
                tracing::warn!("report render failed: {e}");
                None
            }
        }
    }
}

/// Render the full report raster: one stacked panel per available chart.
/// Deterministic for a given digest and config.
pub fn render_report(digest: &FinancialDigest, cfg: &ReportConfig) -> Result<CapturedImage> {
    let mut panels: Vec<Vec<u8>> = Vec::new();

    if !digest.historical_trends.is_empty() {
        let revenue = revenue_trend(digest, cfg);
        let net_income = net_income_trend(digest, cfg);
        panels.push(line_panel(&[
            (&revenue, REVENUE_BLUE),
            (&net_income, INCOME_GREEN),
        ])?);
    }

    if !digest.cash_flow.is_empty() {
        let cash = cash_flow_series(digest, cfg);
        panels.push(line_panel(&[
            (&cash.operating, OPERATING_GOLD),
            (&cash.investing, INCOME_GREEN),
            (&cash.financing, FINANCING_INDIGO),
        ])?);
    }

    if let Some(shares) = market_share_series(digest) {
        if !shares.points.is_empty() {
            panels.push(share_panel(&shares.points)?);
        }
    }

    let forecast = forecast_series(digest, cfg);
    if !forecast.is_empty() {
        panels.push(forecast_panel(&forecast)?);
    }

    // metric cards only; the view is still mounted
    if panels.is_empty() {
        panels.push(blank_panel());
    }

    Ok(stack_panels(&panels))
}

fn chart_err<E: std::fmt::Display>(e: E) -> anyhow::Error {
    anyhow::anyhow!("chart render: {e}")
}

fn panel_buffer() -> Vec<u8> {
    vec![255u8; (REPORT_WIDTH * PANEL_HEIGHT * 3) as usize]
}

fn blank_panel() -> Vec<u8> {
    panel_buffer()
}

/// Value range over every point of every series, padded so lines never sit
/// on the panel edge.
fn value_range<'a>(series: impl Iterator<Item = &'a TrendPoint>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for p in series {
        lo = lo.min(p.value);
        hi = hi.max(p.value);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-9);
    (lo - pad, hi + pad)
}

fn line_panel(series_set: &[(&Vec<TrendPoint>, RGBColor)]) -> Result<Vec<u8>> {
    let mut buf = panel_buffer();
    let n = series_set.iter().map(|(s, _)| s.len()).max().unwrap_or(0);
    if n == 0 {
        return Ok(buf);
    }
    {
        let root =
            BitMapBackend::with_buffer(&mut buf, (REPORT_WIDTH, PANEL_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let (lo, hi) = value_range(series_set.iter().flat_map(|(s, _)| s.iter()));
        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), lo..hi)
            .map_err(chart_err)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .max_light_lines(4)
            .draw()
            .map_err(chart_err)?;

        for (points, color) in series_set {
            chart
                .draw_series(LineSeries::new(
                    points.iter().enumerate().map(|(i, p)| (i as f64, p.value)),
                    color.stroke_width(2),
                ))
                .map_err(chart_err)?;
        }
        root.present().map_err(chart_err)?;
    }
    Ok(buf)
}

fn share_panel(points: &[SharePoint]) -> Result<Vec<u8>> {
    let mut buf = panel_buffer();
    {
        let root =
            BitMapBackend::with_buffer(&mut buf, (REPORT_WIDTH, PANEL_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let n = points.len();
        let top = points.iter().fold(0.0f64, |m, p| m.max(p.share)).max(1e-9);
        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0.0..top * 1.1)
            .map_err(chart_err)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .max_light_lines(4)
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(points.iter().enumerate().map(|(i, p)| {
                Rectangle::new(
                    [(i as f64 - 0.35, 0.0), (i as f64 + 0.35, p.share)],
                    SHARE_PURPLE.filled(),
                )
            }))
            .map_err(chart_err)?;
        root.present().map_err(chart_err)?;
    }
    Ok(buf)
}

fn forecast_panel(points: &[ForecastPoint]) -> Result<Vec<u8>> {
    let mut buf = panel_buffer();
    {
        let root =
            BitMapBackend::with_buffer(&mut buf, (REPORT_WIDTH, PANEL_HEIGHT)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;

        let n = points.len();
        let mut lo = 0.0f64;
        let mut hi = 0.0f64;
        for p in points {
            for v in [p.revenue, p.net_income].into_iter().flatten() {
                lo = lo.min(v);
                hi = hi.max(v);
            }
        }
        let pad = ((hi - lo) * 0.05).max(1e-9);
        let mut chart = ChartBuilder::on(&root)
            .margin(12)
            .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), (lo - pad)..(hi + pad))
            .map_err(chart_err)?;
        chart
            .configure_mesh()
            .disable_x_mesh()
            .max_light_lines(4)
            .draw()
            .map_err(chart_err)?;

        // paired bars per year: revenue left, net income right
        chart
            .draw_series(points.iter().enumerate().flat_map(|(i, p)| {
                let x = i as f64;
                let mut bars = Vec::new();
                if let Some(v) = p.revenue {
                    bars.push(Rectangle::new(
                        [(x - 0.35, 0.0), (x - 0.03, v)],
                        REVENUE_BLUE.filled(),
                    ));
                }
                if let Some(v) = p.net_income {
                    bars.push(Rectangle::new(
                        [(x + 0.03, 0.0), (x + 0.35, v)],
                        INCOME_GREEN.filled(),
                    ));
                }
                bars
            }))
            .map_err(chart_err)?;
        root.present().map_err(chart_err)?;
    }
    Ok(buf)
}

fn stack_panels(panels: &[Vec<u8>]) -> CapturedImage {
    let width = REPORT_WIDTH;
    let count = panels.len() as u32;
    let height = count * PANEL_HEIGHT + count.saturating_sub(1) * PANEL_GAP;
    let row_bytes = (width * 3) as usize;

    let mut rgb = vec![255u8; (width * height * 3) as usize];
    let mut y = 0usize;
    for panel in panels {
        let start = y * row_bytes;
        rgb[start..start + panel.len()].copy_from_slice(panel);
        y += (PANEL_HEIGHT + PANEL_GAP) as usize;
    }

    CapturedImage { width, height, rgb }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_core::validate_digest;
    use serde_json::json;

    fn full_digest() -> FinancialDigest {
        validate_digest(&json!({
            "company": "Acme", "symbol": "ACME",
            "historicalTrends": {
                "years": ["2021", "2022", "2023"],
                "revenue": [53.8e9, 81.5e9, 96.8e9],
                "netIncome": [5.5e9, 12.6e9, 15.0e9],
                "grossMargins": [0.25, 0.26, 0.18],
                "profitMargins": [0.10, 0.15, 0.15]
            },
            "cashFlow": {
                "years": ["2022", "2023"],
                "operating": [14.7e9, 13.3e9],
                "investing": [-12.0e9, -15.6e9],
                "financing": [-3.5e9, 2.6e9]
            },
            "industryInsights": { "competitors": [
                { "symbol": "BETA", "company": "Beta Auto", "revenue": 158e9,
                  "netIncome": 10e9, "grossMargins": 0.17, "profitMargins": 0.063,
                  "marketCap": 48e9 }
            ]},
            "marketShare": { "company": 38.0, "competitors": [62.0] },
            "forecast": { "2024": { "revenue": 114.9e9, "netIncome": 17.9e9 } }
        }))
        .unwrap()
        .digest
    }

    #[test]
    fn test_render_stacks_all_panels() {
        let digest = full_digest();
        let image = render_report(&digest, &ReportConfig::default()).unwrap();
        assert_eq!(image.width, REPORT_WIDTH);
        // trends + cash flow + market share + forecast
        assert_eq!(image.height, 4 * PANEL_HEIGHT + 3 * PANEL_GAP);
        assert_eq!(image.rgb.len(), (image.width * image.height * 3) as usize);
    }

    #[test]
    fn test_render_without_charts_still_mounts_view() {
        let digest = validate_digest(&json!({ "company": "Acme", "symbol": "ACME" }))
            .unwrap()
            .digest;
        let image = render_report(&digest, &ReportConfig::default()).unwrap();
        assert_eq!(image.height, PANEL_HEIGHT);
    }

    #[test]
    fn test_render_is_deterministic() {
        let digest = full_digest();
        let cfg = ReportConfig::default();
        let a = render_report(&digest, &cfg).unwrap();
        let b = render_report(&digest, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rendered_view_captures() {
        let digest = full_digest();
        let view = RenderedView::new(&digest, ReportConfig::default());
        assert!(view.capture().is_some());
    }
}
