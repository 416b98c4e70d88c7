//! Derived-series normalizer: chart-ready point sequences computed from a
//! validated digest. Pure and deterministic; the digest is never mutated.

use digest_core::{DataIntegrityWarning, FinancialDigest};
use serde::Serialize;

use crate::config::ReportConfig;

/// One year-indexed chart point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendPoint {
    pub year: String,
    pub value: f64,
}

/// The three cash-flow component series, sharing year labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowSeries {
    pub operating: Vec<TrendPoint>,
    pub investing: Vec<TrendPoint>,
    pub financing: Vec<TrendPoint>,
}

/// One forecast chart point, scaled, in year-label order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub year: String,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
}

/// One row of the entity comparison: focal company or competitor, with
/// currency fields scaled and margins expressed as percent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityMetrics {
    pub company: String,
    pub symbol: String,
    pub focal: bool,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub gross_margin: Option<f64>,
    pub profit_margin: Option<f64>,
    pub market_cap: Option<f64>,
}

/// Positional market-share chart series, focal entry first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharePoint {
    pub name: String,
    pub share: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketShareSeries {
    pub points: Vec<SharePoint>,
    /// Set when the share list and competitor list lengths disagree and the
    /// series was truncated to the shorter of the two.
    pub warning: Option<DataIntegrityWarning>,
}

/// Historical revenue, scaled to billions for display.
pub fn revenue_trend(digest: &FinancialDigest, cfg: &ReportConfig) -> Vec<TrendPoint> {
    digest
        .historical_trends
        .iter()
        .filter_map(|row| {
            Some(TrendPoint {
                year: row.year.clone(),
                value: row.revenue? / cfg.currency_scale,
            })
        })
        .collect()
}

/// Historical net income, scaled to billions for display.
pub fn net_income_trend(digest: &FinancialDigest, cfg: &ReportConfig) -> Vec<TrendPoint> {
    digest
        .historical_trends
        .iter()
        .filter_map(|row| {
            Some(TrendPoint {
                year: row.year.clone(),
                value: row.net_income? / cfg.currency_scale,
            })
        })
        .collect()
}

/// Gross-margin ratio series, unscaled pass-through.
pub fn gross_margin_trend(digest: &FinancialDigest) -> Vec<TrendPoint> {
    digest
        .historical_trends
        .iter()
        .filter_map(|row| {
            Some(TrendPoint {
                year: row.year.clone(),
                value: row.gross_margin?,
            })
        })
        .collect()
}

/// Profit-margin ratio series, unscaled pass-through.
pub fn profit_margin_trend(digest: &FinancialDigest) -> Vec<TrendPoint> {
    digest
        .historical_trends
        .iter()
        .filter_map(|row| {
            Some(TrendPoint {
                year: row.year.clone(),
                value: row.profit_margin?,
            })
        })
        .collect()
}

/// Operating/investing/financing cash-flow series, scaled.
pub fn cash_flow_series(digest: &FinancialDigest, cfg: &ReportConfig) -> CashFlowSeries {
    let component = |select: fn(&digest_core::CashFlowYear) -> Option<f64>| {
        digest
            .cash_flow
            .iter()
            .filter_map(|row| {
                Some(TrendPoint {
                    year: row.year.clone(),
                    value: select(row)? / cfg.currency_scale,
                })
            })
            .collect()
    };
    CashFlowSeries {
        operating: component(|r| r.operating),
        investing: component(|r| r.investing),
        financing: component(|r| r.financing),
    }
}

/// Forecast points in year-label order (the digest map already iterates
/// sorted), scaled.
pub fn forecast_series(digest: &FinancialDigest, cfg: &ReportConfig) -> Vec<ForecastPoint> {
    digest
        .forecast
        .iter()
        .map(|(year, entry)| ForecastPoint {
            year: year.clone(),
            revenue: entry.revenue.map(|v| v / cfg.currency_scale),
            net_income: entry.net_income.map(|v| v / cfg.currency_scale),
        })
        .collect()
}

/// Entity comparison rows: focal company first, then competitors in source
/// order. Never sorted or filtered.
pub fn comparison_rows(digest: &FinancialDigest, cfg: &ReportConfig) -> Vec<EntityMetrics> {
    let scale = cfg.currency_scale;
    let mut rows = vec![EntityMetrics {
        company: digest.company.clone(),
        symbol: digest.symbol.clone(),
        focal: true,
        revenue: digest.revenue.map(|v| v / scale),
        net_income: digest.net_income.map(|v| v / scale),
        gross_margin: digest.gross_margins.value().map(|v| v * 100.0),
        profit_margin: digest.profit_margins.value().map(|v| v * 100.0),
        market_cap: digest.market_cap.map(|v| v / scale),
    }];
    rows.extend(digest.competitors.iter().map(|c| EntityMetrics {
        company: c.company.clone(),
        symbol: c.symbol.clone(),
        focal: false,
        revenue: c.revenue.map(|v| v / scale),
        net_income: c.net_income.map(|v| v / scale),
        gross_margin: c.gross_margins.map(|v| v * 100.0),
        profit_margin: c.profit_margins.map(|v| v * 100.0),
        market_cap: c.market_cap.map(|v| v / scale),
    }));
    rows
}

/// Market-share chart series. A length mismatch between shares and
/// competitors truncates to the shorter list and records a warning rather
/// than discarding the chart.
pub fn market_share_series(digest: &FinancialDigest) -> Option<MarketShareSeries> {
    let shares = digest.market_share.as_ref()?;
    let n = shares.competitors.len().min(digest.competitors.len());

    let warning = (shares.competitors.len() != digest.competitors.len()).then(|| {
        DataIntegrityWarning::new(
            "marketShare",
            format!(
                "{} share entries for {} competitors; truncated to {n}",
                shares.competitors.len(),
                digest.competitors.len()
            ),
        )
    });

    let mut points = vec![SharePoint {
        name: digest.company.clone(),
        share: shares.company,
    }];
    points.extend((0..n).map(|i| SharePoint {
        name: digest.competitors[i].company.clone(),
        share: shares.competitors[i],
    }));

    Some(MarketShareSeries { points, warning })
}
