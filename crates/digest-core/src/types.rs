use serde::Serialize;
use std::collections::BTreeMap;

/// A metric the upstream source may report as a number, as a descriptive
/// unavailability string, or not at all. Zero is a legitimate value and
/// never stands in for a missing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Value(f64),
    Unavailable(String),
    #[default]
    Absent,
}

impl MetricValue {
    /// Numeric alternative, if that is what the source reported.
    pub fn value(&self) -> Option<f64> {
        match self {
            MetricValue::Value(v) => Some(*v),
            MetricValue::Unavailable(_) | MetricValue::Absent => None,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, MetricValue::Absent)
    }
}

/// One year of historical income-statement trends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendYear {
    pub year: String,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub gross_margin: Option<f64>,
    pub profit_margin: Option<f64>,
}

/// One year of cash-flow components.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashFlowYear {
    pub year: String,
    pub operating: Option<f64>,
    pub investing: Option<f64>,
    pub financing: Option<f64>,
}

/// Industry peer carrying the same scalar metrics as the focal company.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competitor {
    pub symbol: String,
    pub company: String,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub gross_margins: Option<f64>,
    pub profit_margins: Option<f64>,
    pub market_cap: Option<f64>,
}

/// Revenue-based market-share percentages. `competitors` is positionally
/// aligned with the digest's competitor list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketShare {
    pub company: f64,
    pub competitors: Vec<f64>,
}

/// Projected revenue/net-income pair for one year label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastEntry {
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
}

/// Headline from the upstream news feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub publisher: Option<String>,
}

/// Per-metric explanatory strings attached to each metric's display.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricComments {
    pub revenue: Option<String>,
    pub net_income: Option<String>,
    pub gross_margins: Option<String>,
    pub profit_margins: Option<String>,
    pub pe_ratio: Option<String>,
    pub pb_ratio: Option<String>,
    pub cash_flow: Option<String>,
}

/// Validated financial digest for one company, as produced by one analysis
/// request. Identity fields are guaranteed present; everything else is
/// optional. Parallel wire arrays have already been zipped into composite
/// per-year and per-entity records, so index alignment cannot be lost.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinancialDigest {
    pub company: String,
    pub symbol: String,
    pub sector: Option<String>,
    pub industry: Option<String>,

    pub market_cap: Option<f64>,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub gross_margins: MetricValue,
    pub profit_margins: MetricValue,
    pub net_margin: MetricValue,
    pub pe_ratio: MetricValue,
    pub pb_ratio: MetricValue,

    pub insight: Option<String>,
    pub graph_inference: Option<String>,
    pub market_insights: Option<String>,
    pub qualitative_factors: Option<String>,
    pub company_segregation: Option<String>,
    pub current_investments: Option<String>,
    pub future_investments: Option<String>,
    pub future_demands: Option<String>,
    pub financial_health: Option<String>,

    pub comments: MetricComments,
    pub historical_trends: Vec<TrendYear>,
    pub cash_flow: Vec<CashFlowYear>,
    pub competitors: Vec<Competitor>,
    pub market_share: Option<MarketShare>,
    /// Keyed by year label; BTreeMap iteration gives chronological order,
    /// so upstream key order is never observable.
    pub forecast: BTreeMap<String, ForecastEntry>,
    pub news: Vec<NewsItem>,
}
