//! Decode and re-encode the upstream analysis payload.
//!
//! The wire shape is loosely typed camelCase JSON with parallel arrays.
//! Validation is strict only about the identity fields; every other field
//! of the wrong declared type is treated as absent, never coerced. Parallel
//! year/value arrays are zipped into composite records here, at the
//! boundary, so downstream code never handles raw indices.

use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use crate::error::{DataIntegrityWarning, DigestError};
use crate::types::{
    CashFlowYear, Competitor, FinancialDigest, ForecastEntry, MarketShare, MetricComments,
    MetricValue, NewsItem, TrendYear,
};

/// Validation result: the digest plus any non-fatal shape warnings
/// discovered while zipping parallel arrays.
#[derive(Debug, Clone)]
pub struct ValidatedDigest {
    pub digest: FinancialDigest,
    pub warnings: Vec<DataIntegrityWarning>,
}

/// Validate an arbitrary decoded response payload into a typed digest.
///
/// Fails only when a structurally required identity field is missing; the
/// error names the first one found, checked in order `company`, `symbol`.
pub fn validate_digest(payload: &Value) -> Result<ValidatedDigest, DigestError> {
    let company = required_str(payload, "company")?;
    let symbol = required_str(payload, "symbol")?;

    let mut warnings = Vec::new();
    let historical_trends = parse_trends(payload.get("historicalTrends"), &mut warnings);
    let cash_flow = parse_cash_flow(payload.get("cashFlow"), &mut warnings);

    let digest = FinancialDigest {
        company,
        symbol,
        sector: opt_str(payload, "sector"),
        industry: opt_str(payload, "industry"),
        market_cap: opt_f64(payload, "marketCap"),
        revenue: opt_f64(payload, "revenue"),
        net_income: opt_f64(payload, "netIncome"),
        gross_margins: metric(payload, "grossMargins"),
        profit_margins: metric(payload, "profitMargins"),
        net_margin: metric(payload, "netMargin"),
        pe_ratio: metric(payload, "peRatio"),
        pb_ratio: metric(payload, "pbRatio"),
        insight: opt_str(payload, "insight"),
        graph_inference: opt_str(payload, "graphInference"),
        market_insights: opt_str(payload, "marketInsights"),
        qualitative_factors: opt_str(payload, "qualitativeFactors"),
        company_segregation: opt_str(payload, "companySegregation"),
        current_investments: opt_str(payload, "currentInvestments"),
        future_investments: opt_str(payload, "futureInvestments"),
        future_demands: opt_str(payload, "futureDemands"),
        financial_health: opt_str(payload, "financialHealth"),
        comments: parse_comments(payload.get("comments")),
        historical_trends,
        cash_flow,
        competitors: parse_competitors(payload.get("industryInsights")),
        market_share: parse_market_share(payload.get("marketShare")),
        forecast: parse_forecast(payload.get("forecast")),
        news: parse_news(payload.get("news")),
    };

    Ok(ValidatedDigest { digest, warnings })
}

fn required_str(v: &Value, key: &str) -> Result<String, DigestError> {
    match v.get(key).and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => Ok(s.to_string()),
        _ => Err(DigestError::MalformedDigest(key.to_string())),
    }
}

fn opt_str(v: &Value, key: &str) -> Option<String> {
    v.get(key).and_then(Value::as_str).map(str::to_string)
}

fn opt_f64(v: &Value, key: &str) -> Option<f64> {
    v.get(key).and_then(Value::as_f64)
}

/// Tri-state metric: number, descriptive unavailability string, or absent.
fn metric(v: &Value, key: &str) -> MetricValue {
    match v.get(key) {
        Some(Value::Number(n)) => match n.as_f64() {
            Some(x) => MetricValue::Value(x),
            None => MetricValue::Absent,
        },
        Some(Value::String(s)) => MetricValue::Unavailable(s.clone()),
        _ => MetricValue::Absent,
    }
}

/// Year labels arrive as strings; tolerate bare numbers.
fn year_label(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A value array of a parallel-array block. An array whose length differs
/// from the year-label count is recorded as a warning; a missing array is
/// just an absent series.
fn series<'a>(
    block: &'a Value,
    key: &str,
    n: usize,
    context: &str,
    warnings: &mut Vec<DataIntegrityWarning>,
) -> &'a [Value] {
    match block.get(key).and_then(Value::as_array) {
        Some(arr) => {
            if arr.len() != n {
                warnings.push(DataIntegrityWarning::new(
                    context,
                    format!("`{key}` has {} entries for {} year labels", arr.len(), n),
                ));
            }
            arr
        }
        None => &[],
    }
}

fn f64_at(arr: &[Value], i: usize) -> Option<f64> {
    arr.get(i).and_then(Value::as_f64)
}

fn parse_trends(
    block: Option<&Value>,
    warnings: &mut Vec<DataIntegrityWarning>,
) -> Vec<TrendYear> {
    let Some(block) = block else {
        return Vec::new();
    };
    let Some(years) = block.get("years").and_then(Value::as_array) else {
        return Vec::new();
    };

    let n = years.len();
    let revenue = series(block, "revenue", n, "historicalTrends", warnings);
    let net_income = series(block, "netIncome", n, "historicalTrends", warnings);
    let gross = series(block, "grossMargins", n, "historicalTrends", warnings);
    let profit = series(block, "profitMargins", n, "historicalTrends", warnings);

    years
        .iter()
        .enumerate()
        .filter_map(|(i, y)| {
            Some(TrendYear {
                year: year_label(y)?,
                revenue: f64_at(revenue, i),
                net_income: f64_at(net_income, i),
                gross_margin: f64_at(gross, i),
                profit_margin: f64_at(profit, i),
            })
        })
        .collect()
}

fn parse_cash_flow(
    block: Option<&Value>,
    warnings: &mut Vec<DataIntegrityWarning>,
) -> Vec<CashFlowYear> {
    let Some(block) = block else {
        return Vec::new();
    };
    let Some(years) = block.get("years").and_then(Value::as_array) else {
        return Vec::new();
    };

    let n = years.len();
    let operating = series(block, "operating", n, "cashFlow", warnings);
    let investing = series(block, "investing", n, "cashFlow", warnings);
    let financing = series(block, "financing", n, "cashFlow", warnings);

    years
        .iter()
        .enumerate()
        .filter_map(|(i, y)| {
            Some(CashFlowYear {
                year: year_label(y)?,
                operating: f64_at(operating, i),
                investing: f64_at(investing, i),
                financing: f64_at(financing, i),
            })
        })
        .collect()
}

fn parse_competitors(block: Option<&Value>) -> Vec<Competitor> {
    block
        .and_then(|b| b.get("competitors"))
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(parse_competitor).collect())
        .unwrap_or_default()
}

fn parse_competitor(v: &Value) -> Option<Competitor> {
    // symbol and company identify the row; a record without them is noise
    let symbol = v.get("symbol").and_then(Value::as_str)?.to_string();
    let company = v.get("company").and_then(Value::as_str)?.to_string();
    Some(Competitor {
        symbol,
        company,
        revenue: opt_f64(v, "revenue"),
        net_income: opt_f64(v, "netIncome"),
        gross_margins: opt_f64(v, "grossMargins"),
        profit_margins: opt_f64(v, "profitMargins"),
        market_cap: opt_f64(v, "marketCap"),
    })
}

fn parse_market_share(block: Option<&Value>) -> Option<MarketShare> {
    let block = block?;
    // A share chart is anchored on the focal entry; without a numeric focal
    // share the whole block is treated as absent.
    let company = block.get("company").and_then(Value::as_f64)?;
    let competitors = block
        .get("competitors")
        .and_then(Value::as_array)
        .map(|arr| arr.iter().filter_map(Value::as_f64).collect())
        .unwrap_or_default();
    Some(MarketShare {
        company,
        competitors,
    })
}

fn parse_forecast(block: Option<&Value>) -> BTreeMap<String, ForecastEntry> {
    let mut out = BTreeMap::new();
    if let Some(obj) = block.and_then(Value::as_object) {
        for (year, entry) in obj {
            // upstream emits null for a year it could not fill
            if entry.is_object() {
                out.insert(
                    year.clone(),
                    ForecastEntry {
                        revenue: opt_f64(entry, "revenue"),
                        net_income: opt_f64(entry, "netIncome"),
                    },
                );
            }
        }
    }
    out
}

fn parse_news(block: Option<&Value>) -> Vec<NewsItem> {
    block
        .and_then(Value::as_array)
        .map(|arr| {
            arr.iter()
                .filter_map(|v| {
                    Some(NewsItem {
                        title: v.get("title").and_then(Value::as_str)?.to_string(),
                        link: v.get("link").and_then(Value::as_str)?.to_string(),
                        publisher: opt_str(v, "publisher"),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_comments(block: Option<&Value>) -> MetricComments {
    let Some(block) = block else {
        return MetricComments::default();
    };
    MetricComments {
        revenue: opt_str(block, "revenue"),
        net_income: opt_str(block, "netIncome"),
        gross_margins: opt_str(block, "grossMargins"),
        profit_margins: opt_str(block, "profitMargins"),
        pe_ratio: opt_str(block, "peRatio"),
        pb_ratio: opt_str(block, "pbRatio"),
        cash_flow: opt_str(block, "cashFlow"),
    }
}

fn insert_str(map: &mut Map<String, Value>, key: &str, value: &Option<String>) {
    if let Some(s) = value {
        map.insert(key.to_string(), json!(s));
    }
}

fn insert_f64(map: &mut Map<String, Value>, key: &str, value: Option<f64>) {
    if let Some(x) = value {
        map.insert(key.to_string(), json!(x));
    }
}

fn insert_metric(map: &mut Map<String, Value>, key: &str, value: &MetricValue) {
    match value {
        MetricValue::Value(x) => {
            map.insert(key.to_string(), json!(x));
        }
        MetricValue::Unavailable(s) => {
            map.insert(key.to_string(), json!(s));
        }
        MetricValue::Absent => {}
    }
}

impl FinancialDigest {
    /// Re-encode into the upstream wire shape (camelCase keys, parallel
    /// arrays). Lossless: re-validating the result reproduces `self`.
    pub fn to_payload(&self) -> Value {
        let mut map = Map::new();
        map.insert("company".to_string(), json!(self.company));
        map.insert("symbol".to_string(), json!(self.symbol));
        insert_str(&mut map, "sector", &self.sector);
        insert_str(&mut map, "industry", &self.industry);

        insert_f64(&mut map, "marketCap", self.market_cap);
        insert_f64(&mut map, "revenue", self.revenue);
        insert_f64(&mut map, "netIncome", self.net_income);
        insert_metric(&mut map, "grossMargins", &self.gross_margins);
        insert_metric(&mut map, "profitMargins", &self.profit_margins);
        insert_metric(&mut map, "netMargin", &self.net_margin);
        insert_metric(&mut map, "peRatio", &self.pe_ratio);
        insert_metric(&mut map, "pbRatio", &self.pb_ratio);

        insert_str(&mut map, "insight", &self.insight);
        insert_str(&mut map, "graphInference", &self.graph_inference);
        insert_str(&mut map, "marketInsights", &self.market_insights);
        insert_str(&mut map, "qualitativeFactors", &self.qualitative_factors);
        insert_str(&mut map, "companySegregation", &self.company_segregation);
        insert_str(&mut map, "currentInvestments", &self.current_investments);
        insert_str(&mut map, "futureInvestments", &self.future_investments);
        insert_str(&mut map, "futureDemands", &self.future_demands);
        insert_str(&mut map, "financialHealth", &self.financial_health);

        let mut comments = Map::new();
        insert_str(&mut comments, "revenue", &self.comments.revenue);
        insert_str(&mut comments, "netIncome", &self.comments.net_income);
        insert_str(&mut comments, "grossMargins", &self.comments.gross_margins);
        insert_str(&mut comments, "profitMargins", &self.comments.profit_margins);
        insert_str(&mut comments, "peRatio", &self.comments.pe_ratio);
        insert_str(&mut comments, "pbRatio", &self.comments.pb_ratio);
        insert_str(&mut comments, "cashFlow", &self.comments.cash_flow);
        if !comments.is_empty() {
            map.insert("comments".to_string(), Value::Object(comments));
        }

        if !self.historical_trends.is_empty() {
            let rows = &self.historical_trends;
            map.insert(
                "historicalTrends".to_string(),
                json!({
                    "years": rows.iter().map(|r| &r.year).collect::<Vec<_>>(),
                    "revenue": rows.iter().map(|r| r.revenue).collect::<Vec<_>>(),
                    "netIncome": rows.iter().map(|r| r.net_income).collect::<Vec<_>>(),
                    "grossMargins": rows.iter().map(|r| r.gross_margin).collect::<Vec<_>>(),
                    "profitMargins": rows.iter().map(|r| r.profit_margin).collect::<Vec<_>>(),
                }),
            );
        }

        if !self.cash_flow.is_empty() {
            let rows = &self.cash_flow;
            map.insert(
                "cashFlow".to_string(),
                json!({
                    "years": rows.iter().map(|r| &r.year).collect::<Vec<_>>(),
                    "operating": rows.iter().map(|r| r.operating).collect::<Vec<_>>(),
                    "investing": rows.iter().map(|r| r.investing).collect::<Vec<_>>(),
                    "financing": rows.iter().map(|r| r.financing).collect::<Vec<_>>(),
                }),
            );
        }

        if !self.competitors.is_empty() {
            let rows: Vec<Value> = self
                .competitors
                .iter()
                .map(|c| {
                    json!({
                        "symbol": c.symbol,
                        "company": c.company,
                        "revenue": c.revenue,
                        "netIncome": c.net_income,
                        "grossMargins": c.gross_margins,
                        "profitMargins": c.profit_margins,
                        "marketCap": c.market_cap,
                    })
                })
                .collect();
            map.insert(
                "industryInsights".to_string(),
                json!({ "competitors": rows }),
            );
        }

        if let Some(ms) = &self.market_share {
            map.insert(
                "marketShare".to_string(),
                json!({ "company": ms.company, "competitors": ms.competitors }),
            );
        }

        if !self.forecast.is_empty() {
            let mut entries = Map::new();
            for (year, f) in &self.forecast {
                entries.insert(
                    year.clone(),
                    json!({ "revenue": f.revenue, "netIncome": f.net_income }),
                );
            }
            map.insert("forecast".to_string(), Value::Object(entries));
        }

        if !self.news.is_empty() {
            let items: Vec<Value> = self
                .news
                .iter()
                .map(|n| {
                    let mut item = Map::new();
                    item.insert("title".to_string(), json!(n.title));
                    item.insert("link".to_string(), json!(n.link));
                    insert_str(&mut item, "publisher", &n.publisher);
                    Value::Object(item)
                })
                .collect();
            map.insert("news".to_string(), json!(items));
        }

        Value::Object(map)
    }
}
