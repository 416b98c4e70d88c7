//! Comparative table: the focal company and its competitors juxtaposed on
//! identical metrics, in upstream order.

use digest_core::{FinancialDigest, MetricValue};

use crate::config::ReportConfig;
use crate::format::{format_billions, NO_DATA};

/// Fixed column order; currency in billions, margins in percent.
pub const TABLE_COLUMNS: [&str; 6] = [
    "Company",
    "Revenue ($B)",
    "Net Income ($B)",
    "Gross Margin (%)",
    "Profit Margin (%)",
    "Market Cap ($B)",
];

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub company: String,
    pub revenue: String,
    pub net_income: String,
    pub gross_margin: String,
    pub profit_margin: String,
    pub market_cap: String,
    /// Row 0, the focal company; the view layer highlights it distinctly.
    pub focal: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    pub columns: [&'static str; 6],
    pub rows: Vec<TableRow>,
}

/// Build the row-per-entity table: focal company first, then competitors
/// in source order. Never sorts, reorders, or filters.
pub fn build_comparison_table(digest: &FinancialDigest, cfg: &ReportConfig) -> ComparisonTable {
    let percent = |v: Option<f64>| match v {
        Some(x) => format!("{:.*}", cfg.decimals, x * 100.0),
        None => NO_DATA.to_string(),
    };
    let metric_percent = |m: &MetricValue| match m {
        MetricValue::Value(x) => format!("{:.*}", cfg.decimals, x * 100.0),
        MetricValue::Unavailable(s) => s.clone(),
        MetricValue::Absent => NO_DATA.to_string(),
    };

    let mut rows = vec![TableRow {
        company: digest.company.clone(),
        revenue: format_billions(digest.revenue, cfg),
        net_income: format_billions(digest.net_income, cfg),
        gross_margin: metric_percent(&digest.gross_margins),
        profit_margin: metric_percent(&digest.profit_margins),
        market_cap: format_billions(digest.market_cap, cfg),
        focal: true,
    }];
    rows.extend(digest.competitors.iter().map(|c| TableRow {
        company: c.company.clone(),
        revenue: format_billions(c.revenue, cfg),
        net_income: format_billions(c.net_income, cfg),
        gross_margin: percent(c.gross_margins),
        profit_margin: percent(c.profit_margins),
        market_cap: format_billions(c.market_cap, cfg),
        focal: false,
    }));

    ComparisonTable {
        columns: TABLE_COLUMNS,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_core::validate_digest;
    use serde_json::json;

    fn digest() -> FinancialDigest {
        validate_digest(&json!({
            "company": "Acme", "symbol": "ACME",
            "revenue": 96_770e6, "netIncome": 14_990e6, "marketCap": 812e9,
            "grossMargins": 0.1825,
            "profitMargins": "Profit Margin: Not reported by company",
            "industryInsights": { "competitors": [
                // deliberately larger than the focal company
                { "symbol": "BETA", "company": "Beta", "revenue": 158e9,
                  "netIncome": 10e9, "grossMargins": 0.17, "profitMargins": 0.063,
                  "marketCap": 48e9 },
                { "symbol": "GAMA", "company": "Gamma", "revenue": 174e9,
                  "netIncome": 9e9, "grossMargins": 0.14, "profitMargins": 0.052,
                  "marketCap": 52e9 }
            ]}
        }))
        .unwrap()
        .digest
    }

    #[test]
    fn test_row_order_is_focal_then_source_order() {
        let table = build_comparison_table(&digest(), &ReportConfig::default());
        let names: Vec<&str> = table.rows.iter().map(|r| r.company.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Beta", "Gamma"]);
        assert!(table.rows[0].focal);
        assert!(!table.rows[1].focal);
    }

    #[test]
    fn test_cells_scaled_and_fixed_precision() {
        let table = build_comparison_table(&digest(), &ReportConfig::default());
        let focal = &table.rows[0];
        assert_eq!(focal.revenue, "96.77");
        assert_eq!(focal.net_income, "14.99");
        assert_eq!(focal.market_cap, "812.00");
        assert_eq!(focal.gross_margin, "18.25");
        assert_eq!(table.rows[1].profit_margin, "6.30");
    }

    #[test]
    fn test_descriptive_metric_passes_verbatim() {
        let table = build_comparison_table(&digest(), &ReportConfig::default());
        assert_eq!(
            table.rows[0].profit_margin,
            "Profit Margin: Not reported by company"
        );
    }

    #[test]
    fn test_absent_cell_is_placeholder() {
        let d = validate_digest(&json!({ "company": "Acme", "symbol": "ACME" }))
            .unwrap()
            .digest;
        let table = build_comparison_table(&d, &ReportConfig::default());
        assert_eq!(table.rows[0].revenue, NO_DATA);
        assert_eq!(table.rows[0].gross_margin, NO_DATA);
    }

    #[test]
    fn test_fixed_columns() {
        assert_eq!(TABLE_COLUMNS[0], "Company");
        assert_eq!(TABLE_COLUMNS[5], "Market Cap ($B)");
    }
}
