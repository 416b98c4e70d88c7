//! Terminal assembly of the report views: metric lines, narrative bullet
//! sections, the comparative table, cash-flow and forecast summaries.

use std::fmt::Write;

use digest_core::{DataIntegrityWarning, FinancialDigest};
use report_view::{
    build_comparison_table, format_billions, format_currency, format_percentage, format_ratio,
    narrative_bullets, ReportConfig,
};

pub fn render_report_text(
    digest: &FinancialDigest,
    warnings: &[DataIntegrityWarning],
    cfg: &ReportConfig,
) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{} ({})", digest.company, digest.symbol);
    if let Some(sector) = &digest.sector {
        let _ = writeln!(out, "Sector: {sector}");
    }
    if let Some(industry) = &digest.industry {
        let _ = writeln!(out, "Industry: {industry}");
    }

    section(&mut out, "Company Overview");
    metric_line(&mut out, "Market Cap", &format_currency(digest.market_cap), None);
    metric_line(
        &mut out,
        "Revenue",
        &format_currency(digest.revenue),
        digest.comments.revenue.as_deref(),
    );
    metric_line(
        &mut out,
        "Net Income",
        &format_currency(digest.net_income),
        digest.comments.net_income.as_deref(),
    );
    metric_line(
        &mut out,
        "Gross Margin",
        &format_percentage(&digest.gross_margins, cfg),
        digest.comments.gross_margins.as_deref(),
    );
    metric_line(
        &mut out,
        "Profit Margin",
        &format_percentage(&digest.profit_margins, cfg),
        digest.comments.profit_margins.as_deref(),
    );
    metric_line(
        &mut out,
        "Net Margin",
        &format_percentage(&digest.net_margin, cfg),
        None,
    );
    metric_line(
        &mut out,
        "PE Ratio",
        &format_ratio(&digest.pe_ratio, cfg),
        digest.comments.pe_ratio.as_deref(),
    );
    metric_line(
        &mut out,
        "PB Ratio",
        &format_ratio(&digest.pb_ratio, cfg),
        digest.comments.pb_ratio.as_deref(),
    );

    bullet_section(&mut out, "Market Insights", digest.market_insights.as_deref());
    bullet_section(&mut out, "Insight", digest.insight.as_deref());

    paragraph(&mut out, "Qualitative Factors", digest.qualitative_factors.as_deref());
    paragraph(&mut out, "Company Segregation", digest.company_segregation.as_deref());
    paragraph(&mut out, "Current Investments", digest.current_investments.as_deref());
    paragraph(&mut out, "Future Investments", digest.future_investments.as_deref());
    paragraph(&mut out, "Future Demands", digest.future_demands.as_deref());
    paragraph(&mut out, "Financial Health", digest.financial_health.as_deref());
    paragraph(&mut out, "Chart Inference", digest.graph_inference.as_deref());

    if !digest.competitors.is_empty() {
        section(&mut out, "Industry Comparison");
        let table = build_comparison_table(digest, cfg);
        let _ = writeln!(
            out,
            "  {:<22} {:>13} {:>16} {:>17} {:>18} {:>16}",
            table.columns[0],
            table.columns[1],
            table.columns[2],
            table.columns[3],
            table.columns[4],
            table.columns[5],
        );
        for row in &table.rows {
            let marker = if row.focal { "*" } else { " " };
            let _ = writeln!(
                out,
                "{marker} {:<22} {:>13} {:>16} {:>17} {:>18} {:>16}",
                row.company,
                row.revenue,
                row.net_income,
                row.gross_margin,
                row.profit_margin,
                row.market_cap,
            );
        }
    }

    if !digest.cash_flow.is_empty() {
        section(&mut out, "Cash Flow ($B)");
        for row in &digest.cash_flow {
            let _ = writeln!(
                out,
                "  {}: operating {}, investing {}, financing {}",
                row.year,
                format_billions(row.operating, cfg),
                format_billions(row.investing, cfg),
                format_billions(row.financing, cfg),
            );
        }
        if let Some(inference) = &digest.comments.cash_flow {
            let _ = writeln!(out, "  Inference: {inference}");
        }
    }

    if !digest.forecast.is_empty() {
        section(&mut out, "Forecast ($B)");
        for (year, entry) in &digest.forecast {
            let _ = writeln!(
                out,
                "  {}: revenue {}, net income {}",
                year,
                format_billions(entry.revenue, cfg),
                format_billions(entry.net_income, cfg),
            );
        }
    }

    if !digest.news.is_empty() {
        section(&mut out, "News");
        for item in &digest.news {
            match &item.publisher {
                Some(publisher) => {
                    let _ = writeln!(out, "  - {} ({}) {}", item.title, publisher, item.link);
                }
                None => {
                    let _ = writeln!(out, "  - {} {}", item.title, item.link);
                }
            }
        }
    }

    if !warnings.is_empty() {
        let _ = writeln!(out);
        for w in warnings {
            let _ = writeln!(out, "note: {}: {}", w.context, w.detail);
        }
    }

    out
}

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "\n{title}");
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
}

fn metric_line(out: &mut String, label: &str, value: &str, comment: Option<&str>) {
    let _ = writeln!(out, "  {label}: {value}");
    if let Some(comment) = comment {
        let _ = writeln!(out, "      {comment}");
    }
}

fn bullet_section(out: &mut String, title: &str, text: Option<&str>) {
    let Some(text) = text else { return };
    section(out, title);
    for line in narrative_bullets(text) {
        let _ = writeln!(out, "  * {line}");
    }
}

fn paragraph(out: &mut String, title: &str, text: Option<&str>) {
    if let Some(text) = text {
        let _ = writeln!(out, "\n{title}: {text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_core::validate_digest;
    use serde_json::json;

    #[test]
    fn test_absent_metrics_render_placeholder() {
        let digest = validate_digest(&json!({ "company": "Acme", "symbol": "ACME" }))
            .unwrap()
            .digest;
        let text = render_report_text(&digest, &[], &ReportConfig::default());
        assert!(text.contains("Market Cap: No data"));
        assert!(text.contains("PE Ratio: No data"));
        assert!(!text.contains("NaN"));
    }

    #[test]
    fn test_narrative_rendered_as_bullets() {
        let digest = validate_digest(&json!({
            "company": "Acme", "symbol": "ACME",
            "marketInsights": "**Growth**\n* Revenue up\r* Costs down"
        }))
        .unwrap()
        .digest;
        let text = render_report_text(&digest, &[], &ReportConfig::default());
        assert!(text.contains("  * Growth"));
        assert!(text.contains("  * Revenue up"));
        assert!(text.contains("  * Costs down"));
    }

    #[test]
    fn test_table_focal_row_marked() {
        let digest = validate_digest(&json!({
            "company": "Acme", "symbol": "ACME", "revenue": 96e9,
            "industryInsights": { "competitors": [
                { "symbol": "BETA", "company": "Beta", "revenue": 158e9,
                  "netIncome": 10e9, "grossMargins": 0.17, "profitMargins": 0.063,
                  "marketCap": 48e9 }
            ]}
        }))
        .unwrap()
        .digest;
        let text = render_report_text(&digest, &[], &ReportConfig::default());
        assert!(text.contains("* Acme"));
        assert!(text.contains("  Beta"));
    }

    #[test]
    fn test_warnings_surface_as_notes() {
        let digest = validate_digest(&json!({ "company": "Acme", "symbol": "ACME" }))
            .unwrap()
            .digest;
        let warnings = vec![digest_core::DataIntegrityWarning::new(
            "marketShare",
            "2 share entries for 3 competitors; truncated to 2",
        )];
        let text = render_report_text(&digest, &warnings, &ReportConfig::default());
        assert!(text.contains("note: marketShare"));
    }
}
