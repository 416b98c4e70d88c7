//! Pure display formatting. Absent values always render [`NO_DATA`],
//! never `0`, `NaN`, or an empty string.

use digest_core::MetricValue;

use crate::config::ReportConfig;

/// Placeholder for any value the upstream source did not provide.
pub const NO_DATA: &str = "No data";

/// Render a ratio metric as a percentage. Descriptive unavailability
/// strings pass through verbatim.
pub fn format_percentage(value: &MetricValue, cfg: &ReportConfig) -> String {
    match value {
        MetricValue::Value(x) => format!("{:.*}%", cfg.decimals, x * 100.0),
        MetricValue::Unavailable(s) => s.clone(),
        MetricValue::Absent => NO_DATA.to_string(),
    }
}

/// Render a plain ratio metric (PE, PB) without the percent scaling.
pub fn format_ratio(value: &MetricValue, cfg: &ReportConfig) -> String {
    match value {
        MetricValue::Value(x) => format!("{:.*}", cfg.decimals, x),
        MetricValue::Unavailable(s) => s.clone(),
        MetricValue::Absent => NO_DATA.to_string(),
    }
}

/// Abbreviated currency magnitude for metric cards.
pub fn format_currency(value: Option<f64>) -> String {
    let Some(v) = value else {
        return NO_DATA.to_string();
    };
    let sign = if v < 0.0 { "-" } else { "" };
    let v = v.abs();
    if v >= 1_000_000_000.0 {
        format!("{sign}${:.1}B", v / 1_000_000_000.0)
    } else if v >= 1_000_000.0 {
        format!("{sign}${:.1}M", v / 1_000_000.0)
    } else if v >= 1_000.0 {
        format!("{sign}${:.1}K", v / 1_000.0)
    } else {
        format!("{sign}${v:.0}")
    }
}

/// Fixed-precision billions for table cells.
pub fn format_billions(value: Option<f64>, cfg: &ReportConfig) -> String {
    match value {
        Some(v) => format!("{:.*}", cfg.decimals, v / cfg.currency_scale),
        None => NO_DATA.to_string(),
    }
}

/// Split unstructured narrative text into bullet strings.
///
/// Paired `**` emphasis markers are stripped first, so the remaining bare
/// `*` characters are genuine bullet delimiters; fragments are trimmed and
/// empties dropped.
pub fn narrative_bullets(text: &str) -> Vec<String> {
    text.replace("**", "")
        .split(['\n', '\r', '*'])
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ReportConfig {
        ReportConfig::default()
    }

    #[test]
    fn test_percentage_value() {
        assert_eq!(
            format_percentage(&MetricValue::Value(0.1234), &cfg()),
            "12.34%"
        );
    }

    #[test]
    fn test_percentage_descriptive_passes_verbatim() {
        let v = MetricValue::Unavailable("not disclosed".to_string());
        assert_eq!(format_percentage(&v, &cfg()), "not disclosed");
    }

    #[test]
    fn test_percentage_absent_is_placeholder() {
        assert_eq!(format_percentage(&MetricValue::Absent, &cfg()), NO_DATA);
    }

    #[test]
    fn test_ratio() {
        assert_eq!(format_ratio(&MetricValue::Value(42.5), &cfg()), "42.50");
        assert_eq!(format_ratio(&MetricValue::Absent, &cfg()), NO_DATA);
    }

    #[test]
    fn test_currency_thresholds() {
        assert_eq!(format_currency(Some(812e9)), "$812.0B");
        assert_eq!(format_currency(Some(45_300_000.0)), "$45.3M");
        assert_eq!(format_currency(Some(9_100.0)), "$9.1K");
        assert_eq!(format_currency(Some(412.0)), "$412");
        assert_eq!(format_currency(Some(-1.2e9)), "-$1.2B");
        assert_eq!(format_currency(None), NO_DATA);
    }

    #[test]
    fn test_currency_zero_is_rendered_not_placeholder() {
        assert_eq!(format_currency(Some(0.0)), "$0");
    }

    #[test]
    fn test_billions_cell() {
        assert_eq!(format_billions(Some(96_770e6), &cfg()), "96.77");
        assert_eq!(format_billions(None, &cfg()), NO_DATA);
    }

    #[test]
    fn test_narrative_bullets() {
        let text = "**Growth**\n* Revenue up\r* Costs down";
        assert_eq!(
            narrative_bullets(text),
            vec!["Growth", "Revenue up", "Costs down"]
        );
    }

    #[test]
    fn test_narrative_bullets_empty_fragments_dropped() {
        assert_eq!(narrative_bullets("\n\r* \n**"), Vec::<String>::new());
    }
}
