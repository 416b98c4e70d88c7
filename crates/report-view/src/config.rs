/// Display conventions shared by the formatting layer, the normalizer and
/// the table builder. Scaling is presentation only; stored magnitudes keep
/// full precision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReportConfig {
    /// Divisor applied to raw currency magnitudes (1e9 = billions).
    pub currency_scale: f64,
    /// Fixed decimal places for percentages and scaled currency cells.
    pub decimals: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            currency_scale: 1e9,
            decimals: 2,
        }
    }
}
