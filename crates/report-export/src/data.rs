//! Structured data export: lossless JSON dump of the validated digest.

use std::fs;
use std::path::{Path, PathBuf};

use digest_core::{DigestError, FinancialDigest};

/// Fixed default file name for the structured data export.
pub const DATA_FILE_NAME: &str = "financial-report.json";

/// Serialize the entire validated digest (wire shape, pretty-printed) into
/// `dir` under the fixed file name. Idempotent; a repeat invocation simply
/// rewrites the file.
pub fn export_digest(digest: &FinancialDigest, dir: &Path) -> Result<PathBuf, DigestError> {
    let path = dir.join(DATA_FILE_NAME);
    let text = serde_json::to_string_pretty(&digest.to_payload())
        .map_err(|e| DigestError::Export(e.to_string()))?;
    fs::write(&path, text).map_err(|e| DigestError::Export(e.to_string()))?;
    tracing::info!(path = %path.display(), "wrote data export");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_core::validate_digest;
    use serde_json::json;

    fn scratch_dir(name: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("findigest-{}-{name}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_export_round_trips_through_validator() {
        let validated = validate_digest(&json!({
            "company": "Acme Motors", "symbol": "ACME",
            "sector": "Consumer Cyclical",
            "revenue": 96_770e6, "netIncome": 14_990e6,
            "peRatio": 42.5,
            "pbRatio": "PB Ratio: Not reported by company",
            "historicalTrends": {
                "years": ["2022", "2023"],
                "revenue": [81_462e6, 96_770e6],
                "netIncome": [12_556e6, 14_990e6],
                "grossMargins": [0.256, 0.182],
                "profitMargins": [0.154, 0.155]
            },
            "marketShare": { "company": 22.55, "competitors": [36.83, 40.62] },
            "forecast": { "2024": { "revenue": 114_950e6, "netIncome": 17_890e6 } }
        }))
        .unwrap();

        let dir = scratch_dir("data-roundtrip");
        let path = export_digest(&validated.digest, &dir).unwrap();
        assert_eq!(path.file_name().unwrap(), DATA_FILE_NAME);

        let written = std::fs::read_to_string(&path).unwrap();
        let payload: serde_json::Value = serde_json::from_str(&written).unwrap();
        let reparsed = validate_digest(&payload).unwrap();
        assert_eq!(reparsed.digest, validated.digest);
    }

    #[test]
    fn test_export_is_idempotent() {
        let validated =
            validate_digest(&json!({ "company": "Acme", "symbol": "ACME" })).unwrap();
        let dir = scratch_dir("data-idempotent");
        let first = export_digest(&validated.digest, &dir).unwrap();
        let second = export_digest(&validated.digest, &dir).unwrap();
        assert_eq!(first, second);
        let a = std::fs::read_to_string(&first).unwrap();
        let b = std::fs::read_to_string(&second).unwrap();
        assert_eq!(a, b);
    }
}
