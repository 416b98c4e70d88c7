//! One current report per session. A new analysis wholesale replaces the
//! previous report on success and clears it on failure; partial results
//! are never visible.

use chrono::{DateTime, Utc};
use digest_core::{DataIntegrityWarning, DigestError, FinancialDigest, ValidatedDigest};

/// The resolved current report held by the session.
#[derive(Debug, Clone)]
pub struct CurrentReport {
    pub digest: FinancialDigest,
    pub warnings: Vec<DataIntegrityWarning>,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
pub struct ReportSession {
    current: Option<CurrentReport>,
    error: Option<String>,
}

impl ReportSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply the outcome of an analysis request.
    pub fn apply(&mut self, outcome: Result<ValidatedDigest, DigestError>) {
        match outcome {
            Ok(validated) => {
                for w in &validated.warnings {
                    tracing::warn!(context = %w.context, "{}", w.detail);
                }
                self.current = Some(CurrentReport {
                    digest: validated.digest,
                    warnings: validated.warnings,
                    fetched_at: Utc::now(),
                });
                self.error = None;
            }
            Err(e) => {
                self.current = None;
                self.error = Some(e.to_string());
            }
        }
    }

    pub fn current(&self) -> Option<&CurrentReport> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use digest_core::validate_digest;
    use serde_json::json;

    fn ok_outcome(symbol: &str) -> Result<ValidatedDigest, DigestError> {
        Ok(validate_digest(&json!({ "company": "Acme", "symbol": symbol })).unwrap())
    }

    #[test]
    fn test_success_replaces_current() {
        let mut session = ReportSession::new();
        session.apply(ok_outcome("ACME"));
        session.apply(ok_outcome("ACM2"));
        assert_eq!(session.current().unwrap().digest.symbol, "ACM2");
        assert!(session.error().is_none());
    }

    #[test]
    fn test_failure_clears_prior_report() {
        let mut session = ReportSession::new();
        session.apply(ok_outcome("ACME"));
        session.apply(Err(DigestError::Backend("Company not found".to_string())));
        assert!(session.current().is_none());
        assert_eq!(session.error().unwrap(), "analysis failed: Company not found");
    }

    #[test]
    fn test_success_clears_error_banner() {
        let mut session = ReportSession::new();
        session.apply(Err(DigestError::Unreachable("connect refused".to_string())));
        assert!(session.error().is_some());
        session.apply(ok_outcome("ACME"));
        assert!(session.error().is_none());
        assert!(session.current().is_some());
    }
}
