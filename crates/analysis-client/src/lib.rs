//! Client for the external analysis backend.
//!
//! One request/response exchange per analysis: submit a company name,
//! receive digest-shaped JSON or an error payload. No retry loop, no
//! background tasks; a failed exchange surfaces immediately.

use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use digest_core::{validate_digest, DigestError, ValidatedDigest};

const DEFAULT_BASE_URL: &str = "http://localhost:5000";
const REQUEST_TIMEOUT_SECS: u64 = 90;

#[derive(Clone)]
pub struct AnalysisClient {
    base_url: String,
    client: Client,
}

impl AnalysisClient {
    pub fn new(base_url: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self { base_url, client }
    }

    /// Base URL from `ANALYSIS_API_URL`, falling back to the local default.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("ANALYSIS_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    /// Submit a company name and validate the response into a digest.
    pub async fn analyze(&self, company: &str) -> Result<ValidatedDigest, DigestError> {
        let url = format!("{}/analyze", self.base_url);
        tracing::debug!(company, url = %url, "requesting analysis");

        let response = self
            .client
            .post(&url)
            .json(&json!({ "company": company }))
            .send()
            .await
            .map_err(|e| DigestError::Unreachable(e.to_string()))?;

        let success = response.status().is_success();
        let body: Value = response
            .json()
            .await
            .map_err(|e| DigestError::Backend(format!("invalid response body: {e}")))?;

        digest_from_response(success, &body)
    }
}

/// Map one decoded exchange outcome to a digest or error. Split out from
/// the transport so the mapping is testable without a live backend.
pub fn digest_from_response(success: bool, body: &Value) -> Result<ValidatedDigest, DigestError> {
    if !success {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("something went wrong")
            .to_string();
        return Err(DigestError::Backend(message));
    }
    validate_digest(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_string_surfaces() {
        let err = digest_from_response(false, &json!({ "error": "Company not found" }))
            .unwrap_err();
        match err {
            DigestError::Backend(msg) => assert_eq!(msg, "Company not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_backend_error_without_message_gets_generic() {
        let err = digest_from_response(false, &json!({})).unwrap_err();
        assert!(matches!(err, DigestError::Backend(_)));
    }

    #[test]
    fn test_success_body_is_validated() {
        let v = digest_from_response(true, &json!({ "company": "Acme", "symbol": "ACME" }))
            .unwrap();
        assert_eq!(v.digest.symbol, "ACME");
    }

    #[test]
    fn test_success_body_missing_identity_is_malformed() {
        let err = digest_from_response(true, &json!({ "company": "Acme" })).unwrap_err();
        assert!(matches!(err, DigestError::MalformedDigest(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_maps_to_unreachable() {
        // nothing listens on port 9; connection fails fast
        let client = AnalysisClient::new("http://127.0.0.1:9".to_string());
        let err = client.analyze("Acme").await.unwrap_err();
        assert!(matches!(err, DigestError::Unreachable(_)));
    }
}
