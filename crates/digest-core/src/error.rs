use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DigestError {
    #[error("analysis backend unreachable: {0}")]
    Unreachable(String),

    #[error("analysis failed: {0}")]
    Backend(String),

    #[error("malformed digest: missing required field `{0}`")]
    MalformedDigest(String),

    #[error("export failed: {0}")]
    Export(String),
}

/// Non-fatal shape mismatch found while normalizing upstream data.
/// The affected series degrades (truncated or sparse); the view survives.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataIntegrityWarning {
    pub context: String,
    pub detail: String,
}

impl DataIntegrityWarning {
    pub fn new(context: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            detail: detail.into(),
        }
    }
}
