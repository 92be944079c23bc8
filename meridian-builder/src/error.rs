//! Error types for catalogue loading and serialisation.
//!
//! User input never produces one of these: malformed query values, dates and
//! group sizes degrade to defaults instead.

#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unknown catalog: {0}")]
    UnknownCatalog(String),
}
