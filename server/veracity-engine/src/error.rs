//! Structured error types for the veracity engine.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
  /// A raw record could not become a `CommentRecord`. Only that record is affected.
  #[error("malformed record: {field}: {reason}")]
  MalformedRecord { field: String, reason: String },

  #[error("config: {0}")]
  Config(String),

  #[error("pattern: {0}")]
  Pattern(#[from] regex::Error),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("csv: {0}")]
  Csv(#[from] csv::Error),
}

impl EngineError {
  pub fn malformed(field: &str, reason: &str) -> Self {
    Self::MalformedRecord {
      field: field.to_string(),
      reason: reason.to_string(),
    }
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }
}
