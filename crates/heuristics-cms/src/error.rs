//! Error type for `heuristics-cms`.

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("{request} returned {status}: {body}")]
  Status {
    request: String,
    status:  StatusCode,
    body:    String,
  },

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("no collection is configured")]
  NotConfigured,

  #[error("collection item has no id")]
  MissingId,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
