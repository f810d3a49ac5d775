//! Error types for `heuristics-core`.

use strum::Display;
use thiserror::Error;

use crate::{
  heuristic::{Field, HeuristicId},
  wizard::Step,
};

/// Caller-supplied data violates a field contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("{0} is required")]
  Missing(Field),

  #[error("{value:?} is not a valid {field}")]
  UnknownValue { field: Field, value: String },

  #[error("subcategory {subcategory:?} does not belong to category {category:?}")]
  SubcategoryMismatch {
    category:    String,
    subcategory: String,
  },

  #[error("wizard step {} ({}) is not complete", .0.number(), .0.label())]
  Incomplete(Step),

  #[error("the wizard can only commit from the output step, currently at step {}", .0.number())]
  NotAtFinalStep(Step),
}

/// Local errors. Any of these leaves the store unchanged.
#[derive(Debug, Error)]
pub enum Error {
  #[error("validation error: {0}")]
  Validation(#[from] ValidationError),

  #[error("heuristic not found: {0}")]
  NotFound(HeuristicId),

  #[error("history index {index} out of range for {field} ({len} entries)")]
  IndexOutOfRange {
    field: Field,
    index: usize,
    len:   usize,
  },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Remote sync failures ────────────────────────────────────────────────────

/// The adapter call that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum SyncOperation {
  Load,
  Create,
  Update,
  Delete,
}

/// A remote sync failure. Recorded as the store's last error and surfaced to
/// the caller; it never undoes the local mutation that preceded it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("remote {operation} failed: {message}")]
pub struct AdapterError {
  pub operation: SyncOperation,
  pub message:   String,
}

impl AdapterError {
  pub fn new(operation: SyncOperation, source: &dyn std::error::Error) -> Self {
    Self { operation, message: source.to_string() }
  }
}
