//! Field history entries.
//!
//! Each heuristic keeps one append-only log per field. Entries are never
//! edited or removed; a revert is recorded as a new forward entry that points
//! back at the entry whose `previous_value` it restored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One change to one field.
///
/// Serialised with the keys used by existing collection data: `value` holds
/// the value before the change and `revertedFrom` the restored index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
  pub timestamp:           DateTime<Utc>,
  #[serde(rename = "value", default)]
  pub previous_value:      String,
  #[serde(default)]
  pub new_value:           String,
  #[serde(default, skip_serializing_if = "std::ops::Not::not")]
  pub is_revert:           bool,
  /// Index into the same field's log that was restored. Set iff `is_revert`.
  #[serde(
    rename = "revertedFrom",
    default,
    skip_serializing_if = "Option::is_none"
  )]
  pub reverted_from_index: Option<usize>,
}

impl HistoryEntry {
  /// A plain edit.
  pub fn change(previous: impl Into<String>, new: impl Into<String>) -> Self {
    Self {
      timestamp:           Utc::now(),
      previous_value:      previous.into(),
      new_value:           new.into(),
      is_revert:           false,
      reverted_from_index: None,
    }
  }

  /// A revert that restored the `previous_value` of entry `index`.
  pub fn revert(
    previous: impl Into<String>,
    restored: impl Into<String>,
    index: usize,
  ) -> Self {
    Self {
      timestamp:           Utc::now(),
      previous_value:      previous.into(),
      new_value:           restored.into(),
      is_revert:           true,
      reverted_from_index: Some(index),
    }
  }
}
