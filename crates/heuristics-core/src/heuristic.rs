//! Heuristic records and drafts.
//!
//! A heuristic describes how one kind of element transforms when a desktop
//! layout collapses to mobile. Its fields answer the six wizard questions;
//! every change made after creation is logged per field in `history`.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::{
  catalog::{self, CONDITION_NONE, PARENT_ANY, Status},
  error::ValidationError,
  history::HistoryEntry,
};

// ─── Identity ────────────────────────────────────────────────────────────────

/// Opaque record identifier. Fresh ids are UUID v4 strings; ids loaded from a
/// remote collection are kept verbatim.
#[derive(
  Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct HeuristicId(String);

impl HeuristicId {
  pub fn generate() -> Self { Self(Uuid::new_v4().to_string()) }

  pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for HeuristicId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl From<String> for HeuristicId {
  fn from(s: String) -> Self { Self(s) }
}

impl From<&str> for HeuristicId {
  fn from(s: &str) -> Self { Self(s.to_owned()) }
}

// ─── Fields ──────────────────────────────────────────────────────────────────

/// A named, editable field of a heuristic.
///
/// The string form is the key used by the remote collection and by history
/// logs (`step1_who_element`, ...). The snake-case field name is also
/// accepted when parsing.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize,
  Deserialize, Display, EnumString, EnumIter, IntoStaticStr,
)]
pub enum Field {
  #[serde(rename = "step1_who_element")]
  #[strum(to_string = "step1_who_element", serialize = "element_type")]
  ElementType,
  #[serde(rename = "step2_where_parent")]
  #[strum(to_string = "step2_where_parent", serialize = "parent_type")]
  ParentType,
  #[serde(rename = "step3a_category")]
  #[strum(to_string = "step3a_category", serialize = "category")]
  Category,
  #[serde(rename = "step3b_subcategory")]
  #[strum(to_string = "step3b_subcategory", serialize = "subcategory")]
  Subcategory,
  #[serde(rename = "step4_condition_type")]
  #[strum(to_string = "step4_condition_type", serialize = "condition_type")]
  ConditionType,
  #[serde(rename = "step4_condition_value")]
  #[strum(to_string = "step4_condition_value", serialize = "condition_value")]
  ConditionValue,
  #[serde(rename = "step5_action")]
  #[strum(to_string = "step5_action", serialize = "action")]
  Action,
  #[serde(rename = "step6_output")]
  #[strum(to_string = "step6_output", serialize = "output_value")]
  OutputValue,
  #[serde(rename = "status")]
  #[strum(to_string = "status")]
  Status,
}

impl Field {
  /// The eight string fields in export column order (status excluded).
  pub const COLUMNS: [Field; 8] = [
    Field::ElementType,
    Field::ParentType,
    Field::Category,
    Field::Subcategory,
    Field::ConditionType,
    Field::ConditionValue,
    Field::Action,
    Field::OutputValue,
  ];

  /// Short human label.
  pub fn label(self) -> &'static str {
    match self {
      Self::ElementType => "Element",
      Self::ParentType => "Parent",
      Self::Category => "Category",
      Self::Subcategory => "Subcategory",
      Self::ConditionType => "Condition",
      Self::ConditionValue => "Condition Value",
      Self::Action => "Action",
      Self::OutputValue => "Output",
      Self::Status => "Status",
    }
  }
}

/// Per-field change log. Keys are ordered so serialised output is stable.
pub type FieldHistory = BTreeMap<Field, Vec<HistoryEntry>>;

// ─── Condition ───────────────────────────────────────────────────────────────

/// Typed view of the condition pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition<'a> {
  /// Condition type `none`: the rule always applies.
  Always,
  /// A parametrised condition, e.g. `desktop_width` / `lte_200px`.
  When { kind: &'a str, value: &'a str },
}

fn condition_of<'a>(kind: &'a str, value: &'a str) -> Condition<'a> {
  if kind.is_empty() || kind == CONDITION_NONE {
    Condition::Always
  } else {
    Condition::When { kind, value }
  }
}

// ─── Heuristic ───────────────────────────────────────────────────────────────

/// A committed rule record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heuristic {
  pub id:              HeuristicId,
  pub element_type:    String,
  pub parent_type:     String,
  pub category:        String,
  pub subcategory:     String,
  pub condition_type:  String,
  #[serde(default)]
  pub condition_value: String,
  pub action:          String,
  #[serde(default)]
  pub output_value:    String,
  #[serde(default)]
  pub status:          Status,
  #[serde(default)]
  pub history:         FieldHistory,
}

impl Heuristic {
  /// Build a record from a draft with a fresh, empty history. A blank parent
  /// or condition type takes the `any` / `none` default.
  pub fn from_draft(id: HeuristicId, draft: &Draft) -> Self {
    let or_default = |value: &str, default: &str| {
      if value.is_empty() { default.to_owned() } else { value.to_owned() }
    };
    Self {
      id,
      element_type: draft.element_type.clone(),
      parent_type: or_default(&draft.parent_type, PARENT_ANY),
      category: draft.category.clone(),
      subcategory: draft.subcategory.clone(),
      condition_type: or_default(&draft.condition_type, CONDITION_NONE),
      condition_value: draft.condition_value.clone(),
      action: draft.action.clone(),
      output_value: draft.output_value.clone(),
      status: draft.status,
      history: FieldHistory::new(),
    }
  }

  /// Current value of `field` as a string.
  pub fn value(&self, field: Field) -> &str {
    match field {
      Field::Status => self.status.as_str(),
      other => self.slot(other),
    }
  }

  fn slot(&self, field: Field) -> &str {
    match field {
      Field::ElementType => &self.element_type,
      Field::ParentType => &self.parent_type,
      Field::Category => &self.category,
      Field::Subcategory => &self.subcategory,
      Field::ConditionType => &self.condition_type,
      Field::ConditionValue => &self.condition_value,
      Field::Action => &self.action,
      Field::OutputValue => &self.output_value,
      Field::Status => "",
    }
  }

  fn slot_mut(&mut self, field: Field) -> Option<&mut String> {
    Some(match field {
      Field::ElementType => &mut self.element_type,
      Field::ParentType => &mut self.parent_type,
      Field::Category => &mut self.category,
      Field::Subcategory => &mut self.subcategory,
      Field::ConditionType => &mut self.condition_type,
      Field::ConditionValue => &mut self.condition_value,
      Field::Action => &mut self.action,
      Field::OutputValue => &mut self.output_value,
      Field::Status => return None,
    })
  }

  /// Overwrite `field` without touching history. Only status values are
  /// parsed here; catalog checks belong to the caller.
  pub(crate) fn assign(
    &mut self,
    field: Field,
    value: String,
  ) -> Result<(), ValidationError> {
    match self.slot_mut(field) {
      Some(slot) => *slot = value,
      None => self.status = Status::parse(&value)?,
    }
    Ok(())
  }

  pub fn condition(&self) -> Condition<'_> {
    condition_of(&self.condition_type, &self.condition_value)
  }

  /// The change log for `field`, oldest first.
  pub fn history(&self, field: Field) -> &[HistoryEntry] {
    self.history.get(&field).map(Vec::as_slice).unwrap_or_default()
  }

  pub(crate) fn push_history(&mut self, field: Field, entry: HistoryEntry) {
    self.history.entry(field).or_default().push(entry);
  }
}

// ─── Draft ───────────────────────────────────────────────────────────────────

/// An in-progress heuristic assembled by the wizard. Has no id or history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
  pub element_type:    String,
  pub parent_type:     String,
  pub category:        String,
  pub subcategory:     String,
  pub condition_type:  String,
  pub condition_value: String,
  pub action:          String,
  pub output_value:    String,
  pub status:          Status,
}

impl Default for Draft {
  fn default() -> Self {
    Self {
      element_type:    String::new(),
      parent_type:     PARENT_ANY.to_owned(),
      category:        String::new(),
      subcategory:     String::new(),
      condition_type:  CONDITION_NONE.to_owned(),
      condition_value: String::new(),
      action:          String::new(),
      output_value:    String::new(),
      status:          Status::default(),
    }
  }
}

impl Draft {
  pub fn value(&self, field: Field) -> &str {
    match field {
      Field::ElementType => &self.element_type,
      Field::ParentType => &self.parent_type,
      Field::Category => &self.category,
      Field::Subcategory => &self.subcategory,
      Field::ConditionType => &self.condition_type,
      Field::ConditionValue => &self.condition_value,
      Field::Action => &self.action,
      Field::OutputValue => &self.output_value,
      Field::Status => self.status.as_str(),
    }
  }

  /// Set a field the way the wizard does: picking a category clears the
  /// subcategory, and picking condition type `none` clears the value.
  pub fn set(
    &mut self,
    field: Field,
    value: impl Into<String>,
  ) -> Result<(), ValidationError> {
    let value = value.into();
    match field {
      Field::ElementType => self.element_type = value,
      Field::ParentType => self.parent_type = value,
      Field::Category => {
        if self.category != value {
          self.subcategory.clear();
        }
        self.category = value;
      }
      Field::Subcategory => self.subcategory = value,
      Field::ConditionType => {
        if value == CONDITION_NONE {
          self.condition_value.clear();
        }
        self.condition_type = value;
      }
      Field::ConditionValue => self.condition_value = value,
      Field::Action => self.action = value,
      Field::OutputValue => self.output_value = value,
      Field::Status => self.status = Status::parse(&value)?,
    }
    Ok(())
  }

  pub fn condition(&self) -> Condition<'_> {
    condition_of(&self.condition_type, &self.condition_value)
  }

  /// Check the draft can be committed: element and action are required and
  /// every catalog-backed value must come from the catalog.
  pub fn validate(&self) -> Result<(), ValidationError> {
    for required in [Field::ElementType, Field::Action] {
      if self.value(required).is_empty() {
        return Err(ValidationError::Missing(required));
      }
    }
    for field in Field::COLUMNS {
      catalog::validate(field, self.value(field), &self.category)?;
    }
    Ok(())
  }

  /// Label/value rows for the review panel. Blank values render as `—`.
  pub fn summary(&self) -> Vec<(&'static str, &str)> {
    let mut rows = Vec::with_capacity(Field::COLUMNS.len());
    for field in Field::COLUMNS {
      if field == Field::ConditionValue
        && matches!(self.condition(), Condition::Always)
      {
        continue;
      }
      let value = self.value(field);
      rows.push((field.label(), if value.is_empty() { "—" } else { value }));
    }
    rows
  }
}
