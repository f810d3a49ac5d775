//! Mapping between [`Heuristic`] records and collection item data.

use serde_json::{Map, Value, json};
use tracing::warn;

use heuristics_core::{
  catalog::{CONDITION_NONE, PARENT_ANY, Status},
  display::title_case,
  heuristic::{Field, FieldHistory, Heuristic, HeuristicId},
};

use crate::{FieldShape, Result};

/// Condition type given to legacy items that carry a free-text condition.
const LEGACY_CONDITION: &str = "custom";

/// Item data for `heuristic` in `shape`. The id goes in `_id`.
pub fn to_item(shape: FieldShape, heuristic: &Heuristic) -> Result<Map<String, Value>> {
  let mut data = Map::new();
  data.insert("_id".into(), json!(heuristic.id.as_str()));

  match shape {
    FieldShape::SixStep => {
      for field in Field::COLUMNS {
        data.insert(field.to_string(), json!(heuristic.value(field)));
      }
      data.insert("status".into(), json!(heuristic.status.as_str()));
      data.insert(
        "history".into(),
        Value::String(serde_json::to_string(&heuristic.history)?),
      );
    }
    FieldShape::Legacy => {
      data.insert("elementType".into(), json!(heuristic.element_type));
      data.insert("category".into(), json!(heuristic.category));
      data.insert("condition".into(), json!(heuristic.condition_value));
      data.insert("decision".into(), json!(heuristic.action));
      data.insert("mobileResult".into(), json!(heuristic.output_value));
      data.insert(
        "title".into(),
        json!(format!(
          "{} / {}",
          title_case(&heuristic.element_type),
          title_case(&heuristic.action)
        )),
      );
    }
  }
  Ok(data)
}

/// A record from item `data`. Missing fields take the draft defaults.
pub fn from_item(
  shape: FieldShape,
  id: HeuristicId,
  data: &Map<String, Value>,
) -> Result<Heuristic> {
  let text = |key: &str| {
    data
      .get(key)
      .and_then(Value::as_str)
      .unwrap_or_default()
      .to_owned()
  };
  let or = |value: String, default: &str| {
    if value.is_empty() { default.to_owned() } else { value }
  };

  let heuristic = match shape {
    FieldShape::SixStep => {
      let raw_status = text("status");
      let status = if raw_status.is_empty() {
        Status::default()
      } else {
        Status::parse(&raw_status).unwrap_or_else(|_| {
          warn!(%id, status = %raw_status, "unknown status on remote item");
          Status::default()
        })
      };
      let history = match text("history").as_str() {
        "" => FieldHistory::new(),
        raw => serde_json::from_str(raw)?,
      };

      Heuristic {
        element_type: text("step1_who_element"),
        parent_type: or(text("step2_where_parent"), PARENT_ANY),
        category: text("step3a_category"),
        subcategory: text("step3b_subcategory"),
        condition_type: or(text("step4_condition_type"), CONDITION_NONE),
        condition_value: text("step4_condition_value"),
        action: text("step5_action"),
        output_value: text("step6_output"),
        status,
        history,
        id,
      }
    }
    FieldShape::Legacy => {
      let condition = text("condition");
      Heuristic {
        element_type: text("elementType"),
        parent_type: PARENT_ANY.to_owned(),
        category: text("category"),
        subcategory: String::new(),
        condition_type: if condition.is_empty() {
          CONDITION_NONE.to_owned()
        } else {
          LEGACY_CONDITION.to_owned()
        },
        condition_value: condition,
        action: text("decision"),
        output_value: text("mobileResult"),
        status: Status::default(),
        history: FieldHistory::new(),
        id,
      }
    }
  };
  Ok(heuristic)
}

#[cfg(test)]
mod tests {
  use heuristics_core::heuristic::Draft;
  use pretty_assertions::assert_eq;

  use super::*;

  fn record() -> Heuristic {
    let mut d = Draft::default();
    d.set(Field::ElementType, "image").unwrap();
    d.set(Field::Category, "layout").unwrap();
    d.set(Field::Subcategory, "sizing").unwrap();
    d.set(Field::ConditionType, "desktop_width").unwrap();
    d.set(Field::ConditionValue, "lte_200px").unwrap();
    d.set(Field::Action, "resize_aspect").unwrap();
    d.set(Field::OutputValue, "width-100pct").unwrap();
    Heuristic::from_draft("h1".into(), &d)
  }

  #[test]
  fn six_step_items_carry_history_as_a_string() {
    let data = to_item(FieldShape::SixStep, &record()).unwrap();
    assert_eq!(data["_id"], "h1");
    assert_eq!(data["step1_who_element"], "image");
    assert_eq!(data["step6_output"], "width-100pct");
    assert_eq!(data["status"], "Active");
    assert_eq!(data["history"], "{}");
  }

  #[test]
  fn six_step_defaults_for_missing_fields() {
    let data = json!({ "step1_who_element": "button", "step5_action": "hide" });
    let h = from_item(FieldShape::SixStep, "x".into(), data.as_object().unwrap()).unwrap();
    assert_eq!(h.parent_type, "any");
    assert_eq!(h.condition_type, "none");
    assert_eq!(h.status, Status::Active);
    assert!(h.history.is_empty());
  }

  #[test]
  fn six_step_parses_history() {
    let data = json!({
      "step5_action": "hide",
      "status": "Pending",
      "history": r#"{"step5_action":[{"timestamp":"2025-01-01T00:00:00Z","value":"show","newValue":"hide"}]}"#,
    });
    let h = from_item(FieldShape::SixStep, "x".into(), data.as_object().unwrap()).unwrap();
    assert_eq!(h.status, Status::Pending);
    let log = h.history(Field::Action);
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].previous_value, "show");
    assert!(!log[0].is_revert);
  }

  #[test]
  fn legacy_fields_map_onto_the_record() {
    let data = to_item(FieldShape::Legacy, &record()).unwrap();
    assert_eq!(data["decision"], "resize_aspect");
    assert_eq!(data["condition"], "lte_200px");
    assert_eq!(data["title"], "Image / Resize Aspect");
    assert!(!data.contains_key("history"));

    let h = from_item(FieldShape::Legacy, "h1".into(), &data).unwrap();
    assert_eq!(h.action, "resize_aspect");
    assert_eq!(h.condition_type, "custom");
    assert_eq!(h.condition_value, "lte_200px");
    assert_eq!(h.subcategory, "");
  }
}
