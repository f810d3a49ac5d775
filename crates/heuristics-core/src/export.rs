//! CSV and JSON export of the heuristic collection.
//!
//! Both formats carry the same nine columns in a fixed order: the id followed
//! by the eight wizard fields under their collection keys.

use chrono::NaiveDate;
use serde::Serialize;
use strum::{Display, EnumString};

use crate::{
  Result,
  heuristic::{Field, Heuristic},
};

/// Column headers, in order.
pub const COLUMNS: [&str; 9] = [
  "id",
  "step1_who_element",
  "step2_where_parent",
  "step3a_category",
  "step3b_subcategory",
  "step4_condition_type",
  "step4_condition_value",
  "step5_action",
  "step6_output",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
  #[default]
  Csv,
  Json,
}

impl ExportFormat {
  pub fn extension(self) -> &'static str {
    match self {
      Self::Csv => "csv",
      Self::Json => "json",
    }
  }

  /// `mobile-heuristics-YYYY-MM-DD.<ext>`
  pub fn file_name(self, date: NaiveDate) -> String {
    format!("mobile-heuristics-{}.{}", date.format("%Y-%m-%d"), self.extension())
  }

  pub fn render(self, heuristics: &[Heuristic]) -> Result<String> {
    match self {
      Self::Csv => Ok(to_csv(heuristics)),
      Self::Json => to_json(heuristics),
    }
  }
}

// ─── Rows ────────────────────────────────────────────────────────────────────

/// One exported record. Field order is the column order.
#[derive(Debug, Serialize)]
pub struct ExportRow<'a> {
  pub id:                    &'a str,
  pub step1_who_element:     &'a str,
  pub step2_where_parent:    &'a str,
  pub step3a_category:       &'a str,
  pub step3b_subcategory:    &'a str,
  pub step4_condition_type:  &'a str,
  pub step4_condition_value: &'a str,
  pub step5_action:          &'a str,
  pub step6_output:          &'a str,
}

impl<'a> From<&'a Heuristic> for ExportRow<'a> {
  fn from(h: &'a Heuristic) -> Self {
    Self {
      id:                    h.id.as_str(),
      step1_who_element:     &h.element_type,
      step2_where_parent:    &h.parent_type,
      step3a_category:       &h.category,
      step3b_subcategory:    &h.subcategory,
      step4_condition_type:  &h.condition_type,
      step4_condition_value: &h.condition_value,
      step5_action:          &h.action,
      step6_output:          &h.output_value,
    }
  }
}

// ─── CSV ─────────────────────────────────────────────────────────────────────

fn csv_cell(value: &str) -> String {
  if value.contains([',', '"', '\n', '\r']) {
    format!("\"{}\"", value.replace('"', "\"\""))
  } else {
    value.to_owned()
  }
}

/// Header line plus one line per record, `\n`-separated, no trailing newline.
pub fn to_csv(heuristics: &[Heuristic]) -> String {
  let mut lines = Vec::with_capacity(heuristics.len() + 1);
  lines.push(COLUMNS.join(","));
  for h in heuristics {
    let cells: Vec<String> = std::iter::once(h.id.as_str())
      .chain(Field::COLUMNS.iter().map(|f| h.value(*f)))
      .map(csv_cell)
      .collect();
    lines.push(cells.join(","));
  }
  lines.join("\n")
}

// ─── JSON ────────────────────────────────────────────────────────────────────

/// Pretty-printed array of [`ExportRow`]s.
pub fn to_json(heuristics: &[Heuristic]) -> Result<String> {
  let rows: Vec<ExportRow<'_>> = heuristics.iter().map(ExportRow::from).collect();
  Ok(serde_json::to_string_pretty(&rows)?)
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::heuristic::Draft;

  fn record(id: &str, output: &str) -> Heuristic {
    let mut d = Draft::default();
    d.set(Field::ElementType, "button").unwrap();
    d.set(Field::Category, "layout").unwrap();
    d.set(Field::Subcategory, "sizing").unwrap();
    d.set(Field::Action, "resize_aspect").unwrap();
    d.set(Field::OutputValue, output).unwrap();
    Heuristic::from_draft(id.into(), &d)
  }

  #[test]
  fn two_records_give_three_lines_of_nine_columns() {
    let csv = to_csv(&[record("a", "width-100pct"), record("b", "height-auto")]);
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3);
    for line in &lines {
      assert_eq!(line.split(',').count(), 9);
    }
    assert_eq!(lines[0], COLUMNS.join(","));
    assert_eq!(
      lines[1],
      "a,button,any,layout,sizing,none,,resize_aspect,width-100pct"
    );
  }

  #[test]
  fn cells_with_commas_are_quoted() {
    let csv = to_csv(&[record("a", "width-10px, \"tight\"")]);
    assert!(csv.ends_with(",\"width-10px, \"\"tight\"\"\""));
  }

  #[test]
  fn json_keeps_column_order() {
    let json = to_json(&[record("a", "width-100pct")]).unwrap();
    let positions: Vec<usize> =
      COLUMNS.iter().map(|c| json.find(&format!("\"{c}\"")).unwrap()).collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert!(!json.contains("history"));
  }

  #[test]
  fn file_names_carry_the_date() {
    let date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
    assert_eq!(ExportFormat::Json.file_name(date), "mobile-heuristics-2025-07-04.json");
    assert_eq!("csv".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
  }
}
