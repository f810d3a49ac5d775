//! Human-readable renderings of stored identifiers and template strings.
//!
//! Condition values and outputs are free-text templates such as `lte_200px`
//! or `width-100pct_height-auto`. These helpers turn them into the phrases
//! shown in the library view.

use std::{borrow::Cow, sync::LazyLock};

use regex::{Captures, Regex};

fn re(pattern: &str) -> Regex {
  Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern:?}: {e}"))
}

static WORD_START: LazyLock<Regex> = LazyLock::new(|| re(r"\b\w"));

/// Ordered substitutions applied to condition values.
static CONDITION_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
  vec![
    (re(r"(?i)true_"), ""),
    (re(r"(\d+)to(\d+)"), "${1}:${2}"),
    (re(r"(?i)lte_(\d+)px"), "is equal / less than ${1}px"),
    (re(r"(?i)gte_(\d+)px"), "is equal / greater than ${1}px"),
    (re(r"(?i)lt_(\d+)px"), "is less than ${1}px"),
    (re(r"(?i)gt_(\d+)px"), "is greater than ${1}px"),
    (re(r"(?i)portrait_"), "Portrait: "),
    (re(r"(?i)landscape_"), ""),
    (re(r"(?i)square_"), ""),
    (re(r"_"), " / "),
  ]
});

static FONT_SIZE: LazyLock<Regex> = LazyLock::new(|| re(r"font[_-]size[_-](\d+)px"));
static WIDTH_PX: LazyLock<Regex> = LazyLock::new(|| re(r"width[_-](\d+)px"));
static HEIGHT_PX: LazyLock<Regex> = LazyLock::new(|| re(r"height[_-](\d+)px"));
static MARGIN: LazyLock<Regex> = LazyLock::new(|| re(r"margin[_-](\w+)[_-](\d+)px"));

// ─── Identifiers ─────────────────────────────────────────────────────────────

/// `hamburger_menu` → `Hamburger Menu`.
pub fn title_case(value: &str) -> String {
  let spaced = value.replace('_', " ");
  WORD_START
    .replace_all(&spaced, |c: &Captures<'_>| c[0].to_uppercase())
    .into_owned()
}

/// Label for a condition type identifier.
pub fn condition_type_label(kind: &str) -> String {
  match kind {
    "is_blank" => "is Blank".to_owned(),
    "is_blank_desktop_height" => "is Blank & Desktop Height".to_owned(),
    other => title_case(other),
  }
}

/// `lte_200px` → `is equal / less than 200px`, `portrait_2to3` →
/// `Portrait: 2:3`, `15_19px` → `15 / 19px`.
pub fn condition_value_label(value: &str) -> String {
  CONDITION_RULES
    .iter()
    .fold(value.to_owned(), |acc, (pattern, replacement)| {
      pattern.replace_all(&acc, *replacement).into_owned()
    })
}

/// Substring rules for action phrases, first match wins.
const ACTION_PHRASES: &[(&str, &str)] = &[
  ("resize_aspect", "Resize in Aspect Ratio"),
  ("resize", "Resize"),
  ("item_size", "Resize"),
  ("margin", "Set Margin"),
  ("padding", "Set Padding"),
  ("font_size", "Resize Font"),
  ("alignment", "Align"),
  ("hide", "Hide"),
  ("show", "Show"),
  ("keep", "Keep"),
  ("offset", "Set Offset"),
  ("rotation", "Set Rotation"),
  ("arrange", "Arrange"),
  ("menu_spacing", "Menu Spacing"),
];

/// Verb phrase for an action. The output is consulted because a scaling
/// reset is stored as an `item_size` action with a `scaling-reset` output.
pub fn action_label(action: &str, output: &str) -> Cow<'static, str> {
  if action.is_empty() {
    return Cow::Borrowed("—");
  }
  if output.contains("scaling-reset")
    || output.contains("scaling_reset")
    || action.contains("reset_scaling")
    || (action.contains("item_size") && output.contains("scaling"))
  {
    return Cow::Borrowed("Reset Scaling");
  }
  ACTION_PHRASES
    .iter()
    .find(|(key, _)| action.contains(key))
    .map(|(_, phrase)| Cow::Borrowed(*phrase))
    .unwrap_or_else(|| Cow::Owned(title_case(action)))
}

// ─── Outputs ─────────────────────────────────────────────────────────────────

/// One recognised component of an output template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPart {
  pub label: String,
  pub value: String,
}

impl OutputPart {
  fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
    Self { label: label.into(), value: value.into() }
  }
}

/// Recognise font size, width, height and margin settings in an output
/// template, in that order.
pub fn output_parts(output: &str) -> Vec<OutputPart> {
  let mut parts = Vec::new();
  let has = |needle: &str| output.contains(needle);

  if let Some(c) = FONT_SIZE.captures(output) {
    parts.push(OutputPart::new("Font Size", format!("{}px", &c[1])));
  } else if has("font") && has("keep") {
    parts.push(OutputPart::new("Font Size", "Keep"));
  }

  if has("width") {
    if has("100pct") || has("100%") {
      parts.push(OutputPart::new("Width", "100%"));
    } else if let Some(c) = WIDTH_PX.captures(output) {
      parts.push(OutputPart::new("Width", format!("{}px", &c[1])));
    } else if has("width-keep") || has("width_keep") {
      parts.push(OutputPart::new("Width", "Keep"));
    } else if has("width-full") {
      parts.push(OutputPart::new("Width", "100%"));
    }
  }

  if has("height") {
    if has("height-auto") || has("height_auto") {
      parts.push(OutputPart::new("Height", "Auto"));
    } else if has("height-keep") || has("height_keep") {
      parts.push(OutputPart::new("Height", "Keep"));
    } else if let Some(c) = HEIGHT_PX.captures(output) {
      parts.push(OutputPart::new("Height", format!("{}px", &c[1])));
    } else if has("aspect_ratio") || has("aspect-ratio") {
      parts.push(OutputPart::new("Height", "Aspect Ratio"));
    }
  }

  if let Some(c) = MARGIN.captures(output) {
    parts.push(OutputPart::new(format!("Margin {}", &c[1]), format!("{}px", &c[2])));
  }

  parts
}

/// One-line rendering of an output template.
pub fn output_label(output: &str) -> String {
  if output.contains("scaling-reset") || output.contains("scaling_reset") {
    let cap = if output.contains("100pct") || output.contains("100%") {
      " [100% max]"
    } else {
      ""
    };
    return format!("scaledValue × (desktopVW / mobileVW){cap}");
  }

  let parts = output_parts(output);
  if parts.is_empty() {
    return output.replace('_', " ");
  }
  parts
    .iter()
    .map(|p| format!("{}: {}", p.label, p.value))
    .collect::<Vec<_>>()
    .join(" · ")
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn title_case_identifiers() {
    assert_eq!(title_case("hamburger_menu"), "Hamburger Menu");
    assert_eq!(title_case("font_algo"), "Font Algo");
    assert_eq!(title_case(""), "");
  }

  #[test]
  fn condition_type_special_cases() {
    assert_eq!(condition_type_label("is_blank"), "is Blank");
    assert_eq!(
      condition_type_label("is_blank_desktop_height"),
      "is Blank & Desktop Height"
    );
    assert_eq!(condition_type_label("desktop_width"), "Desktop Width");
  }

  #[test]
  fn condition_value_comparisons() {
    assert_eq!(condition_value_label("lte_200px"), "is equal / less than 200px");
    assert_eq!(condition_value_label("GTE_101px"), "is equal / greater than 101px");
    assert_eq!(condition_value_label("lt_50px"), "is less than 50px");
    assert_eq!(condition_value_label("gt_100px"), "is greater than 100px");
  }

  #[test]
  fn condition_value_ratios_and_separators() {
    assert_eq!(condition_value_label("portrait_2to3"), "Portrait: 2:3");
    assert_eq!(condition_value_label("landscape_16to9"), "16:9");
    assert_eq!(condition_value_label("true_square_1to1"), "1:1");
    assert_eq!(condition_value_label("15_19px"), "15 / 19px");
    assert_eq!(condition_value_label("true"), "true");
  }

  #[test]
  fn action_phrases() {
    let cases = [
      ("resize_aspect", "Resize in Aspect Ratio"),
      ("container_item_resize", "Resize"),
      ("item_size", "Resize"),
      ("margin", "Set Margin"),
      ("set_margin", "Set Margin"),
      ("padding", "Set Padding"),
      ("font_size", "Resize Font"),
      ("alignment", "Align"),
      ("vertical_arrange", "Arrange"),
      ("hide", "Hide"),
      ("show", "Show"),
      ("keep", "Keep"),
      ("keep_value", "Keep"),
      ("offset_value", "Set Offset"),
      ("set_rotation", "Set Rotation"),
      ("menu_spacing", "Menu Spacing"),
      ("reset_scaling", "Reset Scaling"),
      ("wobble_sideways", "Wobble Sideways"),
      ("", "—"),
    ];
    for (action, expected) in cases {
      assert_eq!(action_label(action, ""), expected, "action {action:?}");
    }
  }

  #[test]
  fn scaling_reset_outputs_override_the_action() {
    assert_eq!(action_label("item_size", "scaling-reset_100pct"), "Reset Scaling");
    assert_eq!(action_label("hide", "scaling_reset"), "Reset Scaling");
    assert_eq!(action_label("item_size", "width-100pct"), "Resize");
  }

  #[test]
  fn output_parts_width_and_height() {
    assert_eq!(
      output_parts("width-100pct_height-auto"),
      vec![OutputPart::new("Width", "100%"), OutputPart::new("Height", "Auto")]
    );
    assert_eq!(
      output_parts("width-320px_height-keep"),
      vec![OutputPart::new("Width", "320px"), OutputPart::new("Height", "Keep")]
    );
  }

  #[test]
  fn output_parts_font_and_margin() {
    assert_eq!(
      output_parts("font_size-16px"),
      vec![OutputPart::new("Font Size", "16px")]
    );
    assert_eq!(
      output_parts("margin-top-24px"),
      vec![OutputPart::new("Margin top", "24px")]
    );
  }

  #[test]
  fn output_label_variants() {
    assert_eq!(
      output_label("scaling-reset_100pct"),
      "scaledValue × (desktopVW / mobileVW) [100% max]"
    );
    assert_eq!(output_label("width-100pct_height-auto"), "Width: 100% · Height: Auto");
    assert_eq!(output_label("stack_vertically"), "stack vertically");
  }
}
