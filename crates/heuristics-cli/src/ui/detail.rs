//! Heuristic detail pane, right panel.

use heuristics_core::{
  display::{
    action_label, condition_type_label, condition_value_label, output_parts, title_case,
  },
  heuristic::{Field, Heuristic},
};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use super::status_style;
use crate::app::{App, FIELDS, Prompt, Screen};

// ─── Public entry ─────────────────────────────────────────────────────────────

/// Render the detail pane into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let border = if app.screen == Screen::Detail {
    Color::Cyan
  } else {
    Color::DarkGray
  };
  let block = Block::default()
    .title(" Heuristic ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(border));

  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(h) = app.current() else {
    let hint = Paragraph::new("Nothing selected.")
      .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, inner);
    return;
  };

  let mut lines: Vec<Line> = FIELDS
    .iter()
    .map(|&field| field_line(h, field))
    .collect();

  // Output breakdown, one part per row.
  let parts = output_parts(&h.output_value);
  if parts.len() > 1 {
    lines.push(Line::from(""));
    for part in parts {
      lines.push(Line::from(vec![
        Span::styled(
          format!("  {:<14}", part.label),
          Style::default().fg(Color::DarkGray),
        ),
        Span::raw(part.value),
      ]));
    }
  }

  lines.push(Line::from(""));
  lines.push(Line::from(Span::styled(
    format!("id {}", h.id),
    Style::default().fg(Color::DarkGray),
  )));

  if app.prompt == Prompt::ConfirmDelete {
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
      "Delete this heuristic? (y/N)",
      Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )));
  }

  let para = Paragraph::new(lines).wrap(Wrap { trim: false });
  f.render_widget(para, inner);
}

// ─── Field formatting helpers ─────────────────────────────────────────────────

fn field_line(h: &Heuristic, field: Field) -> Line<'static> {
  let raw = h.value(field);
  let value_span = match field {
    Field::Status => Span::styled(raw.to_owned(), status_style(h.status)),
    _ if raw.is_empty() => Span::styled("—", Style::default().fg(Color::DarkGray)),
    _ => Span::raw(format_value(h, field, raw)),
  };

  let mut spans = vec![
    Span::styled(
      format!("{:<16}", field.label()),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    ),
    value_span,
  ];

  let changes = h.history(field).len();
  if changes > 0 {
    spans.push(Span::styled(
      format!("  ({changes} change{})", if changes == 1 { "" } else { "s" }),
      Style::default().fg(Color::DarkGray),
    ));
  }

  Line::from(spans)
}

fn format_value(h: &Heuristic, field: Field, raw: &str) -> String {
  match field {
    Field::Action => action_label(raw, &h.output_value).into_owned(),
    Field::ConditionType => condition_type_label(raw),
    Field::ConditionValue => condition_value_label(raw),
    Field::OutputValue => raw.to_owned(),
    _ => title_case(raw),
  }
}
