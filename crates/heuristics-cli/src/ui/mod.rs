//! TUI rendering: orchestrates all panes.

pub mod detail;
pub mod history;
pub mod library;
pub mod wizard;

use chrono::Local;
use heuristics_core::{
  catalog::Status,
  display::{
    action_label, condition_type_label, condition_value_label, output_label, title_case,
  },
  heuristic::{Condition, Heuristic},
};
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

use crate::app::{App, FIELDS, Prompt, Screen};

/// One-line rendering of a heuristic, used by `mab list` and the list pane.
pub fn describe(h: &Heuristic) -> String {
  format!(
    "[{}] {} in {} · {} · {} → {}",
    h.status,
    title_case(&h.element_type),
    title_case(&h.parent_type),
    condition_text(h.condition()),
    action_label(&h.action, &h.output_value),
    output_label(&h.output_value),
  )
}

pub fn condition_text(condition: Condition<'_>) -> String {
  match condition {
    Condition::Always => "Always".to_owned(),
    Condition::When { kind, value } if value.is_empty() => condition_type_label(kind),
    Condition::When { kind, value } => {
      format!("{} {}", condition_type_label(kind), condition_value_label(value))
    }
  }
}

pub fn status_style(status: Status) -> Style {
  let color = match status {
    Status::Active => Color::Green,
    Status::Pending => Color::Yellow,
    Status::Canceled => Color::Red,
  };
  Style::default().fg(color).add_modifier(Modifier::BOLD)
}

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw(f: &mut Frame, app: &App) {
  let area = f.area();

  // Vertical stack: header, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_body(f, rows[1], app);
  draw_status(f, rows[2], app);

  match app.prompt {
    Prompt::PickField => draw_field_picker(f, rows[1], app),
    Prompt::EditValue(_) => draw_editor(f, rows[1], app),
    _ => {}
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let remote = if app.store.is_remote_configured() { "remote" } else { "local only" };

  let left = Span::styled(
    " mab  [n] new  [/] search  [q] quit",
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  );
  let right = Span::styled(
    format!("{remote}  {date} "),
    Style::default().fg(Color::Gray),
  );

  // Simple left-right header: pad the middle.
  let left_width = left.content.chars().count() as u16;
  let right_width = right.content.chars().count() as u16;
  let pad = area
    .width
    .saturating_sub(left_width)
    .saturating_sub(right_width);

  let line = Line::from(vec![
    left,
    Span::raw(" ".repeat(pad as usize)),
    right,
  ]);

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(line), inner);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body(f: &mut Frame, area: Rect, app: &App) {
  if app.screen == Screen::Wizard {
    wizard::draw(f, area, app);
    return;
  }

  // Split into left list pane (40%) and right pane (60%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(area);

  library::draw(f, cols[0], app);

  match app.screen {
    Screen::History => history::draw(f, cols[1], app),
    _ => detail::draw(f, cols[1], app),
  }
}

// ─── Prompts ──────────────────────────────────────────────────────────────────

fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let width = width.min(area.width);
  let height = height.min(area.height);
  Rect {
    x: area.x + (area.width - width) / 2,
    y: area.y + (area.height - height) / 2,
    width,
    height,
  }
}

fn draw_field_picker(f: &mut Frame, area: Rect, app: &App) {
  let popup = centered(area, 36, FIELDS.len() as u16 + 2);
  f.render_widget(Clear, popup);

  let items: Vec<ListItem> = FIELDS
    .iter()
    .map(|field| ListItem::new(field.label()))
    .collect();
  let mut state = ListState::default();
  state.select(Some(app.field_cursor));

  f.render_stateful_widget(
    List::new(items)
      .block(
        Block::default()
          .title(" Edit which field? ")
          .borders(Borders::ALL)
          .border_style(Style::default().fg(Color::Cyan)),
      )
      .highlight_style(
        Style::default()
          .bg(Color::Blue)
          .fg(Color::White)
          .add_modifier(Modifier::BOLD),
      ),
    popup,
    &mut state,
  );
}

fn draw_editor(f: &mut Frame, area: Rect, app: &App) {
  let Prompt::EditValue(field) = app.prompt else { return };
  let popup = centered(area, 60, 5);
  f.render_widget(Clear, popup);

  let has_options = !app.edit_options(field).is_empty();
  let hint = if has_options {
    "Tab cycles values  Enter save  Esc cancel"
  } else {
    "Enter save  Esc cancel"
  };

  let lines = vec![
    Line::from(vec![
      Span::raw(app.edit_buffer.clone()),
      Span::styled("_", Style::default().fg(Color::Yellow)),
    ]),
    Line::from(""),
    Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))),
  ];

  f.render_widget(
    Paragraph::new(lines).block(
      Block::default()
        .title(format!(" {} ", field.label()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan)),
    ),
    popup,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
  let (mode_label, hints) = match (&app.screen, &app.prompt) {
    (_, Prompt::Filter) => ("SEARCH", "Type to filter  Esc cancel  Enter select"),
    (_, Prompt::ConfirmDelete) => ("DELETE", "y confirm  any other key cancels"),
    (_, Prompt::PickField) => ("EDIT", "↑↓/jk choose  Enter edit  Esc cancel"),
    (_, Prompt::EditValue(_)) => ("EDIT", "Enter save  Esc cancel"),
    (Screen::Library, _) => (
      "LIBRARY",
      "↑↓/jk navigate  Enter detail  s status  e edit  h history  d delete  R reload",
    ),
    (Screen::Detail, _) => (
      "DETAIL",
      "[ ] prev/next  s status  e edit  h history  d delete  Esc back",
    ),
    (Screen::History, _) => ("HISTORY", "Tab field  ↑↓/jk entry  r revert  Esc back"),
    (Screen::Wizard, _) => (
      "WIZARD",
      "←→ step  ↑↓ option  Enter choose  Tab field  x clear  Esc leave",
    ),
  };

  let status = if app.status_msg.is_empty() {
    hints.to_string()
  } else {
    app.status_msg.clone()
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let hint_span = Span::styled(
    format!("  {status}"),
    Style::default().fg(Color::Gray),
  );

  let mut spans = vec![mode_span, hint_span];
  if let Some(e) = app.store.last_error() {
    spans.push(Span::styled(
      format!("  ⚠ {e}"),
      Style::default().fg(Color::Red),
    ));
  }

  f.render_widget(
    Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black)),
    area,
  );
}
