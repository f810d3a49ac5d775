//! Per-field change log, right panel.

use chrono::Local;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};

use crate::app::{App, FIELDS};

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" History ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let Some(h) = app.current() else {
    f.render_widget(
      Paragraph::new("Nothing selected.").style(Style::default().fg(Color::DarkGray)),
      inner,
    );
    return;
  };

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(2), Constraint::Min(0)])
    .split(inner);

  // Field tabs; fields with changes carry a count.
  let titles: Vec<Line> = FIELDS
    .iter()
    .map(|&field| match h.history(field).len() {
      0 => Line::from(field.label()),
      n => Line::from(format!("{} ({n})", field.label())),
    })
    .collect();
  f.render_widget(
    Tabs::new(titles)
      .select(app.history_field % FIELDS.len())
      .style(Style::default().fg(Color::Gray))
      .highlight_style(
        Style::default()
          .fg(Color::Yellow)
          .add_modifier(Modifier::BOLD),
      ),
    rows[0],
  );

  let entries = app.history_entries();
  if entries.is_empty() {
    f.render_widget(
      Paragraph::new(format!("No changes to {} yet.", app.history_field().label()))
        .style(Style::default().fg(Color::DarkGray)),
      rows[1],
    );
    return;
  }

  let items: Vec<ListItem> = entries
    .iter()
    .enumerate()
    .map(|(i, entry)| {
      let when = entry
        .timestamp
        .with_timezone(&Local)
        .format("%Y-%m-%d %H:%M");
      let mut spans = vec![
        Span::styled(format!("#{i:<3}"), Style::default().fg(Color::DarkGray)),
        Span::styled(format!("{when}  "), Style::default().fg(Color::Gray)),
        Span::styled(
          blank_as_dash(&entry.previous_value),
          Style::default().fg(Color::Red),
        ),
        Span::raw(" → "),
        Span::styled(
          blank_as_dash(&entry.new_value),
          Style::default().fg(Color::Green),
        ),
      ];
      if let Some(index) = entry.reverted_from_index {
        spans.push(Span::styled(
          format!("  ↺ reverted #{index}"),
          Style::default().fg(Color::Yellow),
        ));
      }
      ListItem::new(Line::from(spans))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.history_cursor.min(entries.len() - 1)));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    rows[1],
    &mut state,
  );
}

fn blank_as_dash(value: &str) -> String {
  if value.is_empty() { "—".to_owned() } else { value.to_owned() }
}
