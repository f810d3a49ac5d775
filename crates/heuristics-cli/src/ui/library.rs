//! Heuristic list pane, left panel.

use heuristics_core::{
  catalog::Status,
  display::{action_label, output_label, title_case},
};
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::{condition_text, status_style};
use crate::app::{App, Prompt};

/// Render the heuristic list into `area`.
pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let filtered = app.filtered();
  let total = app.store.len();
  let filtering = app.prompt == Prompt::Filter;

  // Title with count.
  let title = if filtering || !app.filter.is_empty() {
    format!(" Heuristics ({}/{}) ", filtered.len(), total)
  } else {
    format!(" Heuristics ({}) ", total)
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = filtered
    .iter()
    .map(|h| {
      let badge = match h.status {
        Status::Active => "● ",
        Status::Pending => "◐ ",
        Status::Canceled => "○ ",
      };
      ListItem::new(vec![
        Line::from(vec![
          Span::styled(badge, status_style(h.status)),
          Span::styled(
            format!("{} in {}", title_case(&h.element_type), title_case(&h.parent_type)),
            Style::default().add_modifier(Modifier::BOLD),
          ),
          Span::styled(
            format!("  {}", title_case(&h.subcategory)),
            Style::default().fg(Color::DarkGray),
          ),
        ]),
        Line::from(Span::styled(
          format!(
            "  {} → {} {}",
            condition_text(h.condition()),
            action_label(&h.action, &h.output_value),
            output_label(&h.output_value),
          ),
          Style::default().fg(Color::Gray),
        )),
      ])
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  if total == 0 {
    f.render_widget(
      Paragraph::new("No heuristics. Press n to start the wizard.")
        .style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  // Filter bar at the bottom of the inner area.
  if (filtering || !app.filter.is_empty()) && inner_area.height > 2 {
    let filter_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let filter_text = if filtering {
      format!("/{}_", app.filter)
    } else {
      format!("/{}", app.filter)
    };
    f.render_widget(
      Paragraph::new(filter_text).style(Style::default().fg(Color::Yellow)),
      filter_area,
    );
  }

  let mut state = ListState::default();
  state.select(if filtered.is_empty() {
    None
  } else {
    Some(app.list_cursor)
  });

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
