//! Six-step creation wizard, full body.

use heuristics_core::wizard::Step;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs},
};
use strum::IntoEnumIterator;

use crate::app::App;

pub fn draw(f: &mut Frame, area: Rect, app: &App) {
  let wizard = &app.wizard;
  let step = wizard.step();

  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([Constraint::Length(3), Constraint::Min(0)])
    .split(area);

  // ── Step tabs ──
  let titles: Vec<Line> = Step::iter()
    .map(|s| {
      let mark = if s.is_complete(wizard.draft()) { "✓" } else { " " };
      Line::from(format!("{} {} {mark}", s.number(), s.label()))
    })
    .collect();
  let tabs_title = if wizard.is_transitioning() {
    " New heuristic … "
  } else {
    " New heuristic "
  };
  f.render_widget(
    Tabs::new(titles)
      .select(usize::from(step.number() - 1))
      .block(Block::default().title(tabs_title).borders(Borders::ALL))
      .style(Style::default().fg(Color::Gray))
      .highlight_style(
        Style::default()
          .fg(Color::Yellow)
          .add_modifier(Modifier::BOLD),
      ),
    rows[0],
  );

  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
    .split(rows[1]);

  draw_input(f, cols[0], app);
  draw_review(f, cols[1], app);
}

// ── Input ──

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
  let step = app.wizard.step();
  let field = app.wizard_field();
  let fields = step.fields();

  let title = if fields.len() > 1 {
    format!(" {} · {} ", step.title(), field.label())
  } else {
    format!(" {} ", step.title())
  };
  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let current = app.wizard.draft().value(field);
  let options = app.wizard_options();

  if options.is_empty() {
    let mut lines = vec![Line::from(vec![
      Span::raw(current.to_owned()),
      Span::styled("_", Style::default().fg(Color::Yellow)),
    ])];
    lines.push(Line::from(""));
    let hint = if step == Step::LAST {
      "Type a value, Enter to save the heuristic"
    } else {
      "Type a value, Enter to continue"
    };
    lines.push(Line::from(Span::styled(hint, Style::default().fg(Color::DarkGray))));
    f.render_widget(Paragraph::new(lines), inner);
    return;
  }

  let items: Vec<ListItem> = options
    .iter()
    .map(|option| {
      let chosen = option.value == current;
      let marker = if chosen { "● " } else { "  " };
      let style = if chosen {
        Style::default().fg(Color::Green)
      } else {
        Style::default()
      };
      ListItem::new(Line::from(vec![
        Span::styled(marker, style),
        Span::styled(option.label, style),
      ]))
    })
    .collect();

  let mut state = ListState::default();
  state.select(Some(app.option_cursor.min(options.len() - 1)));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner,
    &mut state,
  );
}

// ── Review ──

fn draw_review(f: &mut Frame, area: Rect, app: &App) {
  let block = Block::default()
    .title(" Review ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let mut lines: Vec<Line> = app
    .wizard
    .draft()
    .summary()
    .into_iter()
    .map(|(label, value)| {
      Line::from(vec![
        Span::styled(
          format!("{label:<16}"),
          Style::default().fg(Color::Cyan),
        ),
        Span::raw(value.to_owned()),
      ])
    })
    .collect();

  lines.push(Line::from(""));
  let next = match app.wizard.first_incomplete() {
    Some(step) => Span::styled(
      format!("Next: step {} ({})", step.number(), step.label()),
      Style::default().fg(Color::Yellow),
    ),
    None => Span::styled(
      "Ready to save",
      Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    ),
  };
  lines.push(Line::from(next));

  f.render_widget(Paragraph::new(lines), inner);
}
