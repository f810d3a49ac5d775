//! Application state machine and event dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fuzzy_matcher::{FuzzyMatcher, skim::SkimMatcherV2};
use heuristics_cms::CmsAdapter;
use heuristics_core::{
  catalog::{
    self, Action, CONDITION_NONE, CatalogOption, Category, ConditionKind, ElementKind,
    ParentKind, Status, options,
  },
  heuristic::{Condition, Field, Heuristic, HeuristicId},
  history::HistoryEntry,
  store::HeuristicStore,
  wizard::{Step, Wizard},
};
use heuristics_store_sqlite::SqliteFallback;

pub type Store = HeuristicStore<CmsAdapter, SqliteFallback>;

/// Every editable field, in display order.
pub const FIELDS: [Field; 9] = [
  Field::ElementType,
  Field::ParentType,
  Field::Category,
  Field::Subcategory,
  Field::ConditionType,
  Field::ConditionValue,
  Field::Action,
  Field::OutputValue,
  Field::Status,
];

/// Catalog options for `field`. Free-text fields have none. Subcategories
/// depend on `category`.
pub fn options_for(field: Field, category: &str) -> Vec<CatalogOption> {
  match field {
    Field::ElementType => options::<ElementKind>(),
    Field::ParentType => options::<ParentKind>(),
    Field::Category => options::<Category>(),
    Field::Subcategory => catalog::subcategories(category)
      .iter()
      .map(|s| CatalogOption { value: s, label: s })
      .collect(),
    Field::ConditionType => options::<ConditionKind>(),
    Field::Action => options::<Action>(),
    Field::Status => options::<Status>(),
    Field::ConditionValue | Field::OutputValue => Vec::new(),
  }
}

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the heuristic list; right pane previews the cursor record.
  Library,
  /// Focus on the detail pane.
  Detail,
  /// Per-field change log of the cursor record.
  History,
  /// The six-step creation wizard.
  Wizard,
}

/// A modal input layered over the current screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prompt {
  None,
  Filter,
  ConfirmDelete,
  PickField,
  EditValue(Field),
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App {
  pub screen: Screen,
  pub prompt: Prompt,

  /// The record collection with its remote and local backends.
  pub store: Store,

  /// Current fuzzy-filter string.
  pub filter: String,

  /// Cursor position within the *filtered* list.
  pub list_cursor: usize,

  /// Cursor in the field picker.
  pub field_cursor: usize,

  /// Text being typed for a field edit.
  pub edit_buffer: String,

  /// Highlighted catalog option in the wizard or field edit.
  pub option_cursor: usize,

  /// Index into [`FIELDS`] shown on the history screen.
  pub history_field: usize,

  /// Highlighted entry in the history list.
  pub history_cursor: usize,

  pub wizard: Wizard,

  /// Which of the current step's fields has focus.
  pub wizard_focus: usize,

  /// One-line status message shown in the status bar.
  pub status_msg: String,
}

impl App {
  pub fn new(store: Store, wizard: Wizard) -> Self {
    Self {
      screen: Screen::Library,
      prompt: Prompt::None,
      store,
      filter: String::new(),
      list_cursor: 0,
      field_cursor: 0,
      edit_buffer: String::new(),
      option_cursor: 0,
      history_field: 0,
      history_cursor: 0,
      wizard,
      wizard_focus: 0,
      status_msg: String::new(),
    }
  }

  // ── Filtered list ─────────────────────────────────────────────────────────

  /// Records that match the current filter query.
  pub fn filtered(&self) -> Vec<&Heuristic> {
    if self.filter.is_empty() {
      return self.store.all().iter().collect();
    }
    let matcher = SkimMatcherV2::default();
    self
      .store
      .all()
      .iter()
      .filter(|h| {
        let haystack = [
          h.element_type.as_str(),
          h.parent_type.as_str(),
          h.category.as_str(),
          h.subcategory.as_str(),
          h.condition_value.as_str(),
          h.action.as_str(),
          h.output_value.as_str(),
          h.status.as_str(),
        ]
        .join(" ");
        matcher.fuzzy_match(&haystack, &self.filter).is_some()
      })
      .collect()
  }

  /// The record under the list cursor in the filtered view, if any.
  pub fn current(&self) -> Option<&Heuristic> {
    self.filtered().get(self.list_cursor).copied()
  }

  fn current_id(&self) -> Option<HeuristicId> { self.current().map(|h| h.id.clone()) }

  fn move_cursor(&mut self, delta: isize) {
    let len = self.filtered().len();
    if len > 0 {
      self.list_cursor = self.list_cursor.saturating_add_signed(delta).min(len - 1);
    }
  }

  fn clamp_cursor(&mut self) {
    let len = self.filtered().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  /// Clear the filter and put the cursor on `id`.
  fn select(&mut self, id: &HeuristicId) {
    self.filter.clear();
    if let Some(i) = self.store.all().iter().position(|h| &h.id == id) {
      self.list_cursor = i;
    }
  }

  // ── History ───────────────────────────────────────────────────────────────

  pub fn history_field(&self) -> Field { FIELDS[self.history_field % FIELDS.len()] }

  pub fn history_entries(&self) -> &[HistoryEntry] {
    self
      .current()
      .map(|h| h.history(self.history_field()))
      .unwrap_or_default()
  }

  // ── Wizard ────────────────────────────────────────────────────────────────

  /// The wizard field that has keyboard focus.
  pub fn wizard_field(&self) -> Field {
    let fields = self.wizard.step().fields();
    fields[self.wizard_focus.min(fields.len() - 1)]
  }

  pub fn wizard_options(&self) -> Vec<CatalogOption> {
    options_for(self.wizard_field(), &self.wizard.draft().category)
  }

  pub fn edit_options(&self, field: Field) -> Vec<CatalogOption> {
    let category = self.current().map(|h| h.category.as_str()).unwrap_or_default();
    options_for(field, category)
  }

  fn sync_option_cursor(&mut self) {
    let field = self.wizard_field();
    let value = self.wizard.draft().value(field);
    let position = self.wizard_options().iter().position(|o| o.value == value);
    self.option_cursor = position.unwrap_or(0);
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.prompt {
      Prompt::Filter => {
        self.handle_filter_key(key);
        return Ok(true);
      }
      Prompt::ConfirmDelete => {
        self.handle_confirm_key(key).await;
        return Ok(true);
      }
      Prompt::PickField => {
        self.handle_pick_key(key);
        return Ok(true);
      }
      Prompt::EditValue(field) => {
        self.handle_edit_key(field, key).await;
        return Ok(true);
      }
      Prompt::None => {}
    }

    match self.screen {
      Screen::Library => self.handle_library_key(key).await,
      Screen::Detail => self.handle_detail_key(key).await,
      Screen::History => self.handle_history_key(key).await,
      Screen::Wizard => self.handle_wizard_key(key).await,
    }
  }

  fn handle_filter_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.prompt = Prompt::None;
        self.filter.clear();
        self.list_cursor = 0;
      }
      KeyCode::Enter => {
        self.prompt = Prompt::None;
        self.list_cursor = 0;
        // Open the detail pane straight away if there's exactly one match.
        if self.filtered().len() == 1 {
          self.screen = Screen::Detail;
        }
      }
      KeyCode::Backspace => {
        self.filter.pop();
        self.list_cursor = 0;
      }
      KeyCode::Char(c) => {
        self.filter.push(c);
        self.list_cursor = 0;
      }
      _ => {}
    }
  }

  async fn handle_library_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
      KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),

      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if self.current().is_some() {
          self.screen = Screen::Detail;
        }
      }

      KeyCode::Char('/') => {
        self.prompt = Prompt::Filter;
        self.filter.clear();
        self.list_cursor = 0;
      }

      _ => self.handle_record_key(key).await,
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    match key.code {
      KeyCode::Char('q') => return Ok(false),

      KeyCode::Esc | KeyCode::Left => self.screen = Screen::Library,

      // Step through the list without leaving the detail pane.
      KeyCode::Char(']') | KeyCode::PageDown | KeyCode::Down | KeyCode::Char('j') => {
        self.move_cursor(1)
      }
      KeyCode::Char('[') | KeyCode::PageUp | KeyCode::Up | KeyCode::Char('k') => {
        self.move_cursor(-1)
      }

      _ => self.handle_record_key(key).await,
    }
    Ok(true)
  }

  /// Actions on the record under the cursor, shared by the list and detail
  /// screens.
  async fn handle_record_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Char('n') => self.open_wizard(),
      KeyCode::Char('R') => self.refresh().await,
      _ if self.current().is_none() => {}
      KeyCode::Char('s') => self.cycle_status().await,
      KeyCode::Char('d') => {
        self.prompt = Prompt::ConfirmDelete;
        self.status_msg = "Delete this heuristic? [y/N]".into();
      }
      KeyCode::Char('e') => {
        self.field_cursor = 0;
        self.prompt = Prompt::PickField;
      }
      KeyCode::Char('h') => self.open_history(),
      _ => {}
    }
  }

  async fn handle_confirm_key(&mut self, key: KeyEvent) {
    self.prompt = Prompt::None;
    if !matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
      self.status_msg = "Delete cancelled".into();
      return;
    }
    let Some(id) = self.current_id() else { return };
    let result = self.store.delete(&id).await;
    self.report(result.map(|_| "Heuristic deleted".to_owned()));
    self.clamp_cursor();
    if self.current().is_none() {
      self.screen = Screen::Library;
    }
  }

  fn handle_pick_key(&mut self, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => self.prompt = Prompt::None,
      KeyCode::Down | KeyCode::Char('j') => {
        if self.field_cursor + 1 < FIELDS.len() {
          self.field_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.field_cursor = self.field_cursor.saturating_sub(1);
      }
      KeyCode::Enter => self.begin_edit(FIELDS[self.field_cursor]),
      _ => {}
    }
  }

  async fn handle_edit_key(&mut self, field: Field, key: KeyEvent) {
    match key.code {
      KeyCode::Esc => {
        self.prompt = Prompt::None;
        self.edit_buffer.clear();
      }
      KeyCode::Enter => self.commit_edit(field).await,
      // Tab cycles through the catalog values for the field.
      KeyCode::Tab | KeyCode::BackTab => {
        let options = self.edit_options(field);
        let len = options.len();
        if len > 0 {
          self.option_cursor = if key.code == KeyCode::Tab {
            (self.option_cursor + 1) % len
          } else {
            (self.option_cursor + len - 1) % len
          };
          self.edit_buffer = options[self.option_cursor].value.to_owned();
        }
      }
      KeyCode::Backspace => {
        self.edit_buffer.pop();
      }
      KeyCode::Char(c) => self.edit_buffer.push(c),
      _ => {}
    }
  }

  async fn handle_history_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let fields = FIELDS.len();
    match key.code {
      KeyCode::Char('q') => return Ok(false),
      KeyCode::Esc => self.screen = Screen::Detail,

      KeyCode::Tab | KeyCode::Right | KeyCode::Char('l') => {
        self.history_field = (self.history_field + 1) % fields;
        self.history_cursor = 0;
      }
      KeyCode::BackTab | KeyCode::Left => {
        self.history_field = (self.history_field + fields - 1) % fields;
        self.history_cursor = 0;
      }

      KeyCode::Down | KeyCode::Char('j') => {
        if self.history_cursor + 1 < self.history_entries().len() {
          self.history_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.history_cursor = self.history_cursor.saturating_sub(1);
      }

      KeyCode::Char('r') => self.revert_selected().await,
      _ => {}
    }
    Ok(true)
  }

  async fn handle_wizard_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    let field = self.wizard_field();
    let options = self.wizard_options();
    let text_input = options.is_empty();

    match key.code {
      KeyCode::Esc => {
        self.screen = Screen::Library;
        self.status_msg = "Draft kept; press n to resume".into();
      }

      KeyCode::Right => self.wizard_step(Wizard::next),
      KeyCode::Left => self.wizard_step(Wizard::prev),
      KeyCode::Tab => self.cycle_wizard_focus(),

      KeyCode::Down => {
        if !options.is_empty() {
          self.option_cursor = (self.option_cursor + 1).min(options.len() - 1);
        }
      }
      KeyCode::Up => self.option_cursor = self.option_cursor.saturating_sub(1),

      KeyCode::Enter if self.wizard.step() == Step::LAST => self.commit_wizard().await,
      KeyCode::Enter if text_input => self.wizard_step(Wizard::next),
      KeyCode::Enter => {
        if let Some(option) = options.get(self.option_cursor) {
          self.choose(field, option.value);
        }
      }

      KeyCode::Backspace if text_input => {
        let mut value = self.wizard.draft().value(field).to_owned();
        value.pop();
        self.set_draft(field, value);
      }
      KeyCode::Char(c) if text_input => {
        let mut value = self.wizard.draft().value(field).to_owned();
        value.push(c);
        self.set_draft(field, value);
      }

      KeyCode::Char('j') => {
        if !options.is_empty() {
          self.option_cursor = (self.option_cursor + 1).min(options.len() - 1);
        }
      }
      KeyCode::Char('k') => self.option_cursor = self.option_cursor.saturating_sub(1),
      KeyCode::Char(c @ '1'..='6') => {
        let target = c as u8 - b'0';
        self.wizard_step(|w| w.go_to(target));
      }
      KeyCode::Char('x') => {
        self.wizard.clear();
        self.wizard_focus = 0;
        self.sync_option_cursor();
        self.status_msg = "Draft cleared".into();
      }
      _ => {}
    }
    Ok(true)
  }

  // ── Record actions ────────────────────────────────────────────────────────

  /// Show the outcome of a store call, noting a failed remote sync.
  fn report(&mut self, result: heuristics_core::Result<String>) {
    self.status_msg = match result {
      Ok(msg) => match self.store.last_error() {
        Some(e) => format!("{msg} (saved locally; {e})"),
        None => msg,
      },
      Err(e) => format!("Error: {e}"),
    };
  }

  async fn cycle_status(&mut self) {
    let Some((id, next)) = self.current().map(|h| (h.id.clone(), h.status.cycle())) else {
      return;
    };
    let result = self.store.update_status(&id, next).await;
    self.report(result.map(|_| format!("Status set to {next}")));
    self.clamp_cursor();
  }

  fn begin_edit(&mut self, field: Field) {
    let Some(value) = self.current().map(|h| h.value(field).to_owned()) else {
      self.prompt = Prompt::None;
      return;
    };
    self.option_cursor = self
      .edit_options(field)
      .iter()
      .position(|o| o.value == value)
      .unwrap_or(0);
    self.edit_buffer = value;
    self.prompt = Prompt::EditValue(field);
  }

  async fn commit_edit(&mut self, field: Field) {
    self.prompt = Prompt::None;
    let value = std::mem::take(&mut self.edit_buffer);
    let Some(h) = self.current() else { return };
    if h.value(field) == value {
      self.status_msg = "No change".into();
      return;
    }
    let id = h.id.clone();
    let result = self.store.update_field(&id, field, value).await;
    self.report(result.map(|_| format!("{} updated", field.label())));
    self.clamp_cursor();
  }

  fn open_history(&mut self) {
    // Start on the first field that has any changes.
    self.history_field = self
      .current()
      .and_then(|h| FIELDS.iter().position(|f| !h.history(*f).is_empty()))
      .unwrap_or(0);
    self.history_cursor = 0;
    self.screen = Screen::History;
  }

  async fn revert_selected(&mut self) {
    let Some(id) = self.current_id() else { return };
    if self.history_entries().is_empty() {
      return;
    }
    let field = self.history_field();
    let index = self.history_cursor;
    let result = self.store.revert_field(&id, field, index).await;
    self.report(result.map(|_| format!("{} restored from change #{index}", field.label())));
    self.history_cursor = self.history_entries().len().saturating_sub(1);
  }

  async fn refresh(&mut self) {
    if !self.store.is_remote_configured() {
      self.status_msg = "No remote collection configured".into();
      return;
    }
    let reloaded = self.store.refresh().await;
    self.clamp_cursor();
    self.status_msg = match self.store.last_error() {
      Some(e) if !reloaded => format!("Reload failed: {e}"),
      _ => format!("Reloaded {} heuristics", self.store.len()),
    };
  }

  // ── Wizard actions ────────────────────────────────────────────────────────

  fn open_wizard(&mut self) {
    self.screen = Screen::Wizard;
    self.wizard_focus = 0;
    self.sync_option_cursor();
  }

  /// Run a step transition and reset focus if it took effect.
  fn wizard_step(&mut self, transition: impl FnOnce(&mut Wizard) -> bool) {
    if transition(&mut self.wizard) {
      self.wizard_focus = 0;
      self.sync_option_cursor();
    }
  }

  fn set_draft(&mut self, field: Field, value: impl Into<String>) {
    if let Err(e) = self.wizard.set(field, value) {
      self.status_msg = format!("Error: {e}");
    }
  }

  /// Pick a catalog value. Moves on to the step's second field when it still
  /// needs an answer, otherwise advances the wizard.
  fn choose(&mut self, field: Field, value: &'static str) {
    self.set_draft(field, value);
    let more = match field {
      Field::Category => true,
      Field::ConditionType => value != CONDITION_NONE,
      _ => false,
    };
    if more && self.wizard_focus + 1 < self.wizard.step().fields().len() {
      self.wizard_focus += 1;
      self.sync_option_cursor();
    } else {
      self.wizard_step(Wizard::next);
    }
  }

  fn cycle_wizard_focus(&mut self) {
    let fields = self.wizard.step().fields();
    let mut next = (self.wizard_focus + 1) % fields.len();
    if fields[next] == Field::ConditionValue
      && self.wizard.draft().condition() == Condition::Always
    {
      next = 0;
    }
    self.wizard_focus = next;
    self.sync_option_cursor();
  }

  async fn commit_wizard(&mut self) {
    match self.wizard.commit(&mut self.store).await {
      Ok(h) => {
        self.select(&h.id);
        self.wizard_focus = 0;
        self.sync_option_cursor();
        self.screen = Screen::Library;
        self.report(Ok("Heuristic created".to_owned()));
      }
      Err(e) => self.status_msg = format!("Error: {e}"),
    }
  }
}
