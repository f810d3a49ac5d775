//! The six-question wizard that assembles a [`Draft`].
//!
//! Forward movement is gated on the current step's completion predicate;
//! backward and direct jumps are not. After each transition a short cooldown
//! swallows further requests so a double key press cannot skip a step.

use std::time::{Duration, Instant};

use strum::{EnumIter, IntoEnumIterator};
use tracing::debug;

use crate::{
  adapter::{FallbackStorage, PersistenceAdapter},
  error::{Result, ValidationError},
  heuristic::{Draft, Field, Heuristic},
  store::HeuristicStore,
};

/// Default cooldown after a transition.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(150);

// ─── Steps ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Step {
  Element = 1,
  Parent,
  Type,
  Condition,
  Action,
  Output,
}

impl Step {
  pub const FIRST: Step = Step::Element;
  pub const LAST: Step = Step::Output;

  pub fn number(self) -> u8 { self as u8 }

  pub fn from_number(n: u8) -> Option<Self> {
    Self::iter().find(|s| s.number() == n)
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Element => "Element",
      Self::Parent => "Parent",
      Self::Type => "Type",
      Self::Condition => "Condition",
      Self::Action => "Action",
      Self::Output => "Output",
    }
  }

  /// The question shown at the top of the step.
  pub fn title(self) -> &'static str {
    match self {
      Self::Element => "Which element?",
      Self::Parent => "Inside which parent?",
      Self::Type => "What type?",
      Self::Condition => "Under which condition?",
      Self::Action => "What happens?",
      Self::Output => "What is the result?",
    }
  }

  /// Draft fields edited on this step.
  pub fn fields(self) -> &'static [Field] {
    match self {
      Self::Element => &[Field::ElementType],
      Self::Parent => &[Field::ParentType],
      Self::Type => &[Field::Category, Field::Subcategory],
      Self::Condition => &[Field::ConditionType, Field::ConditionValue],
      Self::Action => &[Field::Action],
      Self::Output => &[Field::OutputValue],
    }
  }

  /// Whether `draft` answers this step's question.
  ///
  /// The `any` parent and `none` condition sentinels count as answers.
  pub fn is_complete(self, draft: &Draft) -> bool {
    match self {
      Self::Element => !draft.element_type.is_empty(),
      Self::Parent => !draft.parent_type.is_empty(),
      Self::Type => !draft.category.is_empty() && !draft.subcategory.is_empty(),
      Self::Condition => !draft.condition_type.is_empty(),
      Self::Action => !draft.action.is_empty(),
      Self::Output => !draft.output_value.is_empty(),
    }
  }

  fn offset(self, delta: i8) -> Option<Self> {
    Self::from_number(self.number().checked_add_signed(delta)?)
  }
}

// ─── Wizard ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Wizard {
  step:         Step,
  draft:        Draft,
  debounce:     Duration,
  locked_until: Option<Instant>,
}

impl Default for Wizard {
  fn default() -> Self { Self::with_debounce(DEFAULT_DEBOUNCE) }
}

impl Wizard {
  pub fn new() -> Self { Self::default() }

  /// A wizard whose transitions take effect back to back.
  pub fn without_debounce() -> Self { Self::with_debounce(Duration::ZERO) }

  pub fn with_debounce(debounce: Duration) -> Self {
    Self {
      step: Step::FIRST,
      draft: Draft::default(),
      debounce,
      locked_until: None,
    }
  }

  pub fn step(&self) -> Step { self.step }

  pub fn draft(&self) -> &Draft { &self.draft }

  /// Edit the draft. Editing is not subject to the transition cooldown.
  pub fn set(
    &mut self,
    field: Field,
    value: impl Into<String>,
  ) -> Result<(), ValidationError> {
    self.draft.set(field, value)
  }

  /// Whether the current step's predicate holds.
  pub fn can_proceed(&self) -> bool { self.step.is_complete(&self.draft) }

  /// Whether a transition cooldown is running.
  pub fn is_transitioning(&self) -> bool {
    self.locked_until.is_some_and(|t| Instant::now() < t)
  }

  /// Advance one step if the current step is complete. Returns whether the
  /// step changed.
  pub fn next(&mut self) -> bool {
    if !self.can_proceed() {
      return false;
    }
    match self.step.offset(1) {
      Some(target) => self.transition(target),
      None => false,
    }
  }

  /// Go back one step. Never validated.
  pub fn prev(&mut self) -> bool {
    match self.step.offset(-1) {
      Some(target) => self.transition(target),
      None => false,
    }
  }

  /// Jump to step `target` (1-based). Out-of-range targets are ignored.
  pub fn go_to(&mut self, target: u8) -> bool {
    match Step::from_number(target) {
      Some(step) => self.transition(step),
      None => false,
    }
  }

  /// Return to the first step and release the cooldown. The draft is kept.
  pub fn reset(&mut self) {
    self.step = Step::FIRST;
    self.locked_until = None;
  }

  /// Return to the first step with an empty draft.
  pub fn clear(&mut self) {
    self.reset();
    self.draft = Draft::default();
  }

  /// The first step whose predicate fails, if any.
  pub fn first_incomplete(&self) -> Option<Step> {
    Step::iter().find(|s| !s.is_complete(&self.draft))
  }

  /// Commit the draft through `store`. Only allowed from the output step with
  /// every step answered; on success the wizard starts over empty. On any
  /// local error the wizard is left as it was.
  pub async fn commit<A, F>(
    &mut self,
    store: &mut HeuristicStore<A, F>,
  ) -> Result<Heuristic>
  where
    A: PersistenceAdapter,
    F: FallbackStorage,
  {
    if self.step != Step::LAST {
      return Err(ValidationError::NotAtFinalStep(self.step).into());
    }
    if let Some(step) = self.first_incomplete() {
      return Err(ValidationError::Incomplete(step).into());
    }
    let heuristic = store.create(&self.draft).await?;
    self.clear();
    Ok(heuristic)
  }

  fn transition(&mut self, target: Step) -> bool {
    let now = Instant::now();
    if self.locked_until.is_some_and(|t| now < t) {
      debug!(from = self.step.number(), to = target.number(), "transition ignored during cooldown");
      return false;
    }
    debug!(from = self.step.number(), to = target.number(), "wizard transition");
    self.step = target;
    self.locked_until = (!self.debounce.is_zero()).then(|| now + self.debounce);
    true
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{
    catalog::Status,
    error::Error,
    memory::Unconfigured,
  };

  fn answer(wizard: &mut Wizard, step: Step) {
    let answers: &[(Field, &str)] = match step {
      Step::Element => &[(Field::ElementType, "button")],
      Step::Parent => &[(Field::ParentType, "any")],
      Step::Type => &[(Field::Category, "layout"), (Field::Subcategory, "sizing")],
      Step::Condition => &[(Field::ConditionType, "none")],
      Step::Action => &[(Field::Action, "resize_aspect")],
      Step::Output => &[(Field::OutputValue, "width-100pct_height-auto")],
    };
    for (field, value) in answers {
      wizard.set(*field, *value).unwrap();
    }
  }

  #[test]
  fn starts_at_step_one() {
    let w = Wizard::without_debounce();
    assert_eq!(w.step(), Step::Element);
    assert_eq!(w.step().number(), 1);
  }

  #[test]
  fn next_requires_the_current_answer() {
    let mut w = Wizard::without_debounce();
    assert!(!w.next());
    assert_eq!(w.step(), Step::Element);
    answer(&mut w, Step::Element);
    assert!(w.next());
    assert_eq!(w.step(), Step::Parent);
  }

  #[test]
  fn parent_any_counts_as_selected() {
    let mut w = Wizard::without_debounce();
    answer(&mut w, Step::Element);
    w.next();
    assert!(w.can_proceed());
    assert!(w.next());
    assert_eq!(w.step(), Step::Type);
  }

  #[test]
  fn step_three_needs_both_category_and_subcategory() {
    let mut w = Wizard::without_debounce();
    assert!(w.go_to(3));
    w.set(Field::Category, "layout").unwrap();
    assert!(!w.next());
    assert_eq!(w.step().number(), 3);
    w.set(Field::Subcategory, "sizing").unwrap();
    assert!(w.next());
    assert_eq!(w.step().number(), 4);
  }

  #[test]
  fn six_nexts_reach_the_last_step_and_a_seventh_does_nothing() {
    let mut w = Wizard::without_debounce();
    for step in Step::iter() {
      answer(&mut w, step);
    }
    for _ in 0..6 {
      w.next();
    }
    assert_eq!(w.step(), Step::Output);
    assert!(!w.next());
    assert_eq!(w.step(), Step::Output);
  }

  #[test]
  fn prev_is_unconditional_but_stops_at_one() {
    let mut w = Wizard::without_debounce();
    assert!(w.go_to(5));
    assert!(w.prev());
    assert_eq!(w.step(), Step::Condition);
    w.go_to(1);
    assert!(!w.prev());
    assert_eq!(w.step(), Step::Element);
  }

  #[test]
  fn go_to_ignores_out_of_range_targets() {
    let mut w = Wizard::without_debounce();
    assert!(!w.go_to(0));
    assert!(!w.go_to(7));
    assert_eq!(w.step(), Step::Element);
  }

  #[test]
  fn cooldown_swallows_back_to_back_transitions() {
    let mut w = Wizard::with_debounce(Duration::from_secs(60));
    assert!(w.go_to(4));
    assert!(w.is_transitioning());
    assert!(!w.go_to(2));
    assert!(!w.prev());
    assert_eq!(w.step(), Step::Condition);
    w.reset();
    assert!(!w.is_transitioning());
    assert_eq!(w.step(), Step::Element);
    assert!(w.go_to(2));
  }

  #[test]
  fn reset_keeps_the_draft_and_clear_drops_it() {
    let mut w = Wizard::without_debounce();
    answer(&mut w, Step::Element);
    w.reset();
    assert_eq!(w.draft().element_type, "button");
    w.clear();
    assert_eq!(w.draft(), &Draft::default());
  }

  #[tokio::test]
  async fn commit_creates_and_starts_over() {
    let mut store = HeuristicStore::new(Unconfigured);
    let mut w = Wizard::without_debounce();
    for step in Step::iter() {
      answer(&mut w, step);
      w.next();
    }
    let h = w.commit(&mut store).await.unwrap();
    assert_eq!(h.status, Status::Active);
    assert!(h.history.is_empty());
    assert_eq!(store.len(), 1);
    assert_eq!(w.step(), Step::Element);
    assert_eq!(w.draft(), &Draft::default());
  }

  #[tokio::test]
  async fn commit_refuses_before_the_last_step() {
    let mut store = HeuristicStore::new(Unconfigured);
    let mut w = Wizard::without_debounce();
    answer(&mut w, Step::Element);
    let err = w.commit(&mut store).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Validation(ValidationError::NotAtFinalStep(Step::Element))
    ));
    assert!(store.is_empty());
  }

  #[tokio::test]
  async fn commit_reports_the_first_unanswered_step() {
    let mut store = HeuristicStore::new(Unconfigured);
    let mut w = Wizard::without_debounce();
    answer(&mut w, Step::Element);
    w.go_to(6);
    let err = w.commit(&mut store).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Validation(ValidationError::Incomplete(Step::Type))
    ));
    assert_eq!(w.step(), Step::Output);
    assert_eq!(w.draft().element_type, "button");
  }
}
