//! [`HeuristicStore`]: the in-memory collection of heuristics.
//!
//! The store owns the records, the remote [`PersistenceAdapter`] and the local
//! [`FallbackStorage`]. Each mutation validates, applies the change locally,
//! appends history, then makes at most one adapter call. Adapter failures are
//! kept as the last error; local state is never rolled back.

use tracing::{debug, info, warn};

use crate::{
  adapter::{FallbackStorage, PersistenceAdapter, SyncPolicy},
  catalog::{self, Status},
  error::{AdapterError, Error, Result, SyncOperation},
  heuristic::{Draft, Field, Heuristic, HeuristicId},
  history::HistoryEntry,
  memory::NoFallback,
};

/// Where [`HeuristicStore::bootstrap`] found its records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
  Remote,
  Fallback,
  Empty,
}

// ─── Store ───────────────────────────────────────────────────────────────────

pub struct HeuristicStore<A, F = NoFallback> {
  records:    Vec<Heuristic>,
  adapter:    A,
  fallback:   F,
  policy:     SyncPolicy,
  last_error: Option<AdapterError>,
}

impl<A: PersistenceAdapter> HeuristicStore<A> {
  /// A store with no local fallback.
  pub fn new(adapter: A) -> Self { Self::with_fallback(adapter, NoFallback) }
}

impl<A, F> HeuristicStore<A, F>
where
  A: PersistenceAdapter,
  F: FallbackStorage,
{
  pub fn with_fallback(adapter: A, fallback: F) -> Self {
    Self {
      records: Vec::new(),
      adapter,
      fallback,
      policy: SyncPolicy::default(),
      last_error: None,
    }
  }

  pub fn with_policy(mut self, policy: SyncPolicy) -> Self {
    self.policy = policy;
    self
  }

  // ── Reads ─────────────────────────────────────────────────────────────────

  /// All records in insertion order.
  pub fn all(&self) -> &[Heuristic] { &self.records }

  pub fn get(&self, id: &HeuristicId) -> Option<&Heuristic> {
    self.records.iter().find(|h| &h.id == id)
  }

  pub fn len(&self) -> usize { self.records.len() }

  pub fn is_empty(&self) -> bool { self.records.is_empty() }

  pub fn policy(&self) -> SyncPolicy { self.policy }

  pub fn is_remote_configured(&self) -> bool { self.adapter.is_configured() }

  /// The most recent remote sync failure, if the last remote call failed.
  pub fn last_error(&self) -> Option<&AdapterError> { self.last_error.as_ref() }

  pub fn take_last_error(&mut self) -> Option<AdapterError> {
    self.last_error.take()
  }

  // ── Loading ───────────────────────────────────────────────────────────────

  /// Replace the collection wholesale. No history is appended. Records whose
  /// id was already seen are dropped.
  pub fn load(&mut self, initial: Vec<Heuristic>) {
    let mut records: Vec<Heuristic> = Vec::with_capacity(initial.len());
    for h in initial {
      if records.iter().any(|r| r.id == h.id) {
        warn!(id = %h.id, "dropping heuristic with duplicate id");
        continue;
      }
      records.push(h);
    }
    self.records = records;
  }

  /// Startup load: remote collection first, local fallback when the adapter
  /// is unconfigured or fails.
  pub async fn bootstrap(&mut self) -> LoadSource {
    self.last_error = None;

    if self.adapter.is_configured() {
      let result = self.adapter.load().await;
      if let Some(records) = self.settle(SyncOperation::Load, result) {
        info!(count = records.len(), "loaded heuristics from remote collection");
        self.load(records);
        self.mirror().await;
        return LoadSource::Remote;
      }
    }

    match self.fallback.read().await {
      Ok(Some(records)) => {
        info!(count = records.len(), "loaded heuristics from local fallback");
        self.load(records);
        LoadSource::Fallback
      }
      Ok(None) => LoadSource::Empty,
      Err(e) => {
        warn!(error = %e, "failed to read local fallback");
        LoadSource::Empty
      }
    }
  }

  /// Re-fetch from the remote collection. Returns `false` (and leaves the
  /// local collection alone) when unconfigured or on failure.
  pub async fn refresh(&mut self) -> bool {
    if !self.adapter.is_configured() {
      return false;
    }
    self.last_error = None;
    let result = self.adapter.load().await;
    match self.settle(SyncOperation::Load, result) {
      Some(records) => {
        self.load(records);
        self.mirror().await;
        true
      }
      None => false,
    }
  }

  // ── Mutations ─────────────────────────────────────────────────────────────

  /// Commit a draft as a new record with a fresh id and empty history.
  pub async fn create(&mut self, draft: &Draft) -> Result<Heuristic> {
    draft.validate()?;

    let mut id = HeuristicId::generate();
    while self.get(&id).is_some() {
      id = HeuristicId::generate();
    }
    let heuristic = Heuristic::from_draft(id, draft);
    self.records.push(heuristic.clone());
    debug!(id = %heuristic.id, "created heuristic");

    self.last_error = None;
    if self.adapter.is_configured() {
      let result = self.adapter.create(&heuristic).await;
      self.settle(SyncOperation::Create, result);
    }
    self.mirror().await;
    Ok(heuristic)
  }

  /// Set `field` to `value`, logging the previous value in the field history.
  /// A category change also clears a subcategory that no longer belongs to it,
  /// with its own history entry.
  pub async fn update_field(
    &mut self,
    id: &HeuristicId,
    field: Field,
    value: impl Into<String>,
  ) -> Result<Heuristic> {
    let value = value.into();
    let index = self.position(id)?;
    let record = &mut self.records[index];
    catalog::validate(field, &value, &record.category)?;

    let previous = record.value(field).to_owned();
    if field == Field::Category
      && previous != value
      && !record.subcategory.is_empty()
      && !catalog::is_valid_pair(&value, &record.subcategory)
    {
      let stale = std::mem::take(&mut record.subcategory);
      record.push_history(Field::Subcategory, HistoryEntry::change(stale, ""));
    }
    record.assign(field, value.clone())?;
    record.push_history(field, HistoryEntry::change(previous, value));
    let updated = record.clone();
    debug!(id = %id, %field, "updated heuristic field");

    self.forward(&updated).await;
    self.mirror().await;
    Ok(updated)
  }

  /// [`update_field`](Self::update_field) for the status field.
  pub async fn update_status(
    &mut self,
    id: &HeuristicId,
    status: Status,
  ) -> Result<Heuristic> {
    self.update_field(id, Field::Status, status.as_str()).await
  }

  /// Restore `history[field][index].previous_value` as a new forward entry.
  pub async fn revert_field(
    &mut self,
    id: &HeuristicId,
    field: Field,
    index: usize,
  ) -> Result<Heuristic> {
    let position = self.position(id)?;
    let record = &mut self.records[position];
    let log = record.history(field);
    let restored = log
      .get(index)
      .map(|entry| entry.previous_value.clone())
      .ok_or(Error::IndexOutOfRange { field, index, len: log.len() })?;
    // Status logs written before the field existed hold a blank value.
    let restored = if field == Field::Status && restored.is_empty() {
      Status::default().as_str().to_owned()
    } else {
      restored
    };

    let current = record.value(field).to_owned();
    record.assign(field, restored.clone())?;
    record.push_history(field, HistoryEntry::revert(current, restored, index));
    let updated = record.clone();
    debug!(id = %id, %field, index, "reverted heuristic field");

    if self.policy.sync_reverts {
      self.forward(&updated).await;
    }
    self.mirror().await;
    Ok(updated)
  }

  /// Remove a record. The remote delete is attempted afterwards; its failure
  /// does not bring the record back.
  pub async fn delete(&mut self, id: &HeuristicId) -> Result<Heuristic> {
    let position = self.position(id)?;
    let removed = self.records.remove(position);
    debug!(id = %id, "deleted heuristic");

    self.last_error = None;
    if self.adapter.is_configured() {
      let result = self.adapter.delete(id).await;
      self.settle(SyncOperation::Delete, result);
    }
    self.mirror().await;
    Ok(removed)
  }

  // ── Helpers ───────────────────────────────────────────────────────────────

  fn position(&self, id: &HeuristicId) -> Result<usize> {
    self
      .records
      .iter()
      .position(|h| &h.id == id)
      .ok_or_else(|| Error::NotFound(id.clone()))
  }

  async fn forward(&mut self, record: &Heuristic) {
    self.last_error = None;
    if self.adapter.is_configured() {
      let result = self.adapter.update(&record.id, record).await;
      self.settle(SyncOperation::Update, result);
    }
  }

  /// Record an adapter failure as the last error.
  fn settle<T>(
    &mut self,
    operation: SyncOperation,
    result: std::result::Result<T, A::Error>,
  ) -> Option<T> {
    match result {
      Ok(value) => Some(value),
      Err(e) => {
        warn!(%operation, error = %e, "remote sync failed");
        self.last_error = Some(AdapterError::new(operation, &e));
        None
      }
    }
  }

  /// Write the full collection to the local fallback.
  async fn mirror(&self) {
    if let Err(e) = self.fallback.write(&self.records).await {
      warn!(error = %e, "failed to write local fallback");
    }
  }
}
