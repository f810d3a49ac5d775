//! In-process implementations of the persistence traits.
//!
//! [`Unconfigured`] and [`NoFallback`] stand in when there is no backend at
//! all. [`MemoryAdapter`] and [`MemoryFallback`] keep their state behind an
//! `Arc`, so a clone handed to the store shares it with the caller; tests use
//! this to inspect what was synced and to simulate remote failures.

use std::{
  convert::Infallible,
  sync::{Arc, Mutex, MutexGuard},
};

use thiserror::Error;

use crate::{
  adapter::{FallbackStorage, PersistenceAdapter},
  error::SyncOperation,
  heuristic::{Heuristic, HeuristicId},
};

// ─── Unconfigured ────────────────────────────────────────────────────────────

/// An adapter with no backend. `is_configured` is `false`, so the store never
/// calls it.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unconfigured;

impl PersistenceAdapter for Unconfigured {
  type Error = Infallible;

  fn is_configured(&self) -> bool { false }

  async fn load(&self) -> Result<Vec<Heuristic>, Infallible> { Ok(Vec::new()) }

  async fn create(&self, heuristic: &Heuristic) -> Result<Heuristic, Infallible> {
    Ok(heuristic.clone())
  }

  async fn update(
    &self,
    _id: &HeuristicId,
    heuristic: &Heuristic,
  ) -> Result<Heuristic, Infallible> {
    Ok(heuristic.clone())
  }

  async fn delete(&self, _id: &HeuristicId) -> Result<(), Infallible> { Ok(()) }
}

/// A fallback that stores nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFallback;

impl FallbackStorage for NoFallback {
  type Error = Infallible;

  async fn read(&self) -> Result<Option<Vec<Heuristic>>, Infallible> { Ok(None) }

  async fn write(&self, _heuristics: &[Heuristic]) -> Result<(), Infallible> {
    Ok(())
  }
}

// ─── MemoryAdapter ───────────────────────────────────────────────────────────

/// Error returned by [`MemoryAdapter`] while failure simulation is on.
#[derive(Debug, Error)]
pub enum MemoryError {
  #[error("simulated {0} failure")]
  Simulated(SyncOperation),

  #[error("no remote item with id {0}")]
  Missing(HeuristicId),
}

#[derive(Debug, Default)]
struct AdapterState {
  items:   Vec<Heuristic>,
  calls:   Vec<SyncOperation>,
  failing: bool,
}

/// A remote collection held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryAdapter {
  state: Arc<Mutex<AdapterState>>,
}

impl MemoryAdapter {
  pub fn new() -> Self { Self::default() }

  /// Start with `items` already in the collection.
  pub fn with_items(items: Vec<Heuristic>) -> Self {
    let adapter = Self::default();
    adapter.lock().items = items;
    adapter
  }

  /// Make every subsequent call fail (or succeed again).
  pub fn set_failing(&self, failing: bool) { self.lock().failing = failing; }

  /// Snapshot of the remote items.
  pub fn items(&self) -> Vec<Heuristic> { self.lock().items.clone() }

  /// Every call received so far, in order, including failed ones.
  pub fn calls(&self) -> Vec<SyncOperation> { self.lock().calls.clone() }

  fn lock(&self) -> MutexGuard<'_, AdapterState> {
    self.state.lock().unwrap_or_else(|e| e.into_inner())
  }

  fn begin(&self, op: SyncOperation) -> Result<MutexGuard<'_, AdapterState>, MemoryError> {
    let mut state = self.lock();
    state.calls.push(op);
    if state.failing {
      return Err(MemoryError::Simulated(op));
    }
    Ok(state)
  }
}

impl PersistenceAdapter for MemoryAdapter {
  type Error = MemoryError;

  fn is_configured(&self) -> bool { true }

  async fn load(&self) -> Result<Vec<Heuristic>, MemoryError> {
    Ok(self.begin(SyncOperation::Load)?.items.clone())
  }

  async fn create(&self, heuristic: &Heuristic) -> Result<Heuristic, MemoryError> {
    self.begin(SyncOperation::Create)?.items.push(heuristic.clone());
    Ok(heuristic.clone())
  }

  async fn update(
    &self,
    id: &HeuristicId,
    heuristic: &Heuristic,
  ) -> Result<Heuristic, MemoryError> {
    let mut state = self.begin(SyncOperation::Update)?;
    let item = state
      .items
      .iter_mut()
      .find(|h| &h.id == id)
      .ok_or_else(|| MemoryError::Missing(id.clone()))?;
    *item = heuristic.clone();
    Ok(heuristic.clone())
  }

  async fn delete(&self, id: &HeuristicId) -> Result<(), MemoryError> {
    let mut state = self.begin(SyncOperation::Delete)?;
    let before = state.items.len();
    state.items.retain(|h| &h.id != id);
    if state.items.len() == before {
      return Err(MemoryError::Missing(id.clone()));
    }
    Ok(())
  }
}

// ─── MemoryFallback ──────────────────────────────────────────────────────────

/// A fallback snapshot held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryFallback {
  snapshot: Arc<Mutex<Option<Vec<Heuristic>>>>,
}

impl MemoryFallback {
  pub fn new() -> Self { Self::default() }

  pub fn with_snapshot(heuristics: Vec<Heuristic>) -> Self {
    Self { snapshot: Arc::new(Mutex::new(Some(heuristics))) }
  }

  pub fn snapshot(&self) -> Option<Vec<Heuristic>> {
    self.snapshot.lock().unwrap_or_else(|e| e.into_inner()).clone()
  }
}

impl FallbackStorage for MemoryFallback {
  type Error = Infallible;

  async fn read(&self) -> Result<Option<Vec<Heuristic>>, Infallible> {
    Ok(self.snapshot())
  }

  async fn write(&self, heuristics: &[Heuristic]) -> Result<(), Infallible> {
    *self.snapshot.lock().unwrap_or_else(|e| e.into_inner()) =
      Some(heuristics.to_vec());
    Ok(())
  }
}
