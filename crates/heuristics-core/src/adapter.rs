//! Persistence collaborators: the remote `PersistenceAdapter` and the local
//! `FallbackStorage`.
//!
//! Both traits are implemented outside this crate (`heuristics-cms`,
//! `heuristics-store-sqlite`) plus the in-memory versions in
//! [`crate::memory`]. The record store depends only on these abstractions.

use std::future::Future;

use crate::heuristic::{Heuristic, HeuristicId};

// ─── Consistency policy ──────────────────────────────────────────────────────

/// How local state and the remote collection relate.
///
/// There is a single policy. Local state is authoritative: every mutation is
/// applied locally first, then at most one adapter call is made. A failed call
/// is reported through the store's last error and is never rolled back or
/// retried. Adapters must not assume they see every revert (see
/// [`SyncPolicy::sync_reverts`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsistencyPolicy {
  /// Eventual, last-writer-local-wins.
  #[default]
  LocalWins,
}

/// Which mutations are forwarded to the adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncPolicy {
  pub consistency:  ConsistencyPolicy,
  /// Forward reverts as updates. Off by default: reverts stay local until the
  /// next forwarded edit of the same record carries the reverted value along.
  pub sync_reverts: bool,
}

// ─── Remote adapter ──────────────────────────────────────────────────────────

/// A remote document collection holding heuristics.
///
/// All methods return `Send` futures so the store can run inside a
/// multi-threaded tokio runtime.
pub trait PersistenceAdapter: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Whether the adapter has enough configuration to reach its backend. An
  /// unconfigured adapter is never called.
  fn is_configured(&self) -> bool;

  /// Fetch the whole collection.
  fn load(
    &self,
  ) -> impl Future<Output = Result<Vec<Heuristic>, Self::Error>> + Send + '_;

  /// Insert a committed record. The remote item carries the locally assigned
  /// id.
  fn create<'a>(
    &'a self,
    heuristic: &'a Heuristic,
  ) -> impl Future<Output = Result<Heuristic, Self::Error>> + Send + 'a;

  /// Replace the remote item `id` with the full record.
  fn update<'a>(
    &'a self,
    id: &'a HeuristicId,
    heuristic: &'a Heuristic,
  ) -> impl Future<Output = Result<Heuristic, Self::Error>> + Send + 'a;

  /// Remove the remote item `id`.
  fn delete<'a>(
    &'a self,
    id: &'a HeuristicId,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}

// ─── Local fallback ──────────────────────────────────────────────────────────

/// Local mirror of the collection, read when the adapter is unconfigured or
/// fails at load time and rewritten after every local mutation.
pub trait FallbackStorage: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// The last snapshot written, or `None` if nothing was ever stored.
  fn read(
    &self,
  ) -> impl Future<Output = Result<Option<Vec<Heuristic>>, Self::Error>> + Send + '_;

  /// Replace the stored snapshot.
  fn write<'a>(
    &'a self,
    heuristics: &'a [Heuristic],
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;
}
