//! Behavioural tests for `HeuristicStore` against the in-memory backends.

use pretty_assertions::assert_eq;

use crate::{
  Error,
  adapter::SyncPolicy,
  catalog::Status,
  error::{SyncOperation, ValidationError},
  heuristic::{Draft, Field, Heuristic, HeuristicId},
  history::HistoryEntry,
  memory::{MemoryAdapter, MemoryFallback, Unconfigured},
  store::{HeuristicStore, LoadSource},
};

fn draft() -> Draft {
  let mut d = Draft::default();
  d.set(Field::ElementType, "button").unwrap();
  d.set(Field::Category, "layout").unwrap();
  d.set(Field::Subcategory, "sizing").unwrap();
  d.set(Field::Action, "resize_aspect").unwrap();
  d.set(Field::OutputValue, "width-100pct_height-auto").unwrap();
  d
}

fn record(id: &str) -> Heuristic { Heuristic::from_draft(id.into(), &draft()) }

async fn local_store_with_one() -> (HeuristicStore<Unconfigured>, HeuristicId) {
  let mut store = HeuristicStore::new(Unconfigured);
  let h = store.create(&draft()).await.unwrap();
  (store, h.id)
}

// ─── Create ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_assigns_fresh_ids_and_empty_history() {
  let mut store = HeuristicStore::new(Unconfigured);
  let a = store.create(&draft()).await.unwrap();
  let b = store.create(&draft()).await.unwrap();

  assert_ne!(a.id, b.id);
  assert_eq!(store.len(), 2);
  assert!(a.history.is_empty());
  assert_eq!(a.status, Status::Active);
  assert_eq!(a.parent_type, "any");
  assert_eq!(a.condition_type, "none");
}

#[tokio::test]
async fn create_rejects_invalid_drafts_without_growing() {
  let mut store = HeuristicStore::new(Unconfigured);

  let mut missing = draft();
  missing.element_type.clear();
  let err = store.create(&missing).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Validation(ValidationError::Missing(Field::ElementType))
  ));

  let mut unknown = draft();
  unknown.action = "teleport".into();
  let err = store.create(&unknown).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Validation(ValidationError::UnknownValue { field: Field::Action, .. })
  ));

  assert!(store.is_empty());
}

#[tokio::test]
async fn create_without_an_action_is_rejected() {
  let (mut store, _) = local_store_with_one().await;

  let mut missing = draft();
  missing.action.clear();
  let err = store.create(&missing).await.unwrap_err();
  assert!(matches!(
    err,
    Error::Validation(ValidationError::Missing(Field::Action))
  ));
  assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn create_needs_only_element_and_action() {
  let mut store = HeuristicStore::new(Unconfigured);

  let mut minimal = Draft::default();
  minimal.element_type = "button".into();
  minimal.action = "hide".into();
  minimal.parent_type.clear();
  minimal.condition_type.clear();

  let h = store.create(&minimal).await.unwrap();
  assert_eq!(store.len(), 1);
  assert_eq!(h.parent_type, "any");
  assert_eq!(h.condition_type, "none");
  assert_eq!(h.category, "");
  assert_eq!(h.output_value, "");
}

#[tokio::test]
async fn create_forwards_the_local_id() {
  let remote = MemoryAdapter::new();
  let mut store = HeuristicStore::new(remote.clone());
  let h = store.create(&draft()).await.unwrap();

  assert_eq!(remote.calls(), vec![SyncOperation::Create]);
  assert_eq!(remote.items(), vec![h.clone()]);
  assert!(store.last_error().is_none());
}

// ─── Update ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn each_update_appends_one_history_entry() {
  let (mut store, id) = local_store_with_one().await;

  for value in ["width-320px", "width-100pct", "height-keep"] {
    store.update_field(&id, Field::OutputValue, value).await.unwrap();
  }

  let h = store.get(&id).unwrap();
  let log = h.history(Field::OutputValue);
  assert_eq!(log.len(), 3);
  assert_eq!(h.output_value, "height-keep");
  assert_eq!(log[0].previous_value, "width-100pct_height-auto");
  assert_eq!(log[0].new_value, "width-320px");
  assert_eq!(log[2].previous_value, "width-100pct");
  assert!(log.iter().all(|e| !e.is_revert));
  assert!(h.history(Field::Action).is_empty());
}

#[tokio::test]
async fn update_rejects_values_outside_the_catalog() {
  let (mut store, id) = local_store_with_one().await;

  let err = store
    .update_field(&id, Field::ElementType, "spaceship")
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Validation(_)));

  let err = store
    .update_field(&id, Field::Subcategory, "shadows")
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Validation(ValidationError::SubcategoryMismatch { .. })
  ));

  let h = store.get(&id).unwrap();
  assert_eq!(h.element_type, "button");
  assert_eq!(h.subcategory, "sizing");
  assert!(h.history.is_empty());
}

#[tokio::test]
async fn update_unknown_id_is_not_found() {
  let (mut store, _) = local_store_with_one().await;
  let err = store
    .update_field(&"nope".into(), Field::Action, "hide")
    .await
    .unwrap_err();
  assert!(matches!(err, Error::NotFound(id) if id.as_str() == "nope"));
}

#[tokio::test]
async fn status_changes_are_logged() {
  let (mut store, id) = local_store_with_one().await;
  store.update_status(&id, Status::Pending).await.unwrap();
  store.update_status(&id, Status::Canceled).await.unwrap();

  let h = store.get(&id).unwrap();
  assert_eq!(h.status, Status::Canceled);
  let log = h.history(Field::Status);
  assert_eq!(log.len(), 2);
  assert_eq!(log[0].previous_value, "Active");
  assert_eq!(log[1].new_value, "Canceled");
}

#[tokio::test]
async fn changing_category_clears_a_mismatched_subcategory() {
  let (mut store, id) = local_store_with_one().await;

  let h = store.update_field(&id, Field::Category, "style").await.unwrap();
  assert_eq!(h.category, "style");
  assert_eq!(h.subcategory, "");
  let log = h.history(Field::Subcategory);
  assert_eq!(log.len(), 1);
  assert_eq!(log[0].previous_value, "sizing");
  assert_eq!(log[0].new_value, "");

  store.update_field(&id, Field::Subcategory, "shadows").await.unwrap();
  let h = store.update_field(&id, Field::Category, "style").await.unwrap();
  assert_eq!(h.subcategory, "shadows");
  assert_eq!(h.history(Field::Subcategory).len(), 2);
}

// ─── Revert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn revert_restores_the_previous_value_as_a_new_entry() {
  let (mut store, id) = local_store_with_one().await;
  store.update_field(&id, Field::Action, "hide").await.unwrap();

  let h = store.revert_field(&id, Field::Action, 0).await.unwrap();
  assert_eq!(h.action, "resize_aspect");

  let log = h.history(Field::Action);
  assert_eq!(log.len(), 2);
  assert!(log[1].is_revert);
  assert_eq!(log[1].reverted_from_index, Some(0));
  assert_eq!(log[1].previous_value, "hide");
  assert_eq!(log[1].new_value, "resize_aspect");
}

#[tokio::test]
async fn reverting_a_revert_restores_what_it_replaced() {
  let (mut store, id) = local_store_with_one().await;
  store.update_field(&id, Field::Action, "hide").await.unwrap();
  store.revert_field(&id, Field::Action, 0).await.unwrap();

  let h = store.revert_field(&id, Field::Action, 1).await.unwrap();
  assert_eq!(h.action, "hide");
  assert_eq!(h.history(Field::Action).len(), 3);
  assert_eq!(h.history(Field::Action)[2].reverted_from_index, Some(1));
}

#[tokio::test]
async fn revert_out_of_range_changes_nothing() {
  let (mut store, id) = local_store_with_one().await;
  store.update_field(&id, Field::Action, "hide").await.unwrap();

  let err = store.revert_field(&id, Field::Action, 1).await.unwrap_err();
  assert!(matches!(
    err,
    Error::IndexOutOfRange { field: Field::Action, index: 1, len: 1 }
  ));

  let err = store.revert_field(&id, Field::OutputValue, 0).await.unwrap_err();
  assert!(matches!(err, Error::IndexOutOfRange { len: 0, .. }));

  let h = store.get(&id).unwrap();
  assert_eq!(h.action, "hide");
  assert_eq!(h.history(Field::Action).len(), 1);
}

#[tokio::test]
async fn reverting_to_a_blank_status_restores_active() {
  let mut h = record("h1");
  h.status = Status::Pending;
  h.history.insert(Field::Status, vec![HistoryEntry::change("", "Pending")]);
  let mut store = HeuristicStore::new(Unconfigured);
  store.load(vec![h]);

  let id = HeuristicId::from("h1");
  let h = store.revert_field(&id, Field::Status, 0).await.unwrap();
  assert_eq!(h.status, Status::Active);
  let log = h.history(Field::Status);
  assert_eq!(log.len(), 2);
  assert_eq!(log[1].previous_value, "Pending");
  assert_eq!(log[1].new_value, "Active");
}

#[tokio::test]
async fn reverts_stay_local_unless_policy_says_otherwise() {
  let remote = MemoryAdapter::new();
  let mut store = HeuristicStore::new(remote.clone());
  let id = store.create(&draft()).await.unwrap().id;
  store.update_field(&id, Field::Action, "hide").await.unwrap();
  store.revert_field(&id, Field::Action, 0).await.unwrap();

  assert_eq!(remote.calls(), vec![SyncOperation::Create, SyncOperation::Update]);
  assert_eq!(remote.items()[0].action, "hide");

  let remote = MemoryAdapter::new();
  let policy = SyncPolicy { sync_reverts: true, ..SyncPolicy::default() };
  let mut store = HeuristicStore::new(remote.clone()).with_policy(policy);
  let id = store.create(&draft()).await.unwrap().id;
  store.update_field(&id, Field::Action, "hide").await.unwrap();
  store.revert_field(&id, Field::Action, 0).await.unwrap();

  assert_eq!(remote.calls(), vec![
    SyncOperation::Create,
    SyncOperation::Update,
    SyncOperation::Update,
  ]);
  assert_eq!(remote.items()[0].action, "resize_aspect");
}

// ─── Delete ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_removes_exactly_one_record() {
  let mut store = HeuristicStore::new(Unconfigured);
  let a = store.create(&draft()).await.unwrap();
  let b = store.create(&draft()).await.unwrap();

  let removed = store.delete(&a.id).await.unwrap();
  assert_eq!(removed.id, a.id);
  assert_eq!(store.len(), 1);
  assert!(store.get(&a.id).is_none());
  assert!(store.get(&b.id).is_some());
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
  let (mut store, _) = local_store_with_one().await;
  let err = store.delete(&"missing".into()).await.unwrap_err();
  assert!(matches!(err, Error::NotFound(_)));
  assert_eq!(store.len(), 1);
}

// ─── Remote failures ─────────────────────────────────────────────────────────

#[tokio::test]
async fn remote_failure_keeps_local_state_and_records_the_error() {
  let remote = MemoryAdapter::new();
  let mut store = HeuristicStore::new(remote.clone());
  let id = store.create(&draft()).await.unwrap().id;

  remote.set_failing(true);
  let h = store.update_field(&id, Field::Action, "hide").await.unwrap();
  assert_eq!(h.action, "hide");
  assert_eq!(store.get(&id).unwrap().history(Field::Action).len(), 1);

  let err = store.last_error().unwrap();
  assert_eq!(err.operation, SyncOperation::Update);
  assert!(err.message.contains("simulated"));

  store.delete(&id).await.unwrap();
  assert!(store.is_empty());
  assert_eq!(store.last_error().unwrap().operation, SyncOperation::Delete);

  remote.set_failing(false);
  store.create(&draft()).await.unwrap();
  assert!(store.last_error().is_none());
}

#[tokio::test]
async fn unconfigured_adapter_is_never_called() {
  let (mut store, id) = local_store_with_one().await;
  assert!(!store.is_remote_configured());
  store.update_field(&id, Field::Action, "hide").await.unwrap();
  assert!(!store.refresh().await);
  assert!(store.last_error().is_none());
  assert_eq!(store.len(), 1);
}

// ─── Loading and mirroring ───────────────────────────────────────────────────

#[tokio::test]
async fn load_replaces_wholesale_and_drops_duplicate_ids() {
  let (mut store, _) = local_store_with_one().await;
  store.load(vec![record("a"), record("b"), record("a")]);

  let ids: Vec<&str> = store.all().iter().map(|h| h.id.as_str()).collect();
  assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn bootstrap_prefers_the_remote_and_mirrors_it() {
  let remote = MemoryAdapter::with_items(vec![record("r1"), record("r2")]);
  let local = MemoryFallback::with_snapshot(vec![record("stale")]);
  let mut store = HeuristicStore::with_fallback(remote, local.clone());

  assert_eq!(store.bootstrap().await, LoadSource::Remote);
  assert_eq!(store.len(), 2);
  assert_eq!(local.snapshot().unwrap(), store.all().to_vec());
}

#[tokio::test]
async fn bootstrap_falls_back_when_the_remote_fails() {
  let remote = MemoryAdapter::with_items(vec![record("r1")]);
  remote.set_failing(true);
  let local = MemoryFallback::with_snapshot(vec![record("l1"), record("l2")]);
  let mut store = HeuristicStore::with_fallback(remote, local);

  assert_eq!(store.bootstrap().await, LoadSource::Fallback);
  assert_eq!(store.len(), 2);
  assert_eq!(store.last_error().unwrap().operation, SyncOperation::Load);
}

#[tokio::test]
async fn bootstrap_with_nothing_stored_is_empty() {
  let mut store = HeuristicStore::with_fallback(Unconfigured, MemoryFallback::new());
  assert_eq!(store.bootstrap().await, LoadSource::Empty);
  assert!(store.is_empty());
}

#[tokio::test]
async fn every_mutation_rewrites_the_fallback() {
  let local = MemoryFallback::new();
  let mut store = HeuristicStore::with_fallback(Unconfigured, local.clone());

  let id = store.create(&draft()).await.unwrap().id;
  assert_eq!(local.snapshot().unwrap().len(), 1);

  store.update_field(&id, Field::Action, "hide").await.unwrap();
  assert_eq!(local.snapshot().unwrap()[0].action, "hide");

  store.revert_field(&id, Field::Action, 0).await.unwrap();
  assert_eq!(local.snapshot().unwrap()[0].history(Field::Action).len(), 2);

  store.delete(&id).await.unwrap();
  assert_eq!(local.snapshot(), Some(Vec::new()));
}

#[tokio::test]
async fn refresh_replaces_local_records_from_the_remote() {
  let remote = MemoryAdapter::new();
  let mut store = HeuristicStore::new(remote.clone());
  store.create(&draft()).await.unwrap();

  let other = MemoryAdapter::with_items(vec![record("x")]);
  let mut fresh = HeuristicStore::new(other);
  assert!(fresh.refresh().await);
  assert_eq!(fresh.all()[0].id.as_str(), "x");

  remote.set_failing(true);
  assert!(!store.refresh().await);
  assert_eq!(store.len(), 1);
  assert_eq!(store.last_error().unwrap().operation, SyncOperation::Load);
}
