//! `CmsAdapter` against a mock data-items server.

use heuristics_cms::{CmsAdapter, CollectionConfig, Error, FieldShape};
use heuristics_core::{
  adapter::PersistenceAdapter,
  catalog::Status,
  error::SyncOperation,
  heuristic::{Draft, Field, Heuristic},
  store::{HeuristicStore, LoadSource},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::{
  Mock, MockServer, ResponseTemplate,
  matchers::{body_partial_json, header, method, path, query_param},
};

fn adapter(server: &MockServer, shape: FieldShape) -> CmsAdapter {
  let mut config = CollectionConfig::new(server.uri(), "Import5", shape);
  config.api_key = Some("secret".into());
  config.site_id = Some("site-1".into());
  CmsAdapter::new(config).unwrap()
}

fn record(id: &str) -> Heuristic {
  let mut d = Draft::default();
  d.set(Field::ElementType, "button").unwrap();
  d.set(Field::Category, "layout").unwrap();
  d.set(Field::Subcategory, "sizing").unwrap();
  d.set(Field::Action, "resize_aspect").unwrap();
  d.set(Field::OutputValue, "width-100pct_height-auto").unwrap();
  Heuristic::from_draft(id.into(), &d)
}

// ─── Query ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn load_maps_six_step_items() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/wix-data/v2/items/query"))
    .and(header("Authorization", "secret"))
    .and(header("wix-site-id", "site-1"))
    .and(body_partial_json(json!({ "dataCollectionId": "Import5" })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "dataItems": [
        {
          "id": "a",
          "data": {
            "step1_who_element": "image",
            "step5_action": "hide",
            "status": "Canceled",
          }
        },
        { "data": { "_id": "b", "step1_who_element": "tabs" } }
      ],
      "pagingMetadata": { "count": 2, "hasNext": false }
    })))
    .expect(1)
    .mount(&server)
    .await;

  let items = adapter(&server, FieldShape::SixStep).load().await.unwrap();
  assert_eq!(items.len(), 2);
  assert_eq!(items[0].id.as_str(), "a");
  assert_eq!(items[0].status, Status::Canceled);
  assert_eq!(items[0].parent_type, "any");
  assert_eq!(items[1].id.as_str(), "b");
  assert_eq!(items[1].condition_type, "none");
}

#[tokio::test]
async fn load_follows_pages() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/wix-data/v2/items/query"))
    .and(body_partial_json(json!({ "query": { "paging": { "offset": 0 } } })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "dataItems": [{ "id": "a", "data": {} }],
      "pagingMetadata": { "hasNext": true }
    })))
    .mount(&server)
    .await;
  Mock::given(method("POST"))
    .and(path("/wix-data/v2/items/query"))
    .and(body_partial_json(json!({ "query": { "paging": { "offset": 1 } } })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "dataItems": [{ "id": "b", "data": {} }],
      "pagingMetadata": { "hasNext": false }
    })))
    .mount(&server)
    .await;

  let items = adapter(&server, FieldShape::SixStep).load().await.unwrap();
  let ids: Vec<&str> = items.iter().map(|h| h.id.as_str()).collect();
  assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn error_status_carries_the_body() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/wix-data/v2/items/query"))
    .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
    .mount(&server)
    .await;

  let err = adapter(&server, FieldShape::SixStep).load().await.unwrap_err();
  match err {
    Error::Status { status, body, .. } => {
      assert_eq!(status.as_u16(), 403);
      assert_eq!(body, "forbidden");
    }
    other => panic!("unexpected error: {other}"),
  }
}

#[tokio::test]
async fn unconfigured_adapter_refuses_calls() {
  let adapter = CmsAdapter::new(CollectionConfig::default()).unwrap();
  assert!(!adapter.is_configured());
  assert!(matches!(adapter.load().await, Err(Error::NotConfigured)));
}

// ─── Writes ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_sends_the_local_id_and_history_string() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/wix-data/v2/items"))
    .and(body_partial_json(json!({
      "dataCollectionId": "Import5",
      "dataItem": {
        "id": "h1",
        "data": {
          "_id": "h1",
          "step1_who_element": "button",
          "status": "Active",
          "history": "{}"
        }
      }
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "dataItem": { "id": "h1", "data": { "step1_who_element": "button" } }
    })))
    .expect(1)
    .mount(&server)
    .await;

  let created = adapter(&server, FieldShape::SixStep)
    .create(&record("h1"))
    .await
    .unwrap();
  assert_eq!(created.id.as_str(), "h1");
}

#[tokio::test]
async fn update_and_delete_address_the_item() {
  let server = MockServer::start().await;
  Mock::given(method("PUT"))
    .and(path("/wix-data/v2/items/h1"))
    .and(body_partial_json(json!({
      "dataItem": { "data": { "decision": "resize_aspect" } }
    })))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("DELETE"))
    .and(path("/wix-data/v2/items/h1"))
    .and(query_param("dataCollectionId", "Import5"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
    .expect(1)
    .mount(&server)
    .await;

  let cms = adapter(&server, FieldShape::Legacy);
  let h = record("h1");
  let updated = cms.update(&h.id, &h).await.unwrap();
  assert_eq!(updated, h);
  cms.delete(&h.id).await.unwrap();
}

// ─── With the record store ───────────────────────────────────────────────────

#[tokio::test]
async fn store_keeps_local_edits_when_the_server_fails() {
  let server = MockServer::start().await;
  Mock::given(method("POST"))
    .and(path("/wix-data/v2/items/query"))
    .respond_with(ResponseTemplate::new(200).set_body_json(json!({
      "dataItems": [{ "id": "h1", "data": { "step1_who_element": "button", "step5_action": "hide" } }]
    })))
    .mount(&server)
    .await;
  Mock::given(method("PUT"))
    .and(path("/wix-data/v2/items/h1"))
    .respond_with(ResponseTemplate::new(500))
    .mount(&server)
    .await;

  let mut store = HeuristicStore::new(adapter(&server, FieldShape::SixStep));
  assert_eq!(store.bootstrap().await, LoadSource::Remote);

  let id = store.all()[0].id.clone();
  let h = store.update_field(&id, Field::Action, "show").await.unwrap();
  assert_eq!(h.action, "show");
  assert_eq!(store.last_error().unwrap().operation, SyncOperation::Update);
}
