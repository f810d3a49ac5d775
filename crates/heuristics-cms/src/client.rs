//! Async HTTP client for the hosted data-items API.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

use heuristics_core::{
  adapter::PersistenceAdapter,
  heuristic::{Heuristic, HeuristicId},
};

use crate::{CollectionConfig, Error, Result, shape};

const ITEMS_PATH: &str = "/wix-data/v2/items";

// ─── Wire types ──────────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct QueryRequest<'a> {
  data_collection_id: &'a str,
  query:              Query,
}

#[derive(Serialize)]
struct Query {
  paging: Paging,
}

#[derive(Serialize)]
struct Paging {
  limit:  u32,
  offset: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
  #[serde(default)]
  data_items:      Vec<DataItem>,
  #[serde(default)]
  paging_metadata: Option<PagingMetadata>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagingMetadata {
  #[serde(default)]
  has_next: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WriteRequest<'a> {
  data_collection_id: &'a str,
  data_item:          OutgoingItem<'a>,
}

#[derive(Serialize)]
struct OutgoingItem<'a> {
  id:   &'a str,
  data: Map<String, Value>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteResponse {
  #[serde(default)]
  data_item: Option<DataItem>,
}

#[derive(Deserialize)]
struct DataItem {
  #[serde(default)]
  id:   Option<String>,
  #[serde(default)]
  data: Map<String, Value>,
}

impl DataItem {
  /// The item id, falling back to `data._id`.
  fn id(&self) -> Option<HeuristicId> {
    self
      .id
      .as_deref()
      .or_else(|| self.data.get("_id").and_then(Value::as_str))
      .filter(|id| !id.is_empty())
      .map(HeuristicId::from)
  }
}

// ─── Adapter ─────────────────────────────────────────────────────────────────

/// A [`PersistenceAdapter`] over one remote collection.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct CmsAdapter {
  client: Client,
  config: CollectionConfig,
}

impl CmsAdapter {
  pub fn new(config: CollectionConfig) -> Result<Self> {
    let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}{ITEMS_PATH}{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> RequestBuilder {
    let req = match &self.config.api_key {
      Some(key) if !key.is_empty() => req.header("Authorization", key),
      _ => req,
    };
    match &self.config.site_id {
      Some(site) if !site.is_empty() => req.header("wix-site-id", site),
      _ => req,
    }
  }

  fn collection(&self) -> Result<&str> {
    if self.config.is_configured() {
      Ok(&self.config.collection_id)
    } else {
      Err(Error::NotConfigured)
    }
  }

  async fn check(request: &str, resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::Status { request: request.to_owned(), status, body })
  }

  fn decode(&self, item: &DataItem, fallback_id: Option<&HeuristicId>) -> Result<Heuristic> {
    let id = item
      .id()
      .or_else(|| fallback_id.cloned())
      .ok_or(Error::MissingId)?;
    shape::from_item(self.config.shape, id, &item.data)
  }

  // ── Items ─────────────────────────────────────────────────────────────────

  /// `POST /items/query`, following pages until the collection is exhausted.
  pub async fn query_items(&self) -> Result<Vec<Heuristic>> {
    let collection = self.collection()?;
    let limit = self.config.page_limit.max(1);
    let mut offset = 0;
    let mut heuristics = Vec::new();

    loop {
      let body = QueryRequest {
        data_collection_id: collection,
        query:              Query { paging: Paging { limit, offset } },
      };
      let resp = self
        .auth(self.client.post(self.url("/query")))
        .json(&body)
        .send()
        .await?;
      let page: QueryResponse = Self::check("POST /items/query", resp).await?.json().await?;

      let count = page.data_items.len();
      for item in &page.data_items {
        heuristics.push(self.decode(item, None)?);
      }
      debug!(offset, count, "fetched collection page");

      let more = page
        .paging_metadata
        .and_then(|m| m.has_next)
        .unwrap_or(count as u32 == limit);
      if !more || count == 0 {
        break;
      }
      offset += count as u32;
    }

    info!(collection, count = heuristics.len(), "queried remote collection");
    Ok(heuristics)
  }

  /// `POST /items`
  pub async fn insert_item(&self, heuristic: &Heuristic) -> Result<Heuristic> {
    let body = WriteRequest {
      data_collection_id: self.collection()?,
      data_item:          OutgoingItem {
        id:   heuristic.id.as_str(),
        data: shape::to_item(self.config.shape, heuristic)?,
      },
    };
    let resp = self
      .auth(self.client.post(self.url("")))
      .json(&body)
      .send()
      .await?;
    let written: WriteResponse = Self::check("POST /items", resp).await?.json().await?;
    self.written(written, heuristic)
  }

  /// `PUT /items/<id>`
  pub async fn update_item(
    &self,
    id: &HeuristicId,
    heuristic: &Heuristic,
  ) -> Result<Heuristic> {
    let body = WriteRequest {
      data_collection_id: self.collection()?,
      data_item:          OutgoingItem {
        id:   id.as_str(),
        data: shape::to_item(self.config.shape, heuristic)?,
      },
    };
    let resp = self
      .auth(self.client.put(self.url(&format!("/{id}"))))
      .json(&body)
      .send()
      .await?;
    let written: WriteResponse = Self::check("PUT /items", resp).await?.json().await?;
    self.written(written, heuristic)
  }

  /// `DELETE /items/<id>?dataCollectionId=<collection>`
  pub async fn remove_item(&self, id: &HeuristicId) -> Result<()> {
    let collection = self.collection()?;
    let resp = self
      .auth(self.client.delete(self.url(&format!("/{id}"))))
      .query(&[("dataCollectionId", collection)])
      .send()
      .await?;
    Self::check("DELETE /items", resp).await?;
    Ok(())
  }

  /// The record echoed back by a write, or the one sent when the response
  /// carries no item.
  fn written(&self, resp: WriteResponse, sent: &Heuristic) -> Result<Heuristic> {
    match resp.data_item {
      Some(item) => self.decode(&item, Some(&sent.id)),
      None => Ok(sent.clone()),
    }
  }
}

// ─── PersistenceAdapter impl ─────────────────────────────────────────────────

impl PersistenceAdapter for CmsAdapter {
  type Error = Error;

  fn is_configured(&self) -> bool { self.config.is_configured() }

  async fn load(&self) -> Result<Vec<Heuristic>> { self.query_items().await }

  async fn create(&self, heuristic: &Heuristic) -> Result<Heuristic> {
    self.insert_item(heuristic).await
  }

  async fn update(&self, id: &HeuristicId, heuristic: &Heuristic) -> Result<Heuristic> {
    self.update_item(id, heuristic).await
  }

  async fn delete(&self, id: &HeuristicId) -> Result<()> { self.remove_item(id).await }
}
