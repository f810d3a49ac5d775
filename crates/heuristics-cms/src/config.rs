//! Collection settings.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Default API host.
pub const DEFAULT_BASE_URL: &str = "https://www.wixapis.com";

/// Items fetched per query page.
pub const DEFAULT_PAGE_LIMIT: u32 = 1000;

/// How a collection lays out heuristic fields.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FieldShape {
  /// One column per wizard key (`step1_who_element` ... `step6_output`) plus
  /// `status` and `history` (a JSON string).
  #[default]
  SixStep,
  /// The earlier layout: `elementType`, `category`, `condition`, `decision`,
  /// `mobileResult` and `title`. No status or history.
  Legacy,
}

impl FieldShape {
  /// Collection id conventionally used with this shape.
  pub fn default_collection(self) -> &'static str {
    match self {
      Self::SixStep => "Import5",
      Self::Legacy => "Mobile-Algo-Heuristics",
    }
  }
}

/// Where the remote collection lives and how to talk to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
  #[serde(default = "default_base_url")]
  pub base_url:      String,
  /// Empty means unconfigured.
  #[serde(default)]
  pub collection_id: String,
  #[serde(default)]
  pub shape:         FieldShape,
  /// Sent verbatim as the `Authorization` header.
  #[serde(default)]
  pub api_key:       Option<String>,
  #[serde(default)]
  pub site_id:       Option<String>,
  #[serde(default = "default_page_limit")]
  pub page_limit:    u32,
}

fn default_base_url() -> String { DEFAULT_BASE_URL.to_owned() }

fn default_page_limit() -> u32 { DEFAULT_PAGE_LIMIT }

impl Default for CollectionConfig {
  fn default() -> Self {
    Self {
      base_url:      default_base_url(),
      collection_id: String::new(),
      shape:         FieldShape::default(),
      api_key:       None,
      site_id:       None,
      page_limit:    DEFAULT_PAGE_LIMIT,
    }
  }
}

impl CollectionConfig {
  pub fn new(
    base_url: impl Into<String>,
    collection_id: impl Into<String>,
    shape: FieldShape,
  ) -> Self {
    Self {
      base_url: base_url.into(),
      collection_id: collection_id.into(),
      shape,
      ..Self::default()
    }
  }

  pub fn is_configured(&self) -> bool {
    !self.collection_id.trim().is_empty() && !self.base_url.trim().is_empty()
  }
}
