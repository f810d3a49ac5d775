//! Layered configuration: optional TOML file, then `MAB_*` environment
//! variables.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use anyhow::Context as _;
use heuristics_cms::CollectionConfig;
use heuristics_core::{adapter::SyncPolicy, wizard::DEFAULT_DEBOUNCE};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
  /// SQLite file holding the local snapshot. A leading `~/` is expanded.
  #[serde(default = "default_store_path")]
  pub store_path:   PathBuf,
  /// Forward reverts to the remote collection.
  #[serde(default)]
  pub sync_reverts: bool,
  /// Wizard transition cooldown.
  #[serde(default = "default_debounce_ms")]
  pub debounce_ms:  u64,
  /// Remote collection. Absent means local-only.
  #[serde(default)]
  pub cms:          Option<CollectionConfig>,
}

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/mab/heuristics.db") }

fn default_debounce_ms() -> u64 { DEFAULT_DEBOUNCE.as_millis() as u64 }

impl Settings {
  /// Read `path` (if it exists) and overlay the environment, e.g.
  /// `MAB_SYNC_REVERTS=true` or `MAB_CMS__COLLECTION_ID=Import5`.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    config::Config::builder()
      .add_source(config::File::from(path.to_path_buf()).required(false))
      .add_source(
        config::Environment::with_prefix("MAB")
          .prefix_separator("_")
          .separator("__")
          .try_parsing(true),
      )
      .build()
      .context("failed to read configuration")?
      .try_deserialize()
      .context("failed to deserialise settings")
  }

  pub fn store_path(&self) -> PathBuf { expand_tilde(&self.store_path) }

  pub fn debounce(&self) -> Duration { Duration::from_millis(self.debounce_ms) }

  pub fn policy(&self) -> SyncPolicy {
    SyncPolicy { sync_reverts: self.sync_reverts, ..SyncPolicy::default() }
  }

  pub fn collection(&self) -> CollectionConfig { self.cms.clone().unwrap_or_default() }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
