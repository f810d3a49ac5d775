//! [`SqliteFallback`]: the SQLite implementation of [`FallbackStorage`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use heuristics_core::{adapter::FallbackStorage, heuristic::Heuristic};

use crate::{
  Error, Result,
  schema::{SCHEMA, SNAPSHOT_KEY},
};

// ─── Fallback ────────────────────────────────────────────────────────────────

/// A local snapshot of the heuristic collection in a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteFallback {
  pub(crate) conn: tokio_rusqlite::Connection,
  key:             String,
}

impl SqliteFallback {
  /// Open (or create) the database at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory database. Nothing survives the connection.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  /// Store the snapshot under `key` instead of [`SNAPSHOT_KEY`].
  pub fn with_key(mut self, key: impl Into<String>) -> Self {
    self.key = key.into();
    self
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(Self { conn, key: SNAPSHOT_KEY.to_owned() })
  }

  /// When the snapshot was last written, if ever.
  pub async fn updated_at(&self) -> Result<Option<DateTime<Utc>>> {
    let key = self.key.clone();
    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT updated_at FROM snapshots WHERE key = ?1",
              rusqlite::params![key],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    raw
      .map(|s| {
        DateTime::parse_from_rfc3339(&s)
          .map(|dt| dt.with_timezone(&Utc))
          .map_err(|e| Error::DateParse(format!("{s}: {e}")))
      })
      .transpose()
  }

  /// Drop the stored snapshot.
  pub async fn clear(&self) -> Result<()> {
    let key = self.key.clone();
    self
      .conn
      .call(move |conn| {
        conn.execute("DELETE FROM snapshots WHERE key = ?1", rusqlite::params![key])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn read_snapshot(&self) -> Result<Option<Vec<Heuristic>>> {
    let key = self.key.clone();
    let raw: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value_json FROM snapshots WHERE key = ?1",
              rusqlite::params![key],
              |r| r.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    match raw {
      Some(json) => Ok(Some(serde_json::from_str(&json)?)),
      None => Ok(None),
    }
  }

  async fn write_snapshot(&self, heuristics: &[Heuristic]) -> Result<()> {
    let json = serde_json::to_string(heuristics)?;
    let key = self.key.clone();
    let now = Utc::now().to_rfc3339();
    let count = heuristics.len();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO snapshots (key, value_json, updated_at)
           VALUES (?1, ?2, ?3)
           ON CONFLICT(key) DO UPDATE
             SET value_json = excluded.value_json,
                 updated_at = excluded.updated_at",
          rusqlite::params![key, json, now],
        )?;
        Ok(())
      })
      .await?;

    debug!(count, "wrote local snapshot");
    Ok(())
  }
}

// ─── FallbackStorage impl ────────────────────────────────────────────────────

impl FallbackStorage for SqliteFallback {
  type Error = Error;

  async fn read(&self) -> Result<Option<Vec<Heuristic>>> { self.read_snapshot().await }

  async fn write(&self, heuristics: &[Heuristic]) -> Result<()> {
    self.write_snapshot(heuristics).await
  }
}
