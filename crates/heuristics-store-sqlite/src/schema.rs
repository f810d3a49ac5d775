//! SQL schema for the local fallback database.
//!
//! Executed once at connection startup. The table is a small key/value store;
//! each key holds one JSON snapshot of the whole heuristic collection.

/// Key under which the collection snapshot is stored.
pub const SNAPSHOT_KEY: &str = "mobile-heuristics-v2";

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS snapshots (
    key         TEXT PRIMARY KEY,
    value_json  TEXT NOT NULL,   -- JSON array of heuristic records
    updated_at  TEXT NOT NULL    -- ISO 8601 UTC
);

PRAGMA user_version = 1;
";
