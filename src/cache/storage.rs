//! Cache storage trait and its implementations.

use chrono::{DateTime, Utc};
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// A value read back from a storage slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
  /// Serialized payload
  pub value: String,
  /// When the slot was last written
  pub saved_at: DateTime<Utc>,
}

/// Trait for cache storage backends.
///
/// A backend is a set of named slots holding serialized text. Writing a slot
/// replaces its previous content.
pub trait CacheStorage: Send + Sync {
  /// Overwrite a slot.
  fn put(&self, slot: &str, value: &str) -> Result<()>;

  /// Read a slot, `None` if it was never written.
  fn get(&self, slot: &str) -> Result<Option<StoredValue>>;
}

/// Storage implementation that doesn't cache anything.
/// Used when caching is disabled - all operations are no-ops.
pub struct NoopStorage;

impl CacheStorage for NoopStorage {
  fn put(&self, _slot: &str, _value: &str) -> Result<()> {
    Ok(()) // Discard
  }

  fn get(&self, _slot: &str) -> Result<Option<StoredValue>> {
    Ok(None) // Always miss
  }
}

/// In-process storage, lost when the program exits.
#[derive(Default)]
pub struct MemoryStorage {
  slots: Mutex<HashMap<String, StoredValue>>,
}

impl MemoryStorage {
  pub fn new() -> Self {
    Self::default()
  }
}

impl CacheStorage for MemoryStorage {
  fn put(&self, slot: &str, value: &str) -> Result<()> {
    let mut slots = self
      .slots
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    slots.insert(
      slot.to_string(),
      StoredValue {
        value: value.to_string(),
        saved_at: Utc::now(),
      },
    );
    Ok(())
  }

  fn get(&self, slot: &str) -> Result<Option<StoredValue>> {
    let slots = self
      .slots
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;
    Ok(slots.get(slot).cloned())
  }
}

/// SQLite-based cache storage implementation.
pub struct SqliteStorage {
  conn: Mutex<Connection>,
}

impl SqliteStorage {
  /// Open the cache database, creating it if needed.
  ///
  /// Uses `path` when given, otherwise the default location in the data dir.
  pub fn open(path: Option<&Path>) -> Result<Self> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::default_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)
        .map_err(|e| eyre!("Failed to create cache directory: {}", e))?;
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open cache database at {}: {}", path.display(), e))?;

    let storage = Self {
      conn: Mutex::new(conn),
    };
    storage.run_migrations()?;

    Ok(storage)
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    Ok(crate::config::Config::data_dir()?.join("cache.db"))
  }

  /// Run database migrations for cache tables.
  fn run_migrations(&self) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute_batch(CACHE_SCHEMA)
      .map_err(|e| eyre!("Failed to run cache migrations: {}", e))?;

    Ok(())
  }
}

/// Schema for cache tables.
const CACHE_SCHEMA: &str = r#"
-- One row per named slot; writes replace the row
CREATE TABLE IF NOT EXISTS cache_slots (
    slot TEXT PRIMARY KEY,
    data TEXT NOT NULL,
    saved_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;

impl CacheStorage for SqliteStorage {
  fn put(&self, slot: &str, value: &str) -> Result<()> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    conn
      .execute(
        "INSERT OR REPLACE INTO cache_slots (slot, data, saved_at)
         VALUES (?, ?, datetime('now'))",
        params![slot, value],
      )
      .map_err(|e| eyre!("Failed to store cache slot {}: {}", slot, e))?;

    Ok(())
  }

  fn get(&self, slot: &str) -> Result<Option<StoredValue>> {
    let conn = self
      .conn
      .lock()
      .map_err(|e| eyre!("Lock poisoned: {}", e))?;

    let row: Option<(String, String)> = conn
      .query_row(
        "SELECT data, saved_at FROM cache_slots WHERE slot = ?",
        params![slot],
        |row| Ok((row.get(0)?, row.get(1)?)),
      )
      .optional()
      .map_err(|e| eyre!("Failed to read cache slot {}: {}", slot, e))?;

    match row {
      Some((value, saved_at)) => Ok(Some(StoredValue {
        value,
        saved_at: parse_datetime(&saved_at)?,
      })),
      None => Ok(None),
    }
  }
}

/// Parse a datetime string from SQLite format.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
  // SQLite stores as "YYYY-MM-DD HH:MM:SS"
  chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
    .map(|dt| dt.and_utc())
    .map_err(|e| eyre!("Failed to parse datetime '{}': {}", s, e))
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  #[test]
  fn test_noop_storage_always_misses() {
    let storage = NoopStorage;
    storage.put("news", "[]").unwrap();
    assert_eq!(storage.get("news").unwrap(), None);
  }

  #[test]
  fn test_memory_storage_overwrites() {
    let storage = MemoryStorage::new();
    assert_eq!(storage.get("news").unwrap(), None);

    storage.put("news", "first").unwrap();
    storage.put("news", "second").unwrap();
    storage.put("other", "x").unwrap();

    assert_eq!(storage.get("news").unwrap().unwrap().value, "second");
    assert_eq!(storage.get("other").unwrap().unwrap().value, "x");
  }

  #[test]
  fn test_sqlite_storage_persists_across_opens() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("cache.db");

    {
      let storage = SqliteStorage::open(Some(&path)).unwrap();
      assert_eq!(storage.get("news").unwrap(), None);
      storage.put("news", "first").unwrap();
      storage.put("news", "second").unwrap();
    }

    let storage = SqliteStorage::open(Some(&path)).unwrap();
    let stored = storage.get("news").unwrap().unwrap();
    assert_eq!(stored.value, "second");
    assert!(Utc::now() - stored.saved_at < chrono::Duration::minutes(5));
  }

  #[test]
  fn test_parse_datetime() {
    let dt = parse_datetime("2025-03-14 09:30:00").unwrap();
    assert_eq!(dt.to_rfc3339(), "2025-03-14T09:30:00+00:00");
    assert!(parse_datetime("not a date").is_err());
  }
}
